//! Declaration span location.
//!
//! Finds where a named declaration starts, extends the start backward over
//! its attached comment lines, and extends the end forward to the matching
//! closing brace by depth counting.
//!
//! # Known limitation
//!
//! The brace scan counts every `{` and `}` byte. Braces inside string,
//! template, regex or comment literals are NOT distinguished from structural
//! braces, so a body such as `return "{";` desynchronizes the count. This is a
//! structural tool working on raw text, not a parser. When the count never
//! returns to zero the declaration is reported as not found and the text is
//! left untouched.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::name::{is_ident_char, DeclarationName};
use crate::span::Span;

/// Syntactic form of a located declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// `function name(...) {}` or `async function name(...) {}`
    Function,
    /// `const name = function(...) {};` (optionally `async`)
    ConstFunction,
    /// `const NAME = { ... };`
    ConstObject,
}

/// Why a declaration could not be excised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// No declaration header for the name exists in the text.
    NoHeader,
    /// A header exists but its closing brace was never balanced.
    Unbalanced,
}

/// Controls how far a located span reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocateOptions {
    /// Also match `const NAME = {` object bindings.
    pub constants: bool,
    /// Maximum number of lines examined above the header when absorbing
    /// comments. `None` walks until the first code line.
    pub comment_lookback: Option<usize>,
}

/// A declaration header found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: DeclKind,
    /// Offset of the first keyword (`async`, `function` or `const`).
    pub start: usize,
    /// Offset of the opening brace of the body.
    pub open_brace: usize,
}

/// A fully located declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub kind: DeclKind,
    /// Deletion range, including attached leading comments.
    pub span: Span,
}

/// Per-name header patterns, compiled once per name.
struct HeaderPatterns {
    function: Regex,
    const_function: Regex,
    const_object: Regex,
}

impl HeaderPatterns {
    fn for_name(name: &DeclarationName) -> Option<Self> {
        let escaped = regex::escape(name.as_str());
        Some(Self {
            function: Regex::new(&format!(r"function\s+{}\s*\(", escaped)).ok()?,
            const_function: Regex::new(&format!(
                r"const\s+{}\s*=\s*(?:async\s+)?function\s*\(",
                escaped
            ))
            .ok()?,
            const_object: Regex::new(&format!(r"const\s+{}\s*=\s*\{{", escaped)).ok()?,
        })
    }
}

/// Whether the keyword at `pos` starts a whole identifier.
#[inline]
fn starts_word(text: &str, pos: usize) -> bool {
    text[..pos].chars().next_back().map_or(true, |c| !is_ident_char(c))
}

/// Offset of an `async` keyword directly before `pos` (separated by
/// whitespace), if any.
fn async_prefix(text: &str, pos: usize) -> Option<usize> {
    let before = &text[..pos];
    let trimmed = before.trim_end();
    if trimmed.len() == before.len() {
        return None;
    }
    let start = trimmed.strip_suffix("async").map(str::len)?;
    starts_word(text, start).then_some(start)
}

/// Index just past the delimiter matching the `open` byte at `from`.
///
/// Returns `None` when the text ends before the depth returns to zero.
fn match_delimiter(bytes: &[u8], from: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        if b == open {
            depth += 1;
        } else if b == close {
            // A stray closer before the first opener cannot occur: `from`
            // always points at an opener.
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i + 1);
            }
        }
    }
    None
}

/// Index of the first non-whitespace byte at or after `from`.
fn skip_whitespace(bytes: &[u8], from: usize) -> Option<usize> {
    bytes
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, b)| !b.is_ascii_whitespace())
        .map(|(i, _)| i)
}

/// Body brace of a function-like header whose `(` is at `paren`.
///
/// The parameter list is balanced first so destructured parameters are not
/// mistaken for the body. Returns `None` when the next token is not `{`.
fn body_after_params(bytes: &[u8], paren: usize) -> Option<usize> {
    let after_params = match_delimiter(bytes, paren, b'(', b')')?;
    let brace = skip_whitespace(bytes, after_params)?;
    (bytes[brace] == b'{').then_some(brace)
}

fn find_function_like(text: &str, regex: &Regex, kind: DeclKind) -> Option<Header> {
    let bytes = text.as_bytes();
    regex.find_iter(text).find_map(|m| {
        if !starts_word(text, m.start()) {
            return None;
        }
        let start = match kind {
            DeclKind::Function => async_prefix(text, m.start()).unwrap_or(m.start()),
            _ => m.start(),
        };
        let open_brace = body_after_params(bytes, m.end() - 1)?;
        Some(Header {
            kind,
            start,
            open_brace,
        })
    })
}

fn find_const_object(text: &str, regex: &Regex) -> Option<Header> {
    regex
        .find_iter(text)
        .find(|m| starts_word(text, m.start()))
        .map(|m| Header {
            kind: DeclKind::ConstObject,
            start: m.start(),
            open_brace: m.end() - 1,
        })
}

/// Finds the first declaration header for `name`.
///
/// Function declarations are preferred over const-assigned functions, which
/// are preferred over constant objects.
pub fn find_header(text: &str, name: &DeclarationName, constants: bool) -> Option<Header> {
    let patterns = HeaderPatterns::for_name(name)?;
    find_function_like(text, &patterns.function, DeclKind::Function)
        .or_else(|| find_function_like(text, &patterns.const_function, DeclKind::ConstFunction))
        .or_else(|| {
            if constants {
                find_const_object(text, &patterns.const_object)
            } else {
                None
            }
        })
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

/// Start offset of the deletion for a header at `header_start`.
///
/// When the header is the first token on its line, contiguous comment lines
/// above it (possibly separated from it by blank lines) are absorbed. Blank
/// lines above the topmost comment stay in place. A multi-line block comment
/// is absorbed only as a whole: if its `/*` opener is not reached, the walk
/// backs off to where the block began.
pub fn extend_over_comments(text: &str, header_start: usize, lookback: Option<usize>) -> usize {
    let line_start = text[..header_start].rfind('\n').map_or(0, |i| i + 1);
    if !text[line_start..header_start].trim().is_empty() {
        return header_start;
    }

    let mut start = header_start;
    let mut cursor = line_start;
    let mut examined = 0usize;
    // Start offset to restore if the opener of a block comment is never reached.
    let mut in_block: Option<usize> = None;

    while cursor > 0 {
        if lookback.is_some_and(|max| examined >= max) {
            break;
        }
        let line_end = cursor - 1;
        let prev_start = text[..line_end].rfind('\n').map_or(0, |i| i + 1);
        let trimmed = text[prev_start..line_end].trim();
        examined += 1;
        cursor = prev_start;

        if let Some(saved) = in_block {
            if !trimmed.contains("/*") {
                start = prev_start;
                continue;
            }
            if trimmed.starts_with("/*") {
                start = prev_start;
                in_block = None;
                continue;
            }
            // Code before the opener on the same line.
            start = saved;
            in_block = None;
            break;
        }

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.contains("*/") && !trimmed.contains("/*") {
            in_block = Some(start);
            start = prev_start;
        } else if is_comment_line(trimmed) {
            start = prev_start;
        } else {
            break;
        }
    }

    if let Some(saved) = in_block {
        start = saved;
    }
    start
}

/// Locates the full deletion span of `name`'s declaration.
pub fn locate(
    text: &str,
    name: &DeclarationName,
    opts: &LocateOptions,
) -> Result<Located, MissReason> {
    let header = find_header(text, name, opts.constants).ok_or(MissReason::NoHeader)?;
    let bytes = text.as_bytes();

    let mut end =
        match_delimiter(bytes, header.open_brace, b'{', b'}').ok_or(MissReason::Unbalanced)?;
    if header.kind != DeclKind::Function && bytes.get(end) == Some(&b';') {
        end += 1;
    }

    let start = extend_over_comments(text, header.start, opts.comment_lookback);
    Ok(Located {
        kind: header.kind,
        span: Span::new(start, end),
    })
}
