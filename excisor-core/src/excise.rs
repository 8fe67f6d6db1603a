//! Declaration excision.
//!
//! [`excise`] removes a single declaration; [`excise_all`] threads the text
//! through one removal per name, in sorted order. Every removal re-scans the
//! output of the previous one, so no offset is ever reused after the text
//! has changed.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::locate::{locate, DeclKind, LocateOptions, MissReason};
use crate::name::{DeclarationName, NameSet};
use crate::report::{Outcome, RemovalReport};
use crate::span::Span;

/// Knobs for a removal run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExciseOptions {
    /// Also excise `const NAME = { ... };` objects.
    pub remove_constants: bool,
    /// Bound on comment lines absorbed above a header.
    pub comment_lookback: Option<usize>,
    /// Text left in place of each removed span; `{name}` expands to the name.
    pub tombstone: Option<String>,
    /// Collapse runs of blank lines once all removals are done.
    ///
    /// The pass is textual and covers the whole file, so blank runs inside
    /// multi-line template literals are collapsed as well.
    pub collapse_blank_lines: bool,
}

impl ExciseOptions {
    fn locate_options(&self) -> LocateOptions {
        LocateOptions {
            constants: self.remove_constants,
            comment_lookback: self.comment_lookback,
        }
    }

    fn replacement(&self, name: &DeclarationName) -> String {
        self.tombstone
            .as_deref()
            .map(|t| t.replace("{name}", name.as_str()))
            .unwrap_or_default()
    }
}

/// Result of a single removal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Excision {
    /// The declaration was cut; `text` is the new source.
    Removed {
        text: String,
        span: Span,
        kind: DeclKind,
    },
    /// Nothing was cut; the caller's text is still current.
    NotFound(MissReason),
}

/// Removes `name`'s declaration (and its leading comments) from `text`.
pub fn excise(text: &str, name: &DeclarationName, opts: &ExciseOptions) -> Excision {
    match locate(text, name, &opts.locate_options()) {
        Ok(located) => Excision::Removed {
            text: located.span.splice(text, &opts.replacement(name)),
            span: located.span,
            kind: located.kind,
        },
        Err(reason) => Excision::NotFound(reason),
    }
}

/// Removes every name in `names` from `source`, in sorted order.
///
/// Returns the final text and the report of the run.
pub fn excise_all(
    source: &str,
    names: &NameSet,
    opts: &ExciseOptions,
) -> (String, RemovalReport) {
    let mut text = source.to_string();
    let mut outcomes = BTreeMap::new();

    for name in names {
        debug!(name = %name, "excising");
        let outcome = match excise(&text, name, opts) {
            Excision::Removed {
                text: next,
                span,
                kind,
            } => {
                info!(name = %name, kind = ?kind, bytes = span.len(), "removed declaration");
                text = next;
                Outcome::Removed {
                    kind,
                    bytes: span.len(),
                }
            }
            Excision::NotFound(reason) => {
                match reason {
                    MissReason::NoHeader => debug!(name = %name, "declaration not found"),
                    MissReason::Unbalanced => {
                        warn!(name = %name, "unbalanced braces, leaving declaration in place")
                    }
                }
                Outcome::NotFound { reason }
            }
        };
        outcomes.insert(name.clone(), outcome);
    }

    if opts.collapse_blank_lines {
        text = collapse_blank_lines(&text);
    }

    let report = RemovalReport::new(outcomes, source, &text);
    info!(
        attempted = report.attempted(),
        removed = report.removed().len(),
        not_found = report.not_found().len(),
        "excision finished"
    );
    (text, report)
}

fn blank_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by unit tests.
    REGEX.get_or_init(|| {
        Regex::new(r"(\r?\n)[ \t]*\r?\n(?:[ \t]*\r?\n)+").expect("Hardcoded regex pattern is valid")
    })
}

/// Collapses three or more consecutive line breaks into one blank line.
///
/// The run keeps the style of its first line break, so CRLF text stays CRLF.
pub fn collapse_blank_lines(text: &str) -> String {
    blank_line_regex().replace_all(text, "${1}${1}").into_owned()
}
