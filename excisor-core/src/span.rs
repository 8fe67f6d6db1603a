//! Half-open byte ranges into a source text.

use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of byte offsets into a source text.
///
/// Offsets always fall on UTF-8 character boundaries: spans are built from
/// line starts and ASCII delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered substring of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// `text` with this span replaced by `replacement`.
    pub fn splice(&self, text: &str, replacement: &str) -> String {
        let mut out = String::with_capacity(text.len() - self.len() + replacement.len());
        out.push_str(&text[..self.start]);
        out.push_str(replacement);
        out.push_str(&text[self.end..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_and_len() {
        let span = Span::new(4, 9);
        assert_eq!(span.slice("let hello = 1;"), "hello");
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_splice_removes_range() {
        let span = Span::new(2, 5);
        assert_eq!(span.splice("abXYZcd", ""), "abcd");
        assert_eq!(span.splice("abXYZcd", "--"), "ab--cd");
    }

    #[test]
    fn test_empty_span() {
        let span = Span::new(3, 3);
        assert!(span.is_empty());
        assert_eq!(span.splice("abcdef", ""), "abcdef");
    }
}
