//! Removal report: per-name outcomes plus before/after text metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::locate::{DeclKind, MissReason};
use crate::name::DeclarationName;

/// Result of attempting to excise one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Removed { kind: DeclKind, bytes: usize },
    NotFound { reason: MissReason },
}

impl Outcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}

/// Size of a text in bytes, characters and lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub bytes: usize,
    pub chars: usize,
    pub lines: usize,
}

impl TextMetrics {
    pub fn of(text: &str) -> Self {
        Self {
            bytes: text.len(),
            chars: text.chars().count(),
            lines: text.lines().count(),
        }
    }
}

/// SHA-256 of a text, hex encoded.
pub fn text_digest(text: &str) -> String {
    let mut sha = Sha256::new();
    sha.update(text.as_bytes());
    format!("{:x}", sha.finalize())
}

/// Auditable summary of one excision run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    outcomes: BTreeMap<DeclarationName, Outcome>,
    before: TextMetrics,
    after: TextMetrics,
    sha256_before: String,
    sha256_after: String,
    generated_at: String,
}

impl RemovalReport {
    pub fn new(outcomes: BTreeMap<DeclarationName, Outcome>, before: &str, after: &str) -> Self {
        Self {
            outcomes,
            before: TextMetrics::of(before),
            after: TextMetrics::of(after),
            sha256_before: text_digest(before),
            sha256_after: text_digest(after),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn outcomes(&self) -> &BTreeMap<DeclarationName, Outcome> {
        &self.outcomes
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.get(name)
    }

    /// Names whose declaration was removed, sorted.
    pub fn removed(&self) -> Vec<&DeclarationName> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_removed())
            .map(|(n, _)| n)
            .collect()
    }

    /// Names whose declaration could not be located, sorted.
    pub fn not_found(&self) -> Vec<&DeclarationName> {
        self.outcomes
            .iter()
            .filter(|(_, o)| !o.is_removed())
            .map(|(n, _)| n)
            .collect()
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn before(&self) -> TextMetrics {
        self.before
    }

    pub fn after(&self) -> TextMetrics {
        self.after
    }

    pub fn sha256_before(&self) -> &str {
        &self.sha256_before
    }

    pub fn sha256_after(&self) -> &str {
        &self.sha256_after
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    /// Net bytes removed (negative when tombstones outgrow the removed spans).
    pub fn bytes_removed(&self) -> i64 {
        self.before.bytes as i64 - self.after.bytes as i64
    }

    /// Whether the run changed the text at all.
    pub fn is_unchanged(&self) -> bool {
        self.sha256_before == self.sha256_after
    }
}

/// Renders the report as human-readable text.
pub fn render_plain(report: &RemovalReport) -> String {
    let removed = report.removed();
    let not_found = report.not_found();
    let mut out = String::new();

    out.push_str("=== Excision Report ===\n");
    out.push_str(&format!("Attempted: {}\n", report.attempted()));
    out.push_str(&format!("Removed:   {}\n", removed.len()));
    out.push_str(&format!("Not found: {}\n", not_found.len()));
    out.push_str(&format!(
        "Size:      {} -> {} chars, {} -> {} lines ({} bytes removed)\n",
        report.before.chars,
        report.after.chars,
        report.before.lines,
        report.after.lines,
        report.bytes_removed()
    ));

    if !not_found.is_empty() {
        out.push_str("\nNOT FOUND:\n");
        for name in not_found {
            let reason = match report.outcomes.get(name) {
                Some(Outcome::NotFound {
                    reason: MissReason::Unbalanced,
                }) => " (unbalanced braces)",
                _ => "",
            };
            out.push_str(&format!("  - {}{}\n", name, reason));
        }
    }
    out
}

/// Prints the report in plain text format.
pub fn print_plain(report: &RemovalReport) {
    print!("{}", render_plain(report));
}

/// Renders the machine-readable report: summary counts and name lists
/// alongside the full serialized report.
pub fn render_json(report: &RemovalReport) -> serde_json::Value {
    serde_json::json!({
        "attempted": report.attempted(),
        "removed": report.removed(),
        "not_found": report.not_found(),
        "bytes_before": report.before.bytes,
        "bytes_after": report.after.bytes,
        "report": report,
    })
}

/// Prints the report in JSON format.
///
/// Falls back to the plain rendering if serialization fails.
pub fn print_json(report: &RemovalReport) {
    match serde_json::to_string_pretty(&render_json(report)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            print_plain(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DeclarationName {
        DeclarationName::new(s).unwrap()
    }

    fn sample() -> RemovalReport {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(
            name("showTable"),
            Outcome::Removed {
                kind: DeclKind::Function,
                bytes: 20,
            },
        );
        outcomes.insert(
            name("goToPage"),
            Outcome::NotFound {
                reason: MissReason::NoHeader,
            },
        );
        outcomes.insert(
            name("broken"),
            Outcome::NotFound {
                reason: MissReason::Unbalanced,
            },
        );
        RemovalReport::new(outcomes, "line one\nline two\n", "line one\n")
    }

    #[test]
    fn test_metrics() {
        let m = TextMetrics::of("héllo\nworld\n");
        assert_eq!(m.bytes, 13);
        assert_eq!(m.chars, 12);
        assert_eq!(m.lines, 2);
    }

    #[test]
    fn test_removed_and_not_found_sorted() {
        let report = sample();
        let removed: Vec<&str> = report.removed().iter().map(|n| n.as_str()).collect();
        let missing: Vec<&str> = report.not_found().iter().map(|n| n.as_str()).collect();
        assert_eq!(removed, vec!["showTable"]);
        assert_eq!(missing, vec!["broken", "goToPage"]);
        assert_eq!(report.attempted(), 3);
        assert_eq!(report.bytes_removed(), 9);
        assert!(!report.is_unchanged());
    }

    #[test]
    fn test_digest_matches_for_identical_text() {
        let report = RemovalReport::new(BTreeMap::new(), "same", "same");
        assert!(report.is_unchanged());
        assert_eq!(report.sha256_before().len(), 64);
    }

    #[test]
    fn test_render_plain_lists_missing() {
        let text = render_plain(&sample());
        assert!(text.contains("Attempted: 3"));
        assert!(text.contains("Removed:   1"));
        assert!(text.contains("  - broken (unbalanced braces)"));
        assert!(text.contains("  - goToPage\n"));
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["outcomes"]["showTable"]["outcome"], "removed");
        assert_eq!(json["outcomes"]["goToPage"]["reason"], "no_header");
        assert_eq!(json["before"]["lines"], 2);
    }

    #[test]
    fn test_render_json_summary() {
        let json = render_json(&sample());
        assert_eq!(json["attempted"], 3);
        assert_eq!(json["removed"], serde_json::json!(["showTable"]));
        assert_eq!(json["not_found"], serde_json::json!(["broken", "goToPage"]));
        assert_eq!(json["bytes_before"], 18);
        assert_eq!(json["bytes_after"], 9);
        assert_eq!(json["report"]["outcomes"]["broken"]["reason"], "unbalanced");
        assert_eq!(json["report"]["sha256_before"].as_str().map(str::len), Some(64));
    }
}
