//! Declaration name collection from module texts.
//!
//! Harvests the names of top-level declarations a module defines, so the same
//! declarations can later be excised from the monolithic source:
//! - `function name(` and `async function name(`
//! - `const name = function(` and `const name = async function(`
//! - `const UPPER_SNAKE = {` (reported separately as constants)
//!
//! Matching is line-anchored pattern matching, not parsing. Module files are
//! read and scanned in parallel; results are unioned into ordered sets so the
//! outcome does not depend on scheduling.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExcisorError, ExcisorResult};
use crate::name::{DeclarationName, NameSet};

fn function_decl_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by unit tests.
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t]*(?:export[ \t]+)?(?:async[ \t]+)?function[ \t]+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(",
        )
        .expect("Hardcoded regex pattern is valid")
    })
}

fn const_function_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by unit tests.
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?m)^[ \t]*(?:export[ \t]+)?const[ \t]+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(?:async\s+)?function\s*\(",
        )
        .expect("Hardcoded regex pattern is valid")
    })
}

fn const_object_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and covered by unit tests.
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:export[ \t]+)?const[ \t]+([A-Z_][A-Z0-9_]*)\s*=\s*\{")
            .expect("Hardcoded regex pattern is valid")
    })
}

fn capture_names(regex: &Regex, text: &str, into: &mut NameSet) {
    for caps in regex.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            // The capture group only admits identifier characters.
            if let Ok(name) = DeclarationName::new(m.as_str()) {
                into.insert(name);
            }
        }
    }
}

/// Declarations found in a single module text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclarations {
    /// Function names (plain, async, and const-assigned functions).
    pub functions: NameSet,
    /// Upper-snake-case constant object bindings.
    pub constants: NameSet,
}

/// Extracts function and constant names declared in `text`.
pub fn extract_declarations(text: &str) -> ModuleDeclarations {
    let mut decls = ModuleDeclarations::default();
    capture_names(function_decl_regex(), text, &mut decls.functions);
    capture_names(const_function_regex(), text, &mut decls.functions);
    capture_names(const_object_regex(), text, &mut decls.constants);
    decls
}

/// Unions the function names declared across all `texts`.
pub fn collect_names<S: AsRef<str>>(texts: &[S]) -> NameSet {
    texts
        .iter()
        .flat_map(|t| extract_declarations(t.as_ref()).functions)
        .collect()
}

/// Outcome of harvesting one module file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleOutcome {
    Scanned(ModuleDeclarations),
    Missing,
}

/// Harvest result for one module path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleHarvest {
    pub path: PathBuf,
    pub outcome: ModuleOutcome,
}

/// Names harvested from a list of module files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Harvest {
    /// Union of function names from every scanned module.
    pub functions: NameSet,
    /// Union of constant object names from every scanned module.
    pub constants: NameSet,
    /// Per-module outcomes, in input order.
    pub modules: Vec<ModuleHarvest>,
}

impl Harvest {
    /// Paths that could not be found.
    pub fn missing(&self) -> impl Iterator<Item = &Path> {
        self.modules
            .iter()
            .filter(|m| m.outcome == ModuleOutcome::Missing)
            .map(|m| m.path.as_path())
    }
}

fn harvest_one(path: &Path) -> ExcisorResult<ModuleHarvest> {
    let outcome = match fs::read_to_string(path) {
        Ok(text) => {
            let decls = extract_declarations(&text);
            debug!(
                module = %path.display(),
                functions = decls.functions.len(),
                constants = decls.constants.len(),
                "scanned module"
            );
            ModuleOutcome::Scanned(decls)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(module = %path.display(), "module file not found, skipping");
            ModuleOutcome::Missing
        }
        Err(e) => return Err(ExcisorError::io(path, e)),
    };

    Ok(ModuleHarvest {
        path: path.to_path_buf(),
        outcome,
    })
}

/// Reads every module file and unions the names they declare.
///
/// Missing files are recorded as [`ModuleOutcome::Missing`]; any other read
/// failure aborts the harvest.
pub fn harvest_modules(paths: &[PathBuf]) -> ExcisorResult<Harvest> {
    let modules = paths
        .par_iter()
        .map(|p| harvest_one(p))
        .collect::<ExcisorResult<Vec<_>>>()?;

    let mut harvest = Harvest::default();
    for module in &modules {
        if let ModuleOutcome::Scanned(decls) = &module.outcome {
            harvest.functions.extend(decls.functions.iter().cloned());
            harvest.constants.extend(decls.constants.iter().cloned());
        }
    }
    harvest.modules = modules;
    Ok(harvest)
}

/// Renders the harvested names as a plain listing with `FUNCTIONS:` and
/// `CONSTANTS:` sections.
pub fn render_name_list(harvest: &Harvest) -> String {
    let mut out = String::from("FUNCTIONS:\n");
    for name in &harvest.functions {
        out.push_str(name.as_str());
        out.push('\n');
    }
    out.push_str("\nCONSTANTS:\n");
    for name in &harvest.constants {
        out.push_str(name.as_str());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("excisor_collect_test")
            .join(format!("{}_{}", name, id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    fn names(set: &NameSet) -> Vec<&str> {
        set.iter().map(DeclarationName::as_str).collect()
    }

    #[test]
    fn test_extract_plain_and_async_functions() {
        let text = "function showLoading() {}\nasync function loadExportHistory(page) {}\n";
        let decls = extract_declarations(text);
        assert_eq!(names(&decls.functions), vec!["loadExportHistory", "showLoading"]);
    }

    #[test]
    fn test_extract_const_functions() {
        let text = "const debounce = function(fn, wait) {};\nconst load = async function () {};\n";
        let decls = extract_declarations(text);
        assert_eq!(names(&decls.functions), vec!["debounce", "load"]);
    }

    #[test]
    fn test_extract_constants_separately() {
        let text = "const COST_CONSTANTS = {\n  a: 1\n};\nconst lower = { a: 1 };\n";
        let decls = extract_declarations(text);
        assert!(decls.functions.is_empty());
        assert_eq!(names(&decls.constants), vec!["COST_CONSTANTS"]);
    }

    #[test]
    fn test_nested_functions_not_line_anchored_are_ignored() {
        let text = "function outer() { return function inner() {}; }\nfoo(function named() {});\n";
        let decls = extract_declarations(text);
        assert_eq!(names(&decls.functions), vec!["outer"]);
    }

    #[test]
    fn test_indented_and_exported_declarations() {
        let text = "    function indented() {}\nexport function exported() {}\n";
        let decls = extract_declarations(text);
        assert_eq!(names(&decls.functions), vec!["exported", "indented"]);
    }

    #[test]
    fn test_collect_names_dedups_across_modules() {
        let a = "function shared() {}\nfunction onlyA() {}\n";
        let b = "function shared() {}\n";
        let set = collect_names(&[a, b]);
        assert_eq!(names(&set), vec!["onlyA", "shared"]);
    }

    #[test]
    fn test_harvest_skips_missing_modules() {
        let dir = create_temp_dir("harvest_missing");
        let present = dir.join("orders-utils.js");
        fs::write(&present, "function escapeHtml(s) {}\nconst TAX = {};\n").unwrap();
        let missing = dir.join("orders-gone.js");

        let harvest = harvest_modules(&[present.clone(), missing.clone()]).unwrap();
        assert_eq!(names(&harvest.functions), vec!["escapeHtml"]);
        assert_eq!(names(&harvest.constants), vec!["TAX"]);
        assert_eq!(harvest.modules.len(), 2);
        assert_eq!(harvest.modules[0].path, present);
        assert_eq!(harvest.missing().collect::<Vec<_>>(), vec![missing.as_path()]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_render_name_list() {
        let mut harvest = Harvest::default();
        harvest.functions = crate::name::parse_names(["b", "a"]).unwrap();
        harvest.constants = crate::name::parse_names(["COST"]).unwrap();
        assert_eq!(render_name_list(&harvest), "FUNCTIONS:\na\nb\n\nCONSTANTS:\nCOST\n");
    }
}
