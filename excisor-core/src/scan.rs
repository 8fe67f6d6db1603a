//! Module file discovery.
//!
//! Lists the module files whose declarations should be harvested, with early
//! pruning of vendored and VCS directories when walking recursively.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::warn;
use walkdir::WalkDir;

/// Directories never descended into.
const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "target", "dist"];

/// Which files in a module directory count as modules.
#[derive(Debug, Clone)]
pub struct ModuleFilter {
    /// File extension without the dot.
    pub extension: String,
    /// File names to skip (e.g. the module entry point).
    pub exclude: Vec<String>,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for ModuleFilter {
    fn default() -> Self {
        Self {
            extension: "js".to_string(),
            exclude: Vec::new(),
            recursive: false,
        }
    }
}

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| EXCLUDED_DIRS.contains(&name))
}

/// Gathers module files under `dir`, sorted by path.
///
/// A missing directory yields an empty list with a warning, matching the
/// non-fatal handling of missing module files.
pub fn discover_modules(dir: &Path, filter: &ModuleFilter) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "module directory not found, nothing to harvest");
        return Ok(Vec::new());
    }

    let skip: HashSet<&str> = filter.exclude.iter().map(String::as_str).collect();
    let max_depth = if filter.recursive { usize::MAX } else { 1 };

    let mut files = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                let wanted = path.is_file()
                    && path.extension().is_some_and(|ext| ext == filter.extension.as_str())
                    && !e.file_name().to_str().is_some_and(|n| skip.contains(n));
                wanted.then(|| Ok(path.to_path_buf()))
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to list module files in {}", dir.display()))?;

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("excisor_scan_test")
            .join(format!("{}_{}", name, id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    #[test]
    fn test_discover_filters_extension_and_excludes() {
        let dir = create_temp_dir("filter");
        for f in ["orders-utils.js", "orders-main.js", "orders-table.js", "notes.md"] {
            fs::write(dir.join(f), "").unwrap();
        }

        let filter = ModuleFilter {
            exclude: vec!["orders-main.js".to_string()],
            ..ModuleFilter::default()
        };
        let files = discover_modules(&dir, &filter).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["orders-table.js", "orders-utils.js"]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_discover_non_recursive_by_default() {
        let dir = create_temp_dir("shallow");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("top.js"), "").unwrap();
        fs::write(dir.join("nested/deep.js"), "").unwrap();

        let shallow = discover_modules(&dir, &ModuleFilter::default()).unwrap();
        assert_eq!(shallow, vec![dir.join("top.js")]);

        let filter = ModuleFilter {
            recursive: true,
            ..ModuleFilter::default()
        };
        let deep = discover_modules(&dir, &filter).unwrap();
        assert_eq!(deep, vec![dir.join("nested/deep.js"), dir.join("top.js")]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_discover_prunes_node_modules() {
        let dir = create_temp_dir("prune");
        fs::create_dir_all(dir.join("node_modules/pkg")).unwrap();
        fs::write(dir.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(dir.join("a.js"), "").unwrap();

        let filter = ModuleFilter {
            recursive: true,
            ..ModuleFilter::default()
        };
        let files = discover_modules(&dir, &filter).unwrap();
        assert_eq!(files, vec![dir.join("a.js")]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_discover_missing_dir_is_empty() {
        let dir = create_temp_dir("missing").join("does_not_exist");
        let files = discover_modules(&dir, &ModuleFilter::default()).unwrap();
        assert!(files.is_empty());
    }
}
