//! Configuration loading from excisor.toml.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ExcisorError;
use crate::excise::ExciseOptions;
use crate::persist::DEFAULT_BACKUP_SUFFIX;
use crate::scan::ModuleFilter;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "excisor.toml";

/// Monolithic source rewritten when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "public/assets/js/orders.js";

/// Directory of extracted modules harvested when nothing else is configured.
pub const DEFAULT_MODULE_DIR: &str = "public/assets/js/orders";

/// Module entry point skipped during harvesting by default.
pub const DEFAULT_EXCLUDE: &[&str] = &["orders-main.js"];

/// Main configuration structure for excisor.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ExcisorConfig {
    /// Source file to rewrite.
    pub source: Option<PathBuf>,
    /// Explicit module files to harvest names from.
    pub modules: Option<Vec<PathBuf>>,
    /// Directory scanned for module files when `modules` is not given.
    pub module_dir: Option<PathBuf>,
    /// Module file extension (without the dot).
    pub module_extension: Option<String>,
    /// Module file names to skip.
    pub exclude: Option<Vec<String>>,
    /// Scan `module_dir` recursively.
    pub recursive: Option<bool>,
    /// Literal names; when present, modules are not harvested.
    pub names: Option<Vec<String>>,
    /// Excision behaviour.
    pub excise: Option<ExciseConfig>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// `[excise]` table.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExciseConfig {
    pub backup: Option<bool>,
    pub backup_suffix: Option<String>,
    pub remove_constants: Option<bool>,
    pub comment_lookback: Option<usize>,
    pub collapse_blank_lines: Option<bool>,
    pub tombstone: Option<String>,
}

/// `[output]` table.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
    /// Where to write the harvested name listing.
    pub names_out: Option<PathBuf>,
}

impl ExciseConfig {
    pub fn to_options(&self) -> ExciseOptions {
        ExciseOptions {
            remove_constants: self.remove_constants.unwrap_or(false),
            comment_lookback: self.comment_lookback,
            tombstone: self.tombstone.clone(),
            collapse_blank_lines: self.collapse_blank_lines.unwrap_or(false),
        }
    }

    /// Backup suffix, or `None` when backups are disabled.
    pub fn backup_suffix(&self) -> Option<String> {
        if self.backup.unwrap_or(true) {
            Some(
                self.backup_suffix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BACKUP_SUFFIX.to_string()),
            )
        } else {
            None
        }
    }
}

impl ExcisorConfig {
    pub fn source_path(&self) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE))
    }

    pub fn module_dir_path(&self) -> PathBuf {
        self.module_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODULE_DIR))
    }

    pub fn module_filter(&self) -> ModuleFilter {
        ModuleFilter {
            extension: self
                .module_extension
                .clone()
                .unwrap_or_else(|| "js".to_string()),
            exclude: self
                .exclude
                .clone()
                .unwrap_or_else(|| DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect()),
            recursive: self.recursive.unwrap_or(false),
        }
    }

    pub fn excise_config(&self) -> ExciseConfig {
        self.excise.clone().unwrap_or_default()
    }

    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads a configuration file from an explicit path.
pub fn load_config_file(path: &Path) -> Result<ExcisorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).map_err(|e| ExcisorError::config(path, e.to_string()))?;
    Ok(cfg)
}

/// Loads configuration from excisor.toml in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<ExcisorConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("excisor_config_test")
            .join(format!("{}_{}", name, id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = create_temp_dir("missing");
        assert!(load_config(&dir).unwrap().is_none());
    }

    #[test]
    fn test_defaults() {
        let cfg = ExcisorConfig::default();
        assert_eq!(cfg.source_path(), PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(cfg.module_dir_path(), PathBuf::from(DEFAULT_MODULE_DIR));
        assert_eq!(cfg.module_filter().exclude, vec!["orders-main.js".to_string()]);
        assert_eq!(cfg.excise_config().backup_suffix().as_deref(), Some(".backup"));
        assert_eq!(cfg.excise_config().to_options(), ExciseOptions::default());
        assert!(!cfg.wants_json());
    }

    #[test]
    fn test_full_config_parses() {
        let dir = create_temp_dir("full");
        fs::write(
            dir.join(CONFIG_FILE),
            r#"
source = "app/dashboard.js"
module_dir = "app/dashboard"
exclude = []
names = ["debounce", "showTable"]

[excise]
backup = false
remove_constants = true
comment_lookback = 10
tombstone = "// NOTE: {name}() moved"

[output]
format = "JSON"
"#,
        )
        .unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.source_path(), PathBuf::from("app/dashboard.js"));
        assert!(cfg.module_filter().exclude.is_empty());
        assert_eq!(cfg.names.as_ref().map(Vec::len), Some(2));

        let excise = cfg.excise_config();
        assert_eq!(excise.backup_suffix(), None);
        let opts = excise.to_options();
        assert!(opts.remove_constants);
        assert_eq!(opts.comment_lookback, Some(10));
        assert_eq!(opts.tombstone.as_deref(), Some("// NOTE: {name}() moved"));
        assert!(cfg.wants_json());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_config_errors() {
        let dir = create_temp_dir("invalid");
        fs::write(dir.join(CONFIG_FILE), "source = [").unwrap();
        let err = load_config(&dir).unwrap_err();
        let typed = err.downcast_ref::<ExcisorError>().unwrap();
        assert!(matches!(typed, ExcisorError::Config { .. }));
        assert!(typed.is_recoverable());
        fs::remove_dir_all(&dir).ok();
    }
}
