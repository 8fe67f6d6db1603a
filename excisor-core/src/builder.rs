//! Builder pattern API for an excision run.
//!
//! Provides a fluent interface over harvesting, excising and persisting:
//!
//! ```rust,ignore
//! use excisor_core::prelude::*;
//!
//! let outcome = Excisor::new("public/assets/js/orders.js")
//!     .modules(discover_modules(Path::new("public/assets/js/orders"), &filter)?)
//!     .dry_run(true)
//!     .run()?;
//!
//! println!("Removed: {}", outcome.report.removed().len());
//! ```

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::collect::{harvest_modules, Harvest};
use crate::error::{ExcisorResult, IoResultExt};
use crate::excise::{excise_all, ExciseOptions};
use crate::name::NameSet;
use crate::persist::{commit_with_backup, sibling_path, DEFAULT_BACKUP_SUFFIX};
use crate::report::RemovalReport;

/// Builder for configuring an excision run.
#[derive(Debug, Clone)]
pub struct Excisor {
    /// Source file rewritten in place
    source: PathBuf,

    /// Module files harvested for names when no literal names are given
    modules: Vec<PathBuf>,

    /// Literal names, bypassing the harvest
    names: NameSet,

    /// Excision knobs
    options: ExciseOptions,

    /// Backup suffix; `None` disables the backup
    backup_suffix: Option<String>,

    /// Dry-run mode (don't modify files)
    dry_run: bool,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RemovalReport,
    /// Harvest details, when names came from modules.
    pub harvest: Option<Harvest>,
    /// Whether the source file was rewritten.
    pub written: bool,
    /// Backup location, when one was written.
    pub backup: Option<PathBuf>,
}

impl Excisor {
    /// Create a new run builder for the given source file.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            modules: Vec::new(),
            names: NameSet::new(),
            options: ExciseOptions::default(),
            backup_suffix: Some(DEFAULT_BACKUP_SUFFIX.to_string()),
            dry_run: false,
        }
    }

    /// Module files to harvest declaration names from.
    pub fn modules<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.modules.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Literal names to remove. Non-empty names take precedence over modules.
    pub fn names(mut self, names: NameSet) -> Self {
        self.names.extend(names);
        self
    }

    pub fn options(mut self, options: ExciseOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the backup suffix, or disable backups with `None`.
    pub fn backup(mut self, suffix: Option<String>) -> Self {
        self.backup_suffix = suffix;
        self
    }

    /// Enable dry-run mode (compute the report, write nothing).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Resolve the names to remove, harvesting modules when needed.
    fn resolve_names(&self) -> ExcisorResult<(NameSet, Option<Harvest>)> {
        if !self.names.is_empty() {
            return Ok((self.names.clone(), None));
        }

        let harvest = harvest_modules(&self.modules)?;
        let mut names = harvest.functions.clone();
        if self.options.remove_constants {
            names.extend(harvest.constants.iter().cloned());
        }
        info!(
            modules = harvest.modules.len(),
            missing = harvest.missing().count(),
            names = names.len(),
            "harvested declaration names"
        );
        Ok((names, Some(harvest)))
    }

    /// Run the pipeline: read, harvest, excise, then back up and write.
    ///
    /// Reading the source and writing results are fatal on failure. The
    /// source is only rewritten when at least one removal changed it, so a
    /// second run never overwrites the first run's backup.
    pub fn run(&self) -> ExcisorResult<RunOutcome> {
        let original = fs::read_to_string(&self.source).with_path(&self.source)?;
        let (names, harvest) = self.resolve_names()?;

        let (text, report) = excise_all(&original, &names, &self.options);

        let mut written = false;
        let mut backup = None;
        if self.dry_run {
            info!(source = %self.source.display(), "dry run, nothing written");
        } else if report.is_unchanged() {
            info!(source = %self.source.display(), "no declarations removed, nothing written");
        } else {
            let backup_path = self
                .backup_suffix
                .as_deref()
                .map(|suffix| sibling_path(&self.source, suffix));
            commit_with_backup(&self.source, &original, &text, backup_path.as_deref())?;
            written = true;
            backup = backup_path;
        }

        Ok(RunOutcome {
            report,
            harvest,
            written,
            backup,
        })
    }
}
