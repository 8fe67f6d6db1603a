//! excisor-core: structural declaration locator and excisor.
//!
//! Given a large monolithic script and a set of top-level declaration names,
//! this library finds each declaration's exact textual span (including its
//! attached leading comment) and cuts it out, leaving the rest of the text
//! intact and producing an auditable removal report.
//!
//! Spans are found by brace-depth counting over raw text, not by parsing.
//! Braces inside string or comment literals are counted like any other brace;
//! see [`mod@locate`] for the consequences.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use excisor_core::prelude::*;
//!
//! let outcome = Excisor::new("public/assets/js/orders.js")
//!     .names(parse_names(["debounce", "escapeHtml"])?)
//!     .run()?;
//!
//! for name in outcome.report.not_found() {
//!     println!("Not found: {}", name);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`collect`]: Declaration name harvesting from module texts
//! - [`scan`]: Module file discovery
//! - [`locate`]: Header search, comment attachment and brace matching
//! - [`excise`]: Single and batched removals
//! - [`report`]: Removal report and its renderings
//! - [`persist`]: Backup-then-overwrite writing
//! - [`builder`]: Fluent pipeline driver
//! - [`error`]: Typed error handling

pub mod builder;
pub mod collect;
pub mod config;
pub mod error;
pub mod excise;
pub mod locate;
pub mod logging;
pub mod name;
pub mod persist;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod span;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{ExcisorError, ExcisorResult, IoResultExt};

// Builder API
pub use builder::{Excisor, RunOutcome};

// Names
pub use name::{is_identifier, parse_names, DeclarationName, NameSet};

// Collection
pub use collect::{
    collect_names, extract_declarations, harvest_modules, render_name_list, Harvest,
    ModuleDeclarations, ModuleHarvest, ModuleOutcome,
};

// Module discovery
pub use scan::{discover_modules, ModuleFilter};

// Location and excision
pub use excise::{collapse_blank_lines, excise, excise_all, ExciseOptions, Excision};
pub use locate::{
    extend_over_comments, find_header, locate, DeclKind, Header, LocateOptions, Located,
    MissReason,
};
pub use span::Span;

// Reporting
pub use report::{
    print_json, print_plain, render_json, render_plain, text_digest, Outcome, RemovalReport,
    TextMetrics,
};

// Persistence
pub use persist::{commit_with_backup, sibling_path, write_atomic, DEFAULT_BACKUP_SUFFIX};

// Configuration
pub use config::{load_config, load_config_file, ExciseConfig, ExcisorConfig, OutputConfig};

// Logging
pub use logging::init_structured_logging;
