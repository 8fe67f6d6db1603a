//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use excisor_core::prelude::*;
//! ```

pub use crate::builder::{Excisor, RunOutcome};
pub use crate::collect::{collect_names, harvest_modules, Harvest};
pub use crate::config::{load_config, ExcisorConfig};
pub use crate::error::{ExcisorError, ExcisorResult};
pub use crate::excise::{excise, excise_all, ExciseOptions, Excision};
pub use crate::name::{parse_names, DeclarationName, NameSet};
pub use crate::report::{Outcome, RemovalReport};
pub use crate::scan::{discover_modules, ModuleFilter};
