//! Structured logging for auditable excision runs using **tracing**.
//!
//! The JSON subscriber writes to stderr so that stdout stays reserved for the
//! removal report.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: missing modules and fail-closed
/// aborts are reported, per-name progress is not.
const DEFAULT_FILTER: &str = "warn";

/// Initializes the global tracing collector (subscriber).
///
/// This should be called *once* at the beginning of the application's runtime.
/// It configures structured JSON output to stderr.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=excisor_core=debug`)
pub fn init_structured_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
