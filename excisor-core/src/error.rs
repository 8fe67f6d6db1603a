//! Typed error handling for excisor.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for excisor operations.
///
/// Declarations that cannot be located are not errors: they are recorded as
/// `NotFound` in the removal report. Only conditions that stop a run live here.
#[derive(Error, Debug)]
pub enum ExcisorError {
    /// I/O error when reading source or module files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A declaration name that is not a valid identifier
    #[error("Invalid declaration name: {name:?}")]
    InvalidName { name: String },

    /// Failure while writing the backup or the rewritten source
    #[error("Write error at {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl ExcisorError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the run can continue with defaults
    /// or by skipping the offending input).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::InvalidName { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Write { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for excisor results.
pub type ExcisorResult<T> = Result<T, ExcisorError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ExcisorResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ExcisorResult<T> {
        self.map_err(|e| ExcisorError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = ExcisorError::io(
            PathBuf::from("/test/orders.js"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, ExcisorError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/orders.js")));
        assert!(err.to_string().contains("/test/orders.js"));
    }

    #[test]
    fn test_invalid_name_message() {
        let err = ExcisorError::invalid_name("9lives");
        assert!(err.to_string().contains("9lives"));
        assert!(err.path().is_none());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ExcisorError::config("/excisor.toml", "bad").is_recoverable());
        assert!(ExcisorError::invalid_name("a-b").is_recoverable());
        assert!(!ExcisorError::write("/orders.js", "disk full").is_recoverable());
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let io = ExcisorError::io("/orders.js", denied);
        assert!(!io.is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let excisor_result = result.with_path("/missing/orders.js");
        assert!(matches!(excisor_result, Err(ExcisorError::Io { .. })));
    }
}
