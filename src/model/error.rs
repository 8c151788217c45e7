//! Error types for the dialog-row crate.
//!
//! Only the impure shell (configuration, logging, fixture loading, terminal
//! I/O) produces errors that reach the caller. The presentation core never
//! fails: text measurement errors degrade to a plain-text fallback inside the
//! layout engine, and gesture input is clamped.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level error returned from the preview binary
//!   - [`ConfigError`] - configuration file read/parse failures
//!   - [`LoggingError`] - tracing subscriber initialization failures
//!   - [`FixtureError`] - fixture file read/parse failures
//!   - `std::io::Error` - terminal failures

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// All shell-side failures convert into it via `From`, so `main` can use `?`
/// throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    ///
    /// A missing config file is not an error; this only occurs when a file
    /// exists but cannot be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// The fixture file describing the preview rows is unusable.
    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),

    /// Terminal setup, drawing, or event polling failed.
    ///
    /// **Recovery**: restore the terminal, print to stderr, exit non-zero.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Errors raised while loading a row fixture file.
///
/// Individual malformed rows are not errors: they are logged and skipped.
/// Only a file that cannot be read, or whose top level is not the expected
/// document shape, fails the load.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("Failed to read fixture file {path:?}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or lacks the top-level `rows` array.
    #[error("Invalid fixture document: {message}")]
    InvalidDocument {
        /// Parser message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_wraps_config_error() {
        let inner = ConfigError::InvalidValue {
            key: "swipe_action".to_string(),
            reason: "unknown".to_string(),
        };
        let err: AppError = inner.into();
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn fixture_io_error_mentions_path() {
        let err = FixtureError::Io {
            path: PathBuf::from("/tmp/rows.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let message = err.to_string();
        assert!(message.contains("rows.json"), "got: {message}");
        assert!(message.contains("gone"), "got: {message}");
    }

    #[test]
    fn invalid_document_displays_message() {
        let err = FixtureError::InvalidDocument {
            message: "missing field `rows`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid fixture document: missing field `rows`"
        );
    }

    #[test]
    fn terminal_error_converts_from_io() {
        let err: AppError = std::io::Error::other("tty closed").into();
        assert!(matches!(err, AppError::Terminal(_)));
    }
}
