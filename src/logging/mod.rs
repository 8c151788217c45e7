//! Tracing subscriber initialization.
//!
//! The preview owns the terminal, so logs go to a file.
//! Follow them with `tail -f` in a second terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Directory and file name the appender writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// Existing directory holding the log file.
    pub directory: PathBuf,
    /// File name inside `directory`.
    pub file_name: String,
}

/// Splits `log_path` and creates its directory.
///
/// # Errors
///
/// Fails when the path has no file name or parent, or the directory
/// cannot be created.
pub fn prepare_target(log_path: &Path) -> Result<LogTarget, LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => return Err(LoggingError::NoParentDirectory(log_path.to_path_buf())),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    Ok(LogTarget {
        directory,
        file_name: file_name.to_string(),
    })
}

/// `RUST_LOG` when set and valid, otherwise `fallback`.
pub fn filter_from_env(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the tracing subscriber with file-based logging.
///
/// Respects `RUST_LOG`, defaulting to [`DEFAULT_DIRECTIVE`].
///
/// # Errors
///
/// Returns an error if the log directory cannot be prepared or a
/// subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let target = prepare_target(log_path)?;
    let file_appender = tracing_appender::rolling::never(&target.directory, &target.file_name);

    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env(DEFAULT_DIRECTIVE))
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
