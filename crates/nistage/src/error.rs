//! Error types for the nistage pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Nistage error type
///
/// Filesystem and configuration errors are fatal and propagate to the
/// caller; per-row extraction misses are not errors at all (they become
/// absent table values).
#[derive(Error, Debug)]
pub enum NistageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("No column named '{0}' in table")]
    MissingColumn(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, NistageError>;
