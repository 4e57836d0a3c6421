//! Error types for the sweeper.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

use crate::core::JobKind;

/// Validation errors for inputs handed to the engine.
#[derive(Error, Debug, Serialize)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// File path errors.
#[derive(Error, Debug, Serialize)]
pub enum PathError {
    /// Path does not exist
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is neither a file nor a directory
    #[error("Not a file or directory: {0}")]
    Unsupported(PathBuf),
    /// Converting the file would write over a source of the same batch
    #[error("Output would overwrite a source: {0}")]
    OutputConflict(PathBuf),
}

/// Main error type for the sweeper.
///
/// Per-item failures inside a running job never surface here; they are
/// reported as log entries. This type covers everything that stops an
/// operation as a whole, plus the per-item causes before they get logged.
#[derive(Error, Debug, Serialize)]
pub enum SweepError {
    /// A job of this kind was started twice or while one is still active
    #[error("{0} job is already running")]
    AlreadyRunning(JobKind),

    /// Input validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Image decoding or encoding failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Unsupported or invalid image format
    #[error("Format error: {0}")]
    Format(String),

    /// The recoverable trash facility refused the file
    #[error("Trash error: {0}")]
    Trash(String),

    /// Background worker could not be spawned or joined
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Convenience result type for sweeper operations.
pub type SweepResult<T> = Result<T, SweepError>;

impl SweepError {
    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn trash<T: Into<String>>(msg: T) -> Self {
        Self::Trash(msg.into())
    }

    pub fn runtime<T: Into<String>>(msg: T) -> Self {
        Self::Runtime(msg.into())
    }
}

impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn unsupported_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::Unsupported(path.into()))
    }

    pub fn output_conflict(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::OutputConflict(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

impl From<io::Error> for SweepError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<PathError> for SweepError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}

impl From<image::ImageError> for SweepError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(e) => Self::Format(e.to_string()),
            image::ImageError::IoError(e) => Self::IO(e.to_string()),
            other => Self::Processing(other.to_string()),
        }
    }
}
