//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Failure reported by a [`crate::Formatter`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FormatError(pub String);

/// Errors that can occur while loading or applying templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering failed for {path}: {message}")]
    RenderingFailed { path: PathBuf, message: String },

    #[error("Formatting failed for {path}: {source}")]
    FormatFailed {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk template directory {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

impl TemplateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TemplateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the error is attached to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            TemplateError::RenderingFailed { path, .. }
            | TemplateError::FormatFailed { path, .. }
            | TemplateError::Io { path, .. }
            | TemplateError::Walk { path, .. } => Some(path),
            TemplateError::NotFound(_) => None,
        }
    }
}
