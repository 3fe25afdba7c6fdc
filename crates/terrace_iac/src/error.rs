//! Error types for IaC module.

use std::path::PathBuf;

use thiserror::Error;

use terrace_templates::TemplateError;

/// Result type alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while resolving modules or installing plugins.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Invalid module path from {from} to {to}: {reason}")]
    InvalidModulePath {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Unsupported module source: {0}")]
    UnsupportedSource(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(PathBuf),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Git error: {0}")]
    Git(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to unpack plugin {name}: {message}")]
    Unpack { name: String, message: String },

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IacError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IacError::Io {
            path: path.into(),
            source,
        }
    }
}
