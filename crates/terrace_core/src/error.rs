//! Error types for the core module.

use std::path::PathBuf;

use thiserror::Error;

use terrace_config::ConfigError;
use terrace_iac::IacError;
use terrace_plan::PlanError;
use terrace_templates::TemplateError;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while scaffolding a repository.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Plan failed: {0}")]
    Plan(#[from] PlanError),

    #[error("Stage {stage} failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: StageError,
    },
}

/// The failure inside a scaffolding stage.
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Iac(#[from] IacError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Name of the stage that failed, if the failure happened inside one.
    pub fn stage(&self) -> Option<&str> {
        match self {
            CoreError::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}
