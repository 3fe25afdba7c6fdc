//! Error types for plan resolution.

use thiserror::Error;

/// Result type alias for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while building a plan.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("Required field {field} is unresolved for {scope}")]
    Unresolved { scope: String, field: &'static str },
}
