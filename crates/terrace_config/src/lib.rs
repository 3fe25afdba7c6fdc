//! # terrace_config
//!
//! Typed configuration for a terrace repository.
//!
//! A single document describes defaults plus sparse per-scope overrides for
//! accounts, environments, components and modules. This crate only reads,
//! writes and validates that document; inheritance is resolved by
//! `terrace_plan`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use terrace_config::ConfigReader;
//!
//! let config = ConfigReader::read("terrace.json").unwrap();
//! let result = config.validate();
//! for violation in &result.errors {
//!     eprintln!("{}", violation);
//! }
//! ```

pub mod error;
pub mod models;
pub mod reader;
pub mod validator;
pub mod writer;

pub use error::{ConfigError, ConfigResult};
pub use models::*;
pub use reader::{ConfigFormat, ConfigReader};
pub use validator::{ValidationResult, Violation, REQUIRED_DEFAULTS};
pub use writer::{ConfigWriter, StarterOptions};
