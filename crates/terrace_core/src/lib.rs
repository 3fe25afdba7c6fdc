//! # terrace_core
//!
//! Orchestrates a scaffolding run: resolves the configuration into a plan,
//! then materializes every scope of it into the target repository.
//!
//! ## Example
//!
//! ```rust,no_run
//! use terrace_config::ConfigReader;
//! use terrace_core::Scaffolder;
//! use terrace_iac::SourceModuleResolver;
//! use terrace_templates::{HclFormatter, OsFs, TemplateSet};
//!
//! let config = ConfigReader::read("terrace.json").unwrap();
//! let fs = OsFs::new(".");
//! let resolver = SourceModuleResolver::new(".");
//!
//! let report = Scaffolder::new(&fs, &HclFormatter, &resolver)
//!     .apply(&config, &TemplateSet::builtin())
//!     .unwrap();
//! println!("{} files", report.files.files.len());
//! ```

pub mod error;
pub mod layout;
pub mod scaffolder;

pub use error::{CoreError, CoreResult, StageError};
pub use scaffolder::{ScaffoldReport, Scaffolder};
