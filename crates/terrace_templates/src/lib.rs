//! # terrace_templates
//!
//! Template trees and the engine that materializes them into a target
//! repository. Every entry's file-name suffix selects how it is applied:
//!
//! - `.tmpl`: rendered against the scope, always overwritten
//! - `.touch`: created empty, only if the target does not exist yet
//! - `.create`: copied verbatim, only if the target does not exist yet
//! - anything else: copied verbatim, always overwritten
//!
//! The marker suffix is stripped from the target name. Targets ending in
//! `.tf` pass through a [`Formatter`] before they are written.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use terrace_plan::Scope;
//! use terrace_templates::{HclFormatter, OsFs, TemplateEngine, TemplateSet};
//! # fn run(plan: &terrace_plan::Plan) -> terrace_templates::TemplateResult<()> {
//! let fs = OsFs::new("./infra");
//! let engine = TemplateEngine::new(&fs, &HclFormatter);
//! let templates = TemplateSet::builtin();
//!
//! engine.apply(&templates.global, Path::new("terraform/global"), &Scope::Global(&plan.global))?;
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod engine;
pub mod error;
pub mod format;
pub mod fs;
pub mod renderer;
pub mod strategy;
pub mod tree;

pub use builtin::TemplateSet;
pub use engine::{ApplyReport, FileOutcome, TemplateEngine};
pub use error::{FormatError, TemplateError, TemplateResult};
pub use format::{Formatter, HclFormatter, Passthrough, TerraformFmt};
pub use fs::{MemoryFs, OsFs, TargetFs};
pub use renderer::TemplateRenderer;
pub use strategy::{is_formatted, Strategy};
pub use tree::{TemplateEntry, TemplateTree};
