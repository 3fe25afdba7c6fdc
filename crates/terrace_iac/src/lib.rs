//! # terrace_iac
//!
//! Everything terrace needs to know about terraform modules and plugins:
//!
//! - [`ModuleAddress`] classifies a module `source` as local or remote and
//!   rewrites local sources relative to the component that uses them
//! - [`ModuleResolver`] reports the variables and outputs a module declares
//! - [`ModuleInvocationGenerator`] writes the `main.tf` and `outputs.tf`
//!   that instantiate a module inside a component
//! - [`PluginInstaller`] downloads custom plugins and provider binaries
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use terrace_iac::{ModuleInvocationGenerator, SourceModuleResolver};
//! use terrace_templates::{HclFormatter, OsFs, TemplateEngine, TemplateSet};
//!
//! let fs = OsFs::new(".");
//! let engine = TemplateEngine::new(&fs, &HclFormatter);
//! let resolver = SourceModuleResolver::new(".");
//! let templates = TemplateSet::builtin();
//!
//! let generator =
//!     ModuleInvocationGenerator::new(&engine, &resolver, &templates.module_invocation);
//! generator
//!     .generate(Path::new("terraform/envs/prod/vpc"), "terraform/modules/vpc")
//!     .unwrap();
//! ```

pub mod address;
pub mod error;
pub mod invocation;
pub mod plugins;
pub mod resolver;

pub use address::{relative_path, GitSource, ModuleAddress, SourceKind};
pub use error::{IacError, IacResult};
pub use invocation::{
    ModuleInvocationData, ModuleInvocationGenerator, MAIN_TEMPLATE, OUTPUTS_TEMPLATE,
};
pub use plugins::{write_executables, HttpPluginInstaller, PluginInstaller};
pub use resolver::{
    parse_module_file, read_module_dir, ModuleMetadata, ModuleResolver, SourceModuleResolver,
};
