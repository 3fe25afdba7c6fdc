//! # terrace_plan
//!
//! Turns the sparse, inheritance-based configuration into a dense [`Plan`]:
//! one fully resolved node per account, environment, component and module,
//! plus the global node and the plugin installation plan.
//!
//! Resolution runs top-down along `defaults -> account/env -> component`:
//!
//! - scalars: an explicit child value wins, otherwise the parent's resolved value
//! - `account_id`: same rule, absence propagates as absence
//! - `aws_regions`: an explicit child list replaces the parent list
//! - `extra_vars`: merged key-by-key, the child wins on collision
//!
//! ## Example
//!
//! ```rust,no_run
//! use terrace_config::ConfigReader;
//! use terrace_plan::PlanBuilder;
//!
//! let config = ConfigReader::read("terrace.json").unwrap();
//! let plan = PlanBuilder::build(&config).unwrap();
//! for (name, env) in &plan.envs {
//!     println!("{name}: {} components", env.components.len());
//! }
//! ```

pub mod builder;
pub mod error;
pub mod plan;
pub mod scope;

pub use builder::PlanBuilder;
pub use error::{PlanError, PlanResult};
pub use plan::{
    AccountNode, ComponentNode, EnvNode, GlobalNode, ModuleNode, Plan, PluginInstall,
    PluginPlan, ResolvedSettings, DOCKER_IMAGE_VERSION,
};
pub use scope::{Scope, ScopeKind};
