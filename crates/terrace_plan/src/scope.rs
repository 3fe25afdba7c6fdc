//! Substitution data handed to the template engine.

use serde::Serialize;

use crate::plan::{AccountNode, ComponentNode, EnvNode, GlobalNode, ModuleNode, Plan};

/// Which part of the generated repository a node describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Repo,
    Global,
    Account,
    Env,
    Component,
    Module,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Repo => "repo",
            ScopeKind::Global => "global",
            ScopeKind::Account => "account",
            ScopeKind::Env => "env",
            ScopeKind::Component => "component",
            ScopeKind::Module => "module",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A plan node, tagged by the scope it belongs to.
///
/// Serializes as the wrapped node itself, so templates address fields
/// directly (`{{ aws_region_backend }}`, `{{ other_components }}`).
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Scope<'a> {
    /// The repository root renders against the whole plan.
    Repo(&'a Plan),
    Global(&'a GlobalNode),
    Account(&'a AccountNode),
    Env(&'a EnvNode),
    Component(&'a ComponentNode),
    Module(&'a ModuleNode),
}

impl Scope<'_> {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Repo(_) => ScopeKind::Repo,
            Scope::Global(_) => ScopeKind::Global,
            Scope::Account(_) => ScopeKind::Account,
            Scope::Env(_) => ScopeKind::Env,
            Scope::Component(_) => ScopeKind::Component,
            Scope::Module(_) => ScopeKind::Module,
        }
    }

    /// Display name of the node, e.g. `prod/vpc` for a component.
    pub fn name(&self) -> String {
        match self {
            Scope::Repo(_) => "repo".to_string(),
            Scope::Global(node) => node.name.clone(),
            Scope::Account(node) => node.name.clone(),
            Scope::Env(node) => node.name.clone(),
            Scope::Component(node) => format!("{}/{}", node.env, node.name),
            Scope::Module(node) => node.name.clone(),
        }
    }
}
