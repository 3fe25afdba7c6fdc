//! Plan node types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use terrace_config::{PluginFormat, PluginSpec};

/// Tag of the toolchain image referenced by generated Makefiles.
pub const DOCKER_IMAGE_VERSION: &str = "0.2.1";

/// Directory (relative to the repository root) holding custom plugins.
const CUSTOM_PLUGIN_DIR: &str = "terraform.d/plugins";

/// Directory (relative to the repository root) caching provider binaries.
const PROVIDER_CACHE_DIR: &str = ".terraform.d/plugin-cache";

/// The attribute set every scope carries once inheritance is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSettings {
    pub account_id: Option<i64>,
    pub aws_region_backend: String,
    pub aws_region_provider: String,
    pub aws_regions: Vec<String>,
    pub aws_profile_backend: String,
    pub aws_profile_provider: String,
    pub aws_provider_version: String,
    pub infra_bucket: String,
    pub owner: String,
    pub project: String,
    pub terraform_version: String,
    pub docker_image_version: String,
    pub extra_vars: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalNode {
    pub name: String,
    #[serde(flatten)]
    pub settings: ResolvedSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountNode {
    pub name: String,
    #[serde(flatten)]
    pub settings: ResolvedSettings,
    /// Every configured account with an id, independent of this account's overrides.
    pub all_accounts: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentNode {
    pub name: String,
    pub env: String,
    #[serde(flatten)]
    pub settings: ResolvedSettings,
    /// Sibling components in the same environment, sorted, never including `name`.
    pub other_components: Vec<String>,
    /// Copied verbatim from the config.
    pub module_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvNode {
    pub name: String,
    #[serde(flatten)]
    pub settings: ResolvedSettings,
    pub components: BTreeMap<String, ComponentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNode {
    pub name: String,
    #[serde(flatten)]
    pub settings: ResolvedSettings,
}

/// A plugin together with the directory it is installed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginInstall {
    pub url: String,
    pub format: PluginFormat,
    pub target_dir: PathBuf,
}

impl PluginInstall {
    fn new(spec: &PluginSpec, base: &str) -> Self {
        Self {
            url: spec.url.clone(),
            format: spec.format,
            target_dir: PathBuf::from(base).join(platform_dir()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginPlan {
    pub custom_plugins: BTreeMap<String, PluginInstall>,
    pub terraform_providers: BTreeMap<String, PluginInstall>,
}

impl PluginPlan {
    pub fn new(
        custom_plugins: &BTreeMap<String, PluginSpec>,
        terraform_providers: &BTreeMap<String, PluginSpec>,
    ) -> Self {
        Self {
            custom_plugins: custom_plugins
                .iter()
                .map(|(name, spec)| (name.clone(), PluginInstall::new(spec, CUSTOM_PLUGIN_DIR)))
                .collect(),
            terraform_providers: terraform_providers
                .iter()
                .map(|(name, spec)| (name.clone(), PluginInstall::new(spec, PROVIDER_CACHE_DIR)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.custom_plugins.is_empty() && self.terraform_providers.is_empty()
    }
}

/// `<os>_<arch>` in the naming terraform uses for plugin directories.
fn platform_dir() -> String {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    };
    format!("{os}_{arch}")
}

/// The fully resolved, inheritance-free configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub version: String,
    pub global: GlobalNode,
    pub accounts: BTreeMap<String, AccountNode>,
    pub envs: BTreeMap<String, EnvNode>,
    pub modules: BTreeMap<String, ModuleNode>,
    pub plugins: PluginPlan,
}
