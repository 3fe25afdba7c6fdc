//! Data models for the configuration document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Settings shared by every scope.
///
/// In `defaults` most of these are mandatory (see [`crate::REQUIRED_DEFAULTS`]);
/// in every other scope they are sparse overrides where `None` means
/// "inherit from the parent scope".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region_backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_regions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile_backend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_provider_version: Option<String>,
    #[serde(
        rename = "infra_s3_bucket",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub infra_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    /// Arbitrary variables; merged key-by-key down the scope chain.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_vars: BTreeMap<String, String>,
}

impl Settings {
    /// Scalar string fields as `(key, value)` pairs, in document order.
    pub fn scalar_fields(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("aws_region_backend", self.aws_region_backend.as_deref()),
            ("aws_region_provider", self.aws_region_provider.as_deref()),
            ("aws_profile_backend", self.aws_profile_backend.as_deref()),
            ("aws_profile_provider", self.aws_profile_provider.as_deref()),
            ("aws_provider_version", self.aws_provider_version.as_deref()),
            ("infra_s3_bucket", self.infra_bucket.as_deref()),
            ("owner", self.owner.as_deref()),
            ("project", self.project.as_deref()),
            ("terraform_version", self.terraform_version.as_deref()),
        ]
    }
}

/// Per-account overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(flatten)]
    pub settings: Settings,
}

/// Per-component overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentConfig {
    #[serde(flatten)]
    pub settings: Settings,
    /// Address of a reusable module this component instantiates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_source: Option<String>,
}

/// Per-environment overrides and the environment's components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(flatten)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, ComponentConfig>,
}

/// Per-module overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(flatten)]
    pub settings: Settings,
}

/// Packaging of a downloadable plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginFormat {
    /// A single executable.
    Bin,
    /// A gzipped tarball whose members are installed side by side.
    Tar,
}

impl PluginFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginFormat::Bin => "bin",
            PluginFormat::Tar => "tar",
        }
    }
}

impl std::fmt::Display for PluginFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A custom plugin or provider binary to install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    pub url: String,
    pub format: PluginFormat,
}

/// Declared plugins and provider binaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginsConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_plugins: BTreeMap<String, PluginSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub terraform_providers: BTreeMap<String, PluginSpec>,
}

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Settings,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub accounts: BTreeMap<String, AccountConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub envs: BTreeMap<String, EnvConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: BTreeMap<String, ModuleConfig>,
    #[serde(default)]
    pub plugins: PluginsConfig,
}
