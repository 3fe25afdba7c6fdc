//! Inheritance resolution.

use std::collections::BTreeMap;

use tracing::{debug, info};

use terrace_config::{AccountConfig, ComponentConfig, Config, Settings};

use crate::error::{PlanError, PlanResult};
use crate::plan::{
    AccountNode, ComponentNode, EnvNode, GlobalNode, ModuleNode, Plan, PluginPlan,
    ResolvedSettings, DOCKER_IMAGE_VERSION,
};

/// Builds a [`Plan`] from a validated [`Config`].
pub struct PlanBuilder;

impl PlanBuilder {
    /// Resolve every scope of the config. Pure; touches nothing outside `config`.
    pub fn build(config: &Config) -> PlanResult<Plan> {
        let base = ResolvedSettings::from_defaults(&config.defaults)?;

        let global = GlobalNode {
            name: "global".to_string(),
            settings: base.clone(),
        };

        let all_accounts = resolve_all_accounts(&config.accounts);
        let mut accounts = BTreeMap::new();
        for (name, account) in &config.accounts {
            let settings = base.overlay(&format!("account {name}"), &account.settings)?;
            accounts.insert(
                name.clone(),
                AccountNode {
                    name: name.clone(),
                    settings,
                    all_accounts: all_accounts.clone(),
                },
            );
        }

        let mut envs = BTreeMap::new();
        for (env_name, env) in &config.envs {
            let env_settings = base.overlay(&format!("env {env_name}"), &env.settings)?;

            let mut components = BTreeMap::new();
            for (component_name, component) in &env.components {
                let node = build_component(
                    env_name,
                    &env_settings,
                    component_name,
                    component,
                    &env.components,
                )?;
                components.insert(component_name.clone(), node);
            }

            envs.insert(
                env_name.clone(),
                EnvNode {
                    name: env_name.clone(),
                    settings: env_settings,
                    components,
                },
            );
        }

        let mut modules = BTreeMap::new();
        for (name, module) in &config.modules {
            let settings = base.overlay(&format!("module {name}"), &module.settings)?;
            modules.insert(
                name.clone(),
                ModuleNode {
                    name: name.clone(),
                    settings,
                },
            );
        }

        let plugins = PluginPlan::new(
            &config.plugins.custom_plugins,
            &config.plugins.terraform_providers,
        );

        info!(
            accounts = accounts.len(),
            envs = envs.len(),
            modules = modules.len(),
            "Plan resolved"
        );

        Ok(Plan {
            version: env!("CARGO_PKG_VERSION").to_string(),
            global,
            accounts,
            envs,
            modules,
            plugins,
        })
    }
}

fn build_component(
    env_name: &str,
    env_settings: &ResolvedSettings,
    name: &str,
    component: &ComponentConfig,
    siblings: &BTreeMap<String, ComponentConfig>,
) -> PlanResult<ComponentNode> {
    let scope = format!("component {env_name}/{name}");
    debug!("Resolving {}", scope);

    Ok(ComponentNode {
        name: name.to_string(),
        env: env_name.to_string(),
        settings: env_settings.overlay(&scope, &component.settings)?,
        other_components: other_components(siblings.keys().map(String::as_str), name),
        module_source: component.module_source.clone(),
    })
}

impl ResolvedSettings {
    /// Resolve the root of the chain. Every required default must be set.
    pub fn from_defaults(defaults: &Settings) -> PlanResult<Self> {
        let scope = "defaults";
        let required = |field: &'static str, value: &Option<String>| {
            non_empty(scope, field, value.clone().unwrap_or_default())
        };

        let aws_regions = defaults.aws_regions.clone().unwrap_or_default();
        if aws_regions.is_empty() {
            return Err(PlanError::Unresolved {
                scope: scope.to_string(),
                field: "aws_regions",
            });
        }

        Ok(Self {
            account_id: defaults.account_id,
            aws_region_backend: required("aws_region_backend", &defaults.aws_region_backend)?,
            aws_region_provider: required("aws_region_provider", &defaults.aws_region_provider)?,
            aws_regions,
            aws_profile_backend: required("aws_profile_backend", &defaults.aws_profile_backend)?,
            aws_profile_provider: required("aws_profile_provider", &defaults.aws_profile_provider)?,
            aws_provider_version: required("aws_provider_version", &defaults.aws_provider_version)?,
            infra_bucket: required("infra_s3_bucket", &defaults.infra_bucket)?,
            owner: required("owner", &defaults.owner)?,
            project: required("project", &defaults.project)?,
            terraform_version: required("terraform_version", &defaults.terraform_version)?,
            docker_image_version: DOCKER_IMAGE_VERSION.to_string(),
            extra_vars: defaults.extra_vars.clone(),
        })
    }

    /// Apply a child scope's overrides on top of these (already resolved) settings.
    pub fn overlay(&self, scope: &str, overrides: &Settings) -> PlanResult<Self> {
        let required = |field: &'static str, parent: &str, child: &Option<String>| {
            non_empty(scope, field, resolve_required(parent, child.as_deref()))
        };

        Ok(Self {
            account_id: resolve_optional(self.account_id, overrides.account_id),
            aws_region_backend: required(
                "aws_region_backend",
                &self.aws_region_backend,
                &overrides.aws_region_backend,
            )?,
            aws_region_provider: required(
                "aws_region_provider",
                &self.aws_region_provider,
                &overrides.aws_region_provider,
            )?,
            aws_regions: resolve_list(&self.aws_regions, overrides.aws_regions.as_deref()),
            aws_profile_backend: required(
                "aws_profile_backend",
                &self.aws_profile_backend,
                &overrides.aws_profile_backend,
            )?,
            aws_profile_provider: required(
                "aws_profile_provider",
                &self.aws_profile_provider,
                &overrides.aws_profile_provider,
            )?,
            aws_provider_version: required(
                "aws_provider_version",
                &self.aws_provider_version,
                &overrides.aws_provider_version,
            )?,
            infra_bucket: required("infra_s3_bucket", &self.infra_bucket, &overrides.infra_bucket)?,
            owner: required("owner", &self.owner, &overrides.owner)?,
            project: required("project", &self.project, &overrides.project)?,
            terraform_version: required(
                "terraform_version",
                &self.terraform_version,
                &overrides.terraform_version,
            )?,
            docker_image_version: self.docker_image_version.clone(),
            extra_vars: resolve_extra_vars(&self.extra_vars, &overrides.extra_vars),
        })
    }
}

fn non_empty(scope: &str, field: &'static str, value: String) -> PlanResult<String> {
    if value.trim().is_empty() {
        return Err(PlanError::Unresolved {
            scope: scope.to_string(),
            field,
        });
    }
    Ok(value)
}

/// Explicit child value wins, otherwise the parent's resolved value.
pub fn resolve_required(parent: &str, child: Option<&str>) -> String {
    child.unwrap_or(parent).to_string()
}

/// Like [`resolve_required`] but absence is representable.
pub fn resolve_optional(parent: Option<i64>, child: Option<i64>) -> Option<i64> {
    child.or(parent)
}

/// An explicit child list replaces the parent list wholesale.
pub fn resolve_list(parent: &[String], child: Option<&[String]>) -> Vec<String> {
    child.unwrap_or(parent).to_vec()
}

/// Key-by-key merge; the child wins on collision.
pub fn resolve_extra_vars(
    parent: &BTreeMap<String, String>,
    child: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut resolved = parent.clone();
    resolved.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
    resolved
}

/// Name -> id for every account that has an id of its own.
pub fn resolve_all_accounts(accounts: &BTreeMap<String, AccountConfig>) -> BTreeMap<String, i64> {
    accounts
        .iter()
        .filter_map(|(name, account)| account.settings.account_id.map(|id| (name.clone(), id)))
        .collect()
}

/// Sorted names of every component except `this`.
pub fn other_components<'a>(names: impl IntoIterator<Item = &'a str>, this: &str) -> Vec<String> {
    let mut others: Vec<String> = names
        .into_iter()
        .filter(|name| *name != this)
        .map(str::to_string)
        .collect();
    others.sort();
    others.dedup();
    others
}
