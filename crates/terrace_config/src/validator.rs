//! Configuration validation.
//!
//! Validation never stops at the first problem: every violation in the
//! document is collected so it can be reported in one pass.

use std::fmt;

use crate::error::{ConfigError, ConfigResult};
use crate::models::{Config, Settings};

/// Defaults that must be present (and non-empty) for a plan to resolve.
pub const REQUIRED_DEFAULTS: &[&str] = &[
    "aws_profile_backend",
    "aws_profile_provider",
    "aws_provider_version",
    "aws_region_backend",
    "aws_region_provider",
    "aws_regions",
    "infra_s3_bucket",
    "owner",
    "project",
    "terraform_version",
];

/// A single problem with one field of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `envs.prod.owner`.
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Violation>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(Violation::new(field, message));
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// All violations joined into one line.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Ok` when valid, otherwise every violation as one error.
    pub fn ensure_valid(&self) -> ConfigResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed(self.summary()))
        }
    }
}

impl Config {
    /// Validate the whole document, returning every violation found.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.merge(validate_defaults(&self.defaults));

        for (name, account) in &self.accounts {
            result.merge(validate_overrides(&format!("accounts.{name}"), &account.settings));
            if account.settings.account_id.is_none() {
                result.add_warning(format!(
                    "Account '{name}' has no account_id and will be missing from all_accounts"
                ));
            }
        }

        for (env_name, env) in &self.envs {
            let scope = format!("envs.{env_name}");
            result.merge(validate_overrides(&scope, &env.settings));

            if env.components.is_empty() {
                result.add_warning(format!("Environment '{env_name}' has no components"));
            }

            for (component_name, component) in &env.components {
                let scope = format!("{scope}.components.{component_name}");
                result.merge(validate_overrides(&scope, &component.settings));

                if let Some(source) = &component.module_source {
                    if source.trim().is_empty() {
                        result.add_error(format!("{scope}.module_source"), "must not be empty");
                    }
                }
            }
        }

        for (name, module) in &self.modules {
            result.merge(validate_overrides(&format!("modules.{name}"), &module.settings));
        }

        for (kind, plugins) in [
            ("custom_plugins", &self.plugins.custom_plugins),
            ("terraform_providers", &self.plugins.terraform_providers),
        ] {
            for (name, plugin) in plugins {
                if plugin.url.trim().is_empty() {
                    result.add_error(format!("plugins.{kind}.{name}.url"), "is required");
                }
            }
        }

        result
    }
}

fn validate_defaults(defaults: &Settings) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut missing: Vec<&str> = defaults
        .scalar_fields()
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(key, _)| *key)
        .collect();

    if defaults.aws_regions.as_ref().map_or(true, |r| r.is_empty()) {
        missing.push("aws_regions");
    }

    missing.sort_unstable();
    for key in missing {
        result.add_error(format!("defaults.{key}"), "is required");
    }

    result
}

/// An override may be absent, but an explicit empty value would erase a
/// required field.
fn validate_overrides(scope: &str, settings: &Settings) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (key, value) in settings.scalar_fields() {
        if value.is_some_and(|v| v.trim().is_empty()) {
            result.add_error(format!("{scope}.{key}"), "must not be empty when set");
        }
    }

    if settings.aws_regions.as_ref().is_some_and(|r| r.is_empty()) {
        result.add_error(format!("{scope}.aws_regions"), "must not be empty when set");
    }

    for key in settings.extra_vars.keys() {
        if key.trim().is_empty() {
            result.add_error(format!("{scope}.extra_vars"), "keys must not be empty");
        }
    }

    result
}
