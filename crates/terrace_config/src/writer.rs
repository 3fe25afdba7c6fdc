//! Starter config generation.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::models::{Config, Settings};
use crate::reader::ConfigFormat;

/// Values prompted for (or passed) when creating a new repository.
#[derive(Debug, Clone)]
pub struct StarterOptions {
    pub project: String,
    pub region: String,
    pub bucket: String,
    pub owner: String,
    pub profile: String,
    pub terraform_version: String,
    pub aws_provider_version: String,
}

impl StarterOptions {
    /// Build the config document these options describe.
    pub fn to_config(&self) -> Config {
        Config {
            defaults: Settings {
                aws_region_backend: Some(self.region.clone()),
                aws_region_provider: Some(self.region.clone()),
                aws_regions: Some(vec![self.region.clone()]),
                aws_profile_backend: Some(self.profile.clone()),
                aws_profile_provider: Some(self.profile.clone()),
                aws_provider_version: Some(self.aws_provider_version.clone()),
                infra_bucket: Some(self.bucket.clone()),
                owner: Some(self.owner.clone()),
                project: Some(self.project.clone()),
                terraform_version: Some(self.terraform_version.clone()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Writer for config files.
pub struct ConfigWriter;

impl ConfigWriter {
    /// Serialize a config in the format implied by the path's extension.
    pub fn write(path: impl AsRef<Path>, config: &Config) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => {
                let mut s = serde_json::to_string_pretty(config)?;
                s.push('\n');
                s
            }
            ConfigFormat::Yaml => serde_yaml::to_string(config)?,
            ConfigFormat::Toml => toml::to_string_pretty(config)?,
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Write a starter config, refusing to clobber an existing file.
    pub fn write_starter(path: impl AsRef<Path>, options: &StarterOptions) -> ConfigResult<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        info!("Writing starter config to {:?}", path);
        Self::write(path, &options.to_config())
    }
}
