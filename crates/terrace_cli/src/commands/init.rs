//! Init command - Write a starter configuration.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use terrace_config::{ConfigWriter, StarterOptions};

#[derive(Args)]
pub struct InitArgs {
    /// Project name
    #[arg(long)]
    project: String,

    /// AWS region used for state and providers
    #[arg(long, default_value = "us-west-2")]
    region: String,

    /// S3 bucket holding terraform state
    #[arg(long)]
    bucket: String,

    /// Owner tag / contact
    #[arg(long)]
    owner: String,

    /// AWS CLI profile used for state and providers
    #[arg(long, default_value = "default")]
    profile: String,

    /// Terraform version to pin
    #[arg(long, default_value = "0.11.7")]
    terraform_version: String,

    /// AWS provider version to pin
    #[arg(long, default_value = "1.27.0")]
    aws_provider_version: String,
}

impl InitArgs {
    fn starter_options(&self) -> StarterOptions {
        StarterOptions {
            project: self.project.clone(),
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            owner: self.owner.clone(),
            profile: self.profile.clone(),
            terraform_version: self.terraform_version.clone(),
            aws_provider_version: self.aws_provider_version.clone(),
        }
    }
}

pub fn execute(config_path: &Path, args: InitArgs) -> Result<()> {
    info!("Writing starter configuration to {:?}", config_path);

    ConfigWriter::write_starter(config_path, &args.starter_options())
        .with_context(|| format!("Failed to initialize {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  add accounts, envs and components to {}", config_path.display());
    println!("  terrace apply");

    Ok(())
}
