//! Plan command - Print the fully resolved plan.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use terrace_config::ConfigReader;
use terrace_plan::{Plan, PlanBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}

pub fn execute(config_path: &Path, args: PlanArgs) -> Result<()> {
    let plan = load_plan(config_path)?;
    println!("{}", render(&plan, args.output)?);
    Ok(())
}

fn load_plan(config_path: &Path) -> Result<Plan> {
    info!("Resolving plan for {:?}", config_path);

    let config = ConfigReader::read(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    config.validate().ensure_valid()?;
    Ok(PlanBuilder::build(&config)?)
}

fn render(plan: &Plan, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(plan)?,
        OutputFormat::Yaml => serde_yaml::to_string(plan)?,
    };
    Ok(output)
}
