//! Validate command - Report every problem in the configuration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use terrace_config::ConfigReader;

pub fn execute(config_path: &Path) -> Result<()> {
    info!("Validating {:?}", config_path);

    let config = ConfigReader::read(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let result = config.validate();

    for warning in &result.warnings {
        println!("warning: {}", warning);
    }

    if result.valid {
        println!("{} is valid", config_path.display());
        return Ok(());
    }

    for violation in &result.errors {
        println!("error: {}", violation);
    }
    result.ensure_valid().with_context(|| {
        format!("{} has {} problem(s)", config_path.display(), result.errors.len())
    })
}
