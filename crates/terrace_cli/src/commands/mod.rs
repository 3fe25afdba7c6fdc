//! CLI command definitions.
//!
//! Each subcommand maps to one stage of working with a terrace repository.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod apply;
pub mod init;
pub mod plan;
pub mod validate;

/// terrace - scaffolding for multi-environment terraform repositories
#[derive(Parser)]
#[command(name = "terrace")]
#[command(version, about = "terrace - scaffolding for multi-environment terraform repositories")]
#[command(long_about = r#"
terrace generates and maintains the layout of a terraform repository from a
single configuration file. Settings cascade from defaults to accounts and
environments, and from environments to their components.

COMMANDS:
  init      → Write a starter configuration
  validate  → Report every problem in the configuration
  plan      → Print the fully resolved plan
  apply     → Generate the repository from the configuration

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Template error
  5 - IaC error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file (.json, .yaml, .yml or .toml)
    #[arg(short, long, global = true, env = "TERRACE_CONFIG", default_value = "terrace.json")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter configuration file
    Init(init::InitArgs),

    /// Validate the configuration file
    Validate,

    /// Print the resolved plan without writing anything
    Plan(plan::PlanArgs),

    /// Generate or update the repository
    Apply(apply::ApplyArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::parse_from([
            "terrace",
            "--config",
            "infra.yaml",
            "apply",
            "--formatter",
            "terraform",
            "--no-plugins",
        ]);
        assert_eq!(cli.config, PathBuf::from("infra.yaml"));
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.formatter, apply::FormatterKind::Terraform);
                assert!(args.no_plugins);
            }
            _ => panic!("expected apply"),
        }
    }
}
