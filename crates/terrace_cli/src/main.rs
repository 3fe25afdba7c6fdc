//! terrace CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Template error
//! - 5: IaC error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use terrace_config::ConfigError;
use terrace_core::{CoreError, StageError};
use terrace_iac::IacError;
use terrace_plan::PlanError;
use terrace_templates::TemplateError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const IAC_ERROR: u8 = 5;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "terrace=debug,warn"
    } else {
        "terrace=info,warn"
    };
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(&cli.config, args),
        Commands::Validate => commands::validate::execute(&cli.config),
        Commands::Plan(args) => commands::plan::execute(&cli.config, args),
        Commands::Apply(args) => commands::apply::execute(&cli.config, args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Pick the exit code from the first typed error in the chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return match err {
                ConfigError::ValidationFailed(_) | ConfigError::InvalidFormat { .. } => {
                    ExitCodes::VALIDATION_FAILURE
                }
                ConfigError::UnsupportedFormat(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<PlanError>().is_some() {
            return ExitCodes::VALIDATION_FAILURE;
        }
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            return match err {
                CoreError::Config(ConfigError::ValidationFailed(_)) | CoreError::Plan(_) => {
                    ExitCodes::VALIDATION_FAILURE
                }
                CoreError::Stage {
                    source: StageError::Template(_),
                    ..
                } => ExitCodes::TEMPLATE_ERROR,
                CoreError::Stage {
                    source: StageError::Iac(_),
                    ..
                } => ExitCodes::IAC_ERROR,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
        if cause.downcast_ref::<IacError>().is_some() {
            return ExitCodes::IAC_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
