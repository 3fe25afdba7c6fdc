//! Apply command - Generate or update the repository.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use terrace_config::ConfigReader;
use terrace_core::{ScaffoldReport, Scaffolder};
use terrace_iac::{HttpPluginInstaller, SourceModuleResolver};
use terrace_templates::{FileOutcome, Formatter, HclFormatter, OsFs, TemplateSet, TerraformFmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatterKind {
    /// Built-in HCL formatter (drops comments)
    Hcl,
    /// `terraform fmt` (requires terraform on PATH)
    Terraform,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Directory holding custom template trees
    #[arg(long, env = "TERRACE_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Formatter used for generated .tf files
    #[arg(long, value_enum, default_value = "hcl")]
    pub formatter: FormatterKind,

    /// Do not download plugins and providers
    #[arg(long)]
    pub no_plugins: bool,

    /// Repository root to generate into
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn execute(config_path: &Path, args: ApplyArgs) -> Result<()> {
    let config = ConfigReader::read(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let templates = match &args.templates {
        Some(dir) => TemplateSet::load(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
        None => TemplateSet::builtin(),
    };

    let formatter: Box<dyn Formatter> = match args.formatter {
        FormatterKind::Hcl => Box::new(HclFormatter),
        FormatterKind::Terraform => {
            let fmt = TerraformFmt::new();
            if !fmt.is_available() {
                bail!("terraform was not found on PATH; use --formatter hcl");
            }
            Box::new(fmt)
        }
    };

    info!("Applying {:?} to {:?}", config_path, args.root);

    let fs = OsFs::new(&args.root);
    let resolver = SourceModuleResolver::new(&args.root);
    let installer = if args.no_plugins {
        None
    } else {
        Some(HttpPluginInstaller::new()?)
    };

    let mut scaffolder = Scaffolder::new(&fs, &*formatter, &resolver);
    if let Some(installer) = &installer {
        scaffolder = scaffolder.with_plugin_installer(installer);
    }

    let report = scaffolder
        .apply(&config, &templates)
        .with_context(|| format!("Failed to apply {}", config_path.display()))?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &ScaffoldReport) {
    println!("Scaffolding complete");
    for outcome in [
        FileOutcome::Rendered,
        FileOutcome::Touched,
        FileOutcome::Seeded,
        FileOutcome::Copied,
        FileOutcome::Skipped,
    ] {
        let count = report.files.count(outcome);
        if count > 0 {
            println!("  {:<10} {}", outcome, count);
        }
    }
    if !report.plugins.is_empty() {
        println!("  {:<10} {}", "plugins", report.plugins.len());
    }
}
