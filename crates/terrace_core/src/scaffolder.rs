//! Scaffolding orchestration.
//!
//! Stages run strictly in order and the first failure stops the run:
//!
//! 1. repository root tree, then declared plugins and providers
//! 2. global tree
//! 3. one tree per account
//! 4. per environment: the env tree, then each component tree followed by
//!    its module invocation when the component declares a module source
//! 5. one tree per module

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::info;

use terrace_config::Config;
use terrace_iac::{ModuleInvocationGenerator, ModuleResolver, PluginInstaller};
use terrace_plan::{Plan, PlanBuilder, PluginInstall, Scope};
use terrace_templates::{
    ApplyReport, Formatter, TargetFs, TemplateEngine, TemplateSet, TemplateTree,
};

use crate::error::{CoreError, CoreResult, StageError};
use crate::layout;

/// What a scaffolding run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub files: ApplyReport,
    pub plugins: Vec<PathBuf>,
}

/// Materializes a whole plan into a [`TargetFs`].
pub struct Scaffolder<'a> {
    fs: &'a dyn TargetFs,
    formatter: &'a dyn Formatter,
    resolver: &'a dyn ModuleResolver,
    installer: Option<&'a dyn PluginInstaller>,
}

impl<'a> Scaffolder<'a> {
    /// Create a scaffolder that skips plugin installation.
    pub fn new(
        fs: &'a dyn TargetFs,
        formatter: &'a dyn Formatter,
        resolver: &'a dyn ModuleResolver,
    ) -> Self {
        Self {
            fs,
            formatter,
            resolver,
            installer: None,
        }
    }

    /// Install declared plugins and providers with `installer`.
    pub fn with_plugin_installer(mut self, installer: &'a dyn PluginInstaller) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Validate `config`, build its plan and apply it.
    pub fn apply(&self, config: &Config, templates: &TemplateSet) -> CoreResult<ScaffoldReport> {
        config.validate().ensure_valid()?;
        let plan = PlanBuilder::build(config)?;
        self.apply_plan(&plan, templates)
    }

    /// Apply an already resolved plan.
    pub fn apply_plan(&self, plan: &Plan, templates: &TemplateSet) -> CoreResult<ScaffoldReport> {
        let engine = TemplateEngine::new(self.fs, self.formatter);
        let mut report = ScaffoldReport::default();

        info!("Scaffolding project {}", plan.global.settings.project);

        report.files.merge(self.apply_tree(
            &engine,
            "repo",
            &templates.repo,
            Path::new(""),
            &Scope::Repo(plan),
        )?);
        report.plugins = self.install_plugins(plan)?;

        report.files.merge(self.apply_tree(
            &engine,
            "global",
            &templates.global,
            &layout::global_dir(),
            &Scope::Global(&plan.global),
        )?);

        for (name, account) in &plan.accounts {
            report.files.merge(self.apply_tree(
                &engine,
                format!("account {name}"),
                &templates.account,
                &layout::account_dir(name),
                &Scope::Account(account),
            )?);
        }

        let generator =
            ModuleInvocationGenerator::new(&engine, self.resolver, &templates.module_invocation);
        for (env_name, env) in &plan.envs {
            report.files.merge(self.apply_tree(
                &engine,
                format!("env {env_name}"),
                &templates.env,
                &layout::env_dir(env_name),
                &Scope::Env(env),
            )?);

            for (name, component) in &env.components {
                let dir = layout::component_dir(env_name, name);
                report.files.merge(self.apply_tree(
                    &engine,
                    format!("component {env_name}/{name}"),
                    &templates.component,
                    &dir,
                    &Scope::Component(component),
                )?);

                if let Some(source) = &component.module_source {
                    let stage = format!("module invocation {env_name}/{name}");
                    report
                        .files
                        .merge(in_stage(stage, generator.generate(&dir, source))?);
                }
            }
        }

        for (name, module) in &plan.modules {
            report.files.merge(self.apply_tree(
                &engine,
                format!("module {name}"),
                &templates.module,
                &layout::module_dir(name),
                &Scope::Module(module),
            )?);
        }

        info!(
            files = report.files.files.len(),
            plugins = report.plugins.len(),
            "Scaffolding complete"
        );
        Ok(report)
    }

    fn apply_tree(
        &self,
        engine: &TemplateEngine<'_>,
        stage: impl Display,
        tree: &TemplateTree,
        base: &Path,
        scope: &Scope<'_>,
    ) -> CoreResult<ApplyReport> {
        in_stage(&stage, self.create_dir(base))?;
        in_stage(stage, engine.apply(tree, base, scope))
    }

    fn install_plugins(&self, plan: &Plan) -> CoreResult<Vec<PathBuf>> {
        let Some(installer) = self.installer else {
            if !plan.plugins.is_empty() {
                info!("Skipping plugin installation");
            }
            return Ok(Vec::new());
        };

        let declared = plan
            .plugins
            .custom_plugins
            .iter()
            .chain(&plan.plugins.terraform_providers);

        let mut installed = Vec::new();
        for (name, plugin) in declared {
            info!("Applying plugin {}", name);
            let stage = format!("plugin {name}");
            in_stage(&stage, self.create_dir(&plugin.target_dir))?;
            installed.extend(in_stage(stage, self.install(installer, name, plugin))?);
        }
        Ok(installed)
    }

    fn install(
        &self,
        installer: &dyn PluginInstaller,
        name: &str,
        plugin: &PluginInstall,
    ) -> Result<Vec<PathBuf>, StageError> {
        Ok(installer.install(self.fs, name, plugin)?)
    }

    fn create_dir(&self, path: &Path) -> Result<(), StageError> {
        self.fs.create_dir_all(path).map_err(|source| StageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn in_stage<T, E: Into<StageError>>(stage: impl Display, result: Result<T, E>) -> CoreResult<T> {
    result.map_err(|e| CoreError::Stage {
        stage: stage.to_string(),
        source: e.into(),
    })
}
