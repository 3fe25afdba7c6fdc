//! Template application.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use terrace_plan::Scope;

use crate::error::{TemplateError, TemplateResult};
use crate::format::Formatter;
use crate::fs::TargetFs;
use crate::renderer::TemplateRenderer;
use crate::strategy::{is_formatted, Strategy};
use crate::tree::{TemplateEntry, TemplateTree};

/// What happened to one target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileOutcome {
    Rendered,
    Touched,
    Seeded,
    Copied,
    /// A touch or seed target already existed and was left alone.
    Skipped,
}

impl FileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOutcome::Rendered => "templated",
            FileOutcome::Touched => "touched",
            FileOutcome::Seeded => "created",
            FileOutcome::Copied => "copied",
            FileOutcome::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-file outcomes of one or more `apply` calls, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl ApplyReport {
    pub fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        self.files.push((path, outcome));
    }

    pub fn merge(&mut self, other: ApplyReport) {
        self.files.extend(other.files);
    }

    pub fn outcome(&self, path: impl AsRef<Path>) -> Option<FileOutcome> {
        let path = path.as_ref();
        self.files
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| *outcome)
    }

    pub fn count(&self, outcome: FileOutcome) -> usize {
        self.files.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Materializes template trees onto a [`TargetFs`].
pub struct TemplateEngine<'a> {
    fs: &'a dyn TargetFs,
    formatter: &'a dyn Formatter,
    renderer: TemplateRenderer,
}

impl<'a> TemplateEngine<'a> {
    pub fn new(fs: &'a dyn TargetFs, formatter: &'a dyn Formatter) -> Self {
        Self {
            fs,
            formatter,
            renderer: TemplateRenderer::new(),
        }
    }

    pub fn fs(&self) -> &'a dyn TargetFs {
        self.fs
    }

    /// Apply every entry of `tree` below `base`, rendering against `scope`.
    ///
    /// The first failure aborts the whole call.
    pub fn apply(
        &self,
        tree: &TemplateTree,
        base: &Path,
        scope: &Scope<'_>,
    ) -> TemplateResult<ApplyReport> {
        info!("Applying {} templates to {:?}", scope.kind(), base);

        let mut report = ApplyReport::default();
        for entry in tree.entries() {
            let (target, outcome) = self.apply_entry(entry, base, scope)?;
            info!("{} {}", target.display(), outcome);
            report.record(target, outcome);
        }
        Ok(report)
    }

    fn apply_entry(
        &self,
        entry: &TemplateEntry,
        base: &Path,
        scope: &Scope<'_>,
    ) -> TemplateResult<(PathBuf, FileOutcome)> {
        let strategy = Strategy::for_path(&entry.path);
        let target = base.join(strategy.target_path(&entry.path));

        if strategy.preserves_existing() && self.exists(&target)? {
            return Ok((target, FileOutcome::Skipped));
        }

        let (contents, outcome) = match strategy {
            Strategy::Render => (self.render(entry, &target, scope)?, FileOutcome::Rendered),
            Strategy::TouchIfAbsent => (Vec::new(), FileOutcome::Touched),
            Strategy::SeedIfAbsent => (entry.contents.clone(), FileOutcome::Seeded),
            Strategy::CopyVerbatim => (entry.contents.clone(), FileOutcome::Copied),
        };

        self.write_formatted(&target, contents)?;
        Ok((target, outcome))
    }

    /// Render a template source against arbitrary data.
    pub fn render_source<S: Serialize>(
        &self,
        name: &Path,
        source: &[u8],
        data: &S,
    ) -> TemplateResult<Vec<u8>> {
        let text = std::str::from_utf8(source).map_err(|e| TemplateError::RenderingFailed {
            path: name.to_path_buf(),
            message: e.to_string(),
        })?;

        self.renderer
            .render(&name.to_string_lossy(), text, data)
            .map(String::into_bytes)
            .map_err(|e| TemplateError::RenderingFailed {
                path: name.to_path_buf(),
                message: format!("{:#}", e),
            })
    }

    fn render(
        &self,
        entry: &TemplateEntry,
        target: &Path,
        scope: &Scope<'_>,
    ) -> TemplateResult<Vec<u8>> {
        self.render_source(&entry.path, &entry.contents, scope)
            .map_err(|e| match e {
                TemplateError::RenderingFailed { message, .. } => TemplateError::RenderingFailed {
                    path: target.to_path_buf(),
                    message,
                },
                other => other,
            })
    }

    /// Format (if the target is an infrastructure file) and write.
    ///
    /// Formatting happens before the write so a formatting failure never
    /// leaves an unformatted file behind.
    pub fn write_formatted(&self, target: &Path, contents: Vec<u8>) -> TemplateResult<()> {
        let contents = self.format_for(target, contents)?;
        self.write(target, &contents)
    }

    /// Run the formatter over `contents` when `target` is an
    /// infrastructure file, otherwise return them unchanged.
    pub fn format_for(&self, target: &Path, contents: Vec<u8>) -> TemplateResult<Vec<u8>> {
        if !is_formatted(target) {
            return Ok(contents);
        }
        self.formatter
            .format(&contents)
            .map_err(|source| TemplateError::FormatFailed {
                path: target.to_path_buf(),
                source,
            })
    }

    /// Write `contents` as-is, creating missing parent directories.
    pub fn write(&self, target: &Path, contents: &[u8]) -> TemplateResult<()> {
        if let Some(parent) = target.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| TemplateError::io(parent, e))?;
        }
        self.fs
            .write(target, contents)
            .map_err(|e| TemplateError::io(target, e))
    }

    fn exists(&self, path: &Path) -> TemplateResult<bool> {
        self.fs.exists(path).map_err(|e| TemplateError::io(path, e))
    }
}
