//! Module metadata resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info};

use crate::address::{GitSource, ModuleAddress, SourceKind};
use crate::error::{IacError, IacResult};

/// Input variable and output names declared by a module, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleMetadata {
    pub variables: Vec<String>,
    pub outputs: Vec<String>,
}

/// Fetches a module and reports its interface.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleResolver {
    fn resolve(&self, address: &ModuleAddress) -> IacResult<ModuleMetadata>;
}

/// Reads local modules from disk and shallow-clones git modules.
#[derive(Debug, Clone)]
pub struct SourceModuleResolver {
    repo_root: PathBuf,
    git: String,
}

impl SourceModuleResolver {
    /// Resolve local addresses against `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            git: "git".to_string(),
        }
    }

    /// Use a specific git binary.
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    fn clone_module(&self, source: &GitSource) -> IacResult<ModuleMetadata> {
        let checkout = tempfile::tempdir().map_err(|e| IacError::io(std::env::temp_dir(), e))?;
        let dest = checkout.path().join("module");

        info!("Cloning {} into {:?}", source.url, dest);

        let mut command = Command::new(&self.git);
        command.args(["clone", "--quiet", "--depth", "1"]);
        if let Some(reference) = &source.reference {
            command.arg("--branch").arg(reference);
        }
        command.arg(&source.url).arg(&dest);

        let output = command
            .output()
            .map_err(|e| IacError::Git(format!("Failed to run git clone: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IacError::Git(format!(
                "git clone {} failed: {}",
                source.url,
                stderr.trim()
            )));
        }

        let module_dir = match &source.subdir {
            Some(subdir) => dest.join(subdir),
            None => dest,
        };
        read_module_dir(&module_dir)
    }
}

impl ModuleResolver for SourceModuleResolver {
    fn resolve(&self, address: &ModuleAddress) -> IacResult<ModuleMetadata> {
        debug!("Resolving module {} ({})", address, address.kind());

        match address.kind() {
            SourceKind::Local => {
                let path = address
                    .local_path()
                    .ok_or_else(|| IacError::UnsupportedSource(address.raw().to_string()))?;
                read_module_dir(&self.repo_root.join(path))
            }
            SourceKind::Git => {
                let source = address
                    .git_source()
                    .ok_or_else(|| IacError::UnsupportedSource(address.raw().to_string()))?;
                self.clone_module(&source)
            }
            _ => Err(IacError::UnsupportedSource(address.raw().to_string())),
        }
    }
}

/// Collect `variable` and `output` block labels from every `*.tf` file
/// directly inside `dir`.
pub fn read_module_dir(dir: &Path) -> IacResult<ModuleMetadata> {
    if !dir.is_dir() {
        return Err(IacError::ModuleNotFound(dir.to_path_buf()));
    }

    let pattern = format!("{}/*.tf", glob::Pattern::escape(&dir.to_string_lossy()));
    let paths = glob::glob(&pattern).map_err(|e| IacError::Parse {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
    files.sort();

    let mut metadata = ModuleMetadata::default();
    for file in files {
        let text = fs::read_to_string(&file).map_err(|e| IacError::io(&file, e))?;
        let parsed = parse_module_file(&text).map_err(|message| IacError::Parse {
            path: file.clone(),
            message,
        })?;
        metadata.variables.extend(parsed.variables);
        metadata.outputs.extend(parsed.outputs);
    }

    debug!(
        variables = metadata.variables.len(),
        outputs = metadata.outputs.len(),
        "Read module {:?}",
        dir
    );
    Ok(metadata)
}

/// Extract the interface declared in one HCL document.
pub fn parse_module_file(text: &str) -> Result<ModuleMetadata, String> {
    let body = hcl::parse(text).map_err(|e| e.to_string())?;

    let mut metadata = ModuleMetadata::default();
    for block in body.blocks() {
        let Some(label) = block.labels().first() else {
            continue;
        };
        match block.identifier() {
            "variable" => metadata.variables.push(label.as_str().to_string()),
            "output" => metadata.outputs.push(label.as_str().to_string()),
            _ => {}
        }
    }
    Ok(metadata)
}
