//! Installation of custom plugins and provider binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};
use walkdir::WalkDir;

use terrace_config::PluginFormat;
use terrace_plan::PluginInstall;
use terrace_templates::TargetFs;

use crate::error::{IacError, IacResult};

/// Installs one declared plugin into the generated repository.
pub trait PluginInstaller {
    /// Returns the installed file paths.
    fn install(
        &self,
        fs: &dyn TargetFs,
        name: &str,
        plugin: &PluginInstall,
    ) -> IacResult<Vec<PathBuf>>;
}

/// Downloads plugins over HTTP(S).
pub struct HttpPluginInstaller {
    client: reqwest::blocking::Client,
    tar: String,
}

impl HttpPluginInstaller {
    pub fn new() -> IacResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("terrace/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| IacError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            tar: "tar".to_string(),
        })
    }

    /// Use a specific tar binary.
    pub fn with_tar(mut self, tar: impl Into<String>) -> Self {
        self.tar = tar.into();
        self
    }

    fn download(&self, url: &str) -> IacResult<Vec<u8>> {
        info!("Downloading {}", url);

        let download_error = |e: reqwest::Error| IacError::Download {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(download_error)?;
        let bytes = response.bytes().map_err(download_error)?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    /// Unpack a gzipped tarball, returning `(relative path, contents)` for
    /// every regular file it contains.
    fn unpack(&self, name: &str, archive: &[u8]) -> IacResult<Vec<(PathBuf, Vec<u8>)>> {
        let unpack_error = |message: String| IacError::Unpack {
            name: name.to_string(),
            message,
        };

        let scratch = tempfile::tempdir().map_err(|e| IacError::io(std::env::temp_dir(), e))?;
        let archive_path = scratch.path().join("plugin.tar.gz");
        let extract_dir = scratch.path().join("contents");
        fs::write(&archive_path, archive).map_err(|e| IacError::io(&archive_path, e))?;
        fs::create_dir_all(&extract_dir).map_err(|e| IacError::io(&extract_dir, e))?;

        let output = Command::new(&self.tar)
            .arg("-xzf")
            .arg(&archive_path)
            .arg("-C")
            .arg(&extract_dir)
            .output()
            .map_err(|e| unpack_error(format!("Failed to run {}: {}", self.tar, e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unpack_error(format!("{} failed: {}", self.tar, stderr.trim())));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&extract_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| unpack_error(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&extract_dir)
                .map_err(|e| unpack_error(e.to_string()))?
                .to_path_buf();
            let contents = fs::read(entry.path()).map_err(|e| IacError::io(entry.path(), e))?;
            files.push((relative, contents));
        }
        Ok(files)
    }
}

impl PluginInstaller for HttpPluginInstaller {
    fn install(
        &self,
        fs: &dyn TargetFs,
        name: &str,
        plugin: &PluginInstall,
    ) -> IacResult<Vec<PathBuf>> {
        let bytes = self.download(&plugin.url)?;

        let files = match plugin.format {
            PluginFormat::Bin => vec![(PathBuf::from(name), bytes)],
            PluginFormat::Tar => self.unpack(name, &bytes)?,
        };

        write_executables(fs, &plugin.target_dir, files)
    }
}

/// Write each file below `target_dir` and mark it executable.
pub fn write_executables(
    fs: &dyn TargetFs,
    target_dir: &Path,
    files: Vec<(PathBuf, Vec<u8>)>,
) -> IacResult<Vec<PathBuf>> {
    let mut installed = Vec::with_capacity(files.len());
    for (relative, contents) in files {
        let target = target_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs.create_dir_all(parent).map_err(|e| IacError::io(parent, e))?;
        }
        fs.write(&target, &contents).map_err(|e| IacError::io(&target, e))?;
        fs.set_executable(&target).map_err(|e| IacError::io(&target, e))?;
        info!("Installed {}", target.display());
        installed.push(target);
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrace_templates::MemoryFs;

    #[test]
    fn test_write_executables() {
        let fs = MemoryFs::new();
        let installed = write_executables(
            &fs,
            Path::new("terraform.d/plugins/linux_amd64"),
            vec![
                (PathBuf::from("terraform-provider-custom"), b"bin".to_vec()),
                (PathBuf::from("nested/helper"), b"helper".to_vec()),
            ],
        )
        .unwrap();

        assert_eq!(installed.len(), 2);
        assert_eq!(
            fs.read(Path::new("terraform.d/plugins/linux_amd64/terraform-provider-custom"))
                .unwrap(),
            b"bin"
        );
        assert_eq!(
            fs.read(Path::new("terraform.d/plugins/linux_amd64/nested/helper")).unwrap(),
            b"helper"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unpack_tarball() {
        let source = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(source.path().join("pkg")).unwrap();
        std::fs::write(source.path().join("pkg/terraform-provider-x"), "x").unwrap();
        std::fs::write(source.path().join("README"), "r").unwrap();
        let archive = source.path().join("out.tar.gz");
        let status = Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(source.path())
            .arg("README")
            .arg("pkg")
            .status()
            .unwrap();
        assert!(status.success());

        let installer = HttpPluginInstaller::new().unwrap();
        let files = installer
            .unpack("x", &std::fs::read(&archive).unwrap())
            .unwrap();
        let paths: Vec<_> = files.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("README"), PathBuf::from("pkg/terraform-provider-x")]
        );
    }

    #[test]
    fn test_client_error_message() {
        let err = IacError::HttpClient("no TLS backend".to_string());
        assert_eq!(err.to_string(), "Failed to build HTTP client: no TLS backend");
    }

    #[test]
    fn test_unpack_rejects_garbage() {
        let installer = HttpPluginInstaller::new().unwrap();
        assert!(installer.unpack("x", b"not a tarball").is_err());
    }
}
