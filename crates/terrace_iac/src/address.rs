//! Module source addresses.
//!
//! Addresses follow terraform's `source` syntax: a plain path is a local
//! module, anything carrying a getter prefix, a URL scheme or a well-known
//! host is remote. Local addresses are stored relative to the repository
//! root and rewritten relative to each component that uses them.

use std::path::{Component, Path};

use regex::Regex;

use crate::error::{IacError, IacResult};

/// Where a module's source code lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Local,
    Git,
    Mercurial,
    Http,
    S3,
    Gcs,
    /// A getter or scheme we recognize as remote but cannot fetch.
    Other,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Git => "git",
            SourceKind::Mercurial => "hg",
            SourceKind::Http => "http",
            SourceKind::S3 => "s3",
            SourceKind::Gcs => "gcs",
            SourceKind::Other => "other",
        }
    }

    fn from_getter(getter: &str) -> Self {
        match getter.to_ascii_lowercase().as_str() {
            "file" => SourceKind::Local,
            "git" | "ssh" => SourceKind::Git,
            "hg" => SourceKind::Mercurial,
            "http" | "https" => SourceKind::Http,
            "s3" => SourceKind::S3,
            "gcs" | "gs" => SourceKind::Gcs,
            _ => SourceKind::Other,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified module address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleAddress {
    raw: String,
    kind: SourceKind,
    /// The address without its forced getter or `file://` prefix.
    location: String,
}

/// The parts of a git address needed to clone it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub url: String,
    pub subdir: Option<String>,
    pub reference: Option<String>,
}

impl ModuleAddress {
    /// Classify `raw` as a local or remote address.
    pub fn detect(raw: &str) -> Self {
        let (kind, location) = classify(raw.trim());
        Self {
            raw: raw.to_string(),
            kind,
            location: location.to_string(),
        }
    }

    /// The address exactly as configured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn is_local(&self) -> bool {
        self.kind == SourceKind::Local
    }

    /// Filesystem path of a local module, relative to the repository root
    /// unless absolute.
    pub fn local_path(&self) -> Option<&Path> {
        self.is_local().then(|| Path::new(&self.location))
    }

    /// Final path segment with any `?ref=` qualifier removed.
    pub fn display_name(&self) -> String {
        let base = Path::new(&self.raw)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.raw.clone());

        match Regex::new(r"\?ref=.*") {
            Ok(re) => re.replace_all(&base, "").into_owned(),
            Err(_) => base,
        }
    }

    /// The `source` value to write into a component at `component_dir`.
    ///
    /// Local modules become a path relative to the component; remote
    /// addresses pass through unchanged.
    pub fn source_for(&self, component_dir: &Path) -> IacResult<String> {
        match self.local_path() {
            Some(module) => relative_path(component_dir, module),
            None => Ok(self.raw.clone()),
        }
    }

    /// Split a git address into clone URL, sub-directory and ref.
    pub fn git_source(&self) -> Option<GitSource> {
        if self.kind != SourceKind::Git {
            return None;
        }

        let (location, query) = match self.location.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (self.location.as_str(), None),
        };
        let reference = query.and_then(|q| {
            q.split('&')
                .find_map(|pair| pair.strip_prefix("ref="))
                .map(str::to_string)
        });

        let (url, subdir) = split_subdir(location);
        let url = if url.starts_with("github.com/") || url.starts_with("bitbucket.org/") {
            format!("https://{url}")
        } else {
            url.to_string()
        };

        Some(GitSource {
            url,
            subdir: subdir.filter(|s| !s.is_empty()).map(str::to_string),
            reference,
        })
    }
}

impl std::fmt::Display for ModuleAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn classify(raw: &str) -> (SourceKind, &str) {
    // Forced getter: `git::https://...`, `s3::...`
    if let Some((getter, rest)) = raw.split_once("::") {
        if !getter.is_empty() && getter.chars().all(|c| c.is_ascii_alphanumeric()) {
            let kind = SourceKind::from_getter(getter);
            if kind == SourceKind::Local {
                return (kind, rest.strip_prefix("file://").unwrap_or(rest));
            }
            return (kind, rest);
        }
    }

    if let Some((scheme, rest)) = raw.split_once("://") {
        let valid_scheme = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid_scheme {
            return match SourceKind::from_getter(scheme) {
                SourceKind::Local => (SourceKind::Local, rest),
                SourceKind::Http if is_git_url(rest) => (SourceKind::Git, raw),
                kind => (kind, raw),
            };
        }
    }

    if raw.starts_with("github.com/")
        || raw.starts_with("bitbucket.org/")
        || raw.starts_with("git@")
    {
        return (SourceKind::Git, raw);
    }

    if raw.contains(".amazonaws.com/") {
        return (SourceKind::S3, raw);
    }
    if raw.starts_with("storage.googleapis.com/") {
        return (SourceKind::Gcs, raw);
    }

    (SourceKind::Local, raw)
}

fn is_git_url(rest: &str) -> bool {
    let path = rest.split('?').next().unwrap_or(rest);
    path.ends_with(".git") || path.contains(".git//")
}

/// Split `url//subdir`, ignoring the `//` of a URL scheme.
fn split_subdir(location: &str) -> (&str, Option<&str>) {
    let start = location.find("://").map_or(0, |i| i + 3);
    match location[start..].find("//") {
        Some(i) => (&location[..start + i], Some(&location[start + i + 2..])),
        None => (location, None),
    }
}

/// Lexical path from directory `from` to `to`, joined with `/`.
///
/// Both paths must be relative (or both absolute), and `from` must not
/// climb above its root.
pub fn relative_path(from: &Path, to: &Path) -> IacResult<String> {
    let invalid = |reason: &str| IacError::InvalidModulePath {
        from: from.display().to_string(),
        to: to.display().to_string(),
        reason: reason.to_string(),
    };

    if from.is_absolute() != to.is_absolute() {
        return Err(invalid("cannot mix absolute and relative paths"));
    }

    let from_parts = normalize(from);
    let to_parts = normalize(to);
    if from_parts.first().is_some_and(|p| p == "..") {
        return Err(invalid("component directory escapes the repository root"));
    }

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let parts: Vec<&str> = std::iter::repeat("..")
        .take(from_parts.len() - common)
        .chain(to_parts[common..].iter().map(String::as_str))
        .collect();

    if parts.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(parts.join("/"))
    }
}

/// Components of `path` with `.` removed and `..` folded where possible.
fn normalize(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|p| p != "..") {
                    parts.pop();
                } else if !path.is_absolute() {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_local() {
        for raw in ["terraform/modules/vpc", "../../modules/vpc", "./vpc", "/abs/vpc"] {
            let address = ModuleAddress::detect(raw);
            assert!(address.is_local(), "{raw}");
        }

        let address = ModuleAddress::detect("file://terraform/modules/vpc");
        assert_eq!(address.local_path(), Some(Path::new("terraform/modules/vpc")));
    }

    #[test]
    fn test_detect_remote() {
        let cases = [
            ("git::https://example.com/modules.git//vpc?ref=v1.2.0", SourceKind::Git),
            ("github.com/acme/modules//vpc", SourceKind::Git),
            ("git@github.com:acme/modules.git", SourceKind::Git),
            ("https://example.com/modules.git", SourceKind::Git),
            ("https://example.com/vpc.zip", SourceKind::Http),
            ("s3::https://s3.amazonaws.com/bucket/vpc.zip", SourceKind::S3),
            ("hg::http://example.com/vpc", SourceKind::Mercurial),
            ("foo::bar", SourceKind::Other),
        ];
        for (raw, kind) in cases {
            assert_eq!(ModuleAddress::detect(raw).kind(), kind, "{raw}");
        }
    }

    #[test]
    fn test_display_name_strips_ref() {
        let address = ModuleAddress::detect("git::https://example.com/modules.git//vpc?ref=v1.2.0");
        assert_eq!(address.display_name(), "vpc");
        assert_eq!(ModuleAddress::detect("terraform/modules/dns").display_name(), "dns");
    }

    #[test]
    fn test_git_source() {
        let git = ModuleAddress::detect("git::https://example.com/modules.git//vpc?ref=v1.2.0")
            .git_source()
            .unwrap();
        assert_eq!(git.url, "https://example.com/modules.git");
        assert_eq!(git.subdir.as_deref(), Some("vpc"));
        assert_eq!(git.reference.as_deref(), Some("v1.2.0"));

        let git = ModuleAddress::detect("github.com/acme/modules").git_source().unwrap();
        assert_eq!(git.url, "https://github.com/acme/modules");
        assert_eq!(git.subdir, None);
        assert_eq!(git.reference, None);

        assert!(ModuleAddress::detect("terraform/modules/vpc").git_source().is_none());
    }

    #[test]
    fn test_relative_path() {
        let rel = relative_path(
            Path::new("terraform/envs/prod/vpc"),
            Path::new("terraform/modules/vpc"),
        );
        assert_eq!(rel.unwrap(), "../../../modules/vpc");

        let rel = relative_path(Path::new("envs/prod/vpc"), Path::new("../../modules/vpc"));
        assert_eq!(rel.unwrap(), "../../../../../modules/vpc");

        let rel = relative_path(Path::new("a/./b"), Path::new("a/b"));
        assert_eq!(rel.unwrap(), ".");
    }

    #[test]
    fn test_relative_path_errors() {
        assert!(matches!(
            relative_path(Path::new("../outside"), Path::new("modules/vpc")),
            Err(IacError::InvalidModulePath { .. })
        ));
        assert!(matches!(
            relative_path(Path::new("envs/prod/vpc"), Path::new("/abs/modules/vpc")),
            Err(IacError::InvalidModulePath { .. })
        ));
    }

    #[test]
    fn test_remote_source_passes_through() {
        let raw = "git::https://example.com/modules.git//vpc?ref=v1.2.0";
        let address = ModuleAddress::detect(raw);
        assert_eq!(address.source_for(Path::new("terraform/envs/prod/vpc")).unwrap(), raw);
    }
}
