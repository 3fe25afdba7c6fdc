//! Path-addressable template bundles.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};

/// One file of a template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Path relative to the root of the tree.
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// A read-only bundle of template entries, kept sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    entries: Vec<TemplateEntry>,
}

impl TemplateTree {
    /// Build a tree from `(relative path, contents)` pairs.
    pub fn from_entries<P, C>(entries: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<Vec<u8>>,
    {
        let mut entries: Vec<TemplateEntry> = entries
            .into_iter()
            .map(|(path, contents)| TemplateEntry {
                path: path.into(),
                contents: contents.into(),
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries.dedup_by(|a, b| a.path == b.path);
        Self { entries }
    }

    /// Load every file below `root`.
    pub fn from_dir(root: &Path) -> TemplateResult<Self> {
        if !root.is_dir() {
            return Err(TemplateError::NotFound(root.display().to_string()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| TemplateError::Walk {
                path: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let source = entry.path();
            let relative = source
                .strip_prefix(root)
                .map_err(|e| TemplateError::Walk {
                    path: source.to_path_buf(),
                    message: e.to_string(),
                })?
                .to_path_buf();
            let contents = fs::read(source).map_err(|e| TemplateError::io(source, e))?;
            debug!("Loaded template entry {:?}", relative);
            entries.push((relative, contents));
        }

        Ok(Self::from_entries(entries))
    }

    /// Entries in path order.
    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    /// Look up an entry by its relative path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&TemplateEntry> {
        let path = path.as_ref();
        self.entries.iter().find(|e| e.path == path)
    }

    /// Like [`TemplateTree::get`] but a missing entry is an error.
    pub fn open(&self, path: impl AsRef<Path>) -> TemplateResult<&TemplateEntry> {
        let path = path.as_ref();
        self.get(path)
            .ok_or_else(|| TemplateError::NotFound(path.display().to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_entries_sorted() {
        let tree = TemplateTree::from_entries([("b.txt", "b"), ("a/c.txt", "c"), ("a.txt", "a")]);
        let paths: Vec<_> = tree.entries().iter().map(|e| e.path.clone()).collect();
        // component-wise: `a/c.txt` sorts before `a.txt`
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a/c.txt"),
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt")
            ]
        );
        assert_eq!(tree.get("a/c.txt").unwrap().contents, b"c");
        assert!(tree.open("missing").is_err());
    }

    #[test]
    fn test_from_dir() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("main.tf.tmpl"), "x").unwrap();
        fs::write(temp.path().join("nested/README.md.create"), "y").unwrap();

        let tree = TemplateTree::from_dir(temp.path()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("nested/README.md.create").unwrap().contents, b"y");
    }

    #[test]
    fn test_from_missing_dir() {
        let temp = tempdir().unwrap();
        assert!(TemplateTree::from_dir(&temp.path().join("nope")).is_err());
    }
}
