//! Marker-suffix dispatch.
//!
//! The final suffix of a template entry's file name selects how it is
//! materialized. The mapping is a pure function of the path so it can be
//! tested without touching a filesystem.

use std::path::{Path, PathBuf};

/// Entry is rendered against the scope node; always overwritten.
pub const RENDER_MARKER: &str = "tmpl";
/// Target is created empty if absent.
pub const TOUCH_MARKER: &str = "touch";
/// Entry is copied verbatim if the target is absent.
pub const SEED_MARKER: &str = "create";
/// Files with this extension go through the formatter after materialization.
pub const FORMATTED_EXTENSION: &str = "tf";

/// How a single template entry is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Render,
    TouchIfAbsent,
    SeedIfAbsent,
    CopyVerbatim,
}

impl Strategy {
    /// Pick the strategy for a template entry path.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(RENDER_MARKER) => Strategy::Render,
            Some(TOUCH_MARKER) => Strategy::TouchIfAbsent,
            Some(SEED_MARKER) => Strategy::SeedIfAbsent,
            _ => Strategy::CopyVerbatim,
        }
    }

    /// Whether an existing target is left alone.
    pub fn preserves_existing(&self) -> bool {
        matches!(self, Strategy::TouchIfAbsent | Strategy::SeedIfAbsent)
    }

    /// Entry path with the marker suffix (if any) stripped.
    pub fn target_path(&self, path: &Path) -> PathBuf {
        match self {
            Strategy::CopyVerbatim => path.to_path_buf(),
            _ => path.with_extension(""),
        }
    }
}

/// Whether a materialized file must go through the formatter.
pub fn is_formatted(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(FORMATTED_EXTENSION)
}
