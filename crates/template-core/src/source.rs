//! Template sources and their modification times.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// The text of one layer of an override chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSource {
    pub path: PathBuf,
    pub text: String,
}

impl LayerSource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Modification-time lookup for source files.
///
/// Returns `None` for a path that does not exist. Used by the cache to decide
/// whether a compiled artifact is still fresh.
pub trait SourceTimestamps: Send + Sync + Debug {
    fn modified(&self, path: &Path) -> Option<SystemTime>;
}

/// Reads modification times from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemTimestamps;

impl SourceTimestamps for FilesystemTimestamps {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}
