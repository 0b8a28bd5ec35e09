//! Filesystem theme resolver.
//!
//! Loads templates from an ordered list of theme directories, most specific
//! (child theme) first.

use crate::error::ResourceError;
use crate::resolver::{TemplateResolver, candidate_paths};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use taglet_template_core::{FilesystemTimestamps, SourceTimestamps};

pub const DEFAULT_EXTENSION: &str = "tpl";

/// A resolver over theme directories on the local filesystem.
///
/// # Security
///
/// Logical names containing `..` or absolute paths resolve to nothing, and
/// `read` refuses paths outside the configured theme directories.
#[derive(Debug, Clone)]
pub struct ThemeResolver {
    theme_dirs: Vec<PathBuf>,
    extension: String,
}

impl ThemeResolver {
    /// Creates a resolver over `theme_dirs`, most specific first.
    pub fn new<I, P>(theme_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            theme_dirs: theme_dirs.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn theme_dirs(&self) -> &[PathBuf] {
        &self.theme_dirs
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl SourceTimestamps for ThemeResolver {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        FilesystemTimestamps.modified(path)
    }
}

impl TemplateResolver for ThemeResolver {
    fn resolve(&self, logical_name: &str) -> Vec<PathBuf> {
        candidate_paths(&self.theme_dirs, &self.extension, logical_name)
    }

    fn read(&self, path: &Path) -> Result<Option<String>, ResourceError> {
        if !self.theme_dirs.iter().any(|dir| path.starts_with(dir)) {
            return Err(ResourceError::LoadFailed {
                path: path.display().to_string(),
                message: "outside the configured theme directories".to_string(),
            });
        }
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ResourceError::LoadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "ThemeResolver"
    }
}
