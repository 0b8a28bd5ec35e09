//! Engine configuration.
//!
//! A config is usually read from a JSON file and refined through
//! [`TemplateEngineBuilder`](crate::TemplateEngineBuilder):
//!
//! ```json
//! {
//!   "theme_dirs": ["themes/child", "themes/default"],
//!   "template_extension": "tpl",
//!   "cache_dir": "var/cache/templates",
//!   "strict": false
//! }
//! ```
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Theme directories, most specific first.
    pub theme_dirs: Vec<PathBuf>,
    pub template_extension: String,
    /// Where compiled artifacts are persisted. `None` keeps them in memory.
    pub cache_dir: Option<PathBuf>,
    /// Reject templates that needed recovery from authoring mistakes.
    pub strict: bool,
    /// Fail rendering on missing fields in the render context.
    pub strict_render: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            theme_dirs: Vec::new(),
            template_extension: "tpl".to_string(),
            cache_dir: None,
            strict: false,
            strict_render: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            EngineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.theme_dirs.is_empty() {
            return Err(EngineError::Config("no theme directories configured".to_string()));
        }
        Ok(())
    }
}
