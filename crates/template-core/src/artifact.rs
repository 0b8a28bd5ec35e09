use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// The cached result of compiling one logical template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledArtifact {
    /// Every candidate path considered for the template, most specific first,
    /// including paths that did not exist at compile time.
    pub source_identity: Vec<PathBuf>,
    pub code: String,
    pub recorded_mtime: SystemTime,
    /// The candidates that existed when `code` was compiled.
    #[serde(default)]
    pub existing_sources: Vec<PathBuf>,
    /// Authoring mistakes recovered from while compiling `code`.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledArtifact {
    pub fn new(source_identity: Vec<PathBuf>, code: String, recorded_mtime: SystemTime) -> Self {
        Self {
            source_identity,
            code,
            recorded_mtime,
            existing_sources: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// `true` if no given modification time is newer than the recorded one.
    pub fn is_fresh<I>(&self, modification_times: I) -> bool
    where
        I: IntoIterator<Item = SystemTime>,
    {
        modification_times
            .into_iter()
            .all(|mtime| self.recorded_mtime >= mtime)
    }
}
