//! Filesystem-backed artifact store.
//!
//! Each artifact is a JSON file named after its cache key. Writes go to a
//! temporary file in the cache directory which is then renamed over the
//! target, so concurrent writers of one key are last-writer-wins and a reader
//! never observes a partially written artifact.

use crate::error::CacheError;
use crate::store::CacheStore;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use taglet_template_core::CompiledArtifact;
use tempfile::NamedTempFile;

const ARTIFACT_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FilesystemCacheStore {
    dir: PathBuf,
}

impl FilesystemCacheStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn artifact_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, ARTIFACT_EXTENSION))
    }
}

impl CacheStore for FilesystemCacheStore {
    fn load(&self, key: &str) -> Result<Option<CompiledArtifact>, CacheError> {
        match fs::read(self.artifact_path(key)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, artifact: &CompiledArtifact) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.artifact_path(key);

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer(&mut writer, artifact)?;
            writer.flush()?;
        }
        temp.persist(&target).map_err(|e| CacheError::Persist {
            path: target.display().to_string(),
            message: e.error.to_string(),
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.artifact_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn clear(&self) -> Result<(), CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION) {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "FilesystemCacheStore"
    }
}
