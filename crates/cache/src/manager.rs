use crate::error::CacheError;
use crate::memory::InMemoryCacheStore;
use crate::store::{CacheStore, cache_key};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use taglet_template_core::{CompiledArtifact, SourceTimestamps, TemplateError};

/// Returns cached emitted code while it is fresh and recompiles otherwise.
///
/// An artifact is fresh when its recorded time is at or after the
/// modification time of every existing file in its source identity, and the
/// same candidates exist as when it was compiled.
#[derive(Debug)]
pub struct CacheManager {
    store: Box<dyn CacheStore>,
    timestamps: Arc<dyn SourceTimestamps>,
}

impl CacheManager {
    pub fn new(store: Box<dyn CacheStore>, timestamps: Arc<dyn SourceTimestamps>) -> Self {
        Self { store, timestamps }
    }

    pub fn in_memory(timestamps: Arc<dyn SourceTimestamps>) -> Self {
        Self::new(Box::new(InMemoryCacheStore::new()), timestamps)
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// The stored artifact for `source_identity`, if it is still fresh.
    ///
    /// Unreadable or corrupt artifacts are logged and treated as missing.
    pub fn lookup(&self, source_identity: &[PathBuf]) -> Option<CompiledArtifact> {
        let key = cache_key(source_identity);
        let artifact = match self.store.load(&key) {
            Ok(Some(artifact)) => artifact,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Ignoring unreadable cached artifact {} in {}: {}", key, self.store.name(), e);
                return None;
            }
        };
        if artifact.source_identity != source_identity {
            log::debug!("Cache key {} belongs to a different source identity", key);
            return None;
        }
        if artifact.existing_sources != self.existing_sources(source_identity) {
            log::debug!("Sources of {:?} were added or removed", source_identity);
            return None;
        }
        let mtimes = source_identity.iter().filter_map(|p| self.timestamps.modified(p));
        artifact.is_fresh(mtimes).then_some(artifact)
    }

    /// Returns the cached code for `source_identity`, or runs `compile` and
    /// caches its result.
    ///
    /// A failure to persist the new artifact is logged and the freshly
    /// compiled code is returned anyway. Errors from `compile` propagate.
    pub fn get_or_compile<F>(&self, source_identity: &[PathBuf], compile: F) -> Result<String, TemplateError>
    where
        F: FnOnce() -> Result<String, TemplateError>,
    {
        self.get_or_compile_artifact(source_identity, |recorded_mtime| {
            let code = compile()?;
            Ok(CompiledArtifact::new(source_identity.to_vec(), code, recorded_mtime))
        })
        .map(|artifact| artifact.code)
    }

    /// Like [`get_or_compile`](Self::get_or_compile), but returns the whole
    /// artifact including its diagnostics.
    ///
    /// `compile` receives the time to record on the new artifact. The source
    /// identity and existing sources are set by the manager.
    pub fn get_or_compile_artifact<F>(
        &self,
        source_identity: &[PathBuf],
        compile: F,
    ) -> Result<CompiledArtifact, TemplateError>
    where
        F: FnOnce(SystemTime) -> Result<CompiledArtifact, TemplateError>,
    {
        if let Some(artifact) = self.lookup(source_identity) {
            log::debug!("Cache hit for {:?}", source_identity);
            return Ok(artifact);
        }
        log::debug!("Cache miss for {:?}; compiling", source_identity);

        // A source stamped in the future (clock skew, copied trees) would
        // otherwise never be considered fresh again.
        let started = SystemTime::now();
        let existing_sources = self.existing_sources(source_identity);
        let recorded_mtime = self
            .newest_mtime(source_identity)
            .map_or(started, |newest| newest.max(started));

        let mut artifact = compile(recorded_mtime)?;
        artifact.source_identity = source_identity.to_vec();
        artifact.existing_sources = existing_sources;

        let key = cache_key(source_identity);
        match self.store.store(&key, &artifact) {
            Ok(()) => log::debug!("Stored artifact {} in {}", key, self.store.name()),
            Err(e) => log::warn!(
                "Failed to cache compiled template {:?}; using in-memory result: {}",
                source_identity,
                e
            ),
        }
        Ok(artifact)
    }

    pub fn invalidate(&self, source_identity: &[PathBuf]) -> Result<(), CacheError> {
        self.store.remove(&cache_key(source_identity))
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.clear()
    }

    fn existing_sources(&self, source_identity: &[PathBuf]) -> Vec<PathBuf> {
        source_identity
            .iter()
            .filter(|p| self.timestamps.modified(p).is_some())
            .cloned()
            .collect()
    }

    fn newest_mtime(&self, source_identity: &[PathBuf]) -> Option<SystemTime> {
        source_identity
            .iter()
            .filter_map(|p| self.timestamps.modified(p))
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::RwLock;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct FakeClock {
        mtimes: RwLock<HashMap<PathBuf, SystemTime>>,
    }

    impl FakeClock {
        fn set(&self, path: &str, mtime: SystemTime) {
            self.mtimes.write().unwrap().insert(PathBuf::from(path), mtime);
        }

        fn delete(&self, path: &str) {
            self.mtimes.write().unwrap().remove(Path::new(path));
        }
    }

    impl SourceTimestamps for FakeClock {
        fn modified(&self, path: &Path) -> Option<SystemTime> {
            self.mtimes.read().unwrap().get(path).copied()
        }
    }

    /// A store whose writes always fail.
    #[derive(Debug)]
    struct ReadOnlyStore;

    impl CacheStore for ReadOnlyStore {
        fn load(&self, _key: &str) -> Result<Option<CompiledArtifact>, CacheError> {
            Ok(None)
        }
        fn store(&self, _key: &str, _artifact: &CompiledArtifact) -> Result<(), CacheError> {
            Err(CacheError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }
        fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Ok(())
        }
        fn clear(&self) -> Result<(), CacheError> {
            Ok(())
        }
        fn name(&self) -> &'static str {
            "ReadOnlyStore"
        }
    }

    fn identity() -> Vec<PathBuf> {
        vec![PathBuf::from("child/page.tpl"), PathBuf::from("base/page.tpl")]
    }

    fn past() -> SystemTime {
        SystemTime::now() - Duration::from_secs(3600)
    }

    #[test]
    fn test_cache_reuses_fresh_artifact() {
        let clock = Arc::new(FakeClock::default());
        clock.set("base/page.tpl", past());
        let manager = CacheManager::in_memory(clock.clone());
        let calls = Cell::new(0);
        let compile = || {
            calls.set(calls.get() + 1);
            Ok("code".to_string())
        };

        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "code");
        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "code");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_touching_any_chain_file_recompiles() {
        let clock = Arc::new(FakeClock::default());
        clock.set("base/page.tpl", past());
        let manager = CacheManager::in_memory(clock.clone());
        let calls = Cell::new(0);
        let compile = || {
            calls.set(calls.get() + 1);
            Ok(format!("v{}", calls.get()))
        };

        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v1");

        // A file that did not exist before appears in the chain.
        clock.set("child/page.tpl", SystemTime::now() + Duration::from_secs(3600));
        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v2");
        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v2");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_deleting_a_chain_file_recompiles() {
        let clock = Arc::new(FakeClock::default());
        clock.set("child/page.tpl", past());
        clock.set("base/page.tpl", past());
        let manager = CacheManager::in_memory(clock.clone());
        let calls = Cell::new(0);
        let compile = || {
            calls.set(calls.get() + 1);
            Ok(format!("v{}", calls.get()))
        };

        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v1");
        clock.delete("child/page.tpl");
        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v2");
        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v2");
    }

    #[test]
    fn test_new_file_with_old_mtime_recompiles() {
        let clock = Arc::new(FakeClock::default());
        clock.set("base/page.tpl", past());
        let manager = CacheManager::in_memory(clock.clone());
        let calls = Cell::new(0);
        let compile = || {
            calls.set(calls.get() + 1);
            Ok(format!("v{}", calls.get()))
        };

        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v1");
        clock.set("child/page.tpl", past() - Duration::from_secs(60));
        assert_eq!(manager.get_or_compile(&identity(), compile).unwrap(), "v2");
    }

    #[test]
    fn test_cached_artifact_keeps_diagnostics() {
        use taglet_template_core::{Diagnostic, DiagnosticKind};

        let clock = Arc::new(FakeClock::default());
        clock.set("base/page.tpl", past());
        let manager = CacheManager::in_memory(clock);
        let diagnostics = vec![Diagnostic::new(DiagnosticKind::UnknownValueTag, "Missing")];
        let compile = |at| {
            Ok(CompiledArtifact::new(Vec::new(), String::new(), at).with_diagnostics(diagnostics.clone()))
        };

        let fresh = manager.get_or_compile_artifact(&identity(), compile).unwrap();
        assert_eq!(fresh.source_identity, identity());
        assert_eq!(fresh.existing_sources, vec![PathBuf::from("base/page.tpl")]);

        let cached = manager
            .get_or_compile_artifact(&identity(), |_| panic!("expected a cache hit"))
            .unwrap();
        assert_eq!(cached.diagnostics, diagnostics);
    }

    #[test]
    fn test_write_failure_still_returns_code() {
        let clock = Arc::new(FakeClock::default());
        let manager = CacheManager::new(Box::new(ReadOnlyStore), clock);
        let code = manager.get_or_compile(&identity(), || Ok("fresh".to_string())).unwrap();
        assert_eq!(code, "fresh");
    }

    #[test]
    fn test_compile_error_propagates_and_is_not_cached() {
        let clock = Arc::new(FakeClock::default());
        let manager = CacheManager::in_memory(clock);
        let result = manager.get_or_compile(&identity(), || Err(TemplateError::NoCandidate("page".to_string())));
        assert!(matches!(result, Err(TemplateError::NoCandidate(_))));
        assert!(manager.lookup(&identity()).is_none());
    }

    #[test]
    fn test_invalidate_forces_recompile() {
        let clock = Arc::new(FakeClock::default());
        let manager = CacheManager::in_memory(clock);
        let calls = Cell::new(0);
        let compile = || {
            calls.set(calls.get() + 1);
            Ok(String::new())
        };

        manager.get_or_compile(&identity(), compile).unwrap();
        manager.invalidate(&identity()).unwrap();
        manager.get_or_compile(&identity(), compile).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_identity_mismatch_is_a_miss() {
        let clock = Arc::new(FakeClock::default());
        let manager = CacheManager::in_memory(clock);
        let key = cache_key(&identity());
        let foreign = CompiledArtifact::new(vec![PathBuf::from("other.tpl")], "x".to_string(), SystemTime::now());
        manager.store().store(&key, &foreign).unwrap();
        assert!(manager.lookup(&identity()).is_none());
    }
}
