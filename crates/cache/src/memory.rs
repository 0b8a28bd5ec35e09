use crate::error::CacheError;
use crate::store::CacheStore;
use std::collections::HashMap;
use std::sync::RwLock;
use taglet_template_core::CompiledArtifact;

/// A process-local artifact store.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    artifacts: RwLock<HashMap<String, CompiledArtifact>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.artifacts.read().map(|a| a.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.artifacts.read().map(|a| a.is_empty()).unwrap_or(true)
    }
}

impl CacheStore for InMemoryCacheStore {
    fn load(&self, key: &str) -> Result<Option<CompiledArtifact>, CacheError> {
        let artifacts = self.artifacts.read().map_err(|_| CacheError::Poisoned)?;
        Ok(artifacts.get(key).cloned())
    }

    fn store(&self, key: &str, artifact: &CompiledArtifact) -> Result<(), CacheError> {
        let mut artifacts = self.artifacts.write().map_err(|_| CacheError::Poisoned)?;
        artifacts.insert(key.to_string(), artifact.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut artifacts = self.artifacts.write().map_err(|_| CacheError::Poisoned)?;
        artifacts.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let mut artifacts = self.artifacts.write().map_err(|_| CacheError::Poisoned)?;
        artifacts.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemoryCacheStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn artifact(code: &str) -> CompiledArtifact {
        CompiledArtifact::new(vec![], code.to_string(), SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_store_and_load() {
        let store = InMemoryCacheStore::new();
        store.store("k", &artifact("code")).unwrap();
        assert_eq!(store.load("k").unwrap().unwrap().code, "code");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_missing() {
        let store = InMemoryCacheStore::new();
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_overwrite_remove_and_clear() {
        let store = InMemoryCacheStore::new();
        store.store("a", &artifact("1")).unwrap();
        store.store("a", &artifact("2")).unwrap();
        store.store("b", &artifact("3")).unwrap();
        assert_eq!(store.load("a").unwrap().unwrap().code, "2");

        store.remove("a").unwrap();
        assert!(store.load("a").unwrap().is_none());

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
