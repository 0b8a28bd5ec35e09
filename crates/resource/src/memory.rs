use crate::error::ResourceError;
use crate::resolver::{TemplateResolver, candidate_paths};
use crate::theme::DEFAULT_EXTENSION;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;
use taglet_template_core::SourceTimestamps;

#[derive(Debug, Clone)]
struct StoredSource {
    text: String,
    modified: SystemTime,
}

/// An in-memory resolver.
///
/// Resolves names with the same rules as [`ThemeResolver`](crate::ThemeResolver)
/// but reads sources from memory. Each source carries an explicit
/// modification time so cache freshness can be exercised without touching
/// the filesystem.
#[derive(Debug)]
pub struct InMemoryResolver {
    theme_dirs: Vec<PathBuf>,
    extension: String,
    sources: RwLock<HashMap<PathBuf, StoredSource>>,
}

impl InMemoryResolver {
    pub fn new<I, P>(theme_dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            theme_dirs: theme_dirs.into_iter().map(Into::into).collect(),
            extension: DEFAULT_EXTENSION.to_string(),
            sources: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Adds or replaces a source, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<PathBuf>, text: impl Into<String>) -> Result<(), ResourceError> {
        self.add_with_mtime(path, text, SystemTime::now())
    }

    /// Adds or replaces a source with an explicit modification time.
    pub fn add_with_mtime(
        &self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        modified: SystemTime,
    ) -> Result<(), ResourceError> {
        let path = path.into();
        let mut sources = self.sources.write().map_err(|_| poisoned(&path))?;
        sources.insert(
            path,
            StoredSource {
                text: text.into(),
                modified,
            },
        );
        Ok(())
    }

    /// Updates the modification time of an existing source. Returns `false`
    /// if the source does not exist or the lock is poisoned.
    pub fn touch(&self, path: &Path, modified: SystemTime) -> bool {
        let Ok(mut sources) = self.sources.write() else {
            return false;
        };
        match sources.get_mut(path) {
            Some(source) => {
                source.modified = modified;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, path: &Path) -> bool {
        self.sources
            .write()
            .map(|mut s| s.remove(path).is_some())
            .unwrap_or(false)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.sources.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Returns `true` if the lock is poisoned (safe default).
    pub fn is_empty(&self) -> bool {
        self.sources.read().map(|s| s.is_empty()).unwrap_or(true)
    }
}

fn poisoned(path: &Path) -> ResourceError {
    ResourceError::LoadFailed {
        path: path.display().to_string(),
        message: "source store lock poisoned".to_string(),
    }
}

impl SourceTimestamps for InMemoryResolver {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.sources.read().ok()?.get(path).map(|s| s.modified)
    }
}

impl TemplateResolver for InMemoryResolver {
    fn resolve(&self, logical_name: &str) -> Vec<PathBuf> {
        candidate_paths(&self.theme_dirs, &self.extension, logical_name)
    }

    fn read(&self, path: &Path) -> Result<Option<String>, ResourceError> {
        let sources = self.sources.read().map_err(|_| poisoned(path))?;
        Ok(sources.get(path).map(|s| s.text.clone()))
    }

    fn name(&self) -> &'static str {
        "InMemoryResolver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::load_layers;
    use std::time::Duration;

    #[test]
    fn test_add_and_read() {
        let resolver = InMemoryResolver::new(["child", "base"]);
        resolver.add("base/index.tpl", "base").unwrap();

        assert_eq!(resolver.read(Path::new("base/index.tpl")).unwrap(), Some("base".to_string()));
        assert_eq!(resolver.read(Path::new("child/index.tpl")).unwrap(), None);
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_layers_in_theme_order() {
        let resolver = InMemoryResolver::new(["child", "base"]);
        resolver.add("base/index.tpl", "base").unwrap();
        resolver.add("child/index.tpl", "child").unwrap();

        let identity = resolver.resolve("index");
        let layers = load_layers(&resolver, "index", &identity).unwrap();
        assert_eq!(layers[0].path, PathBuf::from("child/index.tpl"));
        assert_eq!(layers[1].text, "base");
    }

    #[test]
    fn test_touch_updates_mtime() {
        let resolver = InMemoryResolver::new(["base"]);
        let then = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        resolver.add_with_mtime("base/a.tpl", "a", then).unwrap();
        assert_eq!(resolver.modified(Path::new("base/a.tpl")), Some(then));

        let later = then + Duration::from_secs(5);
        assert!(resolver.touch(Path::new("base/a.tpl"), later));
        assert_eq!(resolver.modified(Path::new("base/a.tpl")), Some(later));
        assert!(!resolver.touch(Path::new("base/missing.tpl"), later));
    }

    #[test]
    fn test_remove() {
        let resolver = InMemoryResolver::new(["base"]);
        resolver.add("base/a.tpl", "a").unwrap();
        assert!(resolver.remove(Path::new("base/a.tpl")));
        assert!(resolver.is_empty());
        assert!(!resolver.exists(Path::new("base/a.tpl")));
    }
}
