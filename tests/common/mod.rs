pub mod fixtures;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};
use taglet::{TemplateEngine, TemplateEngineBuilder};
use tempfile::TempDir;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// A child and a base theme directory inside one temp dir.
pub struct Themes {
    pub root: TempDir,
    pub child: PathBuf,
    pub base: PathBuf,
}

impl Themes {
    pub fn new() -> std::io::Result<Self> {
        let root = tempfile::tempdir()?;
        let child = root.path().join("child");
        let base = root.path().join("base");
        fs::create_dir_all(&child)?;
        fs::create_dir_all(&base)?;
        Ok(Self { root, child, base })
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    /// Writes `<dir>/<name>.tpl` and dates it an hour back, so that a
    /// compile right afterwards records a strictly newer time.
    pub fn write(&self, dir: &Path, name: &str, source: &str) -> std::io::Result<PathBuf> {
        let path = dir.join(format!("{}.tpl", name));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, source)?;
        set_mtime(&path, SystemTime::now() - Duration::from_secs(3600))?;
        Ok(path)
    }

    pub fn builder(&self) -> TemplateEngineBuilder {
        TemplateEngine::builder()
            .with_theme_dir(&self.child)
            .with_theme_dir(&self.base)
    }
}

pub fn set_mtime(path: &Path, mtime: SystemTime) -> std::io::Result<()> {
    File::options().write(true).open(path)?.set_modified(mtime)
}

/// Marks a file as edited well after any compile that already happened.
pub fn touch(path: &Path) -> std::io::Result<()> {
    set_mtime(path, SystemTime::now() + Duration::from_secs(3600))
}

/// Adds a `Count` block tag that passes its children through and counts how
/// often it was compiled.
pub fn with_counter(builder: TemplateEngineBuilder) -> (TemplateEngineBuilder, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let builder = builder.with_block_tag("Count", move |_, _, children| {
        counter.fetch_add(1, Ordering::SeqCst);
        children.to_string()
    });
    (builder, calls)
}
