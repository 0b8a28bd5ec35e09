use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::render::Renderer;
use crate::tags::register_core_tags;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use taglet_cache::{CacheManager, CacheStore, FilesystemCacheStore, InMemoryCacheStore};
use taglet_compiler::{CompileOptions, Compiler};
use taglet_resource::{TemplateResolver, ThemeResolver, load_layers};
use taglet_template_core::{
    Attributes, CompiledArtifact, SourceTimestamps, TagDefinition, TagRegistry, TemplateError,
};

/// Lets the cache read modification times through the engine's resolver.
#[derive(Debug)]
struct ResolverTimestamps(Arc<dyn TemplateResolver>);

impl SourceTimestamps for ResolverTimestamps {
    fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.0.modified(path)
    }
}

/// Resolves, compiles, caches and renders logical templates.
///
/// A template is compiled from every existing layer of its override chain
/// and the emitted code is cached under the full candidate list, so editing
/// any file in the chain triggers a recompile on next use.
#[derive(Debug)]
pub struct TemplateEngine {
    resolver: Arc<dyn TemplateResolver>,
    compiler: Compiler,
    cache: CacheManager,
    renderer: Renderer,
}

impl TemplateEngine {
    pub fn builder() -> TemplateEngineBuilder {
        TemplateEngineBuilder::new()
    }

    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        TemplateEngineBuilder::new().from_config(config).build()
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn resolver(&self) -> &dyn TemplateResolver {
        self.resolver.as_ref()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// Registers a block tag. Cached artifacts were produced with the old
    /// registry and are dropped.
    pub fn register_block_tag<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.compiler.register_block_tag(name, callback);
        self.discard_compiled();
    }

    /// Registers a value tag. Cached artifacts are dropped.
    pub fn register_value_tag<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.compiler.register_value_tag(name, callback);
        self.discard_compiled();
    }

    pub fn register_tag(&mut self, definition: TagDefinition) {
        self.compiler.registry_mut().register(definition);
        self.discard_compiled();
    }

    /// Every candidate path for `logical_name`, most specific first.
    pub fn resolve(&self, logical_name: &str) -> Vec<PathBuf> {
        self.resolver.resolve(logical_name)
    }

    /// Returns the compiled artifact for `logical_name`, compiling it if the
    /// cached one is missing or stale. Its diagnostics list every authoring
    /// mistake that was recovered from, also on a cache hit.
    ///
    /// Fails with `NoCandidate` if no layer of the template exists.
    pub fn compile_artifact(&self, logical_name: &str) -> Result<CompiledArtifact, EngineError> {
        let identity = self.resolver.resolve(logical_name);
        if !identity.iter().any(|p| self.resolver.exists(p)) {
            return Err(TemplateError::NoCandidate(logical_name.to_string()).into());
        }

        let artifact = self.cache.get_or_compile_artifact(&identity, |recorded_mtime| {
            let layers = load_layers(self.resolver.as_ref(), logical_name, &identity)?;
            self.compiler.compile_artifact(identity.clone(), &layers, recorded_mtime)
        })?;
        Ok(artifact)
    }

    /// Returns the emitted code for `logical_name`. See
    /// [`compile_artifact`](Self::compile_artifact).
    pub fn compile(&self, logical_name: &str) -> Result<String, EngineError> {
        self.compile_artifact(logical_name).map(|artifact| artifact.code)
    }

    /// Compiles `logical_name` and renders it against `context`.
    pub fn render(&self, logical_name: &str, context: &Value) -> Result<String, EngineError> {
        let artifact = self.compile_artifact(logical_name)?;
        self.renderer.render(&artifact, context)
    }

    /// Compiles and renders a template given as text. Nothing is cached.
    pub fn render_source(&self, source: &str, context: &Value) -> Result<String, EngineError> {
        let code = self.compiler.compile_str(source)?;
        self.renderer.render_code(&code, context)
    }

    pub fn clear_cache(&self) -> Result<(), EngineError> {
        Ok(self.cache.clear()?)
    }

    fn discard_compiled(&self) {
        if let Err(e) = self.cache.clear() {
            log::warn!("Failed to clear cache after tag registration: {}", e);
        }
    }
}

/// A builder for creating a [`TemplateEngine`].
///
/// The core tag library is installed first, then every tag added through
/// the builder in order, so later registrations override earlier ones.
pub struct TemplateEngineBuilder {
    theme_dirs: Vec<PathBuf>,
    extension: Option<String>,
    resolver: Option<Arc<dyn TemplateResolver>>,
    cache_dir: Option<PathBuf>,
    cache_store: Option<Box<dyn CacheStore>>,
    strict: bool,
    strict_render: bool,
    core_tags: bool,
    tags: Vec<TagDefinition>,
}

impl Default for TemplateEngineBuilder {
    fn default() -> Self {
        Self {
            theme_dirs: Vec::new(),
            extension: None,
            resolver: None,
            cache_dir: None,
            cache_store: None,
            strict: false,
            strict_render: false,
            core_tags: true,
            tags: Vec::new(),
        }
    }
}

impl TemplateEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every setting of `config`.
    pub fn from_config(mut self, config: EngineConfig) -> Self {
        self.theme_dirs = config.theme_dirs;
        self.extension = Some(config.template_extension);
        self.cache_dir = config.cache_dir;
        self.strict = config.strict;
        self.strict_render = config.strict_render;
        self
    }

    /// Appends a theme directory. Directories added first are the most specific.
    pub fn with_theme_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.theme_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_theme_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.theme_dirs.extend(dirs.into_iter().map(|d| d.as_ref().to_path_buf()));
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Uses `resolver` instead of a filesystem resolver over the theme dirs.
    pub fn with_resolver<R: TemplateResolver + 'static>(mut self, resolver: R) -> Self {
        let resolver: Arc<dyn TemplateResolver> = Arc::new(resolver);
        self.resolver = Some(resolver);
        self
    }

    /// Persists compiled artifacts under `dir`.
    pub fn with_cache_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_cache_store<S: CacheStore + 'static>(mut self, store: S) -> Self {
        let store: Box<dyn CacheStore> = Box::new(store);
        self.cache_store = Some(store);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_strict_render(mut self, strict: bool) -> Self {
        self.strict_render = strict;
        self
    }

    /// Starts from an empty registry instead of the core tag library.
    pub fn without_core_tags(mut self) -> Self {
        self.core_tags = false;
        self
    }

    pub fn with_block_tag<F>(self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.with_tag(TagDefinition::block(name, callback))
    }

    pub fn with_value_tag<F>(self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.with_tag(TagDefinition::value(name, callback))
    }

    pub fn with_tag(mut self, definition: TagDefinition) -> Self {
        self.tags.push(definition);
        self
    }

    pub fn build(self) -> Result<TemplateEngine, EngineError> {
        let resolver: Arc<dyn TemplateResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => {
                if self.theme_dirs.is_empty() {
                    return Err(EngineError::Config(
                        "No theme directory has been configured. Use `with_theme_dir` or `with_resolver`."
                            .to_string(),
                    ));
                }
                let mut resolver = ThemeResolver::new(&self.theme_dirs);
                if let Some(extension) = self.extension {
                    resolver = resolver.with_extension(extension);
                }
                Arc::new(resolver)
            }
        };

        let store: Box<dyn CacheStore> = match (self.cache_store, self.cache_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Box::new(FilesystemCacheStore::new(dir)),
            (None, None) => Box::new(InMemoryCacheStore::new()),
        };
        log::debug!("Building template engine with {} resolver and {} cache", resolver.name(), store.name());
        let timestamps = Arc::new(ResolverTimestamps(Arc::clone(&resolver)));
        let cache = CacheManager::new(store, timestamps);

        let mut registry = TagRegistry::new();
        if self.core_tags {
            register_core_tags(&mut registry);
        }
        registry.extend(self.tags);
        let compiler = Compiler::new(registry).with_options(CompileOptions { strict: self.strict });

        Ok(TemplateEngine {
            resolver,
            compiler,
            cache,
            renderer: Renderer::new(self.strict_render),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use taglet_resource::InMemoryResolver;

    fn resolver() -> InMemoryResolver {
        let resolver = InMemoryResolver::new(["child", "base"]);
        let past = SystemTime::now() - Duration::from_secs(3600);
        resolver
            .add_with_mtime("base/page.tpl", "<h1>{{tag:Var name=\"title\"}}</h1><tag:Content>base</tag:Content>", past)
            .unwrap();
        resolver
            .add_with_mtime("child/page.tpl", "<tag:Content>child-{{tag:Parent}}</tag:Content>", past)
            .unwrap();
        resolver
    }

    #[test]
    fn test_render_resolves_layers() {
        let engine = TemplateEngine::builder().with_resolver(resolver()).build().unwrap();
        let out = engine.render("page", &json!({"title": "Hi"})).unwrap();
        assert_eq!(out, "child-base");
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let engine = TemplateEngine::builder().with_resolver(resolver()).build().unwrap();
        let err = engine.compile("missing").unwrap_err();
        assert!(matches!(err, EngineError::Template(TemplateError::NoCandidate(_))));
    }

    #[test]
    fn test_permissive_compile_reports_diagnostics() {
        use taglet_template_core::DiagnosticKind;

        let resolver = resolver();
        resolver.add("base/broken.tpl", "a{{tag:Missing}}b").unwrap();
        let engine = TemplateEngine::builder().with_resolver(resolver).build().unwrap();

        for _ in 0..2 {
            let artifact = engine.compile_artifact("broken").unwrap();
            assert_eq!(artifact.code, "ab");
            assert_eq!(artifact.diagnostics.len(), 1);
            assert_eq!(artifact.diagnostics[0].kind, DiagnosticKind::UnknownValueTag);
        }
    }

    #[test]
    fn test_build_requires_a_source_of_templates() {
        let result = TemplateEngine::builder().build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_builder_tags_override_core_tags() {
        let engine = TemplateEngine::builder()
            .with_resolver(resolver())
            .with_value_tag("Var", |_, _, _| "plugin".to_string())
            .build()
            .unwrap();
        assert_eq!(engine.render_source("{{tag:Var name=\"x\"}}", &json!({})).unwrap(), "plugin");
    }

    #[test]
    fn test_without_core_tags() {
        let engine = TemplateEngine::builder()
            .with_resolver(resolver())
            .without_core_tags()
            .build()
            .unwrap();
        assert!(!engine.compiler().registry().has_value_tag("Var"));
    }

    #[test]
    fn test_registering_a_tag_drops_cached_code() {
        let mut engine = TemplateEngine::builder()
            .with_resolver(resolver())
            .with_block_tag("Content", |_, _, children| format!("[{}]", children))
            .build()
            .unwrap();
        assert_eq!(engine.compile("page").unwrap(), "[child-base]");

        engine.register_block_tag("Content", |_, _, children| format!("<{}>", children));
        assert_eq!(engine.compile("page").unwrap(), "<child-base>");
    }

    #[test]
    fn test_render_source_uses_core_tags() {
        let engine = TemplateEngine::builder().with_resolver(resolver()).build().unwrap();
        let out = engine
            .render_source(
                "<tag:Each var=\"items\">{{tag:Var name=\"this\"}},</tag:Each>",
                &json!({"items": ["a", "b"]}),
            )
            .unwrap();
        assert_eq!(out, "a,b,");
    }
}
