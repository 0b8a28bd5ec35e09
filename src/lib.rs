//! Taglet: a tag-based template compiler for themeable sites.
//!
//! Templates mix literal text with block tags (`<tag:Name attr="v">…</tag:Name>`)
//! and value tags (`{{tag:Name attr="v"}}`). Each tag is compiled through a
//! registered callback into Handlebars code which is cached and rendered
//! against a JSON context. A child theme can redefine any block of a parent
//! theme and call back into it with `{{tag:Parent}}`.
//!
//! ```no_run
//! use taglet::TemplateEngine;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), taglet::EngineError> {
//! let engine = TemplateEngine::builder()
//!     .with_theme_dir("themes/child")
//!     .with_theme_dir("themes/default")
//!     .with_cache_dir("var/cache")
//!     .build()?;
//! let html = engine.render("index", &json!({"title": "Home"}))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod render;
pub mod tags;

pub use config::EngineConfig;
pub use engine::{TemplateEngine, TemplateEngineBuilder};
pub use error::EngineError;
pub use render::Renderer;

pub use taglet_cache::{CacheError, CacheManager, CacheStore, FilesystemCacheStore, InMemoryCacheStore};
pub use taglet_compiler::{CompileOptions, Compilation, Compiler};
pub use taglet_parser::{ParseOutput, parse};
pub use taglet_resource::{InMemoryResolver, ResourceError, TemplateResolver, ThemeResolver};
pub use taglet_template_core::{
    Attributes, CompiledArtifact, Diagnostic, DiagnosticKind, Node, TagDefinition, TagKind,
    TagRegistry, TemplateError,
};
