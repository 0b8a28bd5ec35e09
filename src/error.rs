// src/error.rs
use taglet_cache::CacheError;
use taglet_resource::ResourceError;
use taglet_template_core::TemplateError;
use thiserror::Error;

/// The error type for every high-level engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<handlebars::RenderError> for EngineError {
    fn from(e: handlebars::RenderError) -> Self {
        EngineError::Render(e.to_string())
    }
}
