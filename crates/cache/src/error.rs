use taglet_template_core::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist artifact '{path}': {message}")]
    Persist { path: String, message: String },

    #[error("Cache store lock poisoned")]
    Poisoned,
}

impl From<CacheError> for TemplateError {
    fn from(err: CacheError) -> Self {
        TemplateError::Cache(err.to_string())
    }
}
