use taglet_template_core::TemplateError;
use thiserror::Error;

/// Error type for template resolution and loading.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("No candidate source exists for template '{0}'")]
    NoCandidate(String),

    #[error("Failed to load template source '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

impl From<ResourceError> for TemplateError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NoCandidate(name) => TemplateError::NoCandidate(name),
            ResourceError::LoadFailed { path, message } => {
                TemplateError::SourceUnreadable { path, message }
            }
            ResourceError::Io(message) => TemplateError::SourceUnreadable {
                path: String::new(),
                message,
            },
        }
    }
}
