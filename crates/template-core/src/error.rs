use crate::diagnostics::Diagnostic;
use thiserror::Error;

/// Errors that can occur while producing a compiled template.
///
/// Authoring mistakes inside a template never surface here in the default
/// permissive mode; they are recovered and reported as [`Diagnostic`]s.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Strict mode rejected template: {}", join_diagnostics(.0))]
    Strict(Vec<Diagnostic>),

    #[error("No candidate source exists for template '{0}'")]
    NoCandidate(String),

    #[error("Failed to read template source '{path}': {message}")]
    SourceUnreadable { path: String, message: String },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    #[test]
    fn test_strict_error_lists_every_diagnostic() {
        let err = TemplateError::Strict(vec![
            Diagnostic::new(DiagnosticKind::UnclosedBlock, "Content"),
            Diagnostic::new(DiagnosticKind::UnknownValueTag, "Nope"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Content"));
        assert!(msg.contains("Nope"));
    }

    #[test]
    fn test_source_unreadable_display() {
        let err = TemplateError::SourceUnreadable {
            path: "themes/default/index.tpl".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("themes/default/index.tpl"));
        assert!(err.to_string().contains("permission denied"));
    }
}
