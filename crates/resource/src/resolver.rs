use crate::error::ResourceError;
use std::path::{Component, Path, PathBuf};
use taglet_template_core::{LayerSource, SourceTimestamps};

/// Resolves logical template names to candidate sources across theme layers.
///
/// # Implementations
///
/// - `ThemeResolver`: Reads from theme directories on the local filesystem
/// - `InMemoryResolver`: Reads from pre-populated memory
pub trait TemplateResolver: SourceTimestamps {
    /// Every candidate path for `logical_name`, most specific first.
    ///
    /// Paths are returned whether or not they exist; the whole list is the
    /// template's cache identity.
    fn resolve(&self, logical_name: &str) -> Vec<PathBuf>;

    /// Reads a candidate source. Returns `Ok(None)` if it does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>, ResourceError>;

    /// Returns a human-readable name for this resolver (for logging/debugging).
    fn name(&self) -> &'static str;

    fn exists(&self, path: &Path) -> bool {
        self.modified(path).is_some()
    }
}

/// Candidate paths for `logical_name`: `<dir>/<logical_name>.<extension>`
/// for every theme dir, in order.
///
/// Names that are empty, absolute or contain `..` yield no candidates, so a
/// logical name can never escape the theme directories.
pub fn candidate_paths(theme_dirs: &[PathBuf], extension: &str, logical_name: &str) -> Vec<PathBuf> {
    let name = Path::new(logical_name);
    let safe = !logical_name.is_empty()
        && name
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !safe {
        log::warn!("Rejected template name '{}'", logical_name);
        return Vec::new();
    }

    let suffix = format!(".{}", extension);
    let file = if extension.is_empty() || logical_name.ends_with(&suffix) {
        logical_name.to_string()
    } else {
        format!("{}{}", logical_name, suffix)
    };
    theme_dirs.iter().map(|dir| dir.join(&file)).collect()
}

/// Reads every existing candidate in `source_identity`, most specific first.
///
/// Missing candidates are skipped. If none exists the template cannot be
/// produced at all and `NoCandidate` is returned.
pub fn load_layers<R>(resolver: &R, logical_name: &str, source_identity: &[PathBuf]) -> Result<Vec<LayerSource>, ResourceError>
where
    R: TemplateResolver + ?Sized,
{
    let mut layers = Vec::new();
    for path in source_identity {
        if let Some(text) = resolver.read(path)? {
            layers.push(LayerSource::new(path.clone(), text));
        }
    }
    if layers.is_empty() {
        return Err(ResourceError::NoCandidate(logical_name.to_string()));
    }
    log::debug!(
        "Loaded {} layer(s) for '{}' via {}",
        layers.len(),
        logical_name,
        resolver.name()
    );
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs() -> Vec<PathBuf> {
        vec![PathBuf::from("themes/child"), PathBuf::from("themes/base")]
    }

    #[test]
    fn test_candidates_follow_theme_order() {
        assert_eq!(
            candidate_paths(&dirs(), "tpl", "entries/index"),
            vec![
                PathBuf::from("themes/child/entries/index.tpl"),
                PathBuf::from("themes/base/entries/index.tpl"),
            ]
        );
    }

    #[test]
    fn test_extension_is_not_doubled() {
        assert_eq!(
            candidate_paths(&dirs(), "tpl", "index.tpl")[0],
            PathBuf::from("themes/child/index.tpl")
        );
        assert_eq!(candidate_paths(&dirs(), "", "index.html")[1], PathBuf::from("themes/base/index.html"));
    }

    #[test]
    fn test_traversal_names_have_no_candidates() {
        assert!(candidate_paths(&dirs(), "tpl", "../secret").is_empty());
        assert!(candidate_paths(&dirs(), "tpl", "a/../../b").is_empty());
        assert!(candidate_paths(&dirs(), "tpl", "/etc/passwd").is_empty());
        assert!(candidate_paths(&dirs(), "tpl", "").is_empty());
    }
}
