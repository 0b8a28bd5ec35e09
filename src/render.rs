use crate::error::EngineError;
use handlebars::Handlebars;
use serde_json::Value;
use std::fmt;
use taglet_template_core::CompiledArtifact;

/// Executes emitted code against a render context.
///
/// Output is never HTML-escaped; escaping is left to the tag callbacks that
/// produce the code.
pub struct Renderer {
    handlebars: Handlebars<'static>,
    strict: bool,
}

impl Renderer {
    /// With `strict`, referencing a field missing from the context fails the
    /// render instead of producing empty output.
    pub fn new(strict: bool) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(strict);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars, strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn render(&self, artifact: &CompiledArtifact, context: &Value) -> Result<String, EngineError> {
        self.render_code(&artifact.code, context)
    }

    pub fn render_code(&self, code: &str, context: &Value) -> Result<String, EngineError> {
        Ok(self.handlebars.render_template(code, context)?)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer").field("strict", &self.strict).finish()
    }
}
