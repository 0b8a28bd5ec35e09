use std::path::PathBuf;
use std::time::SystemTime;
use taglet_parser::parse;
use taglet_template_core::{
    Attributes, CompileContext, CompiledArtifact, Diagnostic, LayerSource, Node, TagRegistry,
    TemplateError,
};

/// Options for a compile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject templates that needed any recovery instead of compiling them.
    pub strict: bool,
}

/// The emitted code of a compile pass and the mistakes recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles template sources against a [`TagRegistry`].
///
/// Compiling is a pure function of the sources and the registry: the same
/// input always yields byte-identical code.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    registry: TagRegistry,
    options: CompileOptions,
}

impl Compiler {
    pub fn new(registry: TagRegistry) -> Self {
        Self {
            registry,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TagRegistry {
        &mut self.registry
    }

    pub fn register_block_tag<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.registry.register_block_tag(name, callback);
    }

    pub fn register_value_tag<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.registry.register_value_tag(name, callback);
    }

    /// Compiles a single template with no override chain.
    pub fn compile_str(&self, source: &str) -> Result<String, TemplateError> {
        self.compile_layers(&[source]).map(|c| c.code)
    }

    /// Compiles an override chain, most specific layer first.
    pub fn compile_layers(&self, layers: &[&str]) -> Result<Compilation, TemplateError> {
        let mut diagnostics = Vec::new();
        let roots: Vec<Node> = layers
            .iter()
            .map(|source| {
                let output = parse(source);
                diagnostics.extend(output.diagnostics);
                output.root
            })
            .collect();

        let code = match roots.first() {
            Some(root) => {
                let mut ctx = CompileContext::with_layers(&self.registry, &roots);
                let code = root.compile(&mut ctx);
                diagnostics.extend(ctx.into_diagnostics());
                code
            }
            None => String::new(),
        };

        if self.options.strict && !diagnostics.is_empty() {
            return Err(TemplateError::Strict(diagnostics));
        }
        for diagnostic in &diagnostics {
            log::warn!("Template recovered from {}", diagnostic);
        }
        Ok(Compilation { code, diagnostics })
    }

    /// Compiles loaded layer sources into an artifact for `source_identity`,
    /// with the recovered mistakes attached.
    ///
    /// `recorded_mtime` should be taken before the sources were read, so that
    /// an edit racing the compile is never mistaken for fresh.
    pub fn compile_artifact(
        &self,
        source_identity: Vec<PathBuf>,
        layers: &[LayerSource],
        recorded_mtime: SystemTime,
    ) -> Result<CompiledArtifact, TemplateError> {
        let texts: Vec<&str> = layers.iter().map(|l| l.text.as_str()).collect();
        let compilation = self.compile_layers(&texts)?;
        Ok(
            CompiledArtifact::new(source_identity, compilation.code, recorded_mtime)
                .with_diagnostics(compilation.diagnostics),
        )
    }
}
