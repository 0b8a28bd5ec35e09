use crate::ast::{BlockNode, Node};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::registry::TagRegistry;
use crate::stack::BlockDefinitionStack;
use std::collections::HashMap;

/// State threaded through a single compile pass.
///
/// Layers are ordered most specific first; layer 0 is the tree being
/// compiled. For every layer the context indexes the first closed block of
/// each name, which is that layer's definition of the block.
pub struct CompileContext<'a> {
    registry: &'a TagRegistry,
    layers: Vec<HashMap<&'a str, &'a BlockNode>>,
    pub(crate) stack: BlockDefinitionStack<'a>,
    pub(crate) current_layer: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CompileContext<'a> {
    /// A context for a single template with no override chain.
    pub fn new(registry: &'a TagRegistry) -> Self {
        Self::with_layers(registry, &[])
    }

    /// A context for an override chain, most specific layer first.
    pub fn with_layers(registry: &'a TagRegistry, layers: &'a [Node]) -> Self {
        let layers = layers
            .iter()
            .map(|root| {
                let mut definitions = HashMap::new();
                for block in root.closed_blocks() {
                    definitions.entry(block.tag.as_str()).or_insert(block);
                }
                definitions
            })
            .collect();
        Self {
            registry,
            layers,
            stack: BlockDefinitionStack::new(),
            current_layer: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a TagRegistry {
        self.registry
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Index of the layer whose body is being compiled right now.
    pub fn current_layer(&self) -> usize {
        self.current_layer
    }

    pub fn stack(&self) -> &BlockDefinitionStack<'a> {
        &self.stack
    }

    pub fn record(&mut self, kind: DiagnosticKind, tag: impl Into<String>) {
        let diagnostic = Diagnostic::new(kind, tag);
        log::debug!("Recovered from {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// The override chain for `block`, or `None` if `block` is not the
    /// definition of its name in the current layer or that name is already
    /// being resolved.
    pub(crate) fn layered_bodies(&self, block: &'a BlockNode) -> Option<Vec<(usize, &'a BlockNode)>> {
        if self.stack.is_active(&block.tag) {
            return None;
        }
        let own = self.layers.get(self.current_layer)?.get(block.tag.as_str())?;
        if !std::ptr::eq(*own, block) {
            return None;
        }
        let mut bodies = vec![(self.current_layer, block)];
        for (layer, definitions) in self.layers.iter().enumerate().skip(self.current_layer + 1) {
            if let Some(body) = definitions.get(block.tag.as_str()) {
                bodies.push((layer, *body));
            }
        }
        Some(bodies)
    }
}
