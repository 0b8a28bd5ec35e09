//! Builds a `Root` node tree from the token stream.
//!
//! Recovery rules:
//! - A close tag that does not name the innermost open block is kept as
//!   literal text and the open block stays current. A later matching close
//!   tag still closes it.
//! - Blocks still open at end of input stay `closed = false`.
use crate::attributes::parse_attributes;
use crate::tokenizer::{Token, tokenize};
use taglet_template_core::{BlockNode, Diagnostic, DiagnosticKind, Node, PARENT_TAG, ValueNode};

/// A parsed tree together with the authoring mistakes recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub root: Node,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn parse(source: &str) -> ParseOutput {
    let mut builder = TreeBuilder::default();
    for token in tokenize(source) {
        match token {
            Token::Text(text) => builder.text(text),
            Token::BlockOpen {
                name,
                raw_attributes,
            } => builder.open(name, raw_attributes),
            Token::BlockClose { name, source } => builder.close(name, source),
            Token::Value {
                name,
                raw_attributes,
            } => builder.value(name, raw_attributes),
        }
    }
    builder.finish()
}

/// Parses `source` and discards the diagnostics.
pub fn parse_tree(source: &str) -> Node {
    parse(source).root
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<BlockNode>,
    diagnostics: Vec<Diagnostic>,
}

impl TreeBuilder {
    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(block) => &mut block.children,
            None => &mut self.root,
        }
    }

    fn text(&mut self, text: &str) {
        let children = self.current_children();
        if let Some(Node::Text(previous)) = children.last_mut() {
            previous.push_str(text);
        } else {
            children.push(Node::text(text));
        }
    }

    fn open(&mut self, name: &str, raw_attributes: &str) {
        let attributes = parse_attributes(raw_attributes);
        self.open.push(BlockNode::new(name, attributes, raw_attributes));
    }

    fn close(&mut self, name: &str, source: &str) {
        if self.open.last().is_some_and(|block| block.tag == name) {
            if let Some(mut block) = self.open.pop() {
                block.closed = true;
                self.current_children().push(Node::Block(block));
            }
        } else {
            log::debug!("Close tag '{}' does not match the open block; kept as text", name);
            self.diagnostics
                .push(Diagnostic::new(DiagnosticKind::MismatchedCloseTag, name));
            self.text(source);
        }
    }

    fn value(&mut self, name: &str, raw_attributes: &str) {
        let node = ValueNode::new(name, parse_attributes(raw_attributes), raw_attributes);
        let node = if name == PARENT_TAG {
            Node::ValueParent(node)
        } else {
            Node::Value(node)
        };
        self.current_children().push(node);
    }

    fn finish(mut self) -> ParseOutput {
        while let Some(block) = self.open.pop() {
            self.diagnostics
                .push(Diagnostic::new(DiagnosticKind::UnclosedBlock, block.tag.as_str()));
            self.current_children().push(Node::Block(block));
        }
        ParseOutput {
            root: Node::Root(self.root),
            diagnostics: self.diagnostics,
        }
    }
}
