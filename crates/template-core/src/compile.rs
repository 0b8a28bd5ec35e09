//! The `compile` contract of each node kind.

use crate::ast::{BlockNode, Node, PARENT_TAG, ValueNode};
use crate::context::CompileContext;
use crate::diagnostics::DiagnosticKind;

impl Node {
    /// Compiles this node and its subtree to emitted code.
    pub fn compile<'a>(&'a self, ctx: &mut CompileContext<'a>) -> String {
        match self {
            Node::Root(children) => compile_nodes(children, ctx),
            Node::Text(content) => content.clone(),
            Node::Block(block) => block.compile(ctx),
            Node::Value(value) => value.compile(ctx),
            Node::ValueParent(_) => compile_parent(ctx),
        }
    }
}

impl BlockNode {
    /// Unclosed blocks compile to nothing. Closed blocks compile their
    /// children first, then hand them to the registered block callback, or
    /// pass them through unchanged when none is registered.
    pub fn compile<'a>(&'a self, ctx: &mut CompileContext<'a>) -> String {
        if !self.closed {
            return String::new();
        }

        let children = match ctx.layered_bodies(self) {
            Some(bodies) => {
                ctx.stack.push(&self.tag, bodies);
                let out = compile_nodes(&self.children, ctx);
                ctx.stack.pop(&self.tag);
                out
            }
            None => compile_nodes(&self.children, ctx),
        };

        match ctx.registry().block_tag(&self.tag) {
            Some(callback) => callback(&self.tag, &self.attributes, &children),
            None => {
                ctx.record(DiagnosticKind::UnknownBlockTag, &self.tag);
                children
            }
        }
    }
}

impl ValueNode {
    /// Unknown value tags compile to nothing.
    pub fn compile(&self, ctx: &mut CompileContext<'_>) -> String {
        match ctx.registry().value_tag(&self.tag) {
            Some(callback) => callback(&self.tag, &self.attributes, &self.raw_attributes),
            None => {
                ctx.record(DiagnosticKind::UnknownValueTag, &self.tag);
                String::new()
            }
        }
    }
}

fn compile_nodes<'a>(nodes: &'a [Node], ctx: &mut CompileContext<'a>) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&node.compile(ctx));
    }
    out
}

fn compile_parent(ctx: &mut CompileContext<'_>) -> String {
    let Some((name, layer, body)) = ctx.stack.advance() else {
        let tag = ctx.stack.current().unwrap_or(PARENT_TAG).to_string();
        ctx.record(DiagnosticKind::ParentWithoutLayer, tag);
        return String::new();
    };

    let previous = std::mem::replace(&mut ctx.current_layer, layer);
    let out = compile_nodes(&body.children, ctx);
    ctx.current_layer = previous;
    ctx.stack.retreat(&name);
    out
}
