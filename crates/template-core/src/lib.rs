//! Core abstractions for the taglet template compiler.
//!
//! This crate defines the contract shared by the parser, the compiler, the
//! cache and the template resolvers. It owns everything a compile pass needs
//! to turn a parsed tree into emitted code:
//!
//! ## Key Abstractions
//!
//! - **`Node`**: The closed set of AST node kinds and their `compile` contract
//! - **`TagRegistry`**: Name to callback maps for block and value tags
//! - **`BlockDefinitionStack`**: Layered (child/parent theme) bodies per block name
//! - **`CompileContext`**: Per-pass state threaded explicitly through `Node::compile`
//! - **`CompiledArtifact`**: Emitted code tagged with its source identity and timestamp
//! - **`SourceTimestamps`**: Modification-time lookup used for cache freshness

pub mod artifact;
pub mod ast;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod registry;
pub mod source;
pub mod stack;

mod compile;

pub use artifact::CompiledArtifact;
pub use ast::{Attributes, BlockNode, Node, PARENT_TAG, ValueNode};
pub use context::CompileContext;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::TemplateError;
pub use registry::{BlockCallback, TagCallback, TagDefinition, TagKind, TagRegistry, ValueCallback};
pub use source::{FilesystemTimestamps, LayerSource, SourceTimestamps};
pub use stack::BlockDefinitionStack;
