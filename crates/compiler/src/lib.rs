//! The taglet template compiler.
//!
//! Parses every layer of an override chain, then compiles the most specific
//! layer against the tag registry with the remaining layers available to
//! `{{tag:Parent}}`.

pub mod compiler;

pub use compiler::{CompileOptions, Compilation, Compiler};
