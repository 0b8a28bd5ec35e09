//! Parser for the taglet template language.
//!
//! Turns raw template source into a `Root` [`Node`](taglet_template_core::Node)
//! tree. The language has three markers, everything else is literal text:
//!
//! - `<tag:Name attr="v">` opens a block
//! - `</tag:Name>` closes the innermost block of the same name
//! - `{{tag:Name attr="v"}}` is a value tag; `{{tag:Parent}}` is reserved
//!
//! Parsing never fails. Malformed markers become text, blocks left open are
//! kept as unclosed, and both are reported as diagnostics.

pub mod attributes;
pub mod parser;
pub mod tokenizer;

pub use attributes::parse_attributes;
pub use parser::{ParseOutput, parse, parse_tree};
pub use tokenizer::{Token, tokenize};
