//! Recoverable authoring mistakes found while parsing or compiling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of authoring mistake that was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A block tag was still open at end of input. It compiles to nothing.
    UnclosedBlock,
    /// A close tag did not match the innermost open block and was kept as text.
    MismatchedCloseTag,
    /// No block callback is registered; children were passed through.
    UnknownBlockTag,
    /// No value callback is registered; the tag emitted nothing.
    UnknownValueTag,
    /// `{{tag:Parent}}` was used where no less-specific layer exists.
    ParentWithoutLayer,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::UnclosedBlock => "unclosed block",
            DiagnosticKind::MismatchedCloseTag => "mismatched close tag",
            DiagnosticKind::UnknownBlockTag => "unknown block tag",
            DiagnosticKind::UnknownValueTag => "unknown value tag",
            DiagnosticKind::ParentWithoutLayer => "parent call without a parent layer",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The tag name the mistake was found on.
    pub tag: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.tag)
    }
}
