//! Layered block definitions for theme overriding.
//!
//! When the compiler enters a block that is the definition of its name in a
//! layer, it pushes an entry holding that body followed by the bodies the
//! less-specific layers give the same name. `{{tag:Parent}}` advances the
//! cursor of the entry to render the next body in place.

use crate::ast::BlockNode;
use std::collections::HashMap;

#[derive(Debug)]
struct Entry<'a> {
    /// `(layer index, body)`, most specific first.
    bodies: Vec<(usize, &'a BlockNode)>,
    cursor: usize,
}

impl Entry<'_> {
    fn has_next(&self) -> bool {
        self.cursor + 1 < self.bodies.len()
    }

    fn is_layered(&self) -> bool {
        self.bodies.len() > 1
    }
}

/// Per-compile stack of layered block bodies.
///
/// Holds at most one active entry per block name. It is owned by a single
/// [`CompileContext`](crate::CompileContext) and never shared between passes.
#[derive(Debug, Default)]
pub struct BlockDefinitionStack<'a> {
    entries: HashMap<String, Entry<'a>>,
    /// Active block names, innermost last.
    active: Vec<String>,
}

impl<'a> BlockDefinitionStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// Pushes the layered bodies of `name` with the cursor on the first one.
    ///
    /// Returns `false` without changing anything if `name` is already active.
    pub fn push(&mut self, name: &str, bodies: Vec<(usize, &'a BlockNode)>) -> bool {
        if self.is_active(name) || bodies.is_empty() {
            return false;
        }
        self.entries.insert(name.to_string(), Entry { bodies, cursor: 0 });
        self.active.push(name.to_string());
        true
    }

    pub fn pop(&mut self, name: &str) {
        if self.entries.remove(name).is_some()
            && let Some(pos) = self.active.iter().rposition(|n| n == name)
        {
            self.active.remove(pos);
        }
    }

    /// The innermost active block name.
    pub fn current(&self) -> Option<&str> {
        self.active.last().map(String::as_str)
    }

    /// Number of bodies registered for `name`, or 0 if it is not active.
    pub fn layer_count(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, |e| e.bodies.len())
    }

    /// Moves the innermost layered entry one step further and returns the
    /// next body together with its layer index and the block name it belongs
    /// to. Returns `None` once that entry has run out of bodies.
    ///
    /// Entries that were never layered (a single body) are skipped, so a
    /// `Parent` call nested in a wrapper block such as a conditional still
    /// reaches the enclosing overridden block. An exhausted layered entry is
    /// never skipped: its chain ends there.
    pub fn advance(&mut self) -> Option<(String, usize, &'a BlockNode)> {
        let name = self
            .active
            .iter()
            .rev()
            .find(|n| self.entries.get(n.as_str()).is_some_and(Entry::is_layered))?
            .clone();
        let entry = self.entries.get_mut(&name)?;
        if !entry.has_next() {
            return None;
        }
        entry.cursor += 1;
        let (layer, body) = entry.bodies[entry.cursor];
        Some((name, layer, body))
    }

    /// Undoes one [`advance`](Self::advance) on `name`.
    pub fn retreat(&mut self, name: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.cursor = entry.cursor.saturating_sub(1);
        }
    }
}
