//! The tag registry: name to callback maps for block and value tags.
//!
//! Block and value tags live in two independent namespaces, so the same name
//! may be registered in both. Registration is additive and the last
//! registration for a name wins, which lets a later-loaded plugin override a
//! core tag.

use crate::ast::Attributes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// `(tag, attributes, compiled_children) -> emitted code`
pub type BlockCallback = Arc<dyn Fn(&str, &Attributes, &str) -> String + Send + Sync>;

/// `(tag, attributes, raw_attributes) -> emitted code`
pub type ValueCallback = Arc<dyn Fn(&str, &Attributes, &str) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Block,
    Value,
}

#[derive(Clone)]
pub enum TagCallback {
    Block(BlockCallback),
    Value(ValueCallback),
}

/// A single tag contributed by the core library or by a plugin.
#[derive(Clone)]
pub struct TagDefinition {
    pub name: String,
    pub callback: TagCallback,
}

impl TagDefinition {
    pub fn block<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: TagCallback::Block(Arc::new(callback)),
        }
    }

    pub fn value<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callback: TagCallback::Value(Arc::new(callback)),
        }
    }

    pub fn kind(&self) -> TagKind {
        match self.callback {
            TagCallback::Block(_) => TagKind::Block,
            TagCallback::Value(_) => TagKind::Value,
        }
    }
}

impl fmt::Debug for TagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct TagRegistry {
    block_tags: HashMap<String, BlockCallback>,
    value_tags: HashMap<String, ValueCallback>,
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("block_tags", &self.block_tag_names())
            .field("value_tags", &self.value_tag_names())
            .finish()
    }
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a block tag callback, returning the one it replaced, if any.
    pub fn register_block_tag<F>(&mut self, name: impl Into<String>, callback: F) -> Option<BlockCallback>
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.insert_block(name.into(), Arc::new(callback))
    }

    /// Registers a value tag callback, returning the one it replaced, if any.
    ///
    /// The name `Parent` is reserved by the parser; a callback registered under
    /// it is never invoked.
    pub fn register_value_tag<F>(&mut self, name: impl Into<String>, callback: F) -> Option<ValueCallback>
    where
        F: Fn(&str, &Attributes, &str) -> String + Send + Sync + 'static,
    {
        self.insert_value(name.into(), Arc::new(callback))
    }

    pub fn register(&mut self, definition: TagDefinition) {
        match definition.callback {
            TagCallback::Block(callback) => {
                self.insert_block(definition.name, callback);
            }
            TagCallback::Value(callback) => {
                self.insert_value(definition.name, callback);
            }
        }
    }

    pub fn block_tag(&self, name: &str) -> Option<&BlockCallback> {
        self.block_tags.get(name)
    }

    pub fn value_tag(&self, name: &str) -> Option<&ValueCallback> {
        self.value_tags.get(name)
    }

    pub fn has_block_tag(&self, name: &str) -> bool {
        self.block_tags.contains_key(name)
    }

    pub fn has_value_tag(&self, name: &str) -> bool {
        self.value_tags.contains_key(name)
    }

    /// Registered block tag names, sorted.
    pub fn block_tag_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.block_tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered value tag names, sorted.
    pub fn value_tag_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.value_tags.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert_block(&mut self, name: String, callback: BlockCallback) -> Option<BlockCallback> {
        let previous = self.block_tags.insert(name.clone(), callback);
        if previous.is_some() {
            log::debug!("Block tag '{}' overridden by a later registration", name);
        }
        previous
    }

    fn insert_value(&mut self, name: String, callback: ValueCallback) -> Option<ValueCallback> {
        if name == crate::ast::PARENT_TAG {
            log::warn!("Value tag '{}' is reserved; the registered callback will never run", name);
        }
        let previous = self.value_tags.insert(name.clone(), callback);
        if previous.is_some() {
            log::debug!("Value tag '{}' overridden by a later registration", name);
        }
        previous
    }
}

impl Extend<TagDefinition> for TagRegistry {
    fn extend<I: IntoIterator<Item = TagDefinition>>(&mut self, iter: I) {
        for definition in iter {
            self.register(definition);
        }
    }
}
