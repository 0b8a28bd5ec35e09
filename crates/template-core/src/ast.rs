//! The template AST.
//!
//! A tree is built fresh by the parser for every compile invocation and is
//! dropped once the emitted code has been produced.

/// Reserved value-tag name that renders the next less-specific layer's body
/// of the enclosing block.
pub const PARENT_TAG: &str = "Parent";

/// Ordered `key -> value` map parsed from a tag's opening delimiter.
///
/// Attributes are parsed once and are immutable afterwards. A repeated key
/// keeps its first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k.into(), v.into());
        }
        attributes
    }
}

/// A paired `<tag:Name ...>...</tag:Name>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub tag: String,
    pub attributes: Attributes,
    /// The unparsed text between the tag name and the closing `>`.
    pub raw_attributes: String,
    pub children: Vec<Node>,
    /// `false` when no matching close tag was found. Such a block compiles to nothing.
    pub closed: bool,
}

impl BlockNode {
    pub fn new(tag: impl Into<String>, attributes: Attributes, raw_attributes: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            raw_attributes: raw_attributes.into(),
            children: Vec::new(),
            closed: false,
        }
    }
}

/// A self-contained `{{tag:Name ...}}` tag. Never has children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    pub tag: String,
    pub attributes: Attributes,
    pub raw_attributes: String,
}

impl ValueNode {
    pub fn new(tag: impl Into<String>, attributes: Attributes, raw_attributes: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            raw_attributes: raw_attributes.into(),
        }
    }
}

/// The closed set of node kinds. Only `Root` may be the root of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Root(Vec<Node>),
    Text(String),
    Block(BlockNode),
    Value(ValueNode),
    ValueParent(ValueNode),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Returns the children of a `Root` or `Block`, and an empty slice otherwise.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root(children) => children,
            Node::Block(block) => &block.children,
            Node::Text(_) | Node::Value(_) | Node::ValueParent(_) => &[],
        }
    }

    /// Depth-first pre-order walk over every closed block in this subtree.
    ///
    /// Unclosed blocks and everything below them are skipped, since they can
    /// never contribute output.
    pub fn closed_blocks(&self) -> Vec<&BlockNode> {
        let mut found = Vec::new();
        match self {
            Node::Block(block) if !block.closed => {}
            Node::Block(block) => {
                found.push(block);
                collect_closed_blocks(&block.children, &mut found);
            }
            _ => collect_closed_blocks(self.children(), &mut found),
        }
        found
    }
}

fn collect_closed_blocks<'a>(nodes: &'a [Node], found: &mut Vec<&'a BlockNode>) {
    for node in nodes {
        if let Node::Block(block) = node
            && block.closed
        {
            found.push(block);
            collect_closed_blocks(&block.children, found);
        }
    }
}
