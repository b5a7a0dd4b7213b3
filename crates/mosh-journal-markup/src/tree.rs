//! Arena-backed node tree.
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. Detaching a node
//! only unlinks it from its parent; the node (and its subtree) stays in the
//! arena and can be re-inserted anywhere, which is what range extraction and
//! rollback rely on.

use std::fmt;

use crate::ops::MutableTree;

/// Elements that never have children or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single `name="value"` pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Element name (lowercased) and attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attrs.push(Attribute::new(name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The root of a parsed fragment.
    Fragment,
    Element(Element),
    /// Decoded character data (raw for `script`/`style` children).
    Text(String),
    Comment(String),
    /// A verbatim `<!...>` declaration.
    Doctype(String),
}

impl NodeData {
    pub fn can_have_children(&self) -> bool {
        match self {
            NodeData::Fragment => true,
            NodeData::Element(el) => !el.is_void(),
            _ => false,
        }
    }
}

/// A node with its links.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Errors raised by structural tree edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0} does not exist in this tree")]
    StaleNode(NodeId),

    #[error("node {0} cannot have children")]
    NotAContainer(NodeId),

    #[error("index {index} is out of bounds for node {parent} with {len} children")]
    IndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },

    #[error("inserting node {child} under node {parent} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },

    #[error("node {0} is not attached to a parent")]
    Detached(NodeId),
}

/// An HTML fragment held in an arena.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty fragment.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Fragment)],
            root: NodeId(0),
        }
    }

    /// Parse markup into a new tree. See [`crate::parse_fragment`].
    pub fn parse(html: &str) -> Self {
        crate::parser::parse_fragment(html)
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Serialize the whole fragment.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }
}

impl MutableTree for Tree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0).map(|n| &mut n.data)
    }

    fn create(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        NodeId(self.nodes.len() - 1)
    }

    /// `index` is interpreted after `child` has been detached from any
    /// previous parent, so moving a node within the same parent counts the
    /// remaining siblings only.
    fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let parent_node = self.nodes.get(parent.0).ok_or(TreeError::StaleNode(parent))?;
        if !parent_node.data.can_have_children() {
            return Err(TreeError::NotAContainer(parent));
        }
        let child_node = self.nodes.get(child.0).ok_or(TreeError::StaleNode(child))?;
        if child == self.root || self.contains(child, parent) {
            return Err(TreeError::WouldCycle { parent, child });
        }

        let len = parent_node.children.len() - usize::from(child_node.parent == Some(parent));
        if index > len {
            return Err(TreeError::IndexOutOfBounds { parent, index, len });
        }

        self.detach(child);
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id.0).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.nodes[id.0].parent = None;
    }
}
