//! The `MutableTree` capability.
//!
//! Everything above this crate (selection expansion, block wrapping, figure
//! classes) talks to a document through this trait rather than to [`Tree`]
//! directly, so a host editor can adapt its own node store by implementing
//! six primitives. Queries, class-list handling and serialization come for
//! free as provided methods.
//!
//! [`Tree`]: crate::Tree

use crate::serialize;
use crate::tree::{Element, Node, NodeData, NodeId, TreeError};

pub trait MutableTree {
    /// The fragment root.
    fn root(&self) -> NodeId;

    /// Look up a node; `None` for ids from another tree.
    fn get(&self, id: NodeId) -> Option<&Node>;

    /// Mutable access to a node's payload (never its links).
    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData>;

    /// Allocate a new, detached node.
    fn create(&mut self, data: NodeData) -> NodeId;

    /// Attach `child` as the `index`th child of `parent`, detaching it from
    /// wherever it was first.
    fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError>;

    /// Unlink a node from its parent. No-op for detached nodes.
    fn detach(&mut self, id: NodeId);

    // --- navigation ---

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Ancestors from the parent upwards.
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Deepest node containing both `a` and `b`.
    fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let mut current = Some(a);
        while let Some(n) = current {
            if self.contains(n, b) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Descendants in document order, excluding `id` itself.
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// First descendant element matching `pred`, in document order.
    fn find_descendant(
        &self,
        id: NodeId,
        mut pred: impl FnMut(&Self, NodeId) -> bool,
    ) -> Option<NodeId>
    where
        Self: Sized,
    {
        self.descendants(id)
            .into_iter()
            .find(|&n| self.is_element(n) && pred(self, n))
    }

    /// Nearest element, starting at `id` itself, matching `pred`.
    fn closest(&self, id: NodeId, mut pred: impl FnMut(&Self, NodeId) -> bool) -> Option<NodeId>
    where
        Self: Sized,
    {
        let mut current = Some(id);
        while let Some(n) = current {
            if self.is_element(n) && pred(self, n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    // --- node inspection ---

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.get(id)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    fn is_text(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|n| &n.data), Some(NodeData::Text(_)))
    }

    fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).contains(&class)
    }

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeData::Text(t)) = self.get(id).map(|n| &n.data) {
            out.push_str(t);
        }
        for node in self.descendants(id) {
            if let Some(NodeData::Text(t)) = self.get(node).map(|n| &n.data) {
                out.push_str(t);
            }
        }
        out
    }

    // --- mutation helpers ---

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = self.children(parent).len() - usize::from(self.parent(child) == Some(parent));
        self.insert_child(parent, index, child)
    }

    fn create_element(&mut self, name: &str, classes: &[&str]) -> NodeId {
        let mut el = Element::new(name);
        if !classes.is_empty() {
            el.set_attr("class", &classes.join(" "));
        }
        self.create(NodeData::Element(el))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.create(NodeData::Text(text.to_string()))
    }

    /// Copy of the node's payload without children, detached.
    fn shallow_clone(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let data = self.get(id).ok_or(TreeError::StaleNode(id))?.data.clone();
        Ok(self.create(data))
    }

    fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(NodeData::Element(el)) = self.data_mut(id) {
            el.set_attr(name, value);
        }
    }

    fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(NodeData::Element(el)) = self.data_mut(id) {
            el.remove_attr(name);
        }
    }

    /// Replace the whole class list. An empty list removes the attribute.
    fn set_classes(&mut self, id: NodeId, classes: &[&str]) {
        if classes.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", &classes.join(" "));
        }
    }

    fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let mut classes: Vec<String> = self.classes(id).into_iter().map(str::to_string).collect();
        classes.push(class.to_string());
        let refs: Vec<&str> = classes.iter().map(String::as_str).collect();
        self.set_classes(id, &refs);
    }

    fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let classes: Vec<String> = self
            .classes(id)
            .into_iter()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        let refs: Vec<&str> = classes.iter().map(String::as_str).collect();
        self.set_classes(id, &refs);
    }

    /// Merge adjacent text nodes and drop empty ones in the subtree.
    fn normalize(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut previous_text: Option<NodeId> = None;
        for child in children {
            let text = match self.get(child).map(|n| &n.data) {
                Some(NodeData::Text(t)) => Some(t.clone()),
                _ => None,
            };
            match (text, previous_text) {
                (Some(t), _) if t.is_empty() => self.detach(child),
                (Some(t), Some(prev)) => {
                    if let Some(NodeData::Text(existing)) = self.data_mut(prev) {
                        existing.push_str(&t);
                    }
                    self.detach(child);
                }
                (Some(_), None) => previous_text = Some(child),
                (None, _) => {
                    previous_text = None;
                    self.normalize(child);
                }
            }
        }
    }

    // --- serialization ---

    fn outer_html(&self, id: NodeId) -> String
    where
        Self: Sized,
    {
        serialize::outer_html(self, id)
    }

    fn inner_html(&self, id: NodeId) -> String
    where
        Self: Sized,
    {
        serialize::inner_html(self, id)
    }
}
