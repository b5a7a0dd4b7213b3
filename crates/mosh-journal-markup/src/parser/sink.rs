//! Sink for converting parser events into tree nodes.
//!
//! The sink keeps a stack of open elements and applies the handful of HTML
//! nesting rules that journal markup actually exercises:
//!
//! - void elements (`img`, `br`, ...) never open
//! - a new `li` closes an open `li` in the same list
//! - a block-level start tag closes an open `p`
//! - an end tag closes everything above its matching element; a stray end
//!   tag with no open match is dropped

use crate::ops::MutableTree;
use crate::parser::event::Event;
use crate::tree::{Element, NodeData, NodeId};

/// Start tags that implicitly end an open paragraph.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav",
    "ol", "p", "pre", "section", "table", "ul",
];

/// Builds nodes under a given parent from a stream of events.
pub struct Sink<'t, T: MutableTree> {
    tree: &'t mut T,
    stack: Vec<NodeId>,
}

impl<'t, T: MutableTree> Sink<'t, T> {
    /// Create a sink appending under `parent`.
    pub fn new(tree: &'t mut T, parent: NodeId) -> Self {
        Self {
            tree,
            stack: vec![parent],
        }
    }

    /// Consume the events; anything still open is closed implicitly.
    pub fn finish(mut self, events: Vec<Event>) {
        for event in events {
            match event {
                Event::Open {
                    name,
                    attrs,
                    self_closing,
                } => self.open(name, attrs, self_closing),
                Event::Close { name } => self.close(&name),
                Event::Text(text) => self.text(text),
                Event::RawText(text) => {
                    let node = self.tree.create(NodeData::Text(text));
                    self.append(node);
                }
                Event::Comment(body) => {
                    let node = self.tree.create(NodeData::Comment(body));
                    self.append(node);
                }
                Event::Doctype(raw) => {
                    let node = self.tree.create(NodeData::Doctype(raw));
                    self.append(node);
                }
            }
        }
    }

    fn current(&self) -> NodeId {
        // the stack always holds the insertion parent at index 0
        self.stack[self.stack.len() - 1]
    }

    fn current_is(&self, name: &str) -> bool {
        self.stack.len() > 1 && self.tree.tag_name(self.current()) == Some(name)
    }

    fn append(&mut self, node: NodeId) {
        let parent = self.current();
        if let Err(err) = self.tree.append_child(parent, node) {
            log::trace!("dropping node that cannot be placed: {err}");
        }
    }

    fn open(&mut self, name: String, attrs: Vec<crate::tree::Attribute>, self_closing: bool) {
        if name == "li" {
            self.close_open_list_item();
        }
        if CLOSES_PARAGRAPH.contains(&name.as_str()) && self.current_is("p") {
            self.stack.pop();
        }

        let element = Element { name, attrs };
        let opens = !element.is_void() && !self_closing;
        let node = self.tree.create(NodeData::Element(element));
        self.append(node);
        if opens {
            self.stack.push(node);
        }
    }

    fn close_open_list_item(&mut self) {
        for depth in (1..self.stack.len()).rev() {
            match self.tree.tag_name(self.stack[depth]) {
                Some("li") => {
                    self.stack.truncate(depth);
                    return;
                }
                Some("ul") | Some("ol") => return,
                _ => {}
            }
        }
    }

    fn close(&mut self, name: &str) {
        let found = (1..self.stack.len())
            .rev()
            .find(|&depth| self.tree.tag_name(self.stack[depth]) == Some(name));
        match found {
            Some(depth) => self.stack.truncate(depth),
            None => log::trace!("ignoring stray </{name}>"),
        }
    }

    fn text(&mut self, text: String) {
        let parent = self.current();
        let last = self.tree.children(parent).last().copied();
        if let Some(last) = last
            && let Some(NodeData::Text(existing)) = self.tree.data_mut(last)
        {
            existing.push_str(&text);
            return;
        }
        let node = self.tree.create(NodeData::Text(text));
        self.append(node);
    }
}
