//! The editor the engine acts on.
//!
//! [`apply_block_style`](crate::apply_block_style) needs a document, the
//! editor root inside it and the user's selection. [`SelectionProvider`] is
//! that seam; [`EditorSurface`] is the in-memory implementation used by the
//! CLI and the tests.
//!
//! Selections can be written straight into markup with `{{` and `}}`:
//!
//! ```
//! use mosh_journal_engine::EditorSurface;
//!
//! let surface = EditorSurface::with_markers("<p>Hel{{lo</p><p>Wor}}ld</p>");
//! assert_eq!(surface.to_html(), "<p>Hello</p><p>World</p>");
//! assert_eq!(surface.to_marked_html(), "<p>Hel{{lo</p><p>Wor}}ld</p>");
//! ```

use mosh_journal_markup::{Boundary, MutableTree, NodeData, NodeId, Range, Tree, TreeError};

/// Marks the selection start in [`EditorSurface::with_markers`].
pub const START_MARKER: &str = "{{";

/// Marks the selection end in [`EditorSurface::with_markers`].
pub const END_MARKER: &str = "}}";

pub trait SelectionProvider {
    type Tree: MutableTree;

    fn tree(&self) -> &Self::Tree;

    fn tree_mut(&mut self) -> &mut Self::Tree;

    /// The editor's content root. Never part of a block itself.
    fn root(&self) -> NodeId;

    /// The current selection, if any.
    fn selection(&self) -> Option<Range>;

    /// Replace the selection with one covering `node`.
    fn select_node(&mut self, node: NodeId) -> Result<(), TreeError>;
}

/// A parsed document with a selection.
#[derive(Debug, Clone)]
pub struct EditorSurface {
    tree: Tree,
    root: NodeId,
    selection: Option<Range>,
}

impl EditorSurface {
    pub fn new(tree: Tree) -> Self {
        let root = tree.root();
        Self {
            tree,
            root,
            selection: None,
        }
    }

    /// Parse `html` with nothing selected.
    pub fn parse(html: &str) -> Self {
        Self::new(Tree::parse(html))
    }

    /// Parse `html`, taking the selection from `{{` and `}}` in its text.
    ///
    /// A lone `{{` is a caret. Markers are removed from the document; a text
    /// node left empty is dropped and the boundary moves to its parent.
    pub fn with_markers(html: &str) -> Self {
        let mut tree = Tree::parse(html);
        let root = tree.root();

        let mut start = None;
        let mut end = None;
        for node in tree.descendants(root) {
            let Some(NodeData::Text(text)) = tree.get(node).map(|n| &n.data) else {
                continue;
            };
            if !text.contains(START_MARKER) && !text.contains(END_MARKER) {
                continue;
            }

            let (stripped, found) = strip_markers(text);
            let empty = stripped.is_empty();
            if let Some(NodeData::Text(existing)) = tree.data_mut(node) {
                *existing = stripped;
            }

            let mut hits: Vec<(bool, (NodeId, usize))> = found
                .into_iter()
                .map(|(is_start, offset)| (is_start, (node, offset)))
                .collect();
            if empty
                && let (Some(parent), Some(index)) = (tree.parent(node), tree.index_in_parent(node))
            {
                tree.detach(node);
                for (_, at) in &mut hits {
                    *at = (parent, index);
                }
            }
            for (is_start, (node, offset)) in hits {
                let slot = if is_start { &mut start } else { &mut end };
                slot.get_or_insert(Boundary::new(node, offset));
            }
        }

        let selection = match (start, end) {
            (Some(start), Some(end)) => Some(Range::new(start, end)),
            (Some(caret), None) => Some(Range::new(caret, caret)),
            _ => None,
        };
        Self {
            tree,
            root,
            selection,
        }
    }

    pub fn set_selection(&mut self, selection: Option<Range>) {
        self.selection = selection;
    }

    pub fn to_html(&self) -> String {
        self.tree.to_html()
    }

    /// The document with the selection written back as markers.
    pub fn to_marked_html(&self) -> String {
        let Some(range) = self.selection else {
            return self.to_html();
        };
        let mut tree = self.tree.clone();
        if range.is_collapsed() {
            insert_marker(&mut tree, range.start, START_MARKER);
        } else {
            insert_marker(&mut tree, range.end, END_MARKER);
            insert_marker(&mut tree, range.start, START_MARKER);
        }
        tree.to_html()
    }
}

impl SelectionProvider for EditorSurface {
    type Tree = Tree;

    fn tree(&self) -> &Tree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    fn root(&self) -> NodeId {
        self.root
    }

    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn select_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.selection = Some(Range::select_node(&self.tree, node)?);
        Ok(())
    }
}

/// Remove markers from `text`, returning the char offsets where they were.
fn strip_markers(text: &str) -> (String, Vec<(bool, usize)>) {
    let mut out = String::with_capacity(text.len());
    let mut found = Vec::new();
    let mut chars = 0;
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(START_MARKER) {
            found.push((true, chars));
            rest = after;
        } else if let Some(after) = rest.strip_prefix(END_MARKER) {
            found.push((false, chars));
            rest = after;
        } else if let Some(c) = rest.chars().next() {
            out.push(c);
            chars += 1;
            rest = &rest[c.len_utf8()..];
        }
    }
    (out, found)
}

fn insert_marker(tree: &mut Tree, at: Boundary, marker: &str) {
    if let Some(NodeData::Text(text)) = tree.data_mut(at.node) {
        let byte = text
            .char_indices()
            .nth(at.offset)
            .map_or(text.len(), |(i, _)| i);
        text.insert_str(byte, marker);
        return;
    }
    let node = tree.create_text(marker);
    if let Err(err) = tree.insert_child(at.node, at.offset, node) {
        log::debug!("could not place selection marker: {err}");
    }
}
