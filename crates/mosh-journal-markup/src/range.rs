//! # Ranges and Extraction
//!
//! A [`Range`] is a pair of [`Boundary`] points, each a node plus an offset:
//! a character offset inside text nodes, a child index inside elements. This
//! is the DOM Range model that rich-text editors hand out for selections.
//!
//! [`extract_range`] implements `Range.extractContents()` semantics: nodes
//! fully inside the range are moved out, text nodes cut by a boundary are
//! split, and elements only partially inside are shallow-cloned so the
//! extracted part keeps its structure while the original keeps the rest.
//!
//! ```text
//! <p>He|llo</p><p>Wor|ld</p>        range from "He|" to "Wor|"
//!
//! extracted:  <p>llo</p><p>Wor</p>   (both clones)
//! remaining:  <p>He</p>|<p>ld</p>    (| = Extraction::index)
//! ```
//!
//! Every [`Extraction`] remembers how it was made, so [`Extraction::restore`]
//! can put the content back exactly where it came from. Callers that insert
//! something at the vacated point use this to roll back when the insertion
//! fails. [`extract_range`] does the same for itself: if the tree refuses a
//! move halfway through, everything already moved is put back before the
//! error is returned.

use crate::ops::MutableTree;
use crate::tree::{NodeData, NodeId, TreeError};

/// One end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A start/end pair of boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Boundary,
    pub end: Boundary,
}

impl Range {
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one node (`Range.selectNode`).
    pub fn select_node<T: MutableTree>(tree: &T, node: NodeId) -> Result<Self, TreeError> {
        let parent = tree.parent(node).ok_or(TreeError::Detached(node))?;
        let index = tree.index_in_parent(node).ok_or(TreeError::Detached(node))?;
        Ok(Self::new(
            Boundary::new(parent, index),
            Boundary::new(parent, index + 1),
        ))
    }

    /// A range covering a run of siblings, `first` through `last` inclusive.
    pub fn select_siblings<T: MutableTree>(
        tree: &T,
        first: NodeId,
        last: NodeId,
    ) -> Result<Self, TreeError> {
        let start = Self::select_node(tree, first)?.start;
        let end = Self::select_node(tree, last)?.end;
        Ok(Self::new(start, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Deepest node containing both boundaries.
    pub fn common_ancestor<T: MutableTree>(&self, tree: &T) -> Option<NodeId> {
        tree.common_ancestor(self.start.node, self.end.node)
    }
}

/// Which side of a range a split element came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// The range started inside the source; the clone holds its tail.
    Start,
    /// The range ended inside the source; the clone holds its head.
    End,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    clone: NodeId,
    source: NodeId,
    /// Child index in `source` the clone's children came from.
    at: usize,
}

/// The result of [`extract_range`].
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Extracted top-level nodes in document order, now detached.
    pub nodes: Vec<NodeId>,
    /// The node the range collapsed into.
    pub container: NodeId,
    /// Child index in `container` where the content used to be.
    pub index: usize,
    splits: Vec<Split>,
}

impl Extraction {
    /// True when nothing but whitespace text and comments was extracted.
    pub fn is_blank<T: MutableTree>(&self, tree: &T) -> bool {
        let has_element = self.nodes.iter().any(|&n| tree.is_element(n));
        let text: String = self.nodes.iter().map(|&n| tree.text_content(n)).collect();
        !has_element && text.trim().is_empty()
    }

    /// Put the extracted content back where it came from.
    ///
    /// Works whether or not the extracted nodes have since been moved
    /// elsewhere (e.g. into a wrapper). Text nodes split by the extraction
    /// are merged again.
    pub fn restore<T: MutableTree>(&self, tree: &mut T) -> Result<(), TreeError> {
        let mut at = self.index;
        for &node in &self.nodes {
            if self.splits.iter().any(|s| s.clone == node) {
                continue;
            }
            tree.insert_child(self.container, at, node)?;
            at += 1;
        }

        // Outer clones were recorded first, so their nested clones are
        // already back inside the source when we reach them.
        for split in &self.splits {
            let moved = tree.children(split.clone).to_vec();
            for (i, node) in moved.into_iter().enumerate() {
                tree.insert_child(split.source, split.at + i, node)?;
            }
            tree.detach(split.clone);
        }

        tree.normalize(self.container);
        Ok(())
    }
}

/// Where a boundary sits once text nodes have been split at it.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    Before(NodeId),
    After(NodeId),
    AtEnd(NodeId),
}

/// Move the contents of `range` out of the tree.
pub fn extract_range<T: MutableTree>(tree: &mut T, range: &Range) -> Result<Extraction, TreeError> {
    for b in [range.start, range.end] {
        if tree.get(b.node).is_none() {
            return Err(TreeError::StaleNode(b.node));
        }
    }

    // Text split at a boundary is merged back if anything below fails.
    let split_parents = [tree.parent(range.end.node), tree.parent(range.start.node)];
    let (container, start_path, end_path) = match locate(tree, range) {
        Ok(located) => located,
        Err(err) => {
            for parent in split_parents.into_iter().flatten() {
                tree.normalize(parent);
            }
            return Err(err);
        }
    };

    let mut nodes = Vec::new();
    let mut splits = Vec::new();
    let result = extract_between(
        tree,
        container,
        Some(start_path.as_slice()),
        Some(end_path.as_slice()),
        &mut Dest::Top(&mut nodes),
        &mut splits,
    );

    let extraction = Extraction {
        nodes,
        container,
        index: first_after(&start_path),
        splits,
    };
    if let Err(err) = result {
        if let Err(restore_err) = extraction.restore(tree) {
            log::error!("could not undo partial extraction: {restore_err}");
        }
        return Err(err);
    }
    Ok(extraction)
}

/// Split text at both boundaries, then find the common container and the
/// child-index paths down to each boundary, in document order.
fn locate<T: MutableTree>(
    tree: &mut T,
    range: &Range,
) -> Result<(NodeId, Vec<usize>, Vec<usize>), TreeError> {
    // End first: splitting the start of the same text node would otherwise
    // shift the end offset.
    let end = anchor_at(tree, range.end)?;
    let start = anchor_at(tree, range.start)?;

    let (start_container, start_index) = resolve(tree, start)?;
    let (end_container, end_index) = resolve(tree, end)?;

    let container = tree
        .common_ancestor(start_container, end_container)
        .ok_or(TreeError::Detached(start_container))?;

    let mut start_path = path_from(tree, container, start_container, start_index);
    let mut end_path = path_from(tree, container, end_container, end_index);
    if start_path > end_path {
        std::mem::swap(&mut start_path, &mut end_path);
    }
    Ok((container, start_path, end_path))
}

/// First child index that moves out when extraction starts at `path`.
fn first_after(path: &[usize]) -> usize {
    match path {
        [offset] => *offset,
        [partial, ..] => partial + 1,
        [] => 0,
    }
}

fn anchor_at<T: MutableTree>(tree: &mut T, b: Boundary) -> Result<Anchor, TreeError> {
    let text = match tree.get(b.node).map(|n| &n.data) {
        Some(NodeData::Text(t)) => Some(t.clone()),
        _ => None,
    };

    let Some(text) = text else {
        return Ok(match tree.children(b.node).get(b.offset) {
            Some(&child) => Anchor::Before(child),
            None => Anchor::AtEnd(b.node),
        });
    };

    let chars = text.chars().count();
    if b.offset == 0 {
        return Ok(Anchor::Before(b.node));
    }
    if b.offset >= chars {
        return Ok(Anchor::After(b.node));
    }

    let parent = tree.parent(b.node).ok_or(TreeError::Detached(b.node))?;
    let index = tree.index_in_parent(b.node).ok_or(TreeError::Detached(b.node))?;
    let split_at = text
        .char_indices()
        .nth(b.offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let tail = tree.create_text(&text[split_at..]);
    tree.insert_child(parent, index + 1, tail)?;
    if let Some(NodeData::Text(head)) = tree.data_mut(b.node) {
        head.truncate(split_at);
    }
    Ok(Anchor::Before(tail))
}

fn resolve<T: MutableTree>(tree: &T, anchor: Anchor) -> Result<(NodeId, usize), TreeError> {
    match anchor {
        Anchor::Before(node) | Anchor::After(node) => {
            let parent = tree.parent(node).ok_or(TreeError::Detached(node))?;
            let index = tree.index_in_parent(node).ok_or(TreeError::Detached(node))?;
            let index = if matches!(anchor, Anchor::After(_)) {
                index + 1
            } else {
                index
            };
            Ok((parent, index))
        }
        Anchor::AtEnd(node) => Ok((node, tree.children(node).len())),
    }
}

/// Child-index path from `ancestor` down to `container`, then `offset`.
fn path_from<T: MutableTree>(
    tree: &T,
    ancestor: NodeId,
    container: NodeId,
    offset: usize,
) -> Vec<usize> {
    let mut path = vec![offset];
    let mut node = container;
    while node != ancestor {
        let Some(index) = tree.index_in_parent(node) else {
            break;
        };
        path.push(index);
        match tree.parent(node) {
            Some(parent) => node = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Where extracted nodes go.
enum Dest<'a> {
    /// Detached and listed as top-level extracted nodes.
    Top(&'a mut Vec<NodeId>),
    /// Appended to a clone made by [`split_off`].
    Clone(NodeId),
}

impl Dest<'_> {
    /// Move one node out. On error the node stays where it was.
    fn take<T: MutableTree>(&mut self, tree: &mut T, node: NodeId) -> Result<(), TreeError> {
        match self {
            Dest::Top(nodes) => {
                tree.detach(node);
                nodes.push(node);
                Ok(())
            }
            Dest::Clone(clone) => tree.append_child(*clone, node),
        }
    }
}

/// Extract the children of `node` between two optional paths into `dest`.
///
/// A one-element path is a plain child offset. A longer path means the range
/// boundary lies inside child `path[0]`, which is then split by cloning.
/// `None` stands for the start or end of `node`.
///
/// Every node is either still in place or already in `dest`, and every clone
/// is recorded in `splits`, so a failure partway can be undone with
/// [`Extraction::restore`].
fn extract_between<T: MutableTree>(
    tree: &mut T,
    node: NodeId,
    start: Option<&[usize]>,
    end: Option<&[usize]>,
    dest: &mut Dest<'_>,
    splits: &mut Vec<Split>,
) -> Result<(), TreeError> {
    let children = tree.children(node).to_vec();
    let len = children.len();

    let (partial_start, first) = match start {
        Some([offset]) => (None, *offset),
        Some([index, rest @ ..]) => (Some((*index, rest)), index + 1),
        _ => (None, 0),
    };
    let (partial_end, stop) = match end {
        Some([offset]) => (None, *offset),
        Some([index, rest @ ..]) => (Some((*index, rest)), *index),
        _ => (None, len),
    };

    let child_at = |index: usize| {
        children.get(index).copied().ok_or(TreeError::IndexOutOfBounds {
            parent: node,
            index,
            len,
        })
    };

    if let Some((index, rest)) = partial_start {
        let source = child_at(index)?;
        split_off(tree, source, Side::Start, rest, dest, splits)?;
    }

    let first = first.min(len);
    let stop = stop.clamp(first, len);
    for &child in &children[first..stop] {
        dest.take(tree, child)?;
    }

    if let Some((index, rest)) = partial_end {
        let source = child_at(index)?;
        split_off(tree, source, Side::End, rest, dest, splits)?;
    }

    Ok(())
}

fn split_off<T: MutableTree>(
    tree: &mut T,
    source: NodeId,
    side: Side,
    rest: &[usize],
    dest: &mut Dest<'_>,
    splits: &mut Vec<Split>,
) -> Result<(), TreeError> {
    let clone = tree.shallow_clone(source)?;
    dest.take(tree, clone)?;

    let at = match side {
        Side::Start => first_after(rest).min(tree.children(source).len()),
        Side::End => 0,
    };
    // Outer clones are recorded before the clones nested inside them.
    splits.push(Split { clone, source, at });

    let mut into = Dest::Clone(clone);
    match side {
        Side::Start => extract_between(tree, source, Some(rest), None, &mut into, splits),
        Side::End => extract_between(tree, source, None, Some(rest), &mut into, splits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tree;
    use pretty_assertions::assert_eq;

    fn fragment_html(tree: &Tree, nodes: &[NodeId]) -> String {
        nodes.iter().map(|&n| tree.outer_html(n)).collect()
    }

    /// Text node under the `n`th top-level element.
    fn text_in(tree: &Tree, n: usize) -> NodeId {
        let el = tree.children(tree.root())[n];
        tree.children(el)[0]
    }

    #[test]
    fn extract_inside_single_text_node() {
        let mut tree = Tree::parse("<p>Hello</p>");
        let text = text_in(&tree, 0);
        let range = Range::new(Boundary::new(text, 1), Boundary::new(text, 4));

        let ex = extract_range(&mut tree, &range).unwrap();
        assert_eq!(fragment_html(&tree, &ex.nodes), "ell");
        assert_eq!(tree.to_html(), "<p>Ho</p>");
        assert_eq!(ex.index, 1);
    }

    #[test]
    fn extract_across_paragraphs_splits_both() {
        let mut tree = Tree::parse("<p>Hello</p><p>World</p>");
        let range = Range::new(
            Boundary::new(text_in(&tree, 0), 2),
            Boundary::new(text_in(&tree, 1), 3),
        );

        let ex = extract_range(&mut tree, &range).unwrap();
        assert_eq!(fragment_html(&tree, &ex.nodes), "<p>llo</p><p>Wor</p>");
        assert_eq!(tree.to_html(), "<p>He</p><p>ld</p>");
        assert_eq!(ex.container, tree.root());
        assert_eq!(ex.index, 1);
    }

    #[test]
    fn extract_whole_siblings() {
        let mut tree = Tree::parse("<h1>T</h1><p>a</p><p>b</p><p>c</p>");
        let root = tree.root();
        let kids = tree.children(root).to_vec();
        let range = Range::select_siblings(&tree, kids[1], kids[2]).unwrap();

        let ex = extract_range(&mut tree, &range).unwrap();
        assert_eq!(ex.nodes, vec![kids[1], kids[2]]);
        assert_eq!(tree.to_html(), "<h1>T</h1><p>c</p>");
        assert_eq!(ex.index, 1);
    }

    #[test]
    fn unicode_offsets_are_characters() {
        let mut tree = Tree::parse("<p>añb</p>");
        let text = text_in(&tree, 0);
        let range = Range::new(Boundary::new(text, 1), Boundary::new(text, 2));
        let ex = extract_range(&mut tree, &range).unwrap();
        assert_eq!(fragment_html(&tree, &ex.nodes), "ñ");
    }

    #[test]
    fn restore_undoes_nested_split() {
        let original = "<ul><li>one <b>bold</b></li><li>two</li></ul><p>after</p>";
        let mut tree = Tree::parse(original);
        let ul = tree.children(tree.root())[0];
        let li1 = tree.children(ul)[0];
        let b = tree.children(li1)[1];
        let bold = tree.children(b)[0];
        let p = tree.children(tree.root())[1];
        let after = tree.children(p)[0];
        let range = Range::new(Boundary::new(bold, 2), Boundary::new(after, 2));

        let ex = extract_range(&mut tree, &range).unwrap();
        assert_eq!(
            fragment_html(&tree, &ex.nodes),
            "<ul><li><b>ld</b></li><li>two</li></ul><p>af</p>"
        );
        assert_eq!(tree.to_html(), "<ul><li>one <b>bo</b></li></ul><p>ter</p>");

        // move the content somewhere else first, as a wrapper would
        let wrapper = tree.create_element("div", &[]);
        for &n in &ex.nodes {
            tree.append_child(wrapper, n).unwrap();
        }

        ex.restore(&mut tree).unwrap();
        assert_eq!(tree.to_html(), original);
        assert!(tree.children(wrapper).is_empty());
    }

    /// Refuses the `n`th insert (counting from zero), once.
    struct FlakyTree {
        inner: Tree,
        inserts_before_failure: Option<usize>,
    }

    impl MutableTree for FlakyTree {
        fn root(&self) -> NodeId {
            self.inner.root()
        }

        fn get(&self, id: NodeId) -> Option<&crate::Node> {
            self.inner.get(id)
        }

        fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
            self.inner.data_mut(id)
        }

        fn create(&mut self, data: NodeData) -> NodeId {
            self.inner.create(data)
        }

        fn insert_child(
            &mut self,
            parent: NodeId,
            index: usize,
            child: NodeId,
        ) -> Result<(), TreeError> {
            match self.inserts_before_failure {
                Some(0) => {
                    self.inserts_before_failure = None;
                    Err(TreeError::NotAContainer(parent))
                }
                Some(n) => {
                    self.inserts_before_failure = Some(n - 1);
                    self.inner.insert_child(parent, index, child)
                }
                None => self.inner.insert_child(parent, index, child),
            }
        }

        fn detach(&mut self, id: NodeId) {
            self.inner.detach(id);
        }
    }

    #[test]
    fn refused_move_leaves_document_whole() {
        let original = "<ul><li>one <b>bold</b></li><li>two</li></ul><p>mid</p><p>after</p>";
        let parsed = Tree::parse(original);
        let ul = parsed.children(parsed.root())[0];
        let b = parsed.children(parsed.children(ul)[0])[1];
        let bold = parsed.children(b)[0];
        let after = parsed.children(parsed.children(parsed.root())[2])[0];
        let range = Range::new(Boundary::new(bold, 2), Boundary::new(after, 2));

        let mut failures = 0;
        for n in 0..64 {
            let mut tree = FlakyTree {
                inner: parsed.clone(),
                inserts_before_failure: Some(n),
            };
            match extract_range(&mut tree, &range) {
                Ok(ex) => {
                    assert_eq!(
                        fragment_html(&tree.inner, &ex.nodes),
                        "<ul><li><b>ld</b></li><li>two</li></ul><p>mid</p><p>af</p>"
                    );
                    break;
                }
                Err(err) => {
                    assert!(matches!(err, TreeError::NotAContainer(_)), "{err:?}");
                    assert_eq!(tree.inner.to_html(), original, "insert {n} refused");
                    failures += 1;
                }
            }
        }
        assert!(failures > 2, "only {failures} inserts were exercised");
    }

    #[test]
    fn reversed_range_is_normalized() {
        let mut tree = Tree::parse("<p>a</p><p>b</p><p>c</p>");
        let root = tree.root();
        let range = Range::new(Boundary::new(root, 2), Boundary::new(root, 1));
        let ex = extract_range(&mut tree, &range).unwrap();
        assert_eq!(fragment_html(&tree, &ex.nodes), "<p>b</p>");
    }

    #[test]
    fn blank_extraction_is_detected() {
        let mut tree = Tree::parse("<p>a</p>  <p>b</p>");
        let root = tree.root();
        let range = Range::new(Boundary::new(root, 1), Boundary::new(root, 2));
        let ex = extract_range(&mut tree, &range).unwrap();
        assert!(ex.is_blank(&tree));
    }

    #[test]
    fn select_node_on_detached_node_fails() {
        let mut tree = Tree::new();
        let p = tree.create_element("p", &[]);
        assert_eq!(Range::select_node(&tree, p), Err(TreeError::Detached(p)));
    }
}
