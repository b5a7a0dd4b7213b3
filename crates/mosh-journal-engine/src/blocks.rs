//! # Block Classifier & Wrapper
//!
//! Turning a selection into a block is three steps:
//!
//! 1. **Expand** ([`expand_to_block_span`]): widen each end of the selection
//!    to its nearest block-level element, list items to their whole list,
//!    and take every sibling between the two.
//! 2. **Wrap** ([`wrap`]): move that content into a new `mosh-block`
//!    wrapper inserted where the content was.
//! 3. **Select** ([`apply_block_style`]): make the wrapper the selection so
//!    the next edit acts on the whole block.
//!
//! ```text
//! <h2>Deck B</h2>                   <h2>Deck B</h2>
//! <p>Ligh|ts flicker.</p>     ==>   <div class="mosh-block narrative">
//! <ul><li>Blo|od</li></ul>            <p>Lights flicker.</p><ul><li>Blood</li></ul>
//!                                   </div>
//! ```
//!
//! Expansion that finds no block at one end is not an error: the raw
//! selection is wrapped instead, with partially selected elements split
//! the way a DOM range extraction splits them.
//!
//! Wrapping either completes or leaves the document as it was. If inserting
//! the wrapper fails, the extracted content is put back before the error is
//! returned.

use std::collections::BTreeSet;

use mosh_journal_markup::{Extraction, MutableTree, NodeId, Range, TreeError, extract_range};

use crate::error::BlockError;
use crate::kinds::{BLOCK_CLASS, BlockKind, Modifier, identify_block};
use crate::notify::Notifier;
use crate::render::{TITLE_CLASS, block_title, content_nodes};
use crate::strings::Strings;
use crate::surface::SelectionProvider;

/// Elements a selection may expand to.
pub const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "section",
    "ul",
    "ol",
    "pre",
    "li",
];

/// A contiguous run of sibling elements, `first` through `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpan {
    pub parent: NodeId,
    pub first: NodeId,
    pub last: NodeId,
}

impl ElementSpan {
    /// A span of one element.
    pub fn single<T: MutableTree>(tree: &T, node: NodeId) -> Result<Self, BlockError> {
        let parent = tree
            .parent(node)
            .ok_or_else(|| BlockError::InvalidSpan(format!("node {node} has no parent")))?;
        Ok(Self {
            parent,
            first: node,
            last: node,
        })
    }

    /// The siblings covered, in order.
    pub fn nodes<T: MutableTree>(&self, tree: &T) -> Result<Vec<NodeId>, BlockError> {
        let (first, last) = self.indices(tree)?;
        Ok(tree.children(self.parent)[first..=last].to_vec())
    }

    /// The equivalent range, from before `first` to after `last`.
    pub fn to_range<T: MutableTree>(&self, tree: &T) -> Result<Range, BlockError> {
        self.indices(tree)?;
        Range::select_siblings(tree, self.first, self.last)
            .map_err(|e| BlockError::InvalidSpan(e.to_string()))
    }

    fn indices<T: MutableTree>(&self, tree: &T) -> Result<(usize, usize), BlockError> {
        let index = |node: NodeId| {
            (tree.parent(node) == Some(self.parent))
                .then(|| tree.index_in_parent(node))
                .flatten()
                .ok_or_else(|| {
                    BlockError::InvalidSpan(format!(
                        "node {node} is not a child of {}",
                        self.parent
                    ))
                })
        };
        let (first, last) = (index(self.first)?, index(self.last)?);
        if first > last {
            return Err(BlockError::InvalidSpan(format!(
                "{} comes after {}",
                self.first, self.last
            )));
        }
        Ok((first, last))
    }
}

/// Outcome of [`expand_to_block_span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Span(ElementSpan),
    /// No block found at one end; use the selection as it is.
    Unchanged,
}

/// Widen a selection to the block-level elements it touches.
///
/// Each boundary climbs from its node to the nearest element in
/// [`BLOCK_TAGS`] below `root`. A list item counts as its whole list. The
/// span then runs between the two blocks' branches under their common
/// ancestor, taking in any siblings between them; if one block contains the
/// other, the outer block alone is the span.
pub fn expand_to_block_span<T: MutableTree>(tree: &T, range: &Range, root: NodeId) -> Expansion {
    let start = boundary_node(tree, range.start.node, range.start.offset, false);
    let end = boundary_node(tree, range.end.node, range.end.offset, true);

    let (Some(start), Some(end)) = (block_for(tree, start, root), block_for(tree, end, root)) else {
        log::debug!("no block around selection, keeping it as is");
        return Expansion::Unchanged;
    };

    if tree.contains(start, end) {
        return single_or_unchanged(tree, start);
    }
    if tree.contains(end, start) {
        return single_or_unchanged(tree, end);
    }

    let Some(parent) = tree.common_ancestor(start, end) else {
        return Expansion::Unchanged;
    };
    let (Some(mut first), Some(mut last)) = (
        child_towards(tree, parent, start),
        child_towards(tree, parent, end),
    ) else {
        return Expansion::Unchanged;
    };
    if tree.index_in_parent(first) > tree.index_in_parent(last) {
        std::mem::swap(&mut first, &mut last);
    }
    Expansion::Span(ElementSpan { parent, first, last })
}

fn single_or_unchanged<T: MutableTree>(tree: &T, node: NodeId) -> Expansion {
    ElementSpan::single(tree, node)
        .map(Expansion::Span)
        .unwrap_or(Expansion::Unchanged)
}

/// The node a boundary points at: a text node itself, or the child of an
/// element at the boundary offset.
fn boundary_node<T: MutableTree>(tree: &T, node: NodeId, offset: usize, is_end: bool) -> NodeId {
    if tree.is_text(node) {
        return node;
    }
    let children = tree.children(node);
    let index = if is_end { offset.checked_sub(1) } else { Some(offset) };
    index
        .and_then(|i| children.get(i))
        .copied()
        .unwrap_or(node)
}

/// Nearest block element at or above `node`, strictly inside `root`.
fn block_for<T: MutableTree>(tree: &T, node: NodeId, root: NodeId) -> Option<NodeId> {
    if node == root || !tree.contains(root, node) {
        return None;
    }
    let mut current = node;
    loop {
        if let Some(tag) = tree.tag_name(current)
            && BLOCK_TAGS.contains(&tag)
        {
            break;
        }
        current = tree.parent(current).filter(|&p| p != root)?;
    }

    if tree.tag_name(current) == Some("li") {
        let list = tree
            .ancestors(current)
            .into_iter()
            .take_while(|&a| a != root)
            .find(|&a| matches!(tree.tag_name(a), Some("ul" | "ol")));
        return Some(list.unwrap_or(current));
    }
    Some(current)
}

/// The child of `ancestor` on the path down to `node`.
fn child_towards<T: MutableTree>(tree: &T, ancestor: NodeId, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        let parent = tree.parent(current)?;
        if parent == ancestor {
            return Some(current);
        }
        current = parent;
    }
}

/// What [`wrap`] moves into the new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapTarget {
    Span(ElementSpan),
    Range(Range),
}

impl WrapTarget {
    /// The expanded span, or the raw range when expansion did not apply.
    pub fn from_expansion(expansion: Expansion, range: Range) -> Self {
        match expansion {
            Expansion::Span(span) => WrapTarget::Span(span),
            Expansion::Unchanged => WrapTarget::Range(range),
        }
    }
}

impl From<ElementSpan> for WrapTarget {
    fn from(span: ElementSpan) -> Self {
        WrapTarget::Span(span)
    }
}

impl From<Range> for WrapTarget {
    fn from(range: Range) -> Self {
        WrapTarget::Range(range)
    }
}

/// Settings for a new block wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapOptions {
    pub title: Option<String>,
    pub modifiers: BTreeSet<Modifier>,
}

/// A block wrapper living in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub node: NodeId,
    pub kind: BlockKind,
    pub title: Option<String>,
    pub modifiers: BTreeSet<Modifier>,
}

impl Block {
    /// Read a block back from its wrapper element.
    pub fn from_node<T: MutableTree>(tree: &T, node: NodeId) -> Option<Self> {
        let (kind, modifiers) = identify_block(tree, node)?;
        Some(Self {
            node,
            kind,
            title: block_title(tree, node),
            modifiers,
        })
    }

    /// Current content markup, title excluded.
    pub fn content<T: MutableTree>(&self, tree: &T) -> String {
        unwrap(tree, self.node)
    }
}

/// Move `target` into a new block of `kind`.
///
/// When nothing but whitespace is extracted, the block gets a placeholder
/// paragraph instead. On failure the tree is left as it was.
pub fn wrap<T: MutableTree>(
    tree: &mut T,
    target: impl Into<WrapTarget>,
    kind: BlockKind,
    options: &WrapOptions,
    strings: &Strings,
) -> Result<Block, BlockError> {
    if kind.is_figure() {
        return Err(BlockError::NotWrappable(kind));
    }

    let range = match target.into() {
        WrapTarget::Span(span) => span.to_range(tree)?,
        WrapTarget::Range(range) => range,
    };
    let extraction =
        extract_range(tree, &range).map_err(|e| BlockError::InvalidSpan(e.to_string()))?;

    let mut classes = vec![BLOCK_CLASS, kind.class()];
    classes.extend(
        Modifier::ALL
            .into_iter()
            .filter(|m| options.modifiers.contains(m))
            .map(Modifier::class),
    );
    let wrapper = tree.create_element("div", &classes);
    let title = options.title.clone().filter(|t| !t.is_empty());

    if let Err(err) = fill_and_insert(tree, wrapper, &extraction, title.as_deref(), strings) {
        rollback(tree, wrapper, &extraction);
        return Err(BlockError::Insertion(err));
    }

    log::info!(
        "wrapped {} node(s) in {kind} block {wrapper}",
        extraction.nodes.len()
    );
    Ok(Block {
        node: wrapper,
        kind,
        title,
        modifiers: options.modifiers.clone(),
    })
}

fn fill_and_insert<T: MutableTree>(
    tree: &mut T,
    wrapper: NodeId,
    extraction: &Extraction,
    title: Option<&str>,
    strings: &Strings,
) -> Result<(), TreeError> {
    if let Some(title) = title {
        let heading = tree.create_element("div", &[TITLE_CLASS]);
        let text = tree.create_text(title);
        tree.append_child(heading, text)?;
        tree.append_child(wrapper, heading)?;
    }

    if extraction.is_blank(tree) {
        let p = tree.create_element("p", &[]);
        let text = tree.create_text(strings.get("MOSH.Blocks.Placeholder"));
        tree.append_child(p, text)?;
        tree.append_child(wrapper, p)?;
    } else {
        for &node in &extraction.nodes {
            tree.append_child(wrapper, node)?;
        }
    }

    tree.insert_child(extraction.container, extraction.index, wrapper)
}

fn rollback<T: MutableTree>(tree: &mut T, wrapper: NodeId, extraction: &Extraction) {
    tree.detach(wrapper);
    match extraction.restore(tree) {
        Ok(()) => log::debug!("restored content after failed insert"),
        Err(err) => log::error!("could not restore extracted content: {err}"),
    }
}

/// A block's content markup without its wrapper or title.
///
/// Anything that is not a recognizable block comes back as its full markup.
pub fn unwrap<T: MutableTree>(tree: &T, block: NodeId) -> String {
    if identify_block(tree, block).is_none() {
        return tree.outer_html(block);
    }
    content_nodes(tree, block)
        .into_iter()
        .map(|n| tree.outer_html(n))
        .collect()
}

/// Replace a block wrapper with its content. Returns the moved nodes.
pub fn unwrap_in_place<T: MutableTree>(
    tree: &mut T,
    block: NodeId,
) -> Result<Vec<NodeId>, BlockError> {
    if identify_block(tree, block).is_none() {
        return Err(BlockError::NotABlock(block));
    }
    let parent = tree
        .parent(block)
        .ok_or(BlockError::Insertion(TreeError::Detached(block)))?;
    let index = tree
        .index_in_parent(block)
        .ok_or(BlockError::Insertion(TreeError::Detached(block)))?;

    let nodes = content_nodes(tree, block);
    let mut moved: Vec<(NodeId, NodeId, usize)> = Vec::with_capacity(nodes.len());
    for (i, &node) in nodes.iter().enumerate() {
        let from = tree.parent(node).unwrap_or(block);
        let from_index = tree.index_in_parent(node).unwrap_or(0);
        if let Err(err) = tree.insert_child(parent, index + i, node) {
            for &(node, from, from_index) in moved.iter().rev() {
                if let Err(err) = tree.insert_child(from, from_index, node) {
                    log::error!("could not restore {node} while unwrapping: {err}");
                }
            }
            return Err(BlockError::Insertion(err));
        }
        moved.push((node, from, from_index));
    }

    tree.detach(block);
    log::info!("unwrapped block {block}");
    Ok(nodes)
}

/// Nearest block wrapper at or above `node`, strictly inside `root`.
pub fn enclosing_block<T: MutableTree>(tree: &T, node: NodeId, root: NodeId) -> Option<Block> {
    let found = tree.closest(node, |t, n| identify_block(t, n).is_some())?;
    if found == root || !tree.contains(root, found) {
        return None;
    }
    Block::from_node(tree, found)
}

/// Wrap the current selection of an editor surface in a block.
///
/// Expands the selection, wraps it, selects the new block and tells the user
/// how it went. An absent or empty selection warns and changes nothing.
pub fn apply_block_style<S: SelectionProvider>(
    surface: &mut S,
    kind: BlockKind,
    options: &WrapOptions,
    strings: &Strings,
    notifier: &mut dyn Notifier,
) -> Result<Block, BlockError> {
    let Some(range) = surface.selection() else {
        notifier.warn(strings.get("MOSH.Blocks.SelectText"));
        return Err(BlockError::NoSelection);
    };

    let expansion = expand_to_block_span(surface.tree(), &range, surface.root());
    if range.is_collapsed() && expansion == Expansion::Unchanged {
        notifier.warn(strings.get("MOSH.Blocks.SelectText"));
        return Err(BlockError::NoSelection);
    }

    let target = WrapTarget::from_expansion(expansion, range);
    match wrap(surface.tree_mut(), target, kind, options, strings) {
        Ok(block) => {
            if let Err(err) = surface.select_node(block.node) {
                log::warn!("could not select new block {}: {err}", block.node);
            }
            notifier.info(&format!(
                "{} {}",
                strings.get(kind.label_key()),
                strings.get("MOSH.Dialog.Inserted")
            ));
            Ok(block)
        }
        Err(err) => {
            notifier.error(&format!("{}: {err}", strings.get("MOSH.Dialog.InsertError")));
            Err(err)
        }
    }
}
