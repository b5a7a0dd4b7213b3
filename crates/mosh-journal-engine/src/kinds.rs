//! Block kinds and modifiers.
//!
//! A block's entire identity lives in its wrapper's class list:
//! `mosh-block` plus one kind class plus any modifier classes. Figures are
//! the odd one out and carry `mosh-figure` on a `<figure>` element instead.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use mosh_journal_markup::{MutableTree, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::BlockError;

/// Class shared by every block wrapper.
pub const BLOCK_CLASS: &str = "mosh-block";

/// Class carried by every figure.
pub const FIGURE_CLASS: &str = "mosh-figure";

/// The kind of a styled journal block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Narrative,
    Quote,
    Terminal,
    Handout,
    Navigation,
    /// GM-only content.
    Warden,
    Info,
    /// Wraps a single image rather than arbitrary content.
    Figure,
}

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Narrative,
        BlockKind::Quote,
        BlockKind::Terminal,
        BlockKind::Handout,
        BlockKind::Navigation,
        BlockKind::Warden,
        BlockKind::Info,
        BlockKind::Figure,
    ];

    /// Kinds that wrap content, i.e. everything but [`BlockKind::Figure`].
    pub const CONTENT: [BlockKind; 7] = [
        BlockKind::Narrative,
        BlockKind::Quote,
        BlockKind::Terminal,
        BlockKind::Handout,
        BlockKind::Navigation,
        BlockKind::Warden,
        BlockKind::Info,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Narrative => "narrative",
            BlockKind::Quote => "quote",
            BlockKind::Terminal => "terminal",
            BlockKind::Handout => "handout",
            BlockKind::Navigation => "navigation",
            BlockKind::Warden => "warden",
            BlockKind::Info => "info",
            BlockKind::Figure => "figure",
        }
    }

    /// The class that marks this kind in markup.
    pub fn class(self) -> &'static str {
        match self {
            BlockKind::Figure => FIGURE_CLASS,
            other => other.name(),
        }
    }

    pub fn is_figure(self) -> bool {
        self == BlockKind::Figure
    }

    /// Localization key for the kind's display name.
    pub fn label_key(self) -> &'static str {
        match self {
            BlockKind::Narrative => "MOSH.Blocks.Narrative",
            BlockKind::Quote => "MOSH.Blocks.Quote",
            BlockKind::Terminal => "MOSH.Blocks.Terminal",
            BlockKind::Handout => "MOSH.Blocks.Handout",
            BlockKind::Navigation => "MOSH.Blocks.Navigation",
            BlockKind::Warden => "MOSH.Blocks.Warden",
            BlockKind::Info => "MOSH.Blocks.Info",
            BlockKind::Figure => "MOSH.Blocks.Figure",
        }
    }

    pub fn hint_key(self) -> &'static str {
        match self {
            BlockKind::Narrative => "MOSH.Blocks.NarrativeHint",
            BlockKind::Quote => "MOSH.Blocks.QuoteHint",
            BlockKind::Terminal => "MOSH.Blocks.TerminalHint",
            BlockKind::Handout => "MOSH.Blocks.HandoutHint",
            BlockKind::Navigation => "MOSH.Blocks.NavigationHint",
            BlockKind::Warden => "MOSH.Blocks.WardenHint",
            BlockKind::Info => "MOSH.Blocks.InfoHint",
            BlockKind::Figure => "MOSH.Blocks.FigureHint",
        }
    }

    /// Sample text shown in the block picker. Figures have none.
    pub fn placeholder_key(self) -> Option<&'static str> {
        match self {
            BlockKind::Narrative => Some("MOSH.Blocks.NarrativePlaceholder"),
            BlockKind::Quote => Some("MOSH.Blocks.QuotePlaceholder"),
            BlockKind::Terminal => Some("MOSH.Blocks.TerminalPlaceholder"),
            BlockKind::Handout => Some("MOSH.Blocks.HandoutPlaceholder"),
            BlockKind::Navigation => Some("MOSH.Blocks.NavigationPlaceholder"),
            BlockKind::Warden => Some("MOSH.Blocks.WardenPlaceholder"),
            BlockKind::Info => Some("MOSH.Blocks.InfoPlaceholder"),
            BlockKind::Figure => None,
        }
    }

    /// The content kind whose class is `class`, if any.
    pub fn from_class(class: &str) -> Option<Self> {
        Self::CONTENT.into_iter().find(|k| k.class() == class)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BlockError::UnrecognizedType(s.to_string()))
    }
}

/// Decorative variants a block may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Ragged paper edge.
    Torn,
    /// Redaction stamp.
    Classified,
}

impl Modifier {
    /// In rendering order.
    pub const ALL: [Modifier; 2] = [Modifier::Torn, Modifier::Classified];

    pub fn class(self) -> &'static str {
        match self {
            Modifier::Torn => "torn",
            Modifier::Classified => "classified",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.class() == class)
    }
}

impl FromStr for Modifier {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_class(s.trim()).ok_or_else(|| BlockError::UnrecognizedType(s.to_string()))
    }
}

/// Kind and modifiers of a block wrapper element.
///
/// `None` unless the element carries `mosh-block` and a content kind class.
pub fn identify_block<T: MutableTree>(
    tree: &T,
    node: NodeId,
) -> Option<(BlockKind, BTreeSet<Modifier>)> {
    let classes = tree.classes(node);
    if !classes.contains(&BLOCK_CLASS) {
        return None;
    }
    let kind = classes.iter().find_map(|c| BlockKind::from_class(c))?;
    let modifiers = classes.iter().filter_map(|c| Modifier::from_class(c)).collect();
    Some((kind, modifiers))
}
