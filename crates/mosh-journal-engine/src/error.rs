use mosh_journal_markup::{NodeId, TreeError};

use crate::kinds::BlockKind;

/// Failures of block rendering and wrapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnrecognizedType(String),
    #[error("No text is selected")]
    NoSelection,
    #[error("Could not insert block: {0}")]
    Insertion(#[source] TreeError),
    #[error("Invalid span: {0}")]
    InvalidSpan(String),
    #[error("{0} blocks cannot wrap content")]
    NotWrappable(BlockKind),
    #[error("Node {0} is not a block")]
    NotABlock(NodeId),
}

/// Failures of figure toolbar actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FigureError {
    #[error("Unknown figure action: {0}")]
    UnknownAction(String),
    #[error("Unknown value {value:?} for figure {action}")]
    UnknownValue { action: String, value: String },
    #[error("Node {0} is not a figure")]
    NotAFigure(NodeId),
    #[error("No figure toolbar is active")]
    NoActiveFigure,
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}
