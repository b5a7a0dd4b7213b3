use mosh_journal_markup::{MutableTree, NodeId};

use super::state::{FigurePosition, FigureSize, FigureState, FigureStyle, SELECTED_CLASS};
use crate::error::FigureError;
use crate::kinds::FIGURE_CLASS;

/// A toolbar action on a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigureAction {
    Position(FigurePosition),
    Size(FigureSize),
    Style(FigureStyle),
    Delete,
}

impl FigureAction {
    /// Every toolbar button, in toolbar order.
    pub const ALL: [FigureAction; 10] = [
        FigureAction::Position(FigurePosition::Left),
        FigureAction::Position(FigurePosition::None),
        FigureAction::Position(FigurePosition::Right),
        FigureAction::Size(FigureSize::Small),
        FigureAction::Size(FigureSize::Medium),
        FigureAction::Size(FigureSize::Large),
        FigureAction::Style(FigureStyle::None),
        FigureAction::Style(FigureStyle::Polaroid),
        FigureAction::Style(FigureStyle::Screen),
        FigureAction::Delete,
    ];

    /// Parse a toolbar `data-action` / `data-value` pair.
    ///
    /// The value is ignored for `delete`.
    pub fn parse(action: &str, value: &str) -> Result<Self, FigureError> {
        let unknown_value = || FigureError::UnknownValue {
            action: action.to_string(),
            value: value.to_string(),
        };
        match action {
            "position" => FigurePosition::from_value(value)
                .map(FigureAction::Position)
                .ok_or_else(unknown_value),
            "size" => FigureSize::from_value(value)
                .map(FigureAction::Size)
                .ok_or_else(unknown_value),
            "style" => FigureStyle::from_value(value)
                .map(FigureAction::Style)
                .ok_or_else(unknown_value),
            "delete" => Ok(FigureAction::Delete),
            other => Err(FigureError::UnknownAction(other.to_string())),
        }
    }

    /// The `data-action` string.
    pub fn name(self) -> &'static str {
        match self {
            FigureAction::Position(_) => "position",
            FigureAction::Size(_) => "size",
            FigureAction::Style(_) => "style",
            FigureAction::Delete => "delete",
        }
    }

    /// The `data-value` string; `None` for delete.
    pub fn value(self) -> Option<&'static str> {
        match self {
            FigureAction::Position(p) => Some(p.value()),
            FigureAction::Size(s) => Some(s.value()),
            FigureAction::Style(s) => Some(s.value()),
            FigureAction::Delete => None,
        }
    }

    /// True when this action's value is what `state` already has.
    pub fn matches(self, state: FigureState) -> bool {
        match self {
            FigureAction::Position(p) => state.position == p,
            FigureAction::Size(s) => state.size == s,
            FigureAction::Style(s) => state.style == s,
            FigureAction::Delete => false,
        }
    }
}

impl FigureState {
    /// The state after `action`, or `None` when the action ends the figure.
    pub fn transition(self, action: FigureAction) -> Option<FigureState> {
        match action {
            FigureAction::Position(position) => Some(FigureState { position, ..self }),
            FigureAction::Size(size) => Some(FigureState { size, ..self }),
            FigureAction::Style(style) => Some(FigureState { style, ..self }),
            FigureAction::Delete => None,
        }
    }
}

/// What an applied action did to the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Updated(FigureState),
    Deleted,
}

/// Current state of a figure element, read from its classes.
///
/// Total: any node classifies, with missing attributes read as defaults.
pub fn classify<T: MutableTree>(tree: &T, figure: NodeId) -> FigureState {
    FigureState::from_classes(tree.classes(figure))
}

/// Apply a toolbar action to a figure element.
///
/// Attribute changes rewrite the class list canonically, keeping the
/// selection highlight if present. `Delete` detaches the figure.
pub fn apply_action<T: MutableTree>(
    tree: &mut T,
    figure: NodeId,
    action: FigureAction,
) -> Result<ActionOutcome, FigureError> {
    if !tree.has_class(figure, FIGURE_CLASS) {
        return Err(FigureError::NotAFigure(figure));
    }

    let current = classify(tree, figure);
    let Some(next) = current.transition(action) else {
        tree.detach(figure);
        log::info!("deleted figure {figure}");
        return Ok(ActionOutcome::Deleted);
    };

    let selected = tree.has_class(figure, SELECTED_CLASS);
    tree.set_classes(figure, &next.edit_classes(selected));
    log::debug!("figure {figure}: {current:?} -> {next:?}");
    Ok(ActionOutcome::Updated(next))
}
