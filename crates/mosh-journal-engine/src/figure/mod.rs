//! # Figure State Machine
//!
//! A figure is a floating image with three independent attributes:
//!
//! ```text
//! position  none | left  | right
//! size      small | medium | large
//! style     none | polaroid | screen
//! ```
//!
//! All 27 combinations are valid. The state is never stored anywhere but the
//! figure's class list, so every operation reads it back with [`classify`]
//! before changing it. Toolbar actions replace exactly one attribute; delete
//! removes the figure.
//!
//! Two class vocabularies exist for historical reasons. The fragment
//! renderer writes bare classes (`left small polaroid`), the toolbar writes
//! prefixed ones (`float-left size-small style-polaroid`). Both read back
//! to the same state; toolbar edits normalize to the prefixed form.

mod action;
mod edit;
mod state;
mod toolbar;

pub use action::{ActionOutcome, FigureAction, apply_action, classify};
pub use edit::{FigureDetails, read_figure, update_figure};
pub use state::{FigurePosition, FigureSize, FigureState, FigureStyle, SELECTED_CLASS};
pub use toolbar::{FigureToolbar, ToolbarButton, ToolbarSlot};
