//! Formatting core for Mothership journal pages.
//!
//! - [`render`]: block data to markup and back
//! - [`blocks`]: selection expansion and block wrapping
//! - [`figure`]: figure position/size/style state and its toolbar
//! - [`maintenance`]: the periodic editor-menu button check
//!
//! All state lives in markup. Nothing here keeps a model of a page between
//! calls; every operation reads classes off the tree it is given.

pub mod blocks;
pub mod error;
pub mod figure;
pub mod kinds;
pub mod maintenance;
pub mod notify;
pub mod render;
pub mod strings;
pub mod surface;

pub use blocks::{
    BLOCK_TAGS, Block, ElementSpan, Expansion, WrapOptions, WrapTarget, apply_block_style,
    enclosing_block, expand_to_block_span, unwrap, unwrap_in_place, wrap,
};
pub use error::{BlockError, FigureError};
pub use figure::{
    ActionOutcome, FigureAction, FigureDetails, FigurePosition, FigureSize, FigureState,
    FigureStyle, FigureToolbar, SELECTED_CLASS, ToolbarButton, ToolbarSlot, apply_action, classify,
    read_figure, update_figure,
};
pub use kinds::{BLOCK_CLASS, BlockKind, FIGURE_CLASS, Modifier, identify_block};
pub use maintenance::{DEFAULT_INTERVAL, MaintenanceOutcome, maintain_toolbar_buttons};
pub use notify::{LogNotifier, NoticeLevel, Notifier, RecordingNotifier};
pub use render::{
    FigureOptions, FragmentRenderer, LinkStyle, NavigationExit, ParsedBlock, RenderOptions,
    Rendered, block_title, content_nodes,
};
pub use strings::Strings;
pub use surface::{EditorSurface, SelectionProvider};
