use serde::{Deserialize, Serialize};

use crate::kinds::FIGURE_CLASS;

/// Highlight class on the figure whose toolbar is open.
pub const SELECTED_CLASS: &str = "mosh-figure-selected";

/// Horizontal placement. `None` is inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigurePosition {
    #[default]
    None,
    Left,
    Right,
}

impl FigurePosition {
    pub const ALL: [FigurePosition; 3] = [
        FigurePosition::None,
        FigurePosition::Left,
        FigurePosition::Right,
    ];

    /// Toolbar value; `inline` for [`FigurePosition::None`].
    pub fn value(self) -> &'static str {
        match self {
            FigurePosition::None => "inline",
            FigurePosition::Left => "left",
            FigurePosition::Right => "right",
        }
    }

    /// Class emitted by the fragment renderer.
    pub fn render_class(self) -> Option<&'static str> {
        match self {
            FigurePosition::None => None,
            FigurePosition::Left => Some("left"),
            FigurePosition::Right => Some("right"),
        }
    }

    /// Class written by toolbar edits.
    pub fn edit_class(self) -> Option<&'static str> {
        match self {
            FigurePosition::None => None,
            FigurePosition::Left => Some("float-left"),
            FigurePosition::Right => Some("float-right"),
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "inline" | "none" | "" => Some(FigurePosition::None),
            "left" => Some(FigurePosition::Left),
            "right" => Some(FigurePosition::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FigureSize {
    pub const ALL: [FigureSize; 3] = [FigureSize::Small, FigureSize::Medium, FigureSize::Large];

    pub fn value(self) -> &'static str {
        match self {
            FigureSize::Small => "small",
            FigureSize::Medium => "medium",
            FigureSize::Large => "large",
        }
    }

    pub fn render_class(self) -> &'static str {
        self.value()
    }

    pub fn edit_class(self) -> &'static str {
        match self {
            FigureSize::Small => "size-small",
            FigureSize::Medium => "size-medium",
            FigureSize::Large => "size-large",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.value() == value)
    }
}

/// Frame treatment. `None` is the plain default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureStyle {
    #[default]
    None,
    Polaroid,
    Screen,
}

impl FigureStyle {
    pub const ALL: [FigureStyle; 3] = [
        FigureStyle::None,
        FigureStyle::Polaroid,
        FigureStyle::Screen,
    ];

    /// Toolbar value; `default` for [`FigureStyle::None`].
    pub fn value(self) -> &'static str {
        match self {
            FigureStyle::None => "default",
            FigureStyle::Polaroid => "polaroid",
            FigureStyle::Screen => "screen",
        }
    }

    pub fn render_class(self) -> Option<&'static str> {
        match self {
            FigureStyle::None => None,
            FigureStyle::Polaroid => Some("polaroid"),
            FigureStyle::Screen => Some("screen"),
        }
    }

    pub fn edit_class(self) -> Option<&'static str> {
        match self {
            FigureStyle::None => None,
            FigureStyle::Polaroid => Some("style-polaroid"),
            FigureStyle::Screen => Some("style-screen"),
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "default" | "none" | "" => Some(FigureStyle::None),
            "polaroid" => Some(FigureStyle::Polaroid),
            "screen" => Some(FigureStyle::Screen),
            _ => None,
        }
    }
}

/// The three independent figure attributes.
///
/// Every combination is valid and none is terminal; deleting a figure is a
/// tree operation, not a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FigureState {
    pub position: FigurePosition,
    pub size: FigureSize,
    pub style: FigureStyle,
}

impl FigureState {
    pub fn new(position: FigurePosition, size: FigureSize, style: FigureStyle) -> Self {
        Self { position, size, style }
    }

    /// All 27 states.
    pub fn all() -> Vec<FigureState> {
        let mut out = Vec::with_capacity(27);
        for position in FigurePosition::ALL {
            for size in FigureSize::ALL {
                for style in FigureStyle::ALL {
                    out.push(FigureState::new(position, size, style));
                }
            }
        }
        out
    }

    /// Read the state off a class list.
    ///
    /// Both the toolbar classes (`float-left`, `size-small`, `style-screen`)
    /// and the rendered ones (`left`, `small`, `screen`) count. Where a list
    /// names more than one value for an attribute, the earlier value in
    /// declaration order wins. Attributes with no class read as the default.
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: Vec<&str> = classes.into_iter().collect();
        let has = |a: Option<&str>, b: Option<&str>| {
            classes
                .iter()
                .any(|c| Some(*c) == a || Some(*c) == b)
        };

        let position = FigurePosition::ALL
            .into_iter()
            .filter(|p| *p != FigurePosition::None)
            .find(|p| has(p.edit_class(), p.render_class()))
            .unwrap_or_default();
        let size = FigureSize::ALL
            .into_iter()
            .find(|s| has(Some(s.edit_class()), Some(s.render_class())))
            .unwrap_or_default();
        let style = FigureStyle::ALL
            .into_iter()
            .filter(|s| *s != FigureStyle::None)
            .find(|s| has(s.edit_class(), s.render_class()))
            .unwrap_or_default();

        Self { position, size, style }
    }

    /// Canonical class list written by toolbar edits:
    /// `mosh-figure [float-*] size-* [style-*] [mosh-figure-selected]`.
    pub fn edit_classes(self, selected: bool) -> Vec<&'static str> {
        let mut out = vec![FIGURE_CLASS];
        out.extend(self.position.edit_class());
        out.push(self.size.edit_class());
        out.extend(self.style.edit_class());
        if selected {
            out.push(SELECTED_CLASS);
        }
        out
    }

    /// Class list emitted by the fragment renderer:
    /// `mosh-figure [left|right] size [polaroid|screen]`.
    pub fn render_classes(self) -> Vec<&'static str> {
        let mut out = vec![FIGURE_CLASS];
        out.extend(self.position.render_class());
        out.push(self.size.render_class());
        out.extend(self.style.render_class());
        out
    }
}
