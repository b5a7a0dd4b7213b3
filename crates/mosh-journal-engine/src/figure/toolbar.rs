//! The floating figure toolbar.
//!
//! At most one figure has an open toolbar. [`ToolbarSlot`] owns that fact:
//! activation goes through it, actions are routed through it, and the
//! maintenance tick asks it whether to stay out of the way.

use mosh_journal_markup::{MutableTree, NodeId};

use super::action::{ActionOutcome, FigureAction, apply_action, classify};
use super::state::{FigureState, SELECTED_CLASS};
use crate::error::FigureError;
use crate::kinds::FIGURE_CLASS;
use crate::notify::Notifier;
use crate::strings::Strings;

/// One toolbar button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub action: FigureAction,
    pub active: bool,
}

impl ToolbarButton {
    /// Localization key for the button tooltip.
    pub fn title_key(&self) -> &'static str {
        match self.action.value() {
            Some("left") => "MOSH.Figure.Left",
            Some("inline") => "MOSH.Figure.Inline",
            Some("right") => "MOSH.Figure.Right",
            Some("small") => "MOSH.Figure.Small",
            Some("medium") => "MOSH.Figure.Medium",
            Some("large") => "MOSH.Figure.Large",
            Some("default") => "MOSH.Figure.Default",
            Some("polaroid") => "MOSH.Figure.Polaroid",
            Some("screen") => "MOSH.Figure.Screen",
            _ => "MOSH.Figure.Delete",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.action.value() {
            Some("left") => "fa-align-left",
            Some("inline") => "fa-align-center",
            Some("right") => "fa-align-right",
            Some("small") => "fa-compress-alt",
            Some("medium") => "fa-expand-alt",
            Some("large") => "fa-arrows-alt",
            Some("default") => "fa-square",
            Some("polaroid") => "fa-camera",
            Some("screen") => "fa-tv",
            _ => "fa-trash",
        }
    }
}

/// Button set for the active figure, with active flags mirroring its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureToolbar {
    pub figure: NodeId,
    buttons: Vec<ToolbarButton>,
}

impl FigureToolbar {
    pub fn new(figure: NodeId, state: FigureState) -> Self {
        let buttons = FigureAction::ALL
            .into_iter()
            .map(|action| ToolbarButton {
                action,
                active: action.matches(state),
            })
            .collect();
        Self { figure, buttons }
    }

    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    pub fn refresh(&mut self, state: FigureState) {
        for button in &mut self.buttons {
            button.active = button.action.matches(state);
        }
    }

    /// Actions whose buttons are currently highlighted.
    pub fn active_actions(&self) -> Vec<FigureAction> {
        self.buttons
            .iter()
            .filter(|b| b.active)
            .map(|b| b.action)
            .collect()
    }

    /// Toolbar markup for hosts that inject it as HTML.
    pub fn render_html(&self, strings: &Strings) -> String {
        let mut html = String::from(r#"<div class="mosh-figure-toolbar">"#);
        let sections = [
            ("position", Some("MOSH.Figure.Position")),
            ("size", Some("MOSH.Figure.Size")),
            ("style", Some("MOSH.Figure.Style")),
            ("delete", None),
        ];

        for (i, (name, label)) in sections.into_iter().enumerate() {
            let buttons = self.buttons.iter().filter(|b| b.action.name() == name);
            if i > 0 {
                html.push_str(r#"<div class="mosh-figure-toolbar-separator"></div>"#);
            }
            html.push_str(r#"<div class="mosh-figure-toolbar-section">"#);
            if let Some(key) = label {
                html.push_str(&format!(
                    r#"<span class="toolbar-label">{}:</span>"#,
                    html_escape::encode_text(strings.get(key))
                ));
            }
            for button in buttons {
                html.push_str(&render_button(button, strings));
            }
            html.push_str("</div>");
        }

        html.push_str("</div>");
        html
    }
}

fn render_button(button: &ToolbarButton, strings: &Strings) -> String {
    let mut class = String::from("toolbar-btn");
    if button.action == FigureAction::Delete {
        class.push_str(" toolbar-btn-danger");
    }
    if button.active {
        class.push_str(" active");
    }
    let value = button
        .action
        .value()
        .map(|v| format!(r#" data-value="{v}""#))
        .unwrap_or_default();
    format!(
        r#"<button type="button" class="{class}" data-action="{}"{value} title="{}"><i class="fas {}"></i></button>"#,
        button.action.name(),
        html_escape::encode_double_quoted_attribute(strings.get(button.title_key())),
        button.icon(),
    )
}

/// Single-slot ownership of the active figure toolbar.
#[derive(Debug, Default)]
pub struct ToolbarSlot {
    active: Option<FigureToolbar>,
}

impl ToolbarSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_figure(&self) -> Option<NodeId> {
        self.active.as_ref().map(|t| t.figure)
    }

    pub fn toolbar(&self) -> Option<&FigureToolbar> {
        self.active.as_ref()
    }

    /// Open the toolbar for `figure`.
    ///
    /// Any other figure's toolbar is closed first and its highlight removed.
    /// Activating the figure that is already active changes nothing.
    pub fn activate<T: MutableTree>(
        &mut self,
        tree: &mut T,
        figure: NodeId,
    ) -> Result<&FigureToolbar, FigureError> {
        if !tree.has_class(figure, FIGURE_CLASS) {
            return Err(FigureError::NotAFigure(figure));
        }

        if self.active_figure() != Some(figure) {
            self.deactivate(tree);
            tree.add_class(figure, SELECTED_CLASS);
            self.active = Some(FigureToolbar::new(figure, classify(tree, figure)));
            log::debug!("figure toolbar opened for {figure}");
        }

        self.active.as_ref().ok_or(FigureError::NoActiveFigure)
    }

    /// Close the toolbar, if open, and remove the figure's highlight.
    pub fn deactivate<T: MutableTree>(&mut self, tree: &mut T) {
        if let Some(toolbar) = self.active.take() {
            tree.remove_class(toolbar.figure, SELECTED_CLASS);
            log::debug!("figure toolbar closed for {}", toolbar.figure);
        }
    }

    /// Apply `action` to the active figure and refresh the buttons.
    ///
    /// Deleting the figure closes the toolbar.
    pub fn apply<T: MutableTree>(
        &mut self,
        tree: &mut T,
        action: FigureAction,
        strings: &Strings,
        notifier: &mut dyn Notifier,
    ) -> Result<ActionOutcome, FigureError> {
        let toolbar = self.active.as_mut().ok_or(FigureError::NoActiveFigure)?;
        let outcome = apply_action(tree, toolbar.figure, action)?;
        match outcome {
            ActionOutcome::Updated(state) => toolbar.refresh(state),
            ActionOutcome::Deleted => {
                self.active = None;
                notifier.info(strings.get("MOSH.Figure.Deleted"));
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{FigurePosition, FigureSize, FigureStyle};
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use insta::assert_snapshot;
    use mosh_journal_markup::Tree;
    use pretty_assertions::assert_eq;

    fn two_figures() -> (Tree, NodeId, NodeId) {
        let tree = Tree::parse(
            r#"<figure class="mosh-figure left small"><img src="a.png"></figure><figure class="mosh-figure float-right size-large"><img src="b.png"></figure>"#,
        );
        let root = tree.root();
        let a = tree.children(root)[0];
        let b = tree.children(root)[1];
        (tree, a, b)
    }

    #[test]
    fn activating_another_figure_closes_the_first() {
        let (mut tree, a, b) = two_figures();
        let mut slot = ToolbarSlot::new();

        slot.activate(&mut tree, a).unwrap();
        assert!(tree.has_class(a, SELECTED_CLASS));

        slot.activate(&mut tree, b).unwrap();
        assert!(!tree.has_class(a, SELECTED_CLASS));
        assert!(tree.has_class(b, SELECTED_CLASS));
        assert_eq!(slot.active_figure(), Some(b));

        let highlighted = [a, b].iter().filter(|&&f| tree.has_class(f, SELECTED_CLASS)).count();
        assert_eq!(highlighted, 1);
    }

    #[test]
    fn buttons_render_in_their_own_sections() {
        let (tree, a, _) = two_figures();
        let mut toolbar = FigureToolbar::new(a, classify(&tree, a));
        toolbar.buttons.retain(|b| b.action.name() != "size");
        assert_eq!(toolbar.buttons().len(), FigureAction::ALL.len() - 3);

        let html = toolbar.render_html(&Strings::new());
        assert!(!html.contains(r#"data-action="size""#));
        assert_eq!(html.matches(r#"data-action="position""#).count(), 3);
        assert_eq!(html.matches(r#"data-action="delete""#).count(), 1);
        assert_eq!(html.matches("mosh-figure-toolbar-section").count(), 4);
    }

    #[test]
    fn reactivating_same_figure_is_a_no_op() {
        let (mut tree, a, _) = two_figures();
        let mut slot = ToolbarSlot::new();
        slot.activate(&mut tree, a).unwrap();
        let before = tree.to_html();
        slot.activate(&mut tree, a).unwrap();
        assert_eq!(tree.to_html(), before);
    }

    #[test]
    fn buttons_mirror_state() {
        let (mut tree, _, b) = two_figures();
        let mut slot = ToolbarSlot::new();
        let toolbar = slot.activate(&mut tree, b).unwrap();
        assert_eq!(
            toolbar.active_actions(),
            vec![
                FigureAction::Position(FigurePosition::Right),
                FigureAction::Size(FigureSize::Large),
                FigureAction::Style(FigureStyle::None),
            ]
        );
    }

    #[test]
    fn apply_refreshes_buttons_and_keeps_highlight() {
        let (mut tree, a, _) = two_figures();
        let mut slot = ToolbarSlot::new();
        let mut notifier = RecordingNotifier::new();
        slot.activate(&mut tree, a).unwrap();

        slot.apply(
            &mut tree,
            FigureAction::Style(FigureStyle::Polaroid),
            &Strings::new(),
            &mut notifier,
        )
        .unwrap();

        assert_eq!(
            tree.classes(a),
            vec![
                "mosh-figure",
                "float-left",
                "size-small",
                "style-polaroid",
                "mosh-figure-selected",
            ]
        );
        let toolbar = slot.toolbar().unwrap();
        assert!(toolbar.active_actions().contains(&FigureAction::Style(FigureStyle::Polaroid)));
        assert!(notifier.notices.is_empty());
    }

    #[test]
    fn delete_closes_the_toolbar() {
        let (mut tree, a, _) = two_figures();
        let mut slot = ToolbarSlot::new();
        let mut notifier = RecordingNotifier::new();
        slot.activate(&mut tree, a).unwrap();

        let outcome = slot
            .apply(&mut tree, FigureAction::Delete, &Strings::new(), &mut notifier)
            .unwrap();
        assert_eq!(outcome, ActionOutcome::Deleted);
        assert!(!slot.is_active());
        assert_eq!(notifier.last(), Some(&(NoticeLevel::Info, "Image deleted".to_string())));
        assert_eq!(
            slot.apply(&mut tree, FigureAction::Delete, &Strings::new(), &mut notifier),
            Err(FigureError::NoActiveFigure)
        );
    }

    #[test]
    fn toolbar_markup() {
        let (_, a, _) = two_figures();
        let toolbar = FigureToolbar::new(a, FigureState::default());
        let html = toolbar.render_html(&Strings::new());
        assert_eq!(html.matches("<button").count(), 10);
        assert_eq!(html.matches(" active\"").count(), 3);
        let delete = html.split("<button").last().unwrap_or_default();
        assert_snapshot!(delete, @r#" type="button" class="toolbar-btn toolbar-btn-danger" data-action="delete" title="Delete"><i class="fas fa-trash"></i></button></div></div>"#);
    }
}
