use mosh_journal_markup::{MutableTree, NodeId};

use super::action::classify;
use super::state::{FigureState, SELECTED_CLASS};
use crate::error::FigureError;
use crate::kinds::FIGURE_CLASS;

/// Everything the figure dialog edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FigureDetails {
    pub image_ref: String,
    pub caption: Option<String>,
    pub state: FigureState,
}

/// Read an existing figure element.
pub fn read_figure<T: MutableTree>(tree: &T, figure: NodeId) -> Result<FigureDetails, FigureError> {
    if !tree.has_class(figure, FIGURE_CLASS) {
        return Err(FigureError::NotAFigure(figure));
    }

    let image_ref = tree
        .find_descendant(figure, |t, n| t.tag_name(n) == Some("img"))
        .and_then(|img| tree.attr(img, "src"))
        .unwrap_or_default()
        .to_string();
    let caption = tree
        .find_descendant(figure, |t, n| t.tag_name(n) == Some("figcaption"))
        .map(|c| tree.text_content(c))
        .filter(|c| !c.trim().is_empty());

    Ok(FigureDetails {
        image_ref,
        caption,
        state: classify(tree, figure),
    })
}

/// Rewrite a figure in place from dialog settings.
///
/// Classes are rewritten canonically, the image source and alt text are
/// replaced, and the caption is created, updated or removed to match.
pub fn update_figure<T: MutableTree>(
    tree: &mut T,
    figure: NodeId,
    details: &FigureDetails,
) -> Result<(), FigureError> {
    if !tree.has_class(figure, FIGURE_CLASS) {
        return Err(FigureError::NotAFigure(figure));
    }

    let selected = tree.has_class(figure, SELECTED_CLASS);
    tree.set_classes(figure, &details.state.edit_classes(selected));

    let caption = details.caption.as_deref().filter(|c| !c.is_empty());

    if let Some(img) = tree.find_descendant(figure, |t, n| t.tag_name(n) == Some("img")) {
        tree.set_attr(img, "src", &details.image_ref);
        tree.set_attr(img, "alt", caption.unwrap_or_default());
    }

    let existing = tree.find_descendant(figure, |t, n| t.tag_name(n) == Some("figcaption"));
    match (caption, existing) {
        (Some(text), Some(figcaption)) => {
            for child in tree.children(figcaption).to_vec() {
                tree.detach(child);
            }
            let text = tree.create_text(text);
            tree.append_child(figcaption, text)?;
        }
        (Some(text), None) => {
            let figcaption = tree.create_element("figcaption", &[]);
            let text = tree.create_text(text);
            tree.append_child(figcaption, text)?;
            tree.append_child(figure, figcaption)?;
        }
        (None, Some(figcaption)) => tree.detach(figcaption),
        (None, None) => {}
    }

    log::info!("updated figure {figure}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{FigurePosition, FigureSize, FigureStyle};
    use mosh_journal_markup::Tree;
    use pretty_assertions::assert_eq;

    const FIGURE: &str = r#"<figure class="mosh-figure left small polaroid"><img src="ruins.png" alt="Ruins" loading="lazy"><figcaption>Ruins</figcaption></figure>"#;

    fn parsed() -> (Tree, NodeId) {
        let tree = Tree::parse(FIGURE);
        let fig = tree.children(tree.root())[0];
        (tree, fig)
    }

    #[test]
    fn read_existing_figure() {
        let (tree, fig) = parsed();
        assert_eq!(
            read_figure(&tree, fig).unwrap(),
            FigureDetails {
                image_ref: "ruins.png".to_string(),
                caption: Some("Ruins".to_string()),
                state: FigureState::new(
                    FigurePosition::Left,
                    FigureSize::Small,
                    FigureStyle::Polaroid,
                ),
            }
        );
    }

    #[test]
    fn update_rewrites_image_and_caption() {
        let (mut tree, fig) = parsed();
        let details = FigureDetails {
            image_ref: "derelict.webp".to_string(),
            caption: Some("The Derelict".to_string()),
            state: FigureState::new(FigurePosition::Right, FigureSize::Large, FigureStyle::None),
        };
        update_figure(&mut tree, fig, &details).unwrap();
        assert_eq!(
            tree.to_html(),
            r#"<figure class="mosh-figure float-right size-large"><img src="derelict.webp" alt="The Derelict" loading="lazy"><figcaption>The Derelict</figcaption></figure>"#
        );
        assert_eq!(read_figure(&tree, fig).unwrap(), details);
    }

    #[test]
    fn empty_caption_removes_figcaption() {
        let (mut tree, fig) = parsed();
        let mut details = read_figure(&tree, fig).unwrap();
        details.caption = Some(String::new());
        update_figure(&mut tree, fig, &details).unwrap();
        assert_eq!(
            tree.to_html(),
            r#"<figure class="mosh-figure float-left size-small style-polaroid"><img src="ruins.png" alt="" loading="lazy"></figure>"#
        );
    }

    #[test]
    fn caption_is_added_when_missing() {
        let mut tree = Tree::parse(r#"<figure class="mosh-figure"><img src="a.png"></figure>"#);
        let fig = tree.children(tree.root())[0];
        let details = FigureDetails {
            image_ref: "a.png".to_string(),
            caption: Some("New".to_string()),
            state: FigureState::default(),
        };
        update_figure(&mut tree, fig, &details).unwrap();
        assert_eq!(
            tree.to_html(),
            r#"<figure class="mosh-figure size-medium"><img src="a.png" alt="New"><figcaption>New</figcaption></figure>"#
        );
    }
}
