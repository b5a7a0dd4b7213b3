use mosh_journal_engine::{
    ActionOutcome, FigureAction, FigureError, FigurePosition, FigureSize, FigureState,
    FigureStyle, NoticeLevel, RecordingNotifier, SELECTED_CLASS, Strings, ToolbarSlot,
    apply_action, classify,
};
use mosh_journal_markup::{MutableTree, NodeId, Tree};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn figure_with(classes: &[&str]) -> (Tree, NodeId) {
    let tree = Tree::parse(&format!(
        r#"<p>before</p><figure class="{}"><img src="a.png"></figure>"#,
        classes.join(" ")
    ));
    let figure = tree.children(tree.root())[1];
    (tree, figure)
}

fn attribute_actions() -> impl Iterator<Item = FigureAction> {
    FigureAction::ALL.into_iter().filter(|a| *a != FigureAction::Delete)
}

#[rstest]
fn every_state_and_action_stays_in_domain(#[values(false, true)] rendered_classes: bool) {
    for start in FigureState::all() {
        for action in attribute_actions() {
            let classes = if rendered_classes {
                start.render_classes()
            } else {
                start.edit_classes(false)
            };
            let (mut tree, figure) = figure_with(&classes);
            assert_eq!(classify(&tree, figure), start);

            let outcome = apply_action(&mut tree, figure, action).unwrap();
            let expected = start.transition(action).unwrap();
            assert_eq!(outcome, ActionOutcome::Updated(expected));
            assert_eq!(classify(&tree, figure), expected);
            assert!(FigureState::all().contains(&classify(&tree, figure)));
        }
    }
}

#[test]
fn setting_size_keeps_position_and_style() {
    for start in FigureState::all() {
        let (mut tree, figure) = figure_with(&start.edit_classes(false));
        apply_action(&mut tree, figure, FigureAction::parse("size", "large").unwrap()).unwrap();
        assert_eq!(
            classify(&tree, figure),
            FigureState::new(start.position, FigureSize::Large, start.style)
        );
    }
}

#[test]
fn repeating_an_action_changes_nothing() {
    for start in FigureState::all() {
        for action in attribute_actions() {
            let (mut tree, figure) = figure_with(&start.edit_classes(false));
            apply_action(&mut tree, figure, action).unwrap();
            let once = tree.to_html();
            apply_action(&mut tree, figure, action).unwrap();
            assert_eq!(tree.to_html(), once);
        }
    }
}

#[test]
fn style_change_scenario() {
    let (mut tree, figure) = figure_with(&["mosh-figure", "float-right", "size-large"]);
    apply_action(&mut tree, figure, FigureAction::parse("style", "screen").unwrap()).unwrap();

    let classes = tree.classes(figure);
    for expected in ["float-right", "size-large", "style-screen"] {
        assert!(classes.contains(&expected), "{classes:?} lacks {expected}");
    }
    assert_eq!(
        classify(&tree, figure),
        FigureState::new(FigurePosition::Right, FigureSize::Large, FigureStyle::Screen)
    );
}

#[rstest]
#[case("rotate", "left", FigureError::UnknownAction("rotate".to_string()))]
#[case(
    "size",
    "huge",
    FigureError::UnknownValue {
        action: "size".to_string(),
        value: "huge".to_string(),
    }
)]
fn unknown_toolbar_strings_are_rejected(
    #[case] action: &str,
    #[case] value: &str,
    #[case] expected: FigureError,
) {
    assert_eq!(FigureAction::parse(action, value), Err(expected));
}

#[test]
fn toolbar_session_across_two_figures() {
    let mut tree = Tree::parse(
        r#"<figure class="mosh-figure"><img src="a.png"></figure><figure class="mosh-figure left"><img src="b.png"></figure>"#,
    );
    let root = tree.root();
    let (a, b) = (tree.children(root)[0], tree.children(root)[1]);
    let strings = Strings::new();
    let mut notifier = RecordingNotifier::new();
    let mut slot = ToolbarSlot::new();

    slot.activate(&mut tree, a).unwrap();
    slot.apply(&mut tree, FigureAction::Size(FigureSize::Small), &strings, &mut notifier)
        .unwrap();

    slot.activate(&mut tree, b).unwrap();
    assert!(!tree.has_class(a, SELECTED_CLASS));
    assert!(tree.has_class(b, SELECTED_CLASS));
    assert_eq!(slot.active_figure(), Some(b));

    assert_eq!(
        slot.apply(&mut tree, FigureAction::Delete, &strings, &mut notifier),
        Ok(ActionOutcome::Deleted)
    );
    assert!(!slot.is_active());
    assert_eq!(tree.children(root), &[a]);
    assert_eq!(
        notifier.last(),
        Some(&(NoticeLevel::Info, "Image deleted".to_string()))
    );
    assert_eq!(
        tree.to_html(),
        r#"<figure class="mosh-figure size-small"><img src="a.png"></figure>"#
    );

    assert_eq!(
        slot.apply(&mut tree, FigureAction::Delete, &strings, &mut notifier),
        Err(FigureError::NoActiveFigure)
    );
}
