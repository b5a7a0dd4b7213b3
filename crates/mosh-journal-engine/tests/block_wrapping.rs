use mosh_journal_engine::{
    BlockError, BlockKind, EditorSurface, Expansion, NoticeLevel, RecordingNotifier,
    SelectionProvider, Strings, WrapOptions, apply_block_style, expand_to_block_span, wrap,
};
use mosh_journal_markup::{Boundary, MutableTree, Node, NodeData, NodeId, Range, Tree, TreeError};
use pretty_assertions::assert_eq;

fn apply(
    surface: &mut EditorSurface,
    kind: BlockKind,
) -> (Result<NodeId, BlockError>, RecordingNotifier) {
    let mut notifier = RecordingNotifier::new();
    let result = apply_block_style(
        surface,
        kind,
        &WrapOptions::default(),
        &Strings::new(),
        &mut notifier,
    );
    (result.map(|b| b.node), notifier)
}

#[test]
fn selection_inside_list_item_widens_to_list() {
    let surface = EditorSurface::with_markers(
        "<p>x</p><ul><li>one</li><li>t{{w}}o</li><li>three</li></ul><p>y</p>",
    );
    let list = surface.tree().children(surface.root())[1];

    match expand_to_block_span(surface.tree(), &surface.selection().unwrap(), surface.root()) {
        Expansion::Span(span) => {
            assert_eq!((span.first, span.last), (list, list));
            assert_eq!(span.nodes(surface.tree()).unwrap(), vec![list]);
        }
        Expansion::Unchanged => panic!("list item should expand"),
    }
}

#[test]
fn wrapped_list_is_selected_afterwards() {
    let mut surface = EditorSurface::with_markers(
        "<p>x</p><ul><li>one</li><li>t{{w}}o</li><li>three</li></ul><p>y</p>",
    );
    let (result, notifier) = apply(&mut surface, BlockKind::Info);

    assert!(result.is_ok());
    assert_eq!(
        surface.to_marked_html(),
        r#"<p>x</p>{{<div class="mosh-block info"><ul><li>one</li><li>two</li><li>three</li></ul></div>}}<p>y</p>"#
    );
    assert_eq!(
        notifier.last(),
        Some(&(NoticeLevel::Info, "Info inserted".to_string()))
    );
}

#[test]
fn partial_paragraphs_are_wrapped_whole() {
    let mut surface =
        EditorSurface::with_markers("<h2>Deck B</h2><p>Ligh{{ts flicker.</p><p>Blo}}od</p>");
    apply(&mut surface, BlockKind::Narrative).0.unwrap();
    assert_eq!(
        surface.to_html(),
        r#"<h2>Deck B</h2><div class="mosh-block narrative"><p>Lights flicker.</p><p>Blood</p></div>"#
    );
}

#[test]
fn caret_wraps_its_paragraph() {
    let mut surface = EditorSurface::with_markers("<p>one</p><p>tw{{o</p>");
    apply(&mut surface, BlockKind::Warden).0.unwrap();
    assert_eq!(
        surface.to_html(),
        r#"<p>one</p><div class="mosh-block warden"><p>two</p></div>"#
    );
}

#[test]
fn loose_text_is_wrapped_as_selected() {
    let mut surface = EditorSurface::with_markers("intro {{text}} here<p>x</p>");
    apply(&mut surface, BlockKind::Quote).0.unwrap();
    assert_eq!(
        surface.to_html(),
        r#"intro <div class="mosh-block quote">text</div> here<p>x</p>"#
    );
}

#[test]
fn blank_selection_gets_placeholder_paragraph() {
    let mut surface = EditorSurface::with_markers("<p>x</p>{{ }}<p>y</p>");
    let block = apply(&mut surface, BlockKind::Narrative).0.unwrap();

    assert_eq!(
        surface.to_html(),
        r#"<p>x</p><div class="mosh-block narrative"><p>Enter text here...</p></div><p>y</p>"#
    );
    let tree = surface.tree();
    assert_eq!(tree.children(block).len(), 1);
    assert_eq!(tree.tag_name(tree.children(block)[0]), Some("p"));
}

#[test]
fn empty_range_wraps_placeholder() {
    let mut tree = Tree::parse("<p>x</p><p>y</p>");
    let root = tree.root();
    let at = Boundary::new(root, 1);
    let mut strings = Strings::new();
    strings.set("MOSH.Blocks.Placeholder", "...");

    wrap(
        &mut tree,
        Range::new(at, at),
        BlockKind::Handout,
        &WrapOptions::default(),
        &strings,
    )
    .unwrap();
    assert_eq!(
        tree.to_html(),
        r#"<p>x</p><div class="mosh-block handout"><p>...</p></div><p>y</p>"#
    );
}

#[test]
fn missing_selection_warns_and_changes_nothing() {
    let mut surface = EditorSurface::parse("<p>x</p>");
    let (result, notifier) = apply(&mut surface, BlockKind::Quote);

    assert_eq!(result, Err(BlockError::NoSelection));
    assert_eq!(surface.to_html(), "<p>x</p>");
    assert_eq!(
        notifier.last(),
        Some(&(NoticeLevel::Warn, "Select some text first".to_string()))
    );
}

#[test]
fn caret_outside_any_block_is_no_selection() {
    let mut surface = EditorSurface::with_markers("loose{{ text");
    let (result, _) = apply(&mut surface, BlockKind::Quote);
    assert_eq!(result, Err(BlockError::NoSelection));
    assert_eq!(surface.to_html(), "loose text");
}

/// A tree whose next insert into one chosen parent fails, or whose `n`th
/// insert overall fails.
struct FailingTree {
    inner: Tree,
    fail_into: Option<NodeId>,
    inserts_before_failure: Option<usize>,
}

impl MutableTree for FailingTree {
    fn root(&self) -> NodeId {
        self.inner.root()
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.inner.get(id)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.inner.data_mut(id)
    }

    fn create(&mut self, data: NodeData) -> NodeId {
        self.inner.create(data)
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        if self.fail_into == Some(parent) {
            self.fail_into = None;
            return Err(TreeError::NotAContainer(parent));
        }
        match self.inserts_before_failure {
            Some(0) => {
                self.inserts_before_failure = None;
                Err(TreeError::NotAContainer(parent))
            }
            Some(n) => {
                self.inserts_before_failure = Some(n - 1);
                self.inner.insert_child(parent, index, child)
            }
            None => self.inner.insert_child(parent, index, child),
        }
    }

    fn detach(&mut self, id: NodeId) {
        self.inner.detach(id);
    }
}

struct FailingSurface {
    tree: FailingTree,
    selection: Option<Range>,
}

impl FailingSurface {
    fn with_markers(html: &str) -> Self {
        let surface = EditorSurface::with_markers(html);
        let inner = surface.tree().clone();
        let root = inner.root();
        Self {
            tree: FailingTree {
                inner,
                fail_into: Some(root),
                inserts_before_failure: None,
            },
            selection: surface.selection(),
        }
    }
}

impl SelectionProvider for FailingSurface {
    type Tree = FailingTree;

    fn tree(&self) -> &FailingTree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut FailingTree {
        &mut self.tree
    }

    fn root(&self) -> NodeId {
        self.tree.root()
    }

    fn selection(&self) -> Option<Range> {
        self.selection
    }

    fn select_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.selection = Some(Range::select_node(&self.tree, node)?);
        Ok(())
    }
}

#[test]
fn failed_insert_restores_document() {
    let mut surface = FailingSurface::with_markers("<p>a{{b</p><p>c}}d</p><p>e</p>");
    let before = surface.tree.inner.to_html();
    let selection = surface.selection;

    let mut notifier = RecordingNotifier::new();
    let result = apply_block_style(
        &mut surface,
        BlockKind::Terminal,
        &WrapOptions::default(),
        &Strings::new(),
        &mut notifier,
    );

    let root = surface.tree.root();
    assert_eq!(
        result,
        Err(BlockError::Insertion(TreeError::NotAContainer(root)))
    );
    assert_eq!(surface.tree.inner.to_html(), before);
    assert_eq!(surface.selection, selection);
    let (level, message) = notifier.last().unwrap();
    assert_eq!(*level, NoticeLevel::Error);
    assert!(message.starts_with("Insert failed: "));
}

#[test]
fn failed_text_split_leaves_text_intact() {
    let inner = Tree::parse("loose text here<p>x</p>");
    let root = inner.root();
    let mut tree = FailingTree {
        inner,
        fail_into: Some(root),
        inserts_before_failure: None,
    };
    let text = tree.children(root)[0];
    let range = Range::new(Boundary::new(text, 6), Boundary::new(text, 10));

    let result = wrap(&mut tree, range, BlockKind::Quote, &WrapOptions::default(), &Strings::new());
    assert!(matches!(result, Err(BlockError::InvalidSpan(_))));
    assert_eq!(tree.inner.to_html(), "loose text here<p>x</p>");
}

#[test]
fn refused_insert_at_any_step_keeps_every_paragraph() {
    let surface = EditorSurface::with_markers("<p>a{{b</p><p>MIDDLE</p><p>d}}e</p>");
    let range = surface.selection().unwrap();
    let before = surface.to_html();

    let mut refused = 0;
    for n in 0..64 {
        let mut tree = FailingTree {
            inner: surface.tree().clone(),
            fail_into: None,
            inserts_before_failure: Some(n),
        };
        match wrap(&mut tree, range, BlockKind::Quote, &WrapOptions::default(), &Strings::new()) {
            Ok(_) => {
                assert_eq!(
                    tree.inner.to_html(),
                    r#"<p>a</p><div class="mosh-block quote"><p>b</p><p>MIDDLE</p><p>d</p></div><p>e</p>"#
                );
                break;
            }
            Err(err) => {
                assert_eq!(tree.inner.to_html(), before, "insert {n} refused: {err}");
                refused += 1;
            }
        }
    }
    assert!(refused > 3, "only {refused} inserts were refused");
}
