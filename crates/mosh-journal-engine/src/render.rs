//! # Fragment Renderer
//!
//! Converts block data to journal markup and back. A block's whole state is
//! its markup, so this is the only serialization boundary in the engine:
//!
//! ```text
//! <div class="mosh-block quote torn">     kind class, modifier classes
//!   <div class="title">Log 7</div>        optional title (escaped text)
//!   <p>Hello</p>                          content
//! </div>
//! ```
//!
//! Content that already contains markup is used as-is (after sanitizing, if
//! enabled); plain text gets a single `<p>`. Navigation blocks ignore the
//! content and render their exits instead. Figures are a different shape
//! entirely; see [`FragmentRenderer::render_figure`].
//!
//! [`FragmentRenderer::parse`] is the right inverse of
//! [`FragmentRenderer::render`] for content kinds: content comes back in
//! canonical form (see [`FragmentRenderer::normalize_content`]).

use std::collections::BTreeSet;
use std::sync::OnceLock;

use mosh_journal_markup::{MutableTree, NodeId, Tree, parse_fragment, sanitize_html};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BlockError;
use crate::figure::{FigureDetails, FigureState, read_figure};
use crate::kinds::{BLOCK_CLASS, BlockKind, FIGURE_CLASS, Modifier, identify_block};
use crate::strings::Strings;

/// Class of a block's title element.
pub const TITLE_CLASS: &str = "title";

/// Class of the content container used by older block markup.
pub const LEGACY_CONTENT_CLASS: &str = "content";

/// Class of a navigation block's exit list.
pub const EXITS_CLASS: &str = "exits";

/// How exit links to other documents are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `<a class="content-link" data-uuid="...">label</a>`
    #[default]
    Anchor,
    /// `@UUID[...]{label}`, resolved later by the host's text enricher.
    Enricher,
}

/// One exit of a navigation block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationExit {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl NavigationExit {
    pub fn new(label: &str, target: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            target: target.map(str::to_string),
        }
    }
}

/// Figure settings for [`FragmentRenderer::render_figure`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FigureOptions {
    pub state: FigureState,
    pub caption: Option<String>,
}

/// Per-call render settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub modifiers: BTreeSet<Modifier>,
    /// Navigation blocks only.
    pub exits: Vec<NavigationExit>,
    /// Figures only.
    pub figure: FigureOptions,
}

impl RenderOptions {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn with_exit(mut self, exit: NavigationExit) -> Self {
        self.exits.push(exit);
        self
    }
}

/// Result of [`FragmentRenderer::render_named`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Set when the kind was not recognized and `html` is the raw content.
    pub warning: Option<BlockError>,
}

/// A block recovered from markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedBlock {
    pub kind: BlockKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub modifiers: BTreeSet<Modifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exits: Vec<NavigationExit>,
}

/// Renders and parses block markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRenderer {
    pub strings: Strings,
    pub link_style: LinkStyle,
    /// Strip scripts and event handlers from content markup.
    pub sanitize: bool,
}

impl Default for FragmentRenderer {
    fn default() -> Self {
        Self {
            strings: Strings::default(),
            link_style: LinkStyle::default(),
            sanitize: true,
        }
    }
}

impl FragmentRenderer {
    pub fn new(strings: Strings) -> Self {
        Self {
            strings,
            ..Self::default()
        }
    }

    /// Render a block of `kind`. For figures, `content` is the image source.
    pub fn render(&self, kind: BlockKind, content: &str, options: &RenderOptions) -> String {
        if kind.is_figure() {
            return self.render_figure(content, &options.figure);
        }

        let mut classes = vec![BLOCK_CLASS, kind.class()];
        classes.extend(
            Modifier::ALL
                .into_iter()
                .filter(|m| options.modifiers.contains(m))
                .map(Modifier::class),
        );

        let mut html = format!(r#"<div class="{}">"#, classes.join(" "));
        if let Some(title) = options.title.as_deref().filter(|t| !t.is_empty()) {
            html.push_str(&format!(
                r#"<div class="{TITLE_CLASS}">{}</div>"#,
                html_escape::encode_text(title)
            ));
        }
        if kind == BlockKind::Navigation {
            html.push_str(&self.render_exits(&options.exits));
        } else {
            html.push_str(&self.content_markup(content));
        }
        html.push_str("</div>");
        html
    }

    /// Render by kind name. Unknown names are not fatal: the content comes
    /// back unchanged with a warning.
    pub fn render_named(&self, name: &str, content: &str, options: &RenderOptions) -> Rendered {
        match name.parse::<BlockKind>() {
            Ok(kind) => Rendered {
                html: self.render(kind, content, options),
                warning: None,
            },
            Err(err) => {
                log::warn!("Unknown block type: {name}");
                Rendered {
                    html: content.to_string(),
                    warning: Some(err),
                }
            }
        }
    }

    /// `<figure>` markup for an image.
    pub fn render_figure(&self, image_ref: &str, options: &FigureOptions) -> String {
        let caption = options.caption.as_deref().filter(|c| !c.is_empty());
        let mut html = format!(
            r#"<figure class="{}"><img src="{}" alt="{}" loading="lazy">"#,
            options.state.render_classes().join(" "),
            html_escape::encode_double_quoted_attribute(image_ref),
            html_escape::encode_double_quoted_attribute(caption.unwrap_or_default()),
        );
        if let Some(caption) = caption {
            html.push_str(&format!(
                "<figcaption>{}</figcaption>",
                html_escape::encode_text(caption)
            ));
        }
        html.push_str("</figure>");
        html
    }

    /// Sample markup for the block picker.
    pub fn preview(&self, kind: BlockKind) -> String {
        let Some(key) = kind.placeholder_key() else {
            return format!(
                r#"<div class="placeholder">{}</div>"#,
                html_escape::encode_text(self.strings.get("MOSH.Figure.NoImage"))
            );
        };
        let text = self.strings.get(key);
        let options = match kind {
            BlockKind::Navigation => {
                RenderOptions::default().with_exit(NavigationExit::new(text, None))
            }
            _ => RenderOptions::default(),
        };
        self.render(kind, &html_escape::encode_text(text), &options)
    }

    /// Content as [`FragmentRenderer::render`] would embed it.
    pub fn normalize_content(&self, content: &str) -> String {
        parse_fragment(&self.content_markup(content)).to_html()
    }

    fn content_markup(&self, content: &str) -> String {
        if !content.contains('<') {
            return format!("<p>{content}</p>");
        }
        if self.sanitize {
            sanitize_html(content)
        } else {
            content.to_string()
        }
    }

    fn render_exits(&self, exits: &[NavigationExit]) -> String {
        let mut html = format!(r#"<ul class="{EXITS_CLASS}">"#);
        if exits.is_empty() {
            html.push_str(&format!(
                "<li>{}</li>",
                html_escape::encode_text(&self.exits_placeholder())
            ));
        }
        for exit in exits {
            let label = html_escape::encode_text(&exit.label);
            html.push_str("<li>");
            match (exit.target.as_deref(), self.link_style) {
                (Some(target), LinkStyle::Anchor) => html.push_str(&format!(
                    r#"<a class="content-link" data-uuid="{}">{label}</a>"#,
                    html_escape::encode_double_quoted_attribute(target)
                )),
                (Some(target), LinkStyle::Enricher) => {
                    html.push_str(&format!(
                        "@UUID[{}]{{{label}}}",
                        html_escape::encode_text(target)
                    ))
                }
                (None, _) => html.push_str(&label),
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        html
    }

    fn exits_placeholder(&self) -> String {
        format!("{}: ...", self.strings.get("MOSH.Blocks.Exits"))
    }

    /// Recover a block from markup: the first `mosh-block` element with a
    /// known kind class. `None` when there is none.
    pub fn parse(&self, markup: &str) -> Option<ParsedBlock> {
        let tree = parse_fragment(markup);
        let block = tree.find_descendant(tree.root(), |t, n| identify_block(t, n).is_some())?;
        Some(self.parse_block(&tree, block))
    }

    /// Recover a block from a wrapper element already in a tree.
    pub fn parse_block<T: MutableTree>(&self, tree: &T, block: NodeId) -> ParsedBlock {
        let (kind, modifiers) =
            identify_block(tree, block).unwrap_or((BlockKind::Narrative, BTreeSet::new()));
        let content = content_nodes(tree, block)
            .into_iter()
            .map(|n| tree.outer_html(n))
            .collect();
        let exits = if kind == BlockKind::Navigation {
            self.parse_exits(tree, block)
        } else {
            Vec::new()
        };
        ParsedBlock {
            kind,
            content,
            title: block_title(tree, block),
            modifiers,
            exits,
        }
    }

    fn parse_exits<T: MutableTree>(&self, tree: &T, block: NodeId) -> Vec<NavigationExit> {
        let Some(list) = tree.find_descendant(block, |t, n| t.has_class(n, EXITS_CLASS)) else {
            return Vec::new();
        };
        let placeholder = self.exits_placeholder();

        tree.element_children(list)
            .into_iter()
            .filter(|&li| tree.tag_name(li) == Some("li"))
            .filter_map(|li| {
                let text = tree.text_content(li);
                if let Some(link) =
                    tree.find_descendant(li, |t, n| t.attr(n, "data-uuid").is_some())
                {
                    let target = tree.attr(link, "data-uuid").map(str::to_string);
                    return Some(NavigationExit {
                        label: tree.text_content(link),
                        target,
                    });
                }
                if let Some(caps) = enricher_link().captures(text.trim()) {
                    return Some(NavigationExit::new(&caps[2], Some(&caps[1])));
                }
                (text != placeholder).then(|| NavigationExit::new(&text, None))
            })
            .collect()
    }

    /// Recover a figure from markup: the first `mosh-figure` element.
    pub fn parse_figure(&self, markup: &str) -> Option<FigureDetails> {
        let tree: Tree = parse_fragment(markup);
        let figure = tree.find_descendant(tree.root(), |t, n| t.has_class(n, FIGURE_CLASS))?;
        read_figure(&tree, figure).ok()
    }
}

fn enricher_link() -> &'static Regex {
    static ENRICHER: OnceLock<Regex> = OnceLock::new();
    ENRICHER.get_or_init(|| {
        Regex::new(r"^@UUID\[([^\]]+)\]\{([^}]*)\}$").expect("Invalid enricher regex")
    })
}

/// Text of the block's title element, if it has one.
///
/// Only a `div.title` leading the wrapper counts; a `.title` further in
/// belongs to the content.
pub fn block_title<T: MutableTree>(tree: &T, block: NodeId) -> Option<String> {
    title_element(tree, block).map(|t| tree.text_content(t))
}

fn title_element<T: MutableTree>(tree: &T, block: NodeId) -> Option<NodeId> {
    let first = tree.element_children(block).into_iter().next()?;
    (tree.tag_name(first) == Some("div") && tree.has_class(first, TITLE_CLASS)).then_some(first)
}

/// The nodes making up a block's content.
///
/// Every child of the wrapper except the title. When the only such child is
/// a legacy `.content` element, its children instead.
pub fn content_nodes<T: MutableTree>(tree: &T, block: NodeId) -> Vec<NodeId> {
    let title = title_element(tree, block);
    let nodes: Vec<NodeId> = tree
        .children(block)
        .iter()
        .copied()
        .filter(|&c| Some(c) != title)
        .collect();

    let significant: Vec<NodeId> = nodes
        .iter()
        .copied()
        .filter(|&c| !(tree.is_text(c) && tree.text_content(c).trim().is_empty()))
        .collect();
    if let [only] = significant[..]
        && tree.has_class(only, LEGACY_CONTENT_CLASS)
    {
        return tree.children(only).to_vec();
    }
    nodes
}
