//! # mosh-journal-markup
//!
//! A lenient HTML fragment tree for journal page content, tokenized with
//! [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! Journal pages store rich text as HTML fragments produced by an editor.
//! The formatting engine needs to find blocks, wrap selections, rewrite
//! figure classes and serialize the result back. This crate provides just
//! enough of a document model for that:
//!
//! - a forgiving parser that never fails
//! - an arena tree with stable [`NodeId`]s, where detached nodes survive and
//!   can be re-inserted
//! - the [`MutableTree`] trait, so callers can work against any node store
//! - DOM-style [`Range`] extraction with exact rollback
//! - canonical serialization
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Tree
//!               (Logos)                            (nesting rules)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits input into tags, comments, declarations and text runs. Every byte
//! of input ends up in some token.
//!
//! ```text
//! "<p class=x>Hi</p>" → [StartTag("<p class=x>"), Text("Hi"), EndTag("</p>")]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! Turns tokens into [`parser::event::Event`]s: element names and decoded
//! attributes, decoded text, raw `<script>`/`<style>` bodies.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! Applies the nesting rules rich-text markup relies on (implicit `</li>`,
//! implicit `</p>`, void elements) and appends nodes to the tree.
//!
//! ## Module Structure
//!
//! ```text
//! mosh-journal-markup/
//! ├── lib.rs        # This file - public API and integration tests
//! ├── lexer.rs      # Logos-based tokenizer
//! ├── tree.rs       # Arena, nodes, TreeError
//! ├── ops.rs        # MutableTree trait: navigation, classes, mutation
//! ├── range.rs      # Boundary/Range, extract_range, Extraction::restore
//! ├── sanitize.rs   # Script and event-handler stripping
//! ├── serialize.rs  # Canonical HTML output
//! └── parser/
//!     ├── mod.rs    # Parser struct, parse_fragment()
//!     ├── event.rs  # Event enum
//!     └── sink.rs   # Events to tree nodes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use mosh_journal_markup::{parse_fragment, MutableTree};
//!
//! let mut tree = parse_fragment(r#"<p>One</p><p class="note">Two</p>"#);
//! let second = tree.children(tree.root())[1];
//! assert!(tree.has_class(second, "note"));
//!
//! tree.add_class(second, "mosh-block");
//! assert_eq!(tree.to_html(), r#"<p>One</p><p class="note mosh-block">Two</p>"#);
//! ```

pub mod lexer;
pub mod ops;
pub mod parser;
pub mod range;
pub mod sanitize;
pub mod serialize;
pub mod tree;

pub use ops::MutableTree;
pub use parser::parse_fragment;
pub use range::{Boundary, Extraction, Range, extract_range};
pub use sanitize::{sanitize, sanitize_html};
pub use tree::{Attribute, Element, Node, NodeData, NodeId, Tree, TreeError, VOID_ELEMENTS};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    /// Indented outline of a tree for snapshot testing.
    fn format_tree(tree: &Tree, id: NodeId, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);
        match tree.get(id).map(|n| &n.data) {
            Some(NodeData::Fragment) => result.push_str(&format!("{prefix}FRAGMENT\n")),
            Some(NodeData::Element(el)) => {
                let attrs: Vec<String> = el
                    .attrs
                    .iter()
                    .map(|a| format!("{}={:?}", a.name, a.value))
                    .collect();
                result.push_str(
                    &format!("{prefix}{} {}\n", el.name, attrs.join(" ")).replace(" \n", "\n"),
                );
            }
            Some(NodeData::Text(t)) => result.push_str(&format!("{prefix}TEXT {t:?}\n")),
            Some(NodeData::Comment(c)) => result.push_str(&format!("{prefix}COMMENT {c:?}\n")),
            Some(NodeData::Doctype(d)) => result.push_str(&format!("{prefix}DOCTYPE {d:?}\n")),
            None => {}
        }
        for &child in tree.children(id) {
            result.push_str(&format_tree(tree, child, indent + 1));
        }
        result
    }

    #[test]
    fn snapshot_block_markup() {
        let tree = parse_fragment(
            r#"<div class="mosh-block warning torn"><div class="title">Hull Breach</div><p>Seal the <b>airlock</b>.</p></div>"#,
        );
        assert_snapshot!(format_tree(&tree, tree.root(), 0), @r#"
        FRAGMENT
          div class="mosh-block warning torn"
            div class="title"
              TEXT "Hull Breach"
            p
              TEXT "Seal the "
              b
                TEXT "airlock"
              TEXT "."
        "#);
    }

    #[test]
    fn snapshot_messy_editor_output() {
        let tree = parse_fragment("<p>one<br>two<ul><li>a<li>b & c</ul><!-- x -->");
        assert_snapshot!(format_tree(&tree, tree.root(), 0), @r#"
        FRAGMENT
          p
            TEXT "one"
            br
            TEXT "two"
          ul
            li
              TEXT "a"
            li
              TEXT "b & c"
          COMMENT " x "
        "#);
    }

    #[test]
    fn canonical_output_reparses_to_itself() {
        let inputs = [
            "<p>Hello, world!</p>",
            "<h2>Heading</h2><p>x</p>",
            "<blockquote><p>Quote</p></blockquote>",
            "<ul><li>Item</li></ul>",
            "<pre>code &lt;here&gt;</pre>",
            r#"<figure class="mosh-figure"><img src="a.png" alt="" loading="lazy"></figure>"#,
            "<p>a &amp; b</p>",
        ];

        for input in inputs {
            let once = parse_fragment(input).to_html();
            let twice = parse_fragment(&once).to_html();
            assert_eq!(once, twice, "Reparse changed output for: {:?}", input);
        }
    }

    #[test]
    fn extract_then_restore_is_lossless() {
        let html = "<h1>T</h1><p>alpha <i>beta</i></p><ul><li>gamma</li></ul>";
        let mut tree = parse_fragment(html);
        let root = tree.root();
        let p = tree.children(root)[1];
        let alpha = tree.children(p)[0];
        let ul = tree.children(root)[2];
        let li = tree.children(ul)[0];
        let gamma = tree.children(li)[0];

        let range = Range::new(Boundary::new(alpha, 3), Boundary::new(gamma, 2));
        let extraction = extract_range(&mut tree, &range).unwrap();
        assert_eq!(tree.to_html(), "<h1>T</h1><p>alp</p><ul><li>mma</li></ul>");

        extraction.restore(&mut tree).unwrap();
        assert_eq!(tree.to_html(), html);
    }
}
