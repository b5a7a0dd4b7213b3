//! Markup serialization.
//!
//! Output is normalized rather than byte-preserving: names are lowercase,
//! attribute values are always double quoted, text is re-escaped. Parsing
//! serialized output yields the same tree.

use crate::ops::MutableTree;
use crate::parser::RAW_TEXT_ELEMENTS;
use crate::tree::{NodeData, NodeId};

/// Markup for the node itself and its subtree.
pub fn outer_html<T: MutableTree>(tree: &T, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

/// Markup for the node's children only.
pub fn inner_html<T: MutableTree>(tree: &T, id: NodeId) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        write_node(tree, child, &mut out);
    }
    out
}

fn write_node<T: MutableTree>(tree: &T, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Fragment => {
            for &child in node.children() {
                write_node(tree, child, out);
            }
        }
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for attr in &el.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
                out.push('"');
            }
            out.push('>');
            if el.is_void() {
                return;
            }
            for &child in node.children() {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
        NodeData::Text(text) => {
            let raw = tree
                .parent(id)
                .and_then(|p| tree.tag_name(p))
                .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&html_escape::encode_text(text));
            }
        }
        NodeData::Comment(body) => {
            out.push_str("<!--");
            out.push_str(body);
            out.push_str("-->");
        }
        NodeData::Doctype(raw) => out.push_str(raw),
    }
}
