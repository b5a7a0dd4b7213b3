//! Strip executable content from a subtree.
//!
//! Removes `<script>` elements, every `on*` event-handler attribute, and
//! `href`/`src` values using the `javascript:` scheme. Everything else is
//! left alone; this is not a general allow-list sanitizer.

use crate::ops::MutableTree;
use crate::tree::{NodeData, NodeId};

/// URL-bearing attributes checked for script schemes.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "xlink:href", "action", "formaction"];

/// Sanitize the children of `id` in place. Returns the number of removals.
pub fn sanitize<T: MutableTree>(tree: &mut T, id: NodeId) -> usize {
    let mut removed = 0;
    for node in tree.descendants(id) {
        if tree.tag_name(node) == Some("script") {
            tree.detach(node);
            removed += 1;
            continue;
        }
        let Some(NodeData::Element(el)) = tree.data_mut(node) else {
            continue;
        };
        let before = el.attrs.len();
        el.attrs.retain(|attr| {
            let name = attr.name.to_ascii_lowercase();
            if name.starts_with("on") {
                return false;
            }
            !(URL_ATTRIBUTES.contains(&name.as_str()) && is_script_url(&attr.value))
        });
        removed += before - el.attrs.len();
    }
    if removed > 0 {
        log::debug!("sanitized {removed} script item(s) under {id}");
    }
    removed
}

/// Parse, sanitize and reserialize a fragment.
pub fn sanitize_html(html: &str) -> String {
    let mut tree = crate::parse_fragment(html);
    let root = tree.root();
    sanitize(&mut tree, root);
    tree.to_html()
}

fn is_script_url(value: &str) -> bool {
    // browsers ignore embedded whitespace and control characters in schemes
    let scheme: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take("javascript:".len())
        .collect();
    scheme.eq_ignore_ascii_case("javascript:")
        || scheme.to_ascii_lowercase().starts_with("vbscript:")
}
