//! Periodic re-adding of the "Blocks" editor button.
//!
//! Host editors rebuild their menus freely, dropping anything injected into
//! them. The host calls [`maintain_toolbar_buttons`] on a timer
//! ([`DEFAULT_INTERVAL`] unless configured) and every menu missing the
//! button group gets it back. Ticks are skipped while a figure toolbar is
//! open so the two toolbars never fight over the menu.

use std::time::Duration;

use mosh_journal_markup::{MutableTree, NodeId, TreeError};

use crate::figure::ToolbarSlot;
use crate::strings::Strings;

/// Class of a host editor menu bar.
pub const EDITOR_MENU_CLASS: &str = "editor-menu";

/// Class of the injected button group.
pub const TOOLBAR_GROUP_CLASS: &str = "mosh-toolbar-group";

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceOutcome {
    /// A figure toolbar was open.
    Skipped,
    /// Menus were checked; `added` of them got the button group back.
    Checked { added: usize },
}

/// Append the button group to every editor menu under `root` lacking one.
pub fn maintain_toolbar_buttons<T: MutableTree>(
    tree: &mut T,
    root: NodeId,
    slot: &ToolbarSlot,
    strings: &Strings,
) -> Result<MaintenanceOutcome, TreeError> {
    if slot.is_active() {
        log::debug!("figure toolbar open, skipping menu check");
        return Ok(MaintenanceOutcome::Skipped);
    }

    let menus: Vec<NodeId> = tree
        .descendants(root)
        .into_iter()
        .filter(|&n| tree.has_class(n, EDITOR_MENU_CLASS))
        .filter(|&n| tree.find_descendant(n, |t, c| t.has_class(c, TOOLBAR_GROUP_CLASS)).is_none())
        .collect();

    for &menu in &menus {
        let group = button_group(tree, strings)?;
        tree.append_child(menu, group)?;
        log::info!("re-added block button to menu {menu}");
    }
    Ok(MaintenanceOutcome::Checked { added: menus.len() })
}

fn button_group<T: MutableTree>(tree: &mut T, strings: &Strings) -> Result<NodeId, TreeError> {
    let group = tree.create_element("span", &[TOOLBAR_GROUP_CLASS]);
    let separator = tree.create_element("span", &["mosh-toolbar-separator"]);
    tree.append_child(group, separator)?;

    let button = tree.create_element("button", &["mosh-toolbar-btn"]);
    tree.set_attr(button, "type", "button");
    tree.set_attr(button, "title", strings.get("MOSH.Toolbar.BlocksTitle"));
    let icon = tree.create_element("i", &["fas", "fa-cube"]);
    tree.append_child(button, icon)?;
    let label = tree.create_element("span", &["btn-text"]);
    let text = tree.create_text(strings.get("MOSH.Toolbar.Blocks"));
    tree.append_child(label, text)?;
    tree.append_child(button, label)?;

    tree.append_child(group, button)?;
    Ok(group)
}
