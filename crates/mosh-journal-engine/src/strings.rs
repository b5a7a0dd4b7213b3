//! Localized user-facing text.
//!
//! Every string the engine puts into markup or notifications is looked up by
//! key (`MOSH.Blocks.Placeholder`, ...). English defaults are built in; a
//! host or config file can override any key. Unknown keys resolve to the key
//! itself, so a missing translation is visible rather than blank.

use std::collections::BTreeMap;

const ENGLISH: &[(&str, &str)] = &[
    ("MOSH.Blocks.Narrative", "Narrative"),
    ("MOSH.Blocks.NarrativeHint", "Boxed read-aloud text"),
    ("MOSH.Blocks.NarrativePlaceholder", "The airlock hisses open..."),
    ("MOSH.Blocks.Quote", "Quote"),
    ("MOSH.Blocks.QuoteHint", "Spoken words or a cited source"),
    ("MOSH.Blocks.QuotePlaceholder", "\"We don't get paid enough for this.\""),
    ("MOSH.Blocks.Terminal", "Terminal"),
    ("MOSH.Blocks.TerminalHint", "Green-screen computer output"),
    ("MOSH.Blocks.TerminalPlaceholder", "> ACCESS DENIED"),
    ("MOSH.Blocks.Handout", "Handout"),
    ("MOSH.Blocks.HandoutHint", "A document the players can hold"),
    ("MOSH.Blocks.HandoutPlaceholder", "Crew manifest, page 3 of 4"),
    ("MOSH.Blocks.Navigation", "Navigation"),
    ("MOSH.Blocks.NavigationHint", "Exits to other rooms"),
    ("MOSH.Blocks.NavigationPlaceholder", "North: Cargo Bay"),
    ("MOSH.Blocks.Warden", "Warden"),
    ("MOSH.Blocks.WardenHint", "Notes for the Warden only"),
    ("MOSH.Blocks.WardenPlaceholder", "The android is lying."),
    ("MOSH.Blocks.Info", "Info"),
    ("MOSH.Blocks.InfoHint", "Rules or reference callout"),
    ("MOSH.Blocks.InfoPlaceholder", "Make a Fear Save."),
    ("MOSH.Blocks.Figure", "Figure"),
    ("MOSH.Blocks.FigureHint", "Floating image with caption"),
    ("MOSH.Blocks.Placeholder", "Enter text here..."),
    ("MOSH.Blocks.Exits", "Exits"),
    ("MOSH.Blocks.SelectText", "Select some text first"),
    ("MOSH.Dialog.Inserted", "inserted"),
    ("MOSH.Dialog.InsertError", "Insert failed"),
    ("MOSH.Toolbar.Blocks", "Blocks"),
    ("MOSH.Toolbar.BlocksTitle", "Insert a MOSH block"),
    ("MOSH.Figure.Position", "Position"),
    ("MOSH.Figure.Left", "Left"),
    ("MOSH.Figure.Inline", "Inline"),
    ("MOSH.Figure.Right", "Right"),
    ("MOSH.Figure.Size", "Size"),
    ("MOSH.Figure.Small", "Small"),
    ("MOSH.Figure.Medium", "Medium"),
    ("MOSH.Figure.Large", "Large"),
    ("MOSH.Figure.Style", "Style"),
    ("MOSH.Figure.Default", "Default"),
    ("MOSH.Figure.Polaroid", "Polaroid"),
    ("MOSH.Figure.Screen", "Screen"),
    ("MOSH.Figure.Delete", "Delete"),
    ("MOSH.Figure.NoImage", "No image selected"),
    ("MOSH.Figure.Deleted", "Image deleted"),
    ("MOSH.Figure.Updated", "updated"),
];

/// Key → text lookup with English fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strings {
    overrides: BTreeMap<String, String>,
}

impl Strings {
    pub fn new() -> Self {
        Self::default()
    }

    /// English defaults overlaid with `overrides`.
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    pub fn set(&mut self, key: &str, text: &str) {
        self.overrides.insert(key.to_string(), text.to_string());
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(text) = self.overrides.get(key) {
            return text;
        }
        ENGLISH
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| *text)
            .unwrap_or(key)
    }
}
