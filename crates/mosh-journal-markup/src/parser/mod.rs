//! # Parser - Tokens to Tree
//!
//! Parsing is split in two stages, mirroring the lexer/parser/sink pipeline:
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Events → Sink → Tree
//!          (Logos)          (tags, entities)  (nesting rules)
//! ```
//!
//! The [`Parser`] is a straight pass over tokens. It splits start tags into
//! name and attributes, decodes character references in text, and gathers
//! the bodies of raw text elements (`<script>`, `<style>`) without looking
//! inside them.
//!
//! The parser never fails. Journal markup comes from rich-text editors and
//! hand edits; malformed input produces a best-effort tree rather than an
//! error.
//!
//! ## Public API
//!
//! ```
//! use mosh_journal_markup::{parse_fragment, MutableTree};
//!
//! let tree = parse_fragment("<p>Hello <em>there</em></p>");
//! let p = tree.children(tree.root())[0];
//! assert_eq!(tree.tag_name(p), Some("p"));
//! assert_eq!(tree.text_content(p), "Hello there");
//! ```

pub mod event;
pub mod sink;

use crate::lexer::{Token, TokenKind, lex};
use crate::ops::MutableTree;
use crate::tree::{Attribute, Tree};
use event::Event;
use sink::Sink;

/// Elements whose content is raw text rather than markup.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse an HTML fragment into a new [`Tree`].
pub fn parse_fragment(input: &str) -> Tree {
    let tokens = lex(input);
    let events = Parser::new(&tokens).parse();
    let mut tree = Tree::new();
    let root = tree.root();
    Sink::new(&mut tree, root).finish(events);
    tree
}

/// Converts tokens into [`Event`]s.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Consume all tokens and return the event stream.
    pub fn parse(mut self) -> Vec<Event> {
        while let Some(token) = self.tokens.get(self.pos) {
            self.pos += 1;
            match token.kind {
                TokenKind::StartTag => self.start_tag(token.text),
                TokenKind::EndTag => self.events.push(Event::Close {
                    name: end_tag_name(token.text),
                }),
                TokenKind::Text => self.events.push(Event::Text(
                    html_escape::decode_html_entities(token.text).into_owned(),
                )),
                TokenKind::Lt => self.events.push(Event::Text("<".to_string())),
                TokenKind::Comment => {
                    let body = token.text.trim_start_matches("<!--");
                    let body = body.strip_suffix("-->").unwrap_or(body);
                    self.events.push(Event::Comment(body.to_string()));
                }
                TokenKind::Declaration => self.events.push(Event::Doctype(token.text.to_string())),
            }
        }
        self.events
    }

    fn start_tag(&mut self, text: &str) {
        let (name, attrs, self_closing) = scan_start_tag(text);
        let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing;
        self.events.push(Event::Open {
            name: name.clone(),
            attrs,
            self_closing,
        });
        if raw {
            self.raw_text(&name);
        }
    }

    /// Collect everything up to the matching end tag as one raw text event.
    fn raw_text(&mut self, name: &str) {
        let mut body = String::new();
        while let Some(token) = self.tokens.get(self.pos) {
            self.pos += 1;
            if token.kind == TokenKind::EndTag && end_tag_name(token.text) == name {
                if !body.is_empty() {
                    self.events.push(Event::RawText(body));
                }
                self.events.push(Event::close(name));
                return;
            }
            body.push_str(token.text);
        }
        if !body.is_empty() {
            self.events.push(Event::RawText(body));
        }
    }
}

fn end_tag_name(text: &str) -> String {
    let inner = text.trim_start_matches("</");
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(inner.len());
    inner[..end].to_ascii_lowercase()
}

/// Split a start tag into lowercased name, attributes and self-closing flag.
///
/// Duplicate attributes keep the first occurrence, as browsers do.
fn scan_start_tag(text: &str) -> (String, Vec<Attribute>, bool) {
    let inner = text.strip_prefix('<').unwrap_or(text);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    let self_closing = inner.ends_with('/');

    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();

    let mut attrs: Vec<Attribute> = Vec::new();
    let mut rest = &inner[name_len..];
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }
        let key_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        if key_len == 0 {
            // a bare '=' with no attribute name
            rest = &rest[1..];
            continue;
        }
        let key = rest[..key_len].to_ascii_lowercase();
        rest = rest[key_len..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after_eq) => {
                let after_eq = after_eq.trim_start();
                let (raw, remaining) = match after_eq.chars().next() {
                    Some(q @ ('"' | '\'')) => {
                        let body = &after_eq[1..];
                        match body.find(q) {
                            Some(end) => (&body[..end], &body[end + 1..]),
                            None => (body, ""),
                        }
                    }
                    _ => {
                        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                        (&after_eq[..end], &after_eq[end..])
                    }
                };
                rest = remaining;
                html_escape::decode_html_entities(raw).into_owned()
            }
            None => String::new(),
        };

        if !attrs.iter().any(|a| a.name == key) {
            attrs.push(Attribute::new(&key, &value));
        }
    }

    (name, attrs, self_closing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn events(input: &str) -> Vec<Event> {
        let tokens = lex(input);
        Parser::new(&tokens).parse()
    }

    #[test]
    fn scan_tag_with_mixed_attributes() {
        let (name, attrs, self_closing) =
            scan_start_tag(r#"<IMG Src="a.png" alt='A &amp; B' loading=lazy hidden>"#);
        assert_eq!(name, "img");
        assert!(!self_closing);
        assert_eq!(
            attrs,
            vec![
                Attribute::new("src", "a.png"),
                Attribute::new("alt", "A & B"),
                Attribute::new("loading", "lazy"),
                Attribute::new("hidden", ""),
            ]
        );
    }

    #[test]
    fn scan_self_closing_tag() {
        let (name, attrs, self_closing) = scan_start_tag("<br/>");
        assert_eq!(name, "br");
        assert!(attrs.is_empty());
        assert!(self_closing);
    }

    #[test]
    fn duplicate_attribute_keeps_first() {
        let (_, attrs, _) = scan_start_tag(r#"<p class="a" class="b">"#);
        assert_eq!(attrs, vec![Attribute::new("class", "a")]);
    }

    #[test]
    fn text_entities_are_decoded() {
        assert_eq!(events("a &lt; b"), vec![Event::Text("a < b".to_string())]);
    }

    #[test]
    fn script_body_is_raw() {
        assert_eq!(
            events("<script>if (a < b) { x('</p>') }</script>"),
            vec![
                Event::open("script"),
                Event::RawText("if (a < b) { x('</p>') }".to_string()),
                Event::close("script"),
            ]
        );
    }

    #[test]
    fn comment_body_is_unwrapped() {
        assert_eq!(events("<!-- note -->"), vec![Event::Comment(" note ".to_string())]);
    }

    #[test]
    fn end_tag_name_ignores_trailing_junk() {
        assert_eq!(end_tag_name("</DIV >"), "div");
    }
}
