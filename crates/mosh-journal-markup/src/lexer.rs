//! # Lexer - Tokenizing HTML Fragments
//!
//! This module breaks journal markup into a flat token stream using the
//! [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token. Nothing is skipped,
//! so concatenating token texts gives back the source:
//!
//! ```
//! use mosh_journal_markup::lexer::lex;
//!
//! let input = "<p class=\"x\">Hello</p>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer does not know that `<li>` implicitly
//! closes a previous `<li>` or that `<script>` content is raw text; that is the
//! parser's job. Start tags are matched by name and then extended by a callback
//! that respects quoted attribute values, so `<img alt="a > b">` stays one
//! token.

use logos::{Lexer, Logos};

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- ... -->`, running to end of input when unterminated
    #[token("<!--", comment)]
    Comment,

    /// `<!DOCTYPE html>` and other `<!x ...>` declarations
    #[regex(r"<![a-zA-Z][^>]*>")]
    Declaration,

    /// `</name>`
    #[regex(r"</[a-zA-Z][^>]*>")]
    EndTag,

    /// `<name attr="value" ...>` or `<name/>`
    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*", start_tag)]
    StartTag,

    /// A stray `<` that does not open a tag
    #[token("<")]
    Lt,

    /// Character data between tags
    #[regex(r"[^<]+")]
    Text,
}

fn comment(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("-->").map(|end| end + 3).unwrap_or(rest.len());
    lex.bump(len);
    true
}

fn start_tag(lex: &mut Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let mut quote: Option<char> = None;
    let mut after_eq = false;

    for (i, c) in rest.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '>' => {
                lex.bump(i + 1);
                return true;
            }
            None if after_eq && (c == '"' || c == '\'') => quote = Some(c),
            None => {}
        }
        if quote.is_none() && !c.is_whitespace() {
            after_eq = c == '=';
        }
    }

    // Unterminated tag: swallow the rest so no bytes are lost.
    lex.bump(rest.len());
    true
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input).into_iter().map(|(t, _)| t).collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        // Logos errors mean an unrecognized byte sequence - keep it as text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
