//! One-token lookahead over the [`Lexer`], with comments skipped and each
//! token's semantic text materialized (delimiters/sigils stripped).
//!
//! Grounded on simplecss's `Stream` cursor wrapper (`stream.rs`) applied
//! to the mincss token model, and on the semantic-slice table of spec
//! §4.3.

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

/// A token with its delimiters/sigils already stripped into an owned
/// `String`, and whitespace passed through (not skipped) since some
/// consumers -- selector descendant-combinator detection -- need to see
/// spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticToken {
    pub kind: TokenKind,
    pub text: String,
    pub div: Option<usize>,
    pub line: u32,
}

fn semantic_text(tok: &Token) -> (String, Option<usize>) {
    match tok.kind {
        TokenKind::Ident | TokenKind::Number | TokenKind::Delim => {
            (tok.text.iter().collect(), None)
        }
        TokenKind::Dimension => (tok.text.iter().collect(), tok.div),
        TokenKind::Comment => {
            let strip_trailing = tok.text.len() >= 4
                && tok.text[tok.text.len() - 2] == '*'
                && tok.text[tok.text.len() - 1] == '/';
            let end = if strip_trailing { tok.text.len() - 2 } else { tok.text.len() };
            let start = 2.min(end);
            (tok.text[start..end].iter().collect(), None)
        }
        TokenKind::String => {
            let len = tok.text.len();
            if len >= 2 && tok.text[len - 1] == tok.text[0] {
                (tok.text[1..len - 1].iter().collect(), None)
            } else if len >= 1 {
                (tok.text[1..].iter().collect(), None)
            } else {
                (String::new(), None)
            }
        }
        TokenKind::AtKeyword | TokenKind::Hash => {
            (tok.text[1.min(tok.text.len())..].iter().collect(), None)
        }
        TokenKind::Percentage | TokenKind::Function => {
            let len = tok.text.len();
            let end = if len > 0 { len - 1 } else { 0 };
            (tok.text[..end].iter().collect(), None)
        }
        TokenKind::Uri => {
            let len = tok.text.len();
            let start = 4.min(len);
            let end = if len > start { len - 1 } else { start };
            (tok.text[start..end].iter().collect(), None)
        }
        TokenKind::Space => (String::new(), None),
        _ => (String::new(), None),
    }
}

/// Wraps the lexer with one-token lookahead; comments are dropped here,
/// every other token's semantic text is computed eagerly.
pub struct TokenStream<S: CharSource> {
    lexer: Lexer<S>,
    current: SemanticToken,
}

impl<S: CharSource> TokenStream<S> {
    pub fn new(source: S) -> TokenStream<S> {
        let mut lexer = Lexer::new(source);
        let first = Self::next_non_comment(&mut lexer);
        TokenStream { lexer, current: first }
    }

    fn next_non_comment(lexer: &mut Lexer<S>) -> SemanticToken {
        loop {
            let tok = lexer.next_token();
            if tok.kind == TokenKind::Comment {
                continue;
            }
            let (text, div) = semantic_text(&tok);
            return SemanticToken { kind: tok.kind, text, div, line: tok.line };
        }
    }

    /// The current lookahead token.
    pub fn current(&self) -> &SemanticToken {
        &self.current
    }

    /// Consumes the current token and returns it, advancing the
    /// lookahead to the next non-comment token.
    pub fn advance(&mut self) -> SemanticToken {
        let next = Self::next_non_comment(&mut self.lexer);
        std::mem::replace(&mut self.current, next)
    }

    /// Drains lexical errors accumulated since the last drain.
    pub fn take_errors(&mut self) -> Vec<(ParseError, u32)> {
        self.lexer.take_errors()
    }
}
