//! The structural reader: turns the token stream into an untyped tree of
//! balanced fragments.
//!
//! This stage has no direct analogue in the teacher crate (simplecss
//! skips straight from bytes to rules via brace-counting) -- it follows
//! mincss's `cssread.c` node model (`cssint.h`'s `nodetype`) and spec
//! §4.4. Per Design Notes §9, the three near-duplicate `read_any`
//! routines of the C original are merged here into one routine
//! parameterized by an [`AnyContext`].

use crate::error::ParseError;
use crate::source::CharSource;
use crate::stream::{SemanticToken, TokenStream};
use crate::token::TokenKind;

/// The tag of an untyped tree node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Stylesheet,
    TopLevel,
    AtRule,
    Block,
    Parens,
    Brackets,
    Function,
    Token,
}

/// A node in the untyped structural tree. Container variants use
/// `children`; `Token` leaves carry `token` instead. `text` holds the
/// at-rule/function name where relevant.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub text: Option<String>,
    pub token: Option<SemanticToken>,
    pub children: Vec<Node>,
    pub line: u32,
}

impl Node {
    fn container(kind: NodeKind, line: u32) -> Node {
        Node { kind, text: None, token: None, children: Vec::new(), line }
    }

    fn leaf(tok: SemanticToken) -> Node {
        Node { kind: NodeKind::Token, text: None, line: tok.line, token: Some(tok), children: Vec::new() }
    }
}

/// Which grammar position `read_any` is currently filling; determines
/// both the terminator set and the error policy for otherwise-unexpected
/// tokens, per Design Notes' "clean design" suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnyContext {
    TopLevel,
    AtRuleHead,
    Closer(TokenKind),
}

/// Default maximum bracket/block/selector recursion depth (Design Notes
/// §9: "specify a configurable maximum depth, default >= 256").
pub const DEFAULT_MAX_DEPTH: usize = 256;

pub struct StructuralReader<S: CharSource> {
    stream: TokenStream<S>,
    errors: Vec<(ParseError, u32)>,
    depth: usize,
    max_depth: usize,
}

impl<S: CharSource> StructuralReader<S> {
    pub fn new(source: S, max_depth: usize) -> StructuralReader<S> {
        StructuralReader { stream: TokenStream::new(source), errors: Vec::new(), depth: 0, max_depth }
    }

    pub fn take_errors(&mut self) -> Vec<(ParseError, u32)> {
        let mut lex_errs = self.stream.take_errors();
        lex_errs.append(&mut self.errors);
        lex_errs.sort_by_key(|(_, line)| *line);
        lex_errs
    }

    fn error(&mut self, err: ParseError, line: u32) {
        self.errors.push((err, line));
    }

    fn cur_kind(&self) -> TokenKind {
        self.stream.current().kind
    }

    fn cur_line(&self) -> u32 {
        self.stream.current().line
    }

    /// Builds the top-level `Stylesheet` node: the single public entry
    /// point of this module.
    pub fn read_stylesheet(mut self) -> (Node, Vec<(ParseError, u32)>) {
        let line = self.cur_line();
        let mut sheet = Node::container(NodeKind::Stylesheet, line);

        loop {
            while matches!(self.cur_kind(), TokenKind::Space | TokenKind::Cdo | TokenKind::Cdc) {
                self.stream.advance();
            }
            if self.cur_kind() == TokenKind::Eof {
                break;
            }
            if let Some(stmt) = self.read_statement() {
                sheet.children.push(stmt);
            }
        }

        (sheet, self.take_errors())
    }

    fn read_statement(&mut self) -> Option<Node> {
        if self.cur_kind() == TokenKind::AtKeyword {
            let line = self.cur_line();
            let name = self.stream.current().text.clone();
            let mut node = Node::container(NodeKind::AtRule, line);
            node.text = Some(name);
            self.stream.advance();

            self.read_any(AnyContext::AtRuleHead, &mut node.children);

            match self.cur_kind() {
                TokenKind::Semicolon => {
                    self.stream.advance();
                }
                TokenKind::LBrace => {
                    node.children.push(self.read_block());
                }
                TokenKind::Eof => {
                    self.error(ParseError::IncompleteAtRule, self.cur_line());
                }
                _ => {}
            }
            return Some(node);
        }

        let line = self.cur_line();
        let mut top = Node::container(NodeKind::TopLevel, line);
        loop {
            self.read_any(AnyContext::TopLevel, &mut top.children);
            match self.cur_kind() {
                TokenKind::LBrace => {
                    top.children.push(self.read_block());
                    continue;
                }
                TokenKind::AtKeyword | TokenKind::Eof => break,
                _ => break,
            }
        }

        if top.children.is_empty() {
            None
        } else {
            Some(top)
        }
    }

    /// Reads a `{ ... }` block. Assumes `current()` is `LBrace`.
    fn read_block(&mut self) -> Node {
        let line = self.cur_line();
        self.stream.advance(); // consume '{'

        if self.depth >= self.max_depth {
            self.error(ParseError::NestingTooDeep, line);
            return Node::container(NodeKind::Block, line);
        }

        let mut block = Node::container(NodeKind::Block, line);
        self.depth += 1;
        loop {
            match self.cur_kind() {
                TokenKind::RBrace => {
                    self.stream.advance();
                    break;
                }
                TokenKind::Eof => {
                    self.error(ParseError::UnexpectedEndOfBlock, self.cur_line());
                    break;
                }
                TokenKind::LBrace => {
                    block.children.push(self.read_block());
                }
                TokenKind::LParen => {
                    block.children.push(self.read_bracketed(NodeKind::Parens, TokenKind::RParen));
                }
                TokenKind::LBracket => {
                    block.children.push(self.read_bracketed(NodeKind::Brackets, TokenKind::RBracket));
                }
                TokenKind::Function => {
                    block.children.push(self.read_function());
                }
                TokenKind::Cdo | TokenKind::Cdc => {
                    self.error(ParseError::CdoCdcInBlock, self.cur_line());
                    self.stream.advance();
                }
                _ => {
                    let tok = self.stream.advance();
                    block.children.push(Node::leaf(tok));
                }
            }
        }
        self.depth -= 1;

        block
    }

    fn read_bracketed(&mut self, kind: NodeKind, closer: TokenKind) -> Node {
        let line = self.cur_line();
        self.stream.advance(); // consume opener

        if self.depth >= self.max_depth {
            self.error(ParseError::NestingTooDeep, line);
            return Node::container(kind, line);
        }

        let mut node = Node::container(kind, line);
        self.depth += 1;
        self.read_any(AnyContext::Closer(closer), &mut node.children);
        self.depth -= 1;
        node
    }

    fn read_function(&mut self) -> Node {
        let line = self.cur_line();
        let name = self.stream.current().text.clone();
        self.stream.advance(); // consume function-name token

        if self.depth >= self.max_depth {
            self.error(ParseError::NestingTooDeep, line);
            let mut node = Node::container(NodeKind::Function, line);
            node.text = Some(name);
            return node;
        }

        let mut node = Node::container(NodeKind::Function, line);
        node.text = Some(name);
        self.depth += 1;
        self.read_any(AnyContext::Closer(TokenKind::RParen), &mut node.children);
        self.depth -= 1;
        node
    }

    /// The merged `read_any` routine: collects leaf/nested-bracket
    /// children into `out` until the context's terminator is reached.
    fn read_any(&mut self, ctx: AnyContext, out: &mut Vec<Node>) {
        loop {
            let kind = self.cur_kind();
            let line = self.cur_line();

            match ctx {
                AnyContext::TopLevel => match kind {
                    TokenKind::Eof | TokenKind::LBrace | TokenKind::AtKeyword => return,
                    TokenKind::RParen => {
                        self.error(ParseError::UnexpectedCloseParen, line);
                        self.stream.advance();
                        continue;
                    }
                    TokenKind::RBracket => {
                        self.error(ParseError::UnexpectedCloseBracket, line);
                        self.stream.advance();
                        continue;
                    }
                    TokenKind::Cdo | TokenKind::Cdc => {
                        self.stream.advance();
                        continue;
                    }
                    _ => {}
                },
                AnyContext::AtRuleHead => match kind {
                    TokenKind::Eof | TokenKind::Semicolon | TokenKind::LBrace => return,
                    TokenKind::AtKeyword => {
                        self.error(ParseError::UnexpectedAtKeywordInAtRule, line);
                        self.stream.advance();
                        continue;
                    }
                    TokenKind::RParen => {
                        self.error(ParseError::UnexpectedCloseParen, line);
                        self.stream.advance();
                        continue;
                    }
                    TokenKind::RBracket => {
                        self.error(ParseError::UnexpectedCloseBracket, line);
                        self.stream.advance();
                        continue;
                    }
                    TokenKind::Cdo | TokenKind::Cdc => {
                        self.error(ParseError::CdoCdcInAtRule, line);
                        self.stream.advance();
                        continue;
                    }
                    _ => {}
                },
                AnyContext::Closer(closer) => {
                    if kind == closer {
                        self.stream.advance();
                        return;
                    }
                    match kind {
                        TokenKind::Eof => {
                            self.error(ParseError::MissingCloseDelimiter, line);
                            return;
                        }
                        TokenKind::LBrace => {
                            self.error(ParseError::UnexpectedBlockInBrackets, line);
                            self.read_block();
                            continue;
                        }
                        TokenKind::Semicolon => {
                            self.error(ParseError::UnexpectedSemicolonInBrackets, line);
                            self.stream.advance();
                            continue;
                        }
                        TokenKind::AtKeyword => {
                            self.error(ParseError::UnexpectedAtKeywordInBrackets, line);
                            self.stream.advance();
                            continue;
                        }
                        TokenKind::Cdo | TokenKind::Cdc => {
                            self.error(ParseError::CdoCdcInBrackets, line);
                            self.stream.advance();
                            continue;
                        }
                        TokenKind::RParen => {
                            self.error(ParseError::UnexpectedCloseParen, line);
                            self.stream.advance();
                            continue;
                        }
                        TokenKind::RBracket => {
                            self.error(ParseError::UnexpectedCloseBracket, line);
                            self.stream.advance();
                            continue;
                        }
                        _ => {}
                    }
                }
            }

            match kind {
                TokenKind::LParen => out.push(self.read_bracketed(NodeKind::Parens, TokenKind::RParen)),
                TokenKind::LBracket => out.push(self.read_bracketed(NodeKind::Brackets, TokenKind::RBracket)),
                TokenKind::Function => out.push(self.read_function()),
                _ => {
                    let tok = self.stream.advance();
                    out.push(Node::leaf(tok));
                }
            }
        }
    }
}
