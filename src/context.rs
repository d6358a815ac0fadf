//! Parser entry points and the `ParserContext` configuration builder.
//!
//! Grounded on mincss's `mincss_context`/`mincss_parse_bytes_utf8`/
//! `mincss_parse_unicode` (`mincss.h`, `mincss.c`) for the shape of
//! configuration-then-parse; the builder style itself follows
//! gosub-engine's config builders (`src/bin/style-parser.rs`).

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Stylesheet;
use crate::constructor::Constructor;
use crate::error::{ErrorSink, ParseError, StderrSink};
use crate::lexer::Lexer;
use crate::source::{CharSource, FnCharSource, Utf8Decoder};
use crate::token::Token;
use crate::trace::TraceLevel;
use crate::tree::{Node, StructuralReader, DEFAULT_MAX_DEPTH};

/// The result of a parse: the typed stylesheet plus every diagnostic
/// raised while building it, in source order.
pub struct ParseOutcome {
    pub stylesheet: Stylesheet,
    pub errors: Vec<(ParseError, u32)>,
}

/// Configures and runs a parse. Default-constructed, it logs diagnostics
/// through a [`StderrSink`] and caps nesting at [`DEFAULT_MAX_DEPTH`];
/// use the `with_*` builders to change either.
pub struct ParserContext {
    max_depth: usize,
    trace: TraceLevel,
    sink: Box<dyn ErrorSink>,
}

impl Default for ParserContext {
    fn default() -> ParserContext {
        ParserContext { max_depth: DEFAULT_MAX_DEPTH, trace: TraceLevel::Off, sink: Box::new(StderrSink) }
    }
}

impl ParserContext {
    pub fn new() -> ParserContext {
        ParserContext::default()
    }

    pub fn with_sink(mut self, sink: Box<dyn ErrorSink>) -> ParserContext {
        self.sink = sink;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> ParserContext {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace(mut self, trace: TraceLevel) -> ParserContext {
        self.trace = trace;
        self
    }

    pub fn trace(&self) -> TraceLevel {
        self.trace
    }

    /// Parses a complete stylesheet from a raw UTF-8 byte stream,
    /// mirroring `mincss_parse_bytes_utf8`. Malformed byte sequences are
    /// reported as [`ParseError::InvalidUtf8`] rather than aborting.
    pub fn parse_bytes_utf8(mut self, mut bytes: impl Iterator<Item = u8>) -> ParseOutcome {
        let bad_utf8 = Rc::new(RefCell::new(0u32));
        let bad_utf8_inner = Rc::clone(&bad_utf8);
        let decoder = Utf8Decoder::new(move || bytes.next(), move || *bad_utf8_inner.borrow_mut() += 1);
        let outcome = self.run(decoder);
        let bad_count = *bad_utf8.borrow();
        if bad_count > 0 {
            self.sink.report(ParseError::InvalidUtf8, 0);
        }
        outcome
    }

    /// Parses a complete stylesheet from an already-decoded code point
    /// stream, mirroring `mincss_parse_unicode`.
    pub fn parse_unicode(mut self, chars: impl Iterator<Item = char>) -> ParseOutcome {
        let mut chars = chars;
        self.run(FnCharSource(move || chars.next()))
    }

    /// Lexes a complete UTF-8 byte stream into its raw token sequence,
    /// without building any tree. Backs the CLI's `-l`/`--lexer` trace
    /// mode (spec §6).
    pub fn lex_bytes_utf8(&self, mut bytes: impl Iterator<Item = u8>) -> (Vec<Token>, Vec<(ParseError, u32)>) {
        let bad_utf8 = Rc::new(RefCell::new(Vec::new()));
        let bad_utf8_inner = Rc::clone(&bad_utf8);
        let decoder =
            Utf8Decoder::new(move || bytes.next(), move || bad_utf8_inner.borrow_mut().push(()));
        let mut lexer = Lexer::new(decoder);

        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.kind == crate::token::TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }

        let mut errors = lexer.take_errors();
        if !bad_utf8.borrow().is_empty() {
            errors.push((ParseError::InvalidUtf8, 0));
            errors.sort_by_key(|(_, line)| *line);
        }
        (tokens, errors)
    }

    /// Builds the untyped structural tree from a complete UTF-8 byte
    /// stream, without constructing the typed stylesheet. Backs the
    /// CLI's `-t`/`--tree` trace mode (spec §6).
    pub fn tree_bytes_utf8(&self, mut bytes: impl Iterator<Item = u8>) -> (Node, Vec<(ParseError, u32)>) {
        let bad_utf8 = Rc::new(RefCell::new(Vec::new()));
        let bad_utf8_inner = Rc::clone(&bad_utf8);
        let decoder =
            Utf8Decoder::new(move || bytes.next(), move || bad_utf8_inner.borrow_mut().push(()));
        let reader = StructuralReader::new(decoder, self.max_depth);
        let (tree, mut errors) = reader.read_stylesheet();
        if !bad_utf8.borrow().is_empty() {
            errors.push((ParseError::InvalidUtf8, 0));
            errors.sort_by_key(|(_, line)| *line);
        }
        (tree, errors)
    }

    fn run(&mut self, source: impl CharSource) -> ParseOutcome {
        let reader = StructuralReader::new(source, self.max_depth);
        let (tree, tree_errors) = reader.read_stylesheet();
        let (stylesheet, cons_errors) = Constructor::construct(&tree);

        let mut errors: Vec<(ParseError, u32)> = tree_errors.into_iter().chain(cons_errors).collect();
        errors.sort_by_key(|(_, line)| *line);

        for (err, line) in &errors {
            self.sink.report(*err, *line);
        }

        ParseOutcome { stylesheet, errors }
    }
}
