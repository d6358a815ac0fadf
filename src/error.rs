//! Diagnostics taxonomy and the error sink.
//!
//! The message set is grounded in mincss's scattered `mincss_note_error`
//! call sites across `csslex.c`/`cssread.c`/`csscons.c`; the `Error` shape
//! (a `Copy` enum with `Display` derived by a macro) follows simplecss's
//! `Error`/`TextPos` in `lib.rs`, restyled onto `thiserror`.

use thiserror::Error;

/// Every diagnostic the parser can emit. Every variant carries only
/// `Copy` payloads so messages stay `'static`-cheap to construct and to
/// hand to an [`ErrorSink`], per the Design Notes' "error callback
/// lifetime" note.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    // -- Lexical --
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated string (ends with backslash)")]
    UnterminatedStringBackslash,
    #[error("unterminated URI (ends with backslash)")]
    UnterminatedUriBackslash,
    #[error("invalid UTF-8 byte sequence")]
    InvalidUtf8,

    // -- Structural --
    #[error("missing close-delimiter")]
    MissingCloseDelimiter,
    #[error("unexpected close-paren")]
    UnexpectedCloseParen,
    #[error("unexpected close-bracket")]
    UnexpectedCloseBracket,
    #[error("HTML comment delimiter inside @-rule")]
    CdoCdcInAtRule,
    #[error("HTML comment delimiter inside brackets")]
    CdoCdcInBrackets,
    #[error("HTML comment delimiter inside block")]
    CdoCdcInBlock,
    #[error("unexpected @-keyword inside @-rule")]
    UnexpectedAtKeywordInAtRule,
    #[error("unexpected @-keyword inside brackets")]
    UnexpectedAtKeywordInBrackets,
    #[error("unexpected semicolon inside brackets")]
    UnexpectedSemicolonInBrackets,
    #[error("unexpected block inside brackets")]
    UnexpectedBlockInBrackets,
    #[error("unexpected end of block")]
    UnexpectedEndOfBlock,
    #[error("incomplete @-rule")]
    IncompleteAtRule,

    // -- Semantic --
    #[error("selector missing block")]
    SelectorMissingBlock,
    #[error("block missing selectors")]
    BlockMissingSelectors,
    #[error("block has empty selector")]
    BlockHasEmptySelector,
    #[error("unrecognized text in selector")]
    UnrecognizedTextInSelector,
    #[error("no selector found")]
    NoSelectorFound,
    #[error("combinator not followed by selector")]
    CombinatorNotFollowedBySelector,
    #[error("declaration lacks colon")]
    DeclarationLacksColon,
    #[error("declaration property is not an identifier")]
    DeclarationPropertyNotIdent,
    #[error("missing declaration value")]
    MissingDeclarationValue,
    #[error("invalid declaration value")]
    InvalidDeclarationValue,
    #[error("declaration value cannot have +/-")]
    ValueCannotHaveSign,
    #[error("function cannot have leading +/-")]
    FunctionCannotHaveSign,
    #[error("unexpected leading separator")]
    UnexpectedLeadingSeparator,
    #[error("unexpected trailing separator")]
    UnexpectedTrailingSeparator,
    #[error("unexpected trailing +/-")]
    UnexpectedTrailingSign,
    #[error("nesting too deep")]
    NestingTooDeep,

    // -- Informational --
    #[error("@charset rule ignored (must be UTF-8)")]
    CharsetIgnored,
    #[error("@import rule ignored")]
    ImportIgnored,
    #[error("@page rule ignored")]
    PageIgnored,

    // -- Internal --
    #[error("(Internal) {0}")]
    Internal(&'static str),
}

/// Receives diagnostics as they're discovered. The parser never aborts on
/// an error; every call site reports through this trait and keeps going,
/// per spec §7's propagation policy.
pub trait ErrorSink {
    fn report(&mut self, err: ParseError, line: u32);
}

/// Default sink: logs through the `log` facade and writes to stderr when
/// no logger is installed, matching spec §6's
/// `"mincss error: <msg> (line <n>)"` fallback format.
#[derive(Default)]
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn report(&mut self, err: ParseError, line: u32) {
        log::warn!("mincss error: {} (line {})", err, line);
        if !log::log_enabled!(log::Level::Warn) {
            eprintln!("mincss error: {} (line {})", err, line);
        }
    }
}

/// Collects every diagnostic in order, for tests and the CLI's `-l`/`-t`
/// trace modes where inspecting exact messages matters.
#[derive(Default)]
pub struct CollectingSink {
    pub messages: Vec<(ParseError, u32)>,
}

impl ErrorSink for CollectingSink {
    fn report(&mut self, err: ParseError, line: u32) {
        log::warn!("mincss error: {} (line {})", err, line);
        self.messages.push((err, line));
    }
}
