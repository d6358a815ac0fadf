/*!
A minimal, never-panicking [CSS 2.1](https://www.w3.org/TR/CSS21/) parser.

This is not a browser-grade CSS parser. If you need one, use
[cssparser](https://crates.io/crates/cssparser) + the
[selectors](https://crates.io/crates/selectors) crate.

Parsing runs in three stages -- a lexer that classifies code points into
tokens, a structural reader that groups tokens into a balanced-bracket
tree, and a constructor that turns that tree into the typed
[`Stylesheet`] -- and none of them ever panics on malformed input. Every
recoverable problem is reported as a [`ParseError`] through an
[`ErrorSink`] instead, and parsing degrades gracefully: a malformed
selector drops that one rule-group, a truncated file closes its open
blocks, deeply nested input is cut off at a configurable depth.

## Limitations

- At-rule bodies (`@media`, `@import`, `@charset`, `@page`, ...) are
  recognized but not expanded; `@import`/`@charset`/`@page` are reported
  as informational and skipped.
- Property values are split into typed terms (numbers, idents, strings,
  dimensions, function calls, ...) but not interpreted -- `width: 5px`
  yields a `Dimension` term, not a resolved length.
- Attribute selectors (`[foo=bar]`) are recognized and kept as raw text;
  their internal grammar is not parsed.

## Example

```
use mincss::ParserContext;

let css = "h1, h2 { color: red; font-size: 12px !important; }";
let outcome = ParserContext::new().parse_unicode(css.chars());
assert_eq!(outcome.stylesheet.rule_groups.len(), 1);
assert!(outcome.errors.is_empty());
```
*/

#![forbid(unsafe_code)]

mod ast;
mod buffer;
mod constructor;
mod context;
mod error;
mod lexer;
mod source;
mod stream;
mod token;
mod trace;
mod tree;

pub use ast::{
    Combinator, Declaration, PValue, PValuePayload, RuleGroup, Selector, SelectorElement,
    Separator, Stylesheet, UnarySign,
};
pub use context::{ParseOutcome, ParserContext};
pub use error::{CollectingSink, ErrorSink, ParseError, StderrSink};
pub use source::{CharSource, FnCharSource, Utf8Decoder};
pub use token::{Token, TokenKind};
pub use trace::TraceLevel;
pub use tree::{Node, NodeKind, DEFAULT_MAX_DEPTH};
