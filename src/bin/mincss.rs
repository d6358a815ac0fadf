//! CLI front-end: reads a stylesheet from standard input and either runs
//! it through the full parser or stops early to dump the lexer/tree
//! trace, per spec §6.
//!
//! Grounded on gosub-engine's `clap::Parser`-derive CLI shape
//! (`src/bin/style-parser.rs`), restyled for a stdin-only, always-exit-0
//! tool.

use std::io::{self, Read};

use clap::Parser;
use mincss::{Node, NodeKind, ParserContext, Token, TokenKind, TraceLevel};

#[derive(Parser)]
#[command(name = "mincss", about = "A minimal, never-panicking CSS 2.1 parser")]
struct Cli {
    /// Stop after lexing; print each token as `<TokenName> "text"`.
    #[arg(short = 'l', long = "lexer", conflicts_with = "tree")]
    lexer: bool,

    /// Stop after building the untyped tree; dump it with indentation.
    #[arg(short = 't', long = "tree")]
    tree: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut input = Vec::new();
    if io::stdin().read_to_end(&mut input).is_err() {
        return;
    }

    let trace = if cli.lexer {
        TraceLevel::Lexer
    } else if cli.tree {
        TraceLevel::Tree
    } else {
        TraceLevel::Off
    };

    let ctx = ParserContext::new().with_trace(trace);

    match trace {
        TraceLevel::Lexer => {
            let (tokens, errors) = ctx.lex_bytes_utf8(input.into_iter());
            for tok in &tokens {
                println!("{}", format_token(tok));
            }
            report(&errors);
        }
        TraceLevel::Tree => {
            let (tree, errors) = ctx.tree_bytes_utf8(input.into_iter());
            print_node(&tree, 0);
            report(&errors);
        }
        TraceLevel::Off => {
            let outcome = ctx.parse_bytes_utf8(input.into_iter());
            for group in &outcome.stylesheet.rule_groups {
                println!("{:?}", group);
            }
        }
    }
}

fn report(errors: &[(mincss::ParseError, u32)]) {
    for (err, line) in errors {
        eprintln!("mincss error: {} (line {})", err, line);
    }
}

fn format_token(tok: &Token) -> String {
    let mut text = String::new();
    for c in &tok.text {
        if c.is_control() {
            text.push('^');
            text.push((((*c as u32) & 0x1F) as u8 + b'@') as char);
        } else {
            text.push(*c);
        }
    }
    format!("{} \"{}\"", tok.kind.name(), text)
}

fn print_node(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node.kind {
        NodeKind::Token => {
            let tok = node.token.as_ref().expect("Token node always carries a token");
            let kind_name = token_kind_name(tok.kind);
            println!("{}{} \"{}\" (line {})", indent, kind_name, tok.text, node.line);
        }
        _ => {
            let label = node.text.as_deref().unwrap_or("");
            println!("{}{:?} {} (line {})", indent, node.kind, label, node.line);
            for child in &node.children {
                print_node(child, depth + 1);
            }
        }
    }
}

fn token_kind_name(kind: TokenKind) -> &'static str {
    kind.name()
}
