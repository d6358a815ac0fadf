//! The CSS 2.1 token classes produced by the [`lexer`](crate::lexer).

/// The tag of a lexical token.
///
/// Mirrors the `tokentype` enumeration of a CSS 2.1 tokenizer: every
/// class the grammar distinguishes at the character level, nothing more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Delim,
    Space,
    Comment,
    Number,
    String,
    Ident,
    AtKeyword,
    Percentage,
    Dimension,
    Function,
    Hash,
    Uri,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Semicolon,
    Includes,
    DashMatch,
    Cdo,
    Cdc,
}

impl TokenKind {
    /// The name used by the `-l`/`--lexer` trace dump, matching mincss's
    /// `mincss_token_name`.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Delim => "Delim",
            TokenKind::Space => "Space",
            TokenKind::Comment => "Comment",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Ident => "Ident",
            TokenKind::AtKeyword => "AtKeyword",
            TokenKind::Percentage => "Percentage",
            TokenKind::Dimension => "Dimension",
            TokenKind::Function => "Function",
            TokenKind::Hash => "Hash",
            TokenKind::Uri => "URI",
            TokenKind::LBrace => "LBrace",
            TokenKind::RBrace => "RBrace",
            TokenKind::LBracket => "LBracket",
            TokenKind::RBracket => "RBracket",
            TokenKind::LParen => "LParen",
            TokenKind::RParen => "RParen",
            TokenKind::Colon => "Colon",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Includes => "Includes",
            TokenKind::DashMatch => "DashMatch",
            TokenKind::Cdo => "CDO",
            TokenKind::Cdc => "CDC",
        }
    }
}

/// A single lexical token, as produced by [`Lexer::next_token`](crate::lexer::Lexer::next_token).
///
/// `text` holds the *raw* accepted characters (delimiters and sigils not
/// yet stripped -- that happens at the [`TokenStream`](crate::stream::TokenStream)
/// layer). `div` marks the numeric/unit boundary within a `Dimension`
/// token's text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Vec<char>,
    pub div: Option<usize>,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: Vec<char>, line: u32) -> Token {
        Token { kind, text, div: None, line }
    }

    pub fn with_div(kind: TokenKind, text: Vec<char>, div: usize, line: u32) -> Token {
        Token { kind, text, div: Some(div), line }
    }

    pub fn eof(line: u32) -> Token {
        Token { kind: TokenKind::Eof, text: Vec::new(), div: None, line }
    }

    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }
}
