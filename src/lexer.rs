//! Classifies runs of code points into CSS 2.1 tokens.
//!
//! A close Rust transcription of mincss's `csslex.c`: same dispatch order,
//! same pushback/erase discipline, same escape-handling edge cases. The
//! teacher's `Stream`-cursor style (`stream.rs`) is kept for naming, but
//! the actual state machine below follows the C original term for term,
//! since the distilled spec's Section 4.2 is effectively a description of
//! that file.

use crate::buffer::TokenBuffer;
use crate::error::ParseError;
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{0C}')
}

fn is_number_start(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c >= '\u{A0}'
}

/// Converts a character stream into CSS tokens, one call to
/// [`next_token`](Lexer::next_token) at a time.
pub struct Lexer<S: CharSource> {
    buf: TokenBuffer<S>,
    pub error_count: u32,
    errors: Vec<(ParseError, u32)>,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Lexer<S> {
        Lexer { buf: TokenBuffer::new(source), error_count: 0, errors: Vec::new() }
    }

    /// Drains any lexical errors accumulated since the last call.
    pub fn take_errors(&mut self) -> Vec<(ParseError, u32)> {
        std::mem::take(&mut self.errors)
    }

    fn note_error(&mut self, err: ParseError) {
        let line = self.buf.line();
        self.error_count += 1;
        self.errors.push((err, line));
    }

    fn next_char(&mut self) -> Option<char> {
        self.buf.next_char()
    }

    fn putback(&mut self, n: usize) {
        self.buf.putback(n)
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.buf.accepted_text().to_vec(), self.buf.line())
    }

    fn token_with_div(&self, kind: TokenKind, div: usize) -> Token {
        Token::with_div(kind, self.buf.accepted_text().to_vec(), div, self.buf.line())
    }

    /// Produces the next token. Never returns an `Err`: lexical problems
    /// (unterminated string/comment) are recorded via `take_errors` and a
    /// best-effort token is still returned, per spec §7's recovery policy.
    pub fn next_token(&mut self) -> Token {
        self.buf.start_token();

        let ch = match self.next_char() {
            None => return Token::eof(self.buf.line()),
            Some(c) => c,
        };

        match ch {
            '(' => return self.token(TokenKind::LParen),
            ')' => return self.token(TokenKind::RParen),
            '[' => return self.token(TokenKind::LBracket),
            ']' => return self.token(TokenKind::RBracket),
            '{' => return self.token(TokenKind::LBrace),
            '}' => return self.token(TokenKind::RBrace),
            ':' => return self.token(TokenKind::Colon),
            ';' => return self.token(TokenKind::Semicolon),
            '~' => {
                match self.next_char() {
                    None => return self.token(TokenKind::Delim),
                    Some('=') => return self.token(TokenKind::Includes),
                    Some(_) => {
                        self.putback(1);
                        return self.token(TokenKind::Delim);
                    }
                }
            }
            '|' => {
                match self.next_char() {
                    None => return self.token(TokenKind::Delim),
                    Some('=') => return self.token(TokenKind::DashMatch),
                    Some(_) => {
                        self.putback(1);
                        return self.token(TokenKind::Delim);
                    }
                }
            }
            '@' => {
                let len = self.parse_ident(false);
                if len == 0 {
                    return self.token(TokenKind::Delim);
                }
                return self.token(TokenKind::AtKeyword);
            }
            '#' => {
                let len = self.parse_ident(true);
                if len == 1 {
                    return self.token(TokenKind::Delim);
                }
                return self.token(TokenKind::Hash);
            }
            '<' => {
                return self.lex_cdo();
            }
            _ => {}
        }

        if is_whitespace(ch) {
            loop {
                match self.next_char() {
                    None => return self.token(TokenKind::Space),
                    Some(c) if !is_whitespace(c) => {
                        self.putback(1);
                        return self.token(TokenKind::Space);
                    }
                    _ => continue,
                }
            }
        }

        if ch == '"' || ch == '\'' {
            self.parse_string(ch);
            return self.token(TokenKind::String);
        }

        if is_number_start(ch) {
            self.putback(1);
            let numlen = self.parse_number();
            if numlen == 0 {
                let _ = self.next_char();
                return self.token(TokenKind::Delim);
            }
            match self.next_char() {
                None => return self.token(TokenKind::Number),
                Some('%') => return self.token(TokenKind::Percentage),
                Some(c) if c == '-' || is_ident_start(c) => {
                    self.putback(1);
                    let div = numlen;
                    let len = self.parse_ident(false);
                    if len > 0 {
                        return self.token_with_div(TokenKind::Dimension, div);
                    }
                    return self.token(TokenKind::Number);
                }
                Some(_) => {
                    self.putback(1);
                    return self.token(TokenKind::Number);
                }
            }
        }

        if ch == '-' || is_ident_start(ch) {
            return self.lex_ident_or_cdc();
        }

        if ch == '/' {
            return self.lex_comment();
        }

        if ch == '\\' {
            return self.lex_backslash();
        }

        self.token(TokenKind::Delim)
    }

    fn lex_cdo(&mut self) -> Token {
        match self.next_char() {
            None => return self.token(TokenKind::Delim),
            Some('!') => {}
            Some(_) => {
                self.putback(1);
                return self.token(TokenKind::Delim);
            }
        }
        match self.next_char() {
            None => {
                self.putback(1);
                return self.token(TokenKind::Delim);
            }
            Some('-') => {}
            Some(_) => {
                self.putback(2);
                return self.token(TokenKind::Delim);
            }
        }
        match self.next_char() {
            None => {
                self.putback(2);
                return self.token(TokenKind::Delim);
            }
            Some('-') => self.token(TokenKind::Cdo),
            Some(_) => {
                self.putback(3);
                self.token(TokenKind::Delim)
            }
        }
    }

    /// Ordinary identifiers, plus the `-->` CDC special case. A minus
    /// sign always starts an identifier in CSS 2.1, never a number.
    fn lex_ident_or_cdc(&mut self) -> Token {
        match self.next_char() {
            None => {}
            Some('-') => match self.next_char() {
                None => self.putback(1),
                Some('>') => return self.token(TokenKind::Cdc),
                Some(_) => self.putback(2),
            },
            Some(_) => self.putback(1),
        }

        self.putback(1);
        let len = self.parse_ident(false);
        if len == 0 {
            let _ = self.next_char();
            return self.token(TokenKind::Delim);
        }

        if len == 3 && self.buf.accepted_text() == ['u', 'r', 'l'] {
            let sublen = self.parse_uri_body();
            if sublen > 0 {
                return self.token(TokenKind::Uri);
            }
        }

        match self.next_char() {
            None => self.token(TokenKind::Ident),
            Some('(') => self.token(TokenKind::Function),
            Some(_) => {
                self.putback(1);
                self.token(TokenKind::Ident)
            }
        }
    }

    fn lex_comment(&mut self) -> Token {
        match self.next_char() {
            None => return self.token(TokenKind::Delim),
            Some('*') => {}
            Some(_) => {
                self.putback(1);
                return self.token(TokenKind::Delim);
            }
        }

        let mut got_star = false;
        loop {
            match self.next_char() {
                None => {
                    self.note_error(ParseError::UnterminatedComment);
                    return self.token(TokenKind::Comment);
                }
                Some('/') if got_star => return self.token(TokenKind::Comment),
                Some(c) => got_star = c == '*',
            }
        }
    }

    /// A backslash which forms a hex escape is the start of an
    /// identifier (even if not otherwise ident-start). A backslashed
    /// non-whitespace character starts an identifier as itself. A
    /// backslash before whitespace/EOF is a plain `Delim`.
    fn lex_backslash(&mut self) -> Token {
        let newline_len = self.parse_universal_newline();
        if newline_len > 0 {
            self.putback(newline_len);
            return self.token(TokenKind::Delim);
        }

        let (hexlen, val) = self.parse_escaped_hex();
        if hexlen > 0 {
            self.buf.erase(hexlen);
            self.buf.set_last_accepted(val);
            self.parse_ident(true);
            return match self.next_char() {
                None => self.token(TokenKind::Ident),
                Some('(') => self.token(TokenKind::Function),
                Some(_) => {
                    self.putback(1);
                    self.token(TokenKind::Ident)
                }
            };
        }

        match self.next_char() {
            None => self.token(TokenKind::Delim),
            Some(c) => {
                self.buf.erase(1);
                self.buf.set_last_accepted(c);
                self.parse_ident(true);
                match self.next_char() {
                    None => self.token(TokenKind::Ident),
                    Some('(') => self.token(TokenKind::Function),
                    Some(_) => {
                        self.putback(1);
                        self.token(TokenKind::Ident)
                    }
                }
            }
        }
    }

    /// Parses a number (integer or decimal, no sign). Returns the count
    /// of characters parsed, or 0 (with input pushed back) if the text
    /// isn't a number after all (a lone `.`).
    fn parse_number(&mut self) -> usize {
        let mut count = 0usize;
        let mut dotpos: Option<usize> = None;

        let ch = match self.next_char() {
            None => return 0,
            Some(c) => c,
        };
        count += 1;
        if !is_number_start(ch) {
            self.putback(count);
            return 0;
        }
        if ch == '.' {
            dotpos = Some(0);
        }

        loop {
            let ch = match self.next_char() {
                None => {
                    if dotpos == Some(0) && count == 1 {
                        self.putback(count);
                        return 0;
                    }
                    if let Some(d) = dotpos {
                        if d == count - 1 {
                            self.putback(1);
                            return count - 1;
                        }
                    }
                    return count;
                }
                Some(c) => c,
            };
            count += 1;

            if ch == '.' {
                if let Some(d) = dotpos {
                    if d == 0 && count == 2 {
                        self.putback(count);
                        return 0;
                    }
                    if d == count - 2 {
                        self.putback(2);
                        return count - 2;
                    }
                    self.putback(1);
                    return count - 1;
                }
                dotpos = Some(count - 1);
                continue;
            }

            if !ch.is_ascii_digit() {
                if dotpos == Some(0) && count == 2 {
                    self.putback(count);
                    return 0;
                }
                if let Some(d) = dotpos {
                    if d == count - 2 {
                        self.putback(2);
                        return count - 2;
                    }
                }
                self.putback(1);
                return count - 1;
            }
        }
    }

    /// Parses a quoted string; the opening quote has already been
    /// accepted. An unescaped newline ends the string early and is
    /// reported; EOF likewise.
    fn parse_string(&mut self, delim: char) {
        loop {
            let ch = match self.next_char() {
                None => {
                    self.note_error(ParseError::UnterminatedString);
                    return;
                }
                Some(c) => c,
            };

            if ch == delim {
                return;
            }

            if ch == '\\' {
                let newline_len = self.parse_universal_newline();
                if newline_len > 0 {
                    self.buf.erase(newline_len + 1);
                    continue;
                }
                let (hexlen, val) = self.parse_escaped_hex();
                if hexlen > 0 {
                    self.buf.erase(hexlen);
                    self.buf.set_last_accepted(val);
                    continue;
                }
                match self.next_char() {
                    None => {
                        self.note_error(ParseError::UnterminatedStringBackslash);
                        return;
                    }
                    Some(c) => {
                        self.buf.erase(1);
                        self.buf.set_last_accepted(c);
                        continue;
                    }
                }
            }

            if ch == '\n' || ch == '\r' || ch == '\u{0C}' {
                self.note_error(ParseError::UnterminatedString);
                return;
            }
        }
    }

    /// Parses an identifier. If `gotstart` the initial character is
    /// already accepted (used for `#hash` and post-escape continuation);
    /// otherwise the leading character (possibly a lone `-`, possibly a
    /// hex/literal escape) is read here. Returns the accepted length, 0
    /// (with pushback) if no identifier was present.
    fn parse_ident(&mut self, gotstart: bool) -> usize {
        let mut count;

        if !gotstart {
            count = 0;
            let ch = match self.next_char() {
                None => return 0,
                Some(c) => c,
            };
            count += 1;

            let mut ch = ch;
            if ch == '-' {
                match self.next_char() {
                    None => {
                        self.putback(count);
                        return 0;
                    }
                    Some(c) => {
                        ch = c;
                        count += 1;
                    }
                }
            }

            if ch == '\\' {
                let newline_len = self.parse_universal_newline();
                if newline_len > 0 {
                    self.putback(1 + newline_len);
                    return count - (1 + newline_len);
                }
                let (hexlen, val) = self.parse_escaped_hex();
                if hexlen > 0 {
                    self.buf.erase(hexlen);
                    self.buf.set_last_accepted(val);
                } else {
                    match self.next_char() {
                        None => {
                            self.putback(1);
                            return count - 1;
                        }
                        Some(c) => {
                            self.buf.erase(1);
                            self.buf.set_last_accepted(c);
                        }
                    }
                }
            } else if !is_ident_start(ch) {
                self.putback(count);
                return 0;
            }
        } else {
            count = 1;
        }

        loop {
            let ch = match self.next_char() {
                None => return count,
                Some(c) => c,
            };
            count += 1;

            if ch == '\\' {
                let newline_len = self.parse_universal_newline();
                if newline_len > 0 {
                    self.putback(1 + newline_len);
                    return count - (1 + newline_len);
                }
                let (hexlen, val) = self.parse_escaped_hex();
                if hexlen > 0 {
                    self.buf.erase(hexlen);
                    self.buf.set_last_accepted(val);
                    continue;
                }
                match self.next_char() {
                    None => {
                        self.putback(1);
                        return count - 1;
                    }
                    Some(c) => {
                        self.buf.erase(1);
                        self.buf.set_last_accepted(c);
                        continue;
                    }
                }
            }

            if !(is_ident_start(ch) || ch == '-' || ch.is_ascii_digit()) {
                self.putback(1);
                return count - 1;
            }
        }
    }

    /// Parses a URI body: `(`, optional whitespace, a quoted string or an
    /// unquoted run, optional whitespace, `)`. The leading `url` has
    /// already been accepted. Returns 0 (with full pushback) on anything
    /// malformed, letting `url` fall back to a plain identifier.
    fn parse_uri_body(&mut self) -> usize {
        let mut count = 0usize;

        let ch = match self.next_char() {
            None => return 0,
            Some(c) => c,
        };
        count += 1;
        if ch != '(' {
            self.putback(1);
            return 0;
        }

        let ch = loop {
            match self.next_char() {
                None => {
                    self.putback(count);
                    return 0;
                }
                Some(c) => {
                    count += 1;
                    if is_whitespace(c) {
                        continue;
                    }
                    break c;
                }
            }
        };

        if (ch as u32) < 0x20 || ch == '(' || ch == ')' || ((ch as u32) > 0x7E && (ch as u32) < 0xA0) {
            self.putback(count);
            return 0;
        }

        if ch == '"' || ch == '\'' {
            let start_accepted = count;
            let _ = start_accepted;
            // parse_string consumes until the matching quote (or errors);
            // either way treat it as consumed length against our `count`.
            let before = self.buf.accepted_text().len();
            self.parse_string(ch);
            let consumed = self.buf.accepted_text().len() - before;
            if consumed == 0 {
                self.putback(count);
                return 0;
            }
            count += consumed;
        } else {
            // Unquoted body: put the first char back, it might be a backslash.
            self.putback(1);
            count -= 1;
            loop {
                let ch = match self.next_char() {
                    None => {
                        self.putback(count);
                        return 0;
                    }
                    Some(c) => c,
                };
                count += 1;

                if ch == '\\' {
                    let newline_len = self.parse_universal_newline();
                    if newline_len > 0 {
                        self.buf.erase(newline_len + 1);
                        count -= 1;
                        continue;
                    }
                    let (hexlen, val) = self.parse_escaped_hex();
                    if hexlen > 0 {
                        self.buf.erase(hexlen);
                        self.buf.set_last_accepted(val);
                        continue;
                    }
                    match self.next_char() {
                        None => {
                            self.note_error(ParseError::UnterminatedUriBackslash);
                            return count;
                        }
                        Some(c) => {
                            self.buf.erase(1);
                            self.buf.set_last_accepted(c);
                            continue;
                        }
                    }
                }

                let cv = ch as u32;
                if cv < 0x20
                    || ch == '"'
                    || ch == '\''
                    || ch == '('
                    || ch == ')'
                    || ch == '\\'
                    || (cv > 0x7E && cv < 0xA0)
                {
                    self.putback(1);
                    count -= 1;
                    break;
                }
            }
        }

        loop {
            match self.next_char() {
                None => {
                    self.putback(count);
                    return 0;
                }
                Some(c) => {
                    count += 1;
                    if is_whitespace(c) {
                        continue;
                    }
                    if c == ')' {
                        break;
                    }
                    self.putback(count);
                    return 0;
                }
            }
        }

        count
    }

    /// Consumes one newline sequence (`\n`, `\r\n`, `\r`, `\f`). Returns
    /// the number of characters consumed, or 0 (with full pushback) if
    /// the current position isn't a newline.
    fn parse_universal_newline(&mut self) -> usize {
        let ch = match self.next_char() {
            None => return 0,
            Some(c) => c,
        };
        let mut count = 1;

        if ch == '\n' || ch == '\u{0C}' {
            return count;
        }

        if ch == '\r' {
            match self.next_char() {
                None => return count,
                Some('\n') => {
                    count += 1;
                    return count;
                }
                Some(_) => {
                    self.putback(1);
                    return count;
                }
            }
        }

        self.putback(count);
        0
    }

    /// Parses 1-6 hex digits (optionally followed by one whitespace
    /// character, which is swallowed). The leading backslash has already
    /// been accepted. Returns `(count, value)`; `count == 0` means no hex
    /// escape was present (input restored).
    fn parse_escaped_hex(&mut self) -> (usize, char) {
        let mut count = 0usize;
        let mut res: u32 = 0;
        let mut last: Option<char> = None;

        loop {
            let ch = match self.next_char() {
                None => {
                    return (count, char::from_u32(res).unwrap_or('?'));
                }
                Some(c) => c,
            };
            count += 1;
            last = Some(ch);
            if count > 6 || !is_hex_digit(ch) {
                break;
            }
            let digit = ch.to_digit(16).unwrap();
            res = (res << 4) + digit;
        }

        let ch = last.unwrap();

        if ch == '\r' && count >= 2 {
            match self.next_char() {
                None => return (count, char::from_u32(res).unwrap_or('?')),
                Some('\n') => {
                    count += 1;
                    return (count, char::from_u32(res).unwrap_or('?'));
                }
                Some(_) => {
                    self.putback(1);
                    count -= 1;
                    return (count, char::from_u32(res).unwrap_or('?'));
                }
            }
        }

        if is_whitespace(ch) && count >= 2 {
            return (count, char::from_u32(res).unwrap_or('?'));
        }

        self.putback(1);
        count -= 1;
        if count == 0 {
            (0, '?')
        } else {
            (count, char::from_u32(res).unwrap_or('?'))
        }
    }
}
