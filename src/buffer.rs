//! The token buffer: a single owned array of code points with two
//! cursors, serving as both the current token's accepted text and the
//! lexer's pushback queue.
//!
//! Grounded on mincss's `mincss_context_struct` fields `token` /
//! `tokenbufsize` / `tokenmark` / `tokenlen` (`cssint.h`) and the
//! `next_char`/`putback_char`/`erase_char` trio in `csslex.c`.

use crate::source::CharSource;

/// Owns the pushback buffer and line counter shared across the whole
/// lexing pass. `accepted` is the number of characters committed to the
/// token under construction; `mark` (`>= accepted`) is the number of
/// characters currently resident in the buffer, some of which may be
/// pushed-back lookahead destined for the *next* token.
pub struct TokenBuffer<S: CharSource> {
    source: S,
    buf: Vec<char>,
    accepted: usize,
    mark: usize,
    line: u32,
}

impl<S: CharSource> TokenBuffer<S> {
    pub fn new(source: S) -> TokenBuffer<S> {
        TokenBuffer { source, buf: Vec::new(), accepted: 0, mark: 0, line: 1 }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Discards the accepted portion of the buffer, sliding any pending
    /// pushback down to offset 0. Call this at the start of each new
    /// token, per `mincss_next_token`'s opening `memmove`.
    pub fn start_token(&mut self) {
        if self.accepted == 0 {
            return;
        }
        let extra = self.mark - self.accepted;
        if extra > 0 {
            self.buf.copy_within(self.accepted..self.mark, 0);
        }
        self.buf.truncate(extra);
        self.accepted = 0;
        self.mark = extra;
    }

    /// Returns `buf[..accepted]`, the text accepted so far into the
    /// current token.
    pub fn accepted_text(&self) -> &[char] {
        &self.buf[..self.accepted]
    }

    /// Pulls the next code point: re-delivers pushed-back lookahead if
    /// any remains, otherwise reads a fresh one from the source. Returns
    /// `None` at end of stream, leaving both cursors untouched.
    pub fn next_char(&mut self) -> Option<char> {
        if self.accepted < self.mark {
            let c = self.buf[self.accepted];
            self.accepted += 1;
            return Some(c);
        }

        let c = self.source.next_char()?;
        if c == '\n' || c == '\r' {
            self.line += 1;
        }
        self.buf.push(c);
        self.accepted += 1;
        self.mark += 1;
        Some(c)
    }

    /// Rolls back `n` accepted characters; they remain in the buffer and
    /// will be re-delivered by subsequent `next_char` calls.
    pub fn putback(&mut self, n: usize) {
        debug_assert!(n <= self.accepted, "putback beyond accepted region");
        self.accepted = self.accepted.saturating_sub(n);
    }

    /// Removes the last `n` accepted characters from the buffer entirely
    /// (used when an escape sequence collapses a run of hex digits into
    /// one decoded character). Shifts any pending pushback left.
    pub fn erase(&mut self, n: usize) {
        debug_assert!(n <= self.accepted, "erase beyond accepted region");
        self.buf.copy_within(self.accepted..self.mark, self.accepted - n);
        self.buf.truncate(self.mark - n);
        self.accepted -= n;
        self.mark -= n;
    }

    /// Overwrites the character immediately before the current accepted
    /// cursor -- used to substitute a decoded escape value for the
    /// backslash that introduced it.
    pub fn set_last_accepted(&mut self, c: char) {
        debug_assert!(self.accepted > 0);
        self.buf[self.accepted - 1] = c;
    }
}
