//! Hand-written raw scanner producing `(RawTag, len)` pairs.
//!
//! The scanner operates on a sentinel-terminated [`Cursor`] and never
//! allocates. It does not resolve keywords, decode escapes, or decode dates;
//! those are deferred to the integration layer.
//!
//! # Start conditions
//!
//! The ledger grammar has three start conditions. Rather than keeping a mode
//! flag of its own, the raw scanner exposes one entry point per condition and
//! lets the caller pick:
//!
//! | Condition | Entry point |
//! |-----------|-------------|
//! | normal text | [`RawScanner::next_token`] |
//! | inside `"..."` | [`RawScanner::next_string_piece`] |
//! | error recovery | [`RawScanner::skip_line`], [`RawScanner::skip_string_rest`] |
//!
//! # Longest match
//!
//! Several rules can start on the same byte (a digit opens both a date and a
//! number, an uppercase letter opens an account, a currency and a flag).
//! Because [`Cursor`] is `Copy`, each candidate is measured on a lookahead copy
//! and the longest one wins; ties go to the rule listed first in the grammar.

use crate::cursor::Cursor;
use crate::source_buffer::UTF8_BOM;
use crate::tag::{RawTag, RawToken};

/// Maximum length of a commodity symbol, first and last character included.
const MAX_CURRENCY_LEN: u32 = 24;

const BOM_LEN: u32 = 3;

/// Allocation-free scanner over one source buffer.
///
/// Error conditions are encoded as `RawTag` variants, not as `Result::Err`.
pub struct RawScanner<'a> {
    cursor: Cursor<'a>,
    /// `true` until the first token of the current line has been produced.
    at_line_start: bool,
}

impl<'a> RawScanner<'a> {
    /// Create a new scanner from a cursor. A leading UTF-8 BOM is skipped.
    pub fn new(mut cursor: Cursor<'a>) -> Self {
        if cursor.pos() == 0 && cursor.starts_with(UTF8_BOM) {
            cursor.advance_n(BOM_LEN);
        }
        Self {
            cursor,
            at_line_start: true,
        }
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Returns `true` if the next token would be the first on its line.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Source text between two offsets previously returned by [`pos`](Self::pos).
    #[inline]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        self.cursor.slice(start, end)
    }

    // ─── Normal text ────────────────────────────────────────────────

    /// Produce the next raw token in normal text.
    ///
    /// Returns `RawTag::Eof` with `len == 0` when the source is exhausted.
    /// Subsequent calls after EOF continue to return `Eof`.
    pub fn next_token(&mut self) -> RawToken {
        let line_start = std::mem::replace(&mut self.at_line_start, false);
        let start = self.cursor.pos();
        match self.cursor.current() {
            0 => self.eof(start),
            b'\n' => {
                self.cursor.advance();
                self.at_line_start = true;
                self.finish(RawTag::Newline, start)
            }
            b' ' | b'\t' | b'\r' => self.whitespace(start, line_start),
            b';' => {
                self.cursor.eat_until_newline_or_eof();
                self.finish(RawTag::Comment, start)
            }
            b'*' | b':' | b'#' | b'!' | b'&' | b'%' | b'?' | b'^' | b'~' if line_start => {
                self.cursor.eat_until_newline_or_eof();
                self.finish(RawTag::SkippedLine, start)
            }
            b'0'..=b'9' => self.date_or_number(start),
            b'.' if self.cursor.peek().is_ascii_digit() => {
                let len = Self::number_len(self.cursor);
                self.cursor.advance_n(len);
                self.finish(RawTag::Number, start)
            }
            b'a'..=b'z' => self.lowercase_word(start),
            b'A'..=b'Z' => self.uppercase_word(start),
            0x80..=0xFF => self.non_ascii(start),
            b'"' => self.single(start, RawTag::Quote),
            b'#' => self.prefixed_name(start, RawTag::Tag).unwrap_or_else(|| {
                self.single(start, RawTag::Hash)
            }),
            b'^' => self
                .prefixed_name(start, RawTag::Link)
                .unwrap_or_else(|| self.invalid(start)),
            b'|' => self.single(start, RawTag::Pipe),
            b'@' => self.pair(start, b'@', RawTag::AtAt, RawTag::At),
            b'{' => self.pair(start, b'{', RawTag::LeftCurlCurl, RawTag::LeftCurl),
            b'}' => self.pair(start, b'}', RawTag::RightCurlCurl, RawTag::RightCurl),
            b',' => self.single(start, RawTag::Comma),
            b'~' => self.single(start, RawTag::Tilde),
            b'+' => self.single(start, RawTag::Plus),
            b'-' => self.single(start, RawTag::Minus),
            b'/' => self.single(start, RawTag::Slash),
            b'(' => self.single(start, RawTag::LeftParen),
            b')' => self.single(start, RawTag::RightParen),
            b'*' => self.single(start, RawTag::Asterisk),
            b':' => self.single(start, RawTag::Colon),
            b'=' => self.single(start, RawTag::Equal),
            b'!' | b'&' | b'?' | b'%' => self.single(start, RawTag::Flag),
            _ => self.invalid(start),
        }
    }

    #[inline]
    fn finish(&self, tag: RawTag, start: u32) -> RawToken {
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }

    #[inline]
    fn single(&mut self, start: u32, tag: RawTag) -> RawToken {
        self.cursor.advance();
        self.finish(tag, start)
    }

    /// One- or two-byte punctuation where the second byte repeats or not.
    #[inline]
    fn pair(&mut self, start: u32, second: u8, double: RawTag, single: RawTag) -> RawToken {
        if self.cursor.peek() == second {
            self.cursor.advance_n(2);
            self.finish(double, start)
        } else {
            self.single(start, single)
        }
    }

    fn eof(&mut self, start: u32) -> RawToken {
        if self.cursor.is_eof() {
            RawToken {
                tag: RawTag::Eof,
                len: 0,
            }
        } else {
            // Interior null byte: no rule matches it.
            self.cursor.advance();
            self.finish(RawTag::InvalidByte, start)
        }
    }

    #[cold]
    fn invalid(&mut self, start: u32) -> RawToken {
        self.cursor.advance_char();
        self.finish(RawTag::InvalidByte, start)
    }

    fn whitespace(&mut self, start: u32, line_start: bool) -> RawToken {
        if line_start {
            self.cursor.eat_while(|b| b == b' ' || b == b'\t');
            let indented = self.cursor.pos() > start
                && !matches!(self.cursor.current(), b'\n' | b'\r')
                && !self.cursor.is_eof();
            if indented {
                return self.finish(RawTag::Indent, start);
            }
        }
        self.cursor.eat_while(is_blank);
        self.finish(RawTag::Whitespace, start)
    }

    // ─── Dates and numbers ──────────────────────────────────────────

    fn date_or_number(&mut self, start: u32) -> RawToken {
        let number = Self::number_len(self.cursor);
        match Self::date_len(self.cursor) {
            Some(date) if date >= number => {
                self.cursor.advance_n(date);
                self.finish(RawTag::Date, start)
            }
            _ => {
                self.cursor.advance_n(number);
                self.finish(RawTag::Number, start)
            }
        }
    }

    /// `[0-9]{4,}[-/][0-9]+[-/][0-9]+`
    fn date_len(mut ahead: Cursor<'_>) -> Option<u32> {
        let start = ahead.pos();
        if ahead.count_while(|b| b.is_ascii_digit()) < 4 {
            return None;
        }
        for _ in 0..2 {
            if !matches!(ahead.current(), b'-' | b'/') {
                return None;
            }
            ahead.advance();
            if ahead.count_while(|b| b.is_ascii_digit()) == 0 {
                return None;
            }
        }
        Some(ahead.pos() - start)
    }

    /// `([0-9]+|[0-9][0-9,]+[0-9])(\.[0-9]*)?` or `\.[0-9]+`
    ///
    /// Trailing commas are not part of the number.
    fn number_len(origin: Cursor<'_>) -> u32 {
        let start = origin.pos();
        let mut ahead = origin;
        let mut integer_end = start;
        loop {
            match ahead.current() {
                b'0'..=b'9' => {
                    ahead.advance();
                    integer_end = ahead.pos();
                }
                b',' if integer_end > start => ahead.advance(),
                _ => break,
            }
        }

        let mut tail = origin;
        tail.advance_n(integer_end - start);
        if tail.current() == b'.' {
            tail.advance();
            tail.eat_while(|b| b.is_ascii_digit());
        }
        tail.pos() - start
    }

    // ─── Words ──────────────────────────────────────────────────────

    /// `[a-z][a-zA-Z0-9-_]*`, a key when directly followed by `:`.
    fn lowercase_word(&mut self, start: u32) -> RawToken {
        self.cursor.advance();
        self.cursor.eat_while(is_key_char);
        if self.cursor.current() == b':' {
            self.finish(RawTag::Key, start)
        } else {
            self.finish(RawTag::Ident, start)
        }
    }

    /// Account, currency, or single-letter flag.
    fn uppercase_word(&mut self, start: u32) -> RawToken {
        let account = Self::account_len(self.cursor).unwrap_or(0);
        let currency = Self::currency_len(self.cursor).unwrap_or(0);
        if account > 0 && account >= currency {
            self.cursor.advance_n(account);
            self.finish(RawTag::Account, start)
        } else if currency > 0 {
            self.cursor.advance_n(currency);
            self.finish(RawTag::Currency, start)
        } else if matches!(
            self.cursor.current(),
            b'P' | b'S' | b'T' | b'C' | b'U' | b'R' | b'M'
        ) {
            self.single(start, RawTag::Flag)
        } else {
            self.invalid(start)
        }
    }

    /// Account names may start with any non-ASCII character.
    fn non_ascii(&mut self, start: u32) -> RawToken {
        match Self::account_len(self.cursor) {
            Some(len) => {
                self.cursor.advance_n(len);
                self.finish(RawTag::Account, start)
            }
            None => self.invalid(start),
        }
    }

    /// `TYPE(:COMPONENT)+`
    fn account_len(mut ahead: Cursor<'_>) -> Option<u32> {
        let start = ahead.pos();
        let first = ahead.current();
        if !(first.is_ascii_uppercase() || first >= 0x80) {
            return None;
        }
        ahead.advance();
        ahead.eat_while(is_account_char);
        let mut components = 0u32;
        while ahead.current() == b':' && is_component_start(ahead.peek()) {
            ahead.advance_n(2);
            ahead.eat_while(is_account_char);
            components += 1;
        }
        (components > 0).then(|| ahead.pos() - start)
    }

    /// `[A-Z][A-Z0-9'._-]{0,22}[A-Z0-9]`
    fn currency_len(mut ahead: Cursor<'_>) -> Option<u32> {
        let start = ahead.pos();
        if !ahead.current().is_ascii_uppercase() {
            return None;
        }
        ahead.advance();
        let mut best = None;
        for _ in 1..MAX_CURRENCY_LEN {
            let b = ahead.current();
            if !is_currency_char(b) {
                break;
            }
            ahead.advance();
            if b.is_ascii_uppercase() || b.is_ascii_digit() {
                best = Some(ahead.pos() - start);
            }
        }
        best
    }

    /// `#name` or `^name`. Returns `None` (consuming nothing) when no name
    /// character follows the prefix.
    fn prefixed_name(&mut self, start: u32, tag: RawTag) -> Option<RawToken> {
        if !is_tag_char(self.cursor.peek()) {
            return None;
        }
        self.cursor.advance();
        self.cursor.eat_while(is_tag_char);
        Some(self.finish(tag, start))
    }

    // ─── String literals ────────────────────────────────────────────

    /// Produce the next piece of a string literal body.
    ///
    /// Called after the opening [`RawTag::Quote`]. Returns
    /// [`RawTag::StrClose`] on the closing quote and [`RawTag::Eof`] if the
    /// source ends first. A backslash as the very last byte of the source is
    /// returned as one byte of [`RawTag::StrText`]. A backslash before a
    /// `\r\n` pair is a single three-byte [`RawTag::StrEscape`].
    pub fn next_string_piece(&mut self) -> RawToken {
        let start = self.cursor.pos();
        match self.cursor.current() {
            b'"' => self.single(start, RawTag::StrClose),
            b'\n' => self.single(start, RawTag::StrNewline),
            b'\\' => {
                self.cursor.advance();
                if self.cursor.is_eof() {
                    return self.finish(RawTag::StrText, start);
                }
                if self.cursor.starts_with(b"\r\n") {
                    self.cursor.advance_n(2);
                } else {
                    self.cursor.advance_char();
                }
                self.finish(RawTag::StrEscape, start)
            }
            _ if self.cursor.is_eof() => RawToken {
                tag: RawTag::Eof,
                len: 0,
            },
            _ => {
                self.cursor.skip_to_string_delim();
                self.finish(RawTag::StrText, start)
            }
        }
    }

    /// Discard the remainder of a string literal, through the closing quote
    /// or to EOF. Escaped quotes do not close the literal.
    pub fn skip_string_rest(&mut self) -> RawToken {
        let start = self.cursor.pos();
        loop {
            match self.cursor.skip_to_string_delim() {
                b'"' => {
                    self.cursor.advance();
                    break;
                }
                b'\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance_char();
                    }
                }
                b'\n' => self.cursor.advance(),
                _ => break,
            }
        }
        self.finish(RawTag::Discarded, start)
    }

    // ─── Recovery ───────────────────────────────────────────────────

    /// Discard the rest of the line. The newline itself is left for
    /// [`next_token`](Self::next_token).
    pub fn skip_line(&mut self) -> RawToken {
        let start = self.cursor.pos();
        self.cursor.eat_until_newline_or_eof();
        self.finish(RawTag::Discarded, start)
    }
}

#[inline]
fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r')
}

#[inline]
fn is_key_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

#[inline]
fn is_account_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b >= 0x80
}

#[inline]
fn is_component_start(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b >= 0x80
}

#[inline]
fn is_currency_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || matches!(b, b'\'' | b'.' | b'_' | b'-')
}

#[inline]
fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'/' | b'.')
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
