//! The scanner state machine.
//!
//! Sits on top of [`RawScanner`] and adds everything the raw layer leaves
//! out: start conditions, line/column tracking, escape decoding, keyword
//! resolution, the builder protocol and error reporting.
//!
//! # Modes
//!
//! ```text
//!            `"`                      invalid escape / EOF / `"`
//!  INITIAL ────────▶ STRLIT ─────────────────────────────────▶ INITIAL
//!     │  ▲
//!     │  └──────────── INVALID ◀── unrecognized input (LEX_ERROR)
//!     │    rest of line skipped, newline kept
//! ```
//!
//! Each mode has its own raw entry point; [`Scanner::next_token`] loops over
//! the current mode's step until one of them produces a token.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ledger_lexer_core::{RawScanner, RawTag, SourceBuffer};
use tracing::{debug, trace};

use crate::builder::call_builder;
use crate::escape::decode_escape;
use crate::fixed_width::decode_date;
use crate::{
    keywords, BuildArgs, BuildRequest, Builder, ErrorSink, LexError, LexErrorKind, Location,
    LocationTracker, ScanError, ScanOptions, StringAccumulator, Token, TokenFlags, TokenKind,
};

/// Start condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    /// Skipping the rest of a line after unrecognized input.
    InvalidRecovery,
    /// Inside a quoted string.
    StringLiteral,
}

impl Mode {
    /// Start condition name as the grammar tooling knows it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "INITIAL",
            Self::InvalidRecovery => "INVALID",
            Self::StringLiteral => "STRLIT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opening quote of the literal being accumulated.
#[derive(Clone, Debug)]
struct OpenString {
    offset: u32,
    location: Location,
}

/// Result of one step: `Ok(None)` means keep going.
type Step<'src, V> = Result<Option<Token<'src, V>>, ScanError>;

/// Scans one source buffer into tokens.
pub struct Scanner<'src> {
    buffer: &'src SourceBuffer,
    raw: RawScanner<'src>,
    options: ScanOptions,
    encoding: String,
    tracker: LocationTracker,
    strings: StringAccumulator,
    sink: ErrorSink,
    mode: Mode,
    string_open: OpenString,
    tokens_since_line_start: u32,
    eof_count: u32,
    /// Set by [`finalize`](Self::finalize).
    exhausted: bool,
}

impl<'src> Scanner<'src> {
    /// Bind a scanner to `buffer` and initialize it with `filename` and the
    /// encoding from `options`.
    pub fn new(
        buffer: &'src SourceBuffer,
        filename: impl Into<Arc<str>>,
        options: ScanOptions,
    ) -> Self {
        let tracker = LocationTracker::new(filename.into());
        let encoding = options.encoding.clone();
        let mut scanner = Self {
            buffer,
            raw: RawScanner::new(buffer.cursor()),
            string_open: OpenString {
                offset: 0,
                location: tracker.point(),
            },
            tracker,
            strings: StringAccumulator::default(),
            sink: ErrorSink::default(),
            mode: Mode::Normal,
            tokens_since_line_start: 0,
            eof_count: 0,
            exhausted: false,
            encoding: String::new(),
            options,
        };
        let filename = Arc::clone(scanner.tracker.filename());
        scanner.initialize(filename, encoding);
        scanner
    }

    /// Rewind to the start of the buffer and reset every counter.
    pub fn initialize(&mut self, filename: impl Into<Arc<str>>, encoding: impl Into<String>) {
        self.raw = RawScanner::new(self.buffer.cursor());
        self.tracker = LocationTracker::new(filename.into());
        self.encoding = encoding.into();
        self.strings = StringAccumulator::with_capacity(self.options.initial_string_capacity);
        self.sink = ErrorSink::default();
        self.mode = Mode::Normal;
        self.string_open = OpenString {
            offset: 0,
            location: self.tracker.point(),
        };
        self.tokens_since_line_start = 0;
        self.eof_count = 0;
        self.exhausted = false;
        debug!(
            filename = %self.tracker.filename(),
            encoding = %self.encoding,
            bom = self.buffer.has_bom(),
            "initialize"
        );
    }

    /// Release the string buffer. Every later call to
    /// [`next_token`](Self::next_token) returns `EOF` until the scanner is
    /// initialized again.
    pub fn finalize(&mut self) {
        self.strings.release();
        self.mode = Mode::Normal;
        self.exhausted = true;
        debug!(
            filename = %self.tracker.filename(),
            errors = self.sink.reported(),
            "finalize"
        );
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.tracker.line()
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.tracker.column()
    }

    #[inline]
    pub fn filename(&self) -> &Arc<str> {
        self.tracker.filename()
    }

    #[inline]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// End-of-input signals produced so far.
    #[inline]
    pub fn eof_count(&self) -> u32 {
        self.eof_count
    }

    #[inline]
    pub fn tokens_since_line_start(&self) -> u32 {
        self.tokens_since_line_start
    }

    #[inline]
    pub fn errors_reported(&self) -> usize {
        self.sink.reported()
    }

    /// Capacity of the string literal buffer (0 after `finalize`).
    #[inline]
    pub fn string_capacity(&self) -> usize {
        self.strings.capacity()
    }

    /// Produce the next token.
    ///
    /// Lexical errors do not end the scan. They are reported to `builder`
    /// and surface as `LEX_ERROR` tokens. After unrecognized input the rest
    /// of its line is skipped, but the line's `EOL` is still produced. `Err`
    /// is returned only if reporting itself fails.
    pub fn next_token<B: Builder>(
        &mut self,
        builder: &mut B,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        if self.exhausted {
            let location = self.tracker.point();
            return Ok(self.end_of_input(location));
        }
        loop {
            let step = match self.mode {
                Mode::Normal => self.scan_normal(builder)?,
                Mode::StringLiteral => self.scan_string(builder)?,
                Mode::InvalidRecovery => {
                    self.recover();
                    None
                }
            };
            if let Some(token) = step {
                return Ok(token);
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(
                from = %self.mode,
                to = %mode,
                line = self.tracker.line(),
                "mode change"
            );
            self.mode = mode;
        }
    }

    fn emit<V>(
        &mut self,
        kind: TokenKind,
        text: Cow<'src, str>,
        location: Location,
        value: Option<V>,
        mut flags: TokenFlags,
    ) -> Token<'src, V> {
        if self.tokens_since_line_start == 0 && kind != TokenKind::Eof {
            flags |= TokenFlags::LINE_START;
        }
        self.tokens_since_line_start = if kind == TokenKind::Eol {
            0
        } else {
            self.tokens_since_line_start.saturating_add(1)
        };
        trace!(
            kind = %kind,
            line = location.line,
            column = location.first_column,
            "token"
        );
        Token {
            kind,
            text,
            location,
            value,
            flags,
        }
    }

    fn structural<V>(
        &mut self,
        kind: TokenKind,
        text: &'src str,
        location: Location,
    ) -> Token<'src, V> {
        self.emit(kind, Cow::Borrowed(text), location, None, TokenFlags::empty())
    }

    fn end_of_input<V>(&mut self, location: Location) -> Token<'src, V> {
        self.eof_count = self.eof_count.saturating_add(1);
        debug!(eof_count = self.eof_count, "end of input");
        if self.eof_count == 1 && self.options.terminate_last_line && !self.exhausted {
            self.emit(
                TokenKind::Eol,
                Cow::Borrowed(""),
                location,
                None,
                TokenFlags::SYNTHETIC,
            )
        } else {
            self.structural(TokenKind::Eof, "", location)
        }
    }

    // ─── INITIAL ────────────────────────────────────────────────────

    fn scan_normal<B: Builder>(&mut self, builder: &mut B) -> Step<'src, B::Value> {
        let start = self.raw.pos();
        let raw = self.raw.next_token();
        let text = self.raw.slice(start, start + raw.len);
        let location = self.tracker.advance(text.as_bytes());
        trace!(tag = raw.tag.name(), len = raw.len, "raw token");

        match raw.tag {
            RawTag::Whitespace => Ok(None),
            RawTag::Eof => Ok(Some(self.end_of_input(location))),
            RawTag::Newline => Ok(Some(self.structural(TokenKind::Eol, text, location))),
            RawTag::Indent => Ok(Some(self.structural(TokenKind::Indent, text, location))),
            RawTag::Comment => Ok(Some(self.structural(TokenKind::Comment, text, location))),
            RawTag::SkippedLine => Ok(Some(self.structural(TokenKind::Skipped, text, location))),
            RawTag::Quote => {
                self.begin_string(start, location);
                Ok(None)
            }
            RawTag::InvalidByte => self.unrecognized(builder, text, location).map(Some),
            RawTag::Ident => match keywords::lookup(text) {
                Some(kind) => self
                    .terminal(builder, kind, text, location, BuildArgs::Text(text))
                    .map(Some),
                None => self.unrecognized(builder, text, location).map(Some),
            },
            tag => match terminal_args(tag, text) {
                Ok(Some((kind, args))) => {
                    self.terminal(builder, kind, text, location, args).map(Some)
                }
                Ok(None) => self.unrecognized(builder, text, location).map(Some),
                Err(error) => self
                    .error_token(builder, error, Cow::Borrowed(text), location)
                    .map(Some),
            },
        }
    }

    fn terminal<B: Builder>(
        &mut self,
        builder: &mut B,
        kind: TokenKind,
        text: &'src str,
        location: Location,
        args: BuildArgs<'_>,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        let outcome = call_builder(
            builder,
            &BuildRequest {
                kind,
                lexeme: text,
                location: &location,
                args,
            },
        );
        self.finish_terminal(
            builder,
            outcome,
            kind,
            Cow::Borrowed(text),
            location,
            TokenFlags::empty(),
        )
    }

    fn finish_terminal<B: Builder>(
        &mut self,
        builder: &mut B,
        outcome: Result<B::Value, LexErrorKind>,
        kind: TokenKind,
        text: Cow<'src, str>,
        location: Location,
        flags: TokenFlags,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        match outcome {
            Ok(value) => Ok(self.emit(kind, text, location, Some(value), flags)),
            Err(error) => self.error_token(builder, error, text, location),
        }
    }

    #[cold]
    fn error_token<B: Builder>(
        &mut self,
        builder: &mut B,
        kind: LexErrorKind,
        text: Cow<'src, str>,
        location: Location,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        self.sink.report(builder, LexError::new(kind, location.clone()))?;
        Ok(self.emit(TokenKind::LexError, text, location, None, TokenFlags::empty()))
    }

    /// Report the offending lexeme and switch to recovery. The next call
    /// discards the rest of the line.
    #[cold]
    fn unrecognized<B: Builder>(
        &mut self,
        builder: &mut B,
        text: &'src str,
        location: Location,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        let byte = text.as_bytes().first().copied().unwrap_or_default();
        self.set_mode(Mode::InvalidRecovery);
        self.error_token(
            builder,
            LexErrorKind::UnrecognizedByte { byte },
            Cow::Borrowed(text),
            location,
        )
    }

    // ─── INVALID ────────────────────────────────────────────────────

    fn recover(&mut self) {
        let start = self.raw.pos();
        let skipped = self.raw.skip_line();
        self.tracker.advance(self.raw.slice(start, start + skipped.len).as_bytes());
        trace!(bytes = skipped.len, "discarded rest of line");
        self.set_mode(Mode::Normal);
    }

    // ─── STRLIT ─────────────────────────────────────────────────────

    fn begin_string(&mut self, offset: u32, location: Location) {
        self.strings.reset();
        self.string_open = OpenString { offset, location };
        self.set_mode(Mode::StringLiteral);
    }

    fn scan_string<B: Builder>(&mut self, builder: &mut B) -> Step<'src, B::Value> {
        let start = self.raw.pos();
        let piece = self.raw.next_string_piece();
        let text = self.raw.slice(start, start + piece.len);
        let location = self.tracker.advance(text.as_bytes());

        match piece.tag {
            RawTag::StrText => self.strings.push_bytes(text.as_bytes()),
            RawTag::StrNewline => self.strings.push(b'\n'),
            RawTag::StrEscape => {
                // `\` before CRLF continues the line like `\` before LF.
                let escaped = if text.ends_with("\r\n") {
                    '\n'
                } else {
                    text.chars().nth(1).unwrap_or_default()
                };
                match decode_escape(escaped) {
                    Some(c) => self.strings.push_char(c),
                    None => {
                        return self
                            .invalid_escape(builder, escaped, text, location)
                            .map(Some)
                    }
                }
            }
            RawTag::StrClose => return self.end_string(builder).map(Some),
            _ => return self.unterminated_string(builder).map(Some),
        }
        Ok(None)
    }

    fn end_string<B: Builder>(
        &mut self,
        builder: &mut B,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        let open = self.string_open.clone();
        let lexeme = self.raw.slice(open.offset, self.raw.pos());
        let len = u32::try_from(lexeme.len()).unwrap_or(u32::MAX);
        let location = Location {
            last_column: open.location.first_column.saturating_add(len - 1),
            ..open.location
        };
        let lines = self.tracker.line() - location.line;
        let contents = self.strings.finish();
        self.set_mode(Mode::Normal);

        let flags = if lines > 0 {
            TokenFlags::MULTI_LINE
        } else {
            TokenFlags::empty()
        };
        let outcome = call_builder(
            builder,
            &BuildRequest {
                kind: TokenKind::String,
                lexeme,
                location: &location,
                args: BuildArgs::Str {
                    contents: &contents,
                    lines,
                    encoding: &self.encoding,
                },
            },
        );
        self.finish_terminal(
            builder,
            outcome,
            TokenKind::String,
            Cow::Owned(contents),
            location,
            flags,
        )
    }

    /// Report the escape, then drop the rest of the literal.
    #[cold]
    fn invalid_escape<B: Builder>(
        &mut self,
        builder: &mut B,
        escape: char,
        text: &'src str,
        location: Location,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        let start = self.raw.pos();
        let rest = self.raw.skip_string_rest();
        self.tracker.advance(self.raw.slice(start, start + rest.len).as_bytes());
        self.strings.reset();
        self.set_mode(Mode::Normal);
        self.error_token(
            builder,
            LexErrorKind::InvalidEscape { escape },
            Cow::Borrowed(text),
            location,
        )
    }

    /// Located at the opening quote, not at the end of input.
    #[cold]
    fn unterminated_string<B: Builder>(
        &mut self,
        builder: &mut B,
    ) -> Result<Token<'src, B::Value>, ScanError> {
        let open = self.string_open.clone();
        let text = self.raw.slice(open.offset, self.raw.pos());
        self.strings.reset();
        self.set_mode(Mode::Normal);
        self.error_token(
            builder,
            LexErrorKind::UnterminatedString,
            Cow::Borrowed(text),
            open.location,
        )
    }
}

/// Token kind and builder arguments for a terminal raw token, or `None` for
/// a tag that never starts a terminal in normal text.
fn terminal_args(
    tag: RawTag,
    text: &str,
) -> Result<Option<(TokenKind, BuildArgs<'_>)>, LexErrorKind> {
    let kind = match tag {
        RawTag::Key => TokenKind::Key,
        RawTag::Number => TokenKind::Number,
        RawTag::Account => TokenKind::Account,
        RawTag::Date => {
            let date = decode_date(text)?;
            let args = BuildArgs::Date {
                year: date.year,
                month: date.month,
                day: date.day,
            };
            return Ok(Some((TokenKind::Date, args)));
        }
        RawTag::Currency => {
            return Ok(Some(match text {
                "TRUE" => (TokenKind::Bool, BuildArgs::Bool(true)),
                "FALSE" => (TokenKind::Bool, BuildArgs::Bool(false)),
                "NULL" => (TokenKind::Null, BuildArgs::Text(text)),
                _ => (TokenKind::Currency, BuildArgs::Text(text)),
            }));
        }
        // The builder gets the name without its `#` / `^`.
        RawTag::Tag | RawTag::Link => {
            let kind = if tag == RawTag::Tag {
                TokenKind::Tag
            } else {
                TokenKind::Link
            };
            let name = text.get(1..).unwrap_or_default();
            return Ok(Some((kind, BuildArgs::Text(name))));
        }
        RawTag::Flag => {
            let flag = text.chars().next().unwrap_or_default();
            return Ok(Some((TokenKind::Flag, BuildArgs::Flag(flag))));
        }
        RawTag::Pipe => TokenKind::Pipe,
        RawTag::AtAt => TokenKind::AtAt,
        RawTag::At => TokenKind::At,
        RawTag::LeftCurlCurl => TokenKind::LeftCurlCurl,
        RawTag::RightCurlCurl => TokenKind::RightCurlCurl,
        RawTag::LeftCurl => TokenKind::LeftCurl,
        RawTag::RightCurl => TokenKind::RightCurl,
        RawTag::Comma => TokenKind::Comma,
        RawTag::Tilde => TokenKind::Tilde,
        RawTag::Plus => TokenKind::Plus,
        RawTag::Minus => TokenKind::Minus,
        RawTag::Slash => TokenKind::Slash,
        RawTag::LeftParen => TokenKind::LeftParen,
        RawTag::RightParen => TokenKind::RightParen,
        RawTag::Hash => TokenKind::Hash,
        RawTag::Asterisk => TokenKind::Asterisk,
        RawTag::Colon => TokenKind::Colon,
        RawTag::Equal => TokenKind::Equal,
        RawTag::Ident
        | RawTag::Quote
        | RawTag::StrText
        | RawTag::StrEscape
        | RawTag::StrNewline
        | RawTag::StrClose
        | RawTag::Whitespace
        | RawTag::Newline
        | RawTag::Indent
        | RawTag::Comment
        | RawTag::SkippedLine
        | RawTag::Discarded
        | RawTag::InvalidByte
        | RawTag::Eof => return Ok(None),
    };
    Ok(Some((kind, BuildArgs::Text(text))))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
