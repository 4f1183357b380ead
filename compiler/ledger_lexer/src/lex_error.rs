//! Lexical errors.
//!
//! Every error carries the location of the lexeme that caused it. Errors are
//! never returned through `Result` from [`Scanner::next_token`]; they are
//! reported to the builder through the [`ErrorSink`] and surface as a
//! `LEX_ERROR` token. The only `Err` the scanner returns is [`ScanError`],
//! when the sink itself fails.
//!
//! [`Scanner::next_token`]: crate::Scanner::next_token
//! [`ErrorSink`]: crate::ErrorSink

use crate::fixed_width::NumericOverflow;
use crate::{BuildError, Location, TokenKind};

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// No rule matches the input. The rest of the line is skipped.
    #[error("invalid token: unrecognized byte {byte:#04x}")]
    UnrecognizedByte { byte: u8 },
    /// Input ended inside a string literal.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// `\q` and friends.
    #[error("invalid escape sequence `\\{escape}` in string literal")]
    InvalidEscape { escape: char },
    /// The builder could not construct a value.
    #[error("{message}")]
    BuilderFailure { message: String },
    /// The builder reported success without a value.
    #[error("unexpected empty result from builder for {kind}")]
    BuilderAbsentResult { kind: TokenKind },
    /// A fixed-width field holds too many digits.
    #[error("`{digits}` does not fit in a {width}-digit field")]
    NumericOverflow { digits: String, width: usize },
}

impl From<NumericOverflow> for LexErrorKind {
    fn from(overflow: NumericOverflow) -> Self {
        Self::NumericOverflow {
            digits: overflow.digits,
            width: overflow.width,
        }
    }
}

/// A located lexical error. Displays as `file:line:column: message`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: Location,
}

impl LexError {
    pub fn new(kind: LexErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    #[cold]
    pub fn unrecognized_byte(location: Location, byte: u8) -> Self {
        Self::new(LexErrorKind::UnrecognizedByte { byte }, location)
    }

    #[cold]
    pub fn unterminated_string(location: Location) -> Self {
        Self::new(LexErrorKind::UnterminatedString, location)
    }

    #[cold]
    pub fn invalid_escape(location: Location, escape: char) -> Self {
        Self::new(LexErrorKind::InvalidEscape { escape }, location)
    }

    /// The message without the location prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Terminal scanner failure: reporting an error to the builder failed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to report `{error}`: {source}")]
    ErrorSink {
        error: Box<LexError>,
        #[source]
        source: BuildError,
    },
}
