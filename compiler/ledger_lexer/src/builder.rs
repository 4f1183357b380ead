//! The builder protocol.
//!
//! The scanner recognizes lexemes; a [`Builder`] turns them into values. Every
//! terminal token goes through [`call_builder`], which enforces the contract
//! that a build either fails with a [`BuildError`] or produces a value.
//! Neither a failure nor a missing value lets a token through: both become a
//! `LEX_ERROR` token located at the lexeme.

use crate::{LexError, LexErrorKind, Location, TokenKind};

/// Failure raised by a builder.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BuildError {
    pub message: String,
}

impl BuildError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decoded arguments accompanying a build request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildArgs<'a> {
    /// The lexeme, or for tags and links the name without its prefix.
    Text(&'a str),
    Flag(char),
    Bool(bool),
    /// Components decoded from fixed-width fields, not range-checked.
    Date { year: u32, month: u32, day: u32 },
    /// Decoded string literal contents.
    Str {
        contents: &'a str,
        /// Newlines spanned by the literal.
        lines: u32,
        /// Encoding label recorded at initialization.
        encoding: &'a str,
    },
}

/// One call into the builder.
#[derive(Clone, Copy, Debug)]
pub struct BuildRequest<'a> {
    pub kind: TokenKind,
    /// The exact source text matched, quotes included for strings.
    pub lexeme: &'a str,
    pub location: &'a Location,
    pub args: BuildArgs<'a>,
}

/// Constructs token values and collects errors.
pub trait Builder {
    type Value;

    /// Build the value for one terminal token.
    ///
    /// Returning `Ok(None)` violates the contract and is reported as
    /// [`LexErrorKind::BuilderAbsentResult`].
    fn build(&mut self, request: &BuildRequest<'_>) -> Result<Option<Self::Value>, BuildError>;

    /// Record a lexical error. Failing here stops the scanner.
    fn report_error(&mut self, error: &LexError) -> Result<(), BuildError>;
}

impl<B: Builder + ?Sized> Builder for &mut B {
    type Value = B::Value;

    fn build(&mut self, request: &BuildRequest<'_>) -> Result<Option<Self::Value>, BuildError> {
        (**self).build(request)
    }

    fn report_error(&mut self, error: &LexError) -> Result<(), BuildError> {
        (**self).report_error(error)
    }
}

/// Call the builder and interpret the result.
pub fn call_builder<B: Builder + ?Sized>(
    builder: &mut B,
    request: &BuildRequest<'_>,
) -> Result<B::Value, LexErrorKind> {
    match builder.build(request) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(LexErrorKind::BuilderAbsentResult { kind: request.kind }),
        Err(error) => Err(LexErrorKind::BuilderFailure {
            message: error.message,
        }),
    }
}
