//! Lexer for the ledger language.
//!
//! Turns a [`SourceBuffer`] into [`Token`]s for the grammar. Values are not
//! built here: every terminal token is handed to a caller-supplied
//! [`Builder`], and every lexical error is reported to it as well.
//!
//! # Architecture
//!
//! ```text
//! SourceBuffer → RawScanner (ledger_lexer_core)
//!              → Scanner: mode dispatch, LocationTracker, StringAccumulator
//!              → Builder → Token { kind, text, location, value, flags }
//! ```
//!
//! # Example
//!
//! ```
//! use ledger_lexer::{BuildError, BuildRequest, Builder, LexError, TokenKind};
//!
//! struct Texts;
//!
//! impl Builder for Texts {
//!     type Value = String;
//!
//!     fn build(&mut self, request: &BuildRequest<'_>) -> Result<Option<String>, BuildError> {
//!         Ok(Some(request.lexeme.to_owned()))
//!     }
//!
//!     fn report_error(&mut self, _: &LexError) -> Result<(), BuildError> {
//!         Ok(())
//!     }
//! }
//!
//! let tokens = ledger_lexer::tokenize("2024-01-01 open Assets:Cash\n", "main.ledger", &mut Texts)
//!     .map_err(|e| e.to_string())?;
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Date,
//!         TokenKind::Open,
//!         TokenKind::Account,
//!         TokenKind::Eol,
//!         TokenKind::Eol,
//!         TokenKind::Eof,
//!     ]
//! );
//! # Ok::<(), String>(())
//! ```

mod builder;
mod error_sink;
mod escape;
mod fixed_width;
mod keywords;
mod lex_error;
mod location;
mod options;
mod scanner;
mod string_accumulator;
mod token;

pub use builder::{call_builder, BuildArgs, BuildError, BuildRequest, Builder};
pub use error_sink::ErrorSink;
pub use escape::{decode_escape, escape_string};
pub use fixed_width::{
    decode_date, decode_fixed_width, DateParts, NumericOverflow, MONTH_DAY_WIDTH, YEAR_WIDTH,
};
pub use ledger_lexer_core::SourceBuffer;
pub use lex_error::{LexError, LexErrorKind, ScanError};
pub use location::{Location, LocationTracker};
pub use options::ScanOptions;
pub use scanner::{Mode, Scanner};
pub use string_accumulator::StringAccumulator;
pub use token::{Token, TokenFlags, TokenKind};

use std::sync::Arc;

/// Scan a whole source with default options, through the first `EOF`.
///
/// Tokens are detached from the source. The scanner is finalized before
/// returning.
pub fn tokenize<B: Builder>(
    source: &str,
    filename: impl Into<Arc<str>>,
    builder: &mut B,
) -> Result<Vec<Token<'static, B::Value>>, ScanError> {
    let buffer = SourceBuffer::new(source);
    let mut scanner = Scanner::new(&buffer, filename, ScanOptions::default());
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token(builder)?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token.into_owned());
        if done {
            break;
        }
    }
    scanner.finalize();
    Ok(tokens)
}
