//! Low-level tokenizer for the ledger language.
//!
//! This crate is the allocation-free half of the lexer. It knows how to
//! split a source file into `(RawTag, len)` pairs and nothing else: it does
//! not track lines or columns, decode escapes, resolve keywords, or build
//! values. Those live in `ledger_lexer`.
//!
//! ```text
//! &str → SourceBuffer → Cursor → RawScanner → RawToken { tag, len }
//! ```
//!
//! The scanner exposes one entry point per start condition:
//!
//! - [`RawScanner::next_token`] for normal text,
//! - [`RawScanner::next_string_piece`] inside a quoted string,
//! - [`RawScanner::skip_line`] for error recovery.
//!
//! The caller decides which one to invoke; the raw layer keeps only the
//! beginning-of-line bit needed for line-anchored rules.

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::RawScanner;
pub use source_buffer::SourceBuffer;
pub use tag::{RawTag, RawToken};
