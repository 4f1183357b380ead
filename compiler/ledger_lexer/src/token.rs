//! Cooked tokens handed to the grammar.

use std::borrow::Cow;
use std::fmt;

use bitflags::bitflags;

use crate::Location;

/// Token kinds understood by the ledger grammar.
///
/// [`name`](Self::name) returns the grammar's terminal name (`EOL`,
/// `LEX_ERROR`, ...), which is also what `Display` prints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Line structure ===
    Eol,
    Indent,
    Comment,
    Skipped,
    Eof,
    LexError,

    // === Punctuation ===
    Pipe,
    AtAt,
    At,
    LeftCurlCurl,
    RightCurlCurl,
    LeftCurl,
    RightCurl,
    Comma,
    Tilde,
    Plus,
    Minus,
    Slash,
    LeftParen,
    RightParen,
    Hash,
    Asterisk,
    Colon,
    Equal,

    // === Directive keywords ===
    Txn,
    Balance,
    Open,
    Close,
    Commodity,
    Pad,
    Event,
    Price,
    Note,
    Document,
    Query,
    Custom,
    Pushtag,
    Poptag,
    Pushmeta,
    Popmeta,
    Option,
    Plugin,
    Include,

    // === Values ===
    Flag,
    Bool,
    /// `NULL`.
    Null,
    Date,
    Number,
    Account,
    Currency,
    String,
    Tag,
    Link,
    Key,
}

impl TokenKind {
    /// Terminal name used by the grammar.
    pub fn name(self) -> &'static str {
        match self {
            Self::Eol => "EOL",
            Self::Indent => "INDENT",
            Self::Comment => "COMMENT",
            Self::Skipped => "SKIPPED",
            Self::Eof => "EOF",
            Self::LexError => "LEX_ERROR",
            Self::Pipe => "PIPE",
            Self::AtAt => "ATAT",
            Self::At => "AT",
            Self::LeftCurlCurl => "LCURLCURL",
            Self::RightCurlCurl => "RCURLCURL",
            Self::LeftCurl => "LCURL",
            Self::RightCurl => "RCURL",
            Self::Comma => "COMMA",
            Self::Tilde => "TILDE",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Slash => "SLASH",
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::Hash => "HASH",
            Self::Asterisk => "ASTERISK",
            Self::Colon => "COLON",
            Self::Equal => "EQUAL",
            Self::Txn => "TXN",
            Self::Balance => "BALANCE",
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::Commodity => "COMMODITY",
            Self::Pad => "PAD",
            Self::Event => "EVENT",
            Self::Price => "PRICE",
            Self::Note => "NOTE",
            Self::Document => "DOCUMENT",
            Self::Query => "QUERY",
            Self::Custom => "CUSTOM",
            Self::Pushtag => "PUSHTAG",
            Self::Poptag => "POPTAG",
            Self::Pushmeta => "PUSHMETA",
            Self::Popmeta => "POPMETA",
            Self::Option => "OPTION",
            Self::Plugin => "PLUGIN",
            Self::Include => "INCLUDE",
            Self::Flag => "FLAG",
            Self::Bool => "BOOL",
            Self::Null => "NONE",
            Self::Date => "DATE",
            Self::Number => "NUMBER",
            Self::Account => "ACCOUNT",
            Self::Currency => "CURRENCY",
            Self::String => "STRING",
            Self::Tag => "TAG",
            Self::Link => "LINK",
            Self::Key => "KEY",
        }
    }

    /// Tokens that never carry a builder value.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Eol | Self::Indent | Self::Comment | Self::Skipped | Self::Eof | Self::LexError
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Per-token metadata.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TokenFlags: u8 {
        /// First token on its line.
        const LINE_START = 1 << 0;
        /// Not backed by source text (the `EOL` emitted at end of input).
        const SYNTHETIC = 1 << 1;
        /// The lexeme spans at least one newline.
        const MULTI_LINE = 1 << 2;
    }
}

/// A token with its text, location and builder-produced value.
///
/// `value` is `None` exactly for structural kinds
/// (see [`TokenKind::is_structural`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'src, V> {
    pub kind: TokenKind,
    /// The lexeme as written, or the decoded contents for strings.
    pub text: Cow<'src, str>,
    pub location: Location,
    pub value: Option<V>,
    pub flags: TokenFlags,
}

impl<V> Token<'_, V> {
    /// Detach the token from the source buffer.
    pub fn into_owned(self) -> Token<'static, V> {
        Token {
            kind: self.kind,
            text: Cow::Owned(self.text.into_owned()),
            location: self.location,
            value: self.value,
            flags: self.flags,
        }
    }

    #[inline]
    pub fn is_first_on_line(&self) -> bool {
        self.flags.contains(TokenFlags::LINE_START)
    }
}
