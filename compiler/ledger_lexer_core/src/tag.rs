//! Raw token tags produced by the scanner.
//!
//! Discriminants are grouped in semantic ranges so a tag can be classified
//! with a single comparison:
//!
//! | Range   | Group                           |
//! |---------|---------------------------------|
//! | 0-15    | Words and literals              |
//! | 32-63   | Punctuation                     |
//! | 80-87   | String pieces (STRLIT mode)     |
//! | 112-119 | Trivia and line structure       |
//! | 240     | Errors                          |
//! | 255     | EOF                             |

/// Classification of a raw lexeme. Carries no data; the text is recovered
/// from the source via the token's length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RawTag {
    // === Words and literals ===
    /// Lowercase word not followed by `:` (keyword candidate).
    Ident = 0,
    /// Lowercase word directly followed by `:` (metadata key).
    Key = 1,
    /// `1,234.56`, `42`, `.5`.
    Number = 2,
    /// `2024-01-31` or `2024/01/31`.
    Date = 3,
    /// `Assets:Bank:Checking`.
    Account = 4,
    /// `USD`, `VACHR`, also `TRUE` / `FALSE` / `NULL`.
    Currency = 5,
    /// `#trip-2024`.
    Tag = 6,
    /// `^invoice-17`.
    Link = 7,
    /// Single-character transaction flag.
    Flag = 8,

    // === Punctuation ===
    Pipe = 32,
    AtAt = 33,
    At = 34,
    LeftCurlCurl = 35,
    RightCurlCurl = 36,
    LeftCurl = 37,
    RightCurl = 38,
    Comma = 39,
    Tilde = 40,
    Plus = 41,
    Minus = 42,
    Slash = 43,
    LeftParen = 44,
    RightParen = 45,
    Hash = 46,
    Asterisk = 47,
    Colon = 48,
    Equal = 49,
    /// Opening `"` of a string literal.
    Quote = 50,

    // === String pieces ===
    /// Run of ordinary bytes inside a string.
    StrText = 80,
    /// Backslash plus the escaped character.
    StrEscape = 81,
    /// Raw line feed inside a string.
    StrNewline = 82,
    /// Closing `"`.
    StrClose = 83,

    // === Trivia and line structure ===
    /// Horizontal whitespace that is not an indent.
    Whitespace = 112,
    /// `\n`.
    Newline = 113,
    /// Leading whitespace followed by content on the same line.
    Indent = 114,
    /// `;` up to (not including) the newline.
    Comment = 115,
    /// Line starting with an org-mode style marker, up to the newline.
    SkippedLine = 116,
    /// Bytes thrown away by error recovery.
    Discarded = 117,

    // === Errors ===
    /// Byte (or UTF-8 character) that starts no rule.
    InvalidByte = 240,

    // === Control ===
    Eof = 255,
}

impl RawTag {
    /// Short human-readable name, used in traces and test failure output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::Key => "key",
            Self::Number => "number",
            Self::Date => "date",
            Self::Account => "account",
            Self::Currency => "currency",
            Self::Tag => "tag",
            Self::Link => "link",
            Self::Flag => "flag",
            Self::Pipe => "`|`",
            Self::AtAt => "`@@`",
            Self::At => "`@`",
            Self::LeftCurlCurl => "`{{`",
            Self::RightCurlCurl => "`}}`",
            Self::LeftCurl => "`{`",
            Self::RightCurl => "`}`",
            Self::Comma => "`,`",
            Self::Tilde => "`~`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Slash => "`/`",
            Self::LeftParen => "`(`",
            Self::RightParen => "`)`",
            Self::Hash => "`#`",
            Self::Asterisk => "`*`",
            Self::Colon => "`:`",
            Self::Equal => "`=`",
            Self::Quote => "opening quote",
            Self::StrText => "string text",
            Self::StrEscape => "escape sequence",
            Self::StrNewline => "newline in string",
            Self::StrClose => "closing quote",
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::Indent => "indent",
            Self::Comment => "comment",
            Self::SkippedLine => "skipped line",
            Self::Discarded => "discarded input",
            Self::InvalidByte => "invalid byte",
            Self::Eof => "end of file",
        }
    }
}

/// A raw token: what was matched and how many bytes it spans.
///
/// The start offset is implicit: the caller knows where it asked the
/// scanner to begin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}
