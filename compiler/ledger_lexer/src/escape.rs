//! String literal escapes.
//!
//! Recognized escapes: `\n` `\t` `\r` `\b` `\f` `\\` `\"`, and a backslash
//! directly before a line feed, which keeps the line feed. Anything else
//! after a backslash is an error.

/// Decode the character following a backslash.
#[inline]
pub fn decode_escape(c: char) -> Option<char> {
    match c {
        'n' | '\n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        _ => None,
    }
}

/// Write `contents` as the body of a string literal (without the quotes).
///
/// Line feeds are kept raw since literals may span lines. Scanning
/// `"` + `escape_string(s)` + `"` yields `s` again.
pub fn escape_string(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len() + 2);
    for c in contents.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
    out
}
