//! Directive keyword resolution.
//!
//! Keywords are lowercase and 3-9 bytes long. The lookup filters on length
//! first, then compares against the few keywords of that length.

use crate::TokenKind;

/// Look up a directive keyword. Returns `None` for any other word.
#[inline]
pub(crate) fn lookup(text: &str) -> Option<TokenKind> {
    if !(3..=9).contains(&text.len()) {
        return None;
    }

    match text.len() {
        3 => match text {
            "txn" => Some(TokenKind::Txn),
            "pad" => Some(TokenKind::Pad),
            _ => None,
        },
        4 => match text {
            "open" => Some(TokenKind::Open),
            "note" => Some(TokenKind::Note),
            _ => None,
        },
        5 => match text {
            "close" => Some(TokenKind::Close),
            "event" => Some(TokenKind::Event),
            "price" => Some(TokenKind::Price),
            "query" => Some(TokenKind::Query),
            _ => None,
        },
        6 => match text {
            "custom" => Some(TokenKind::Custom),
            "option" => Some(TokenKind::Option),
            "plugin" => Some(TokenKind::Plugin),
            "poptag" => Some(TokenKind::Poptag),
            _ => None,
        },
        7 => match text {
            "balance" => Some(TokenKind::Balance),
            "include" => Some(TokenKind::Include),
            "popmeta" => Some(TokenKind::Popmeta),
            "pushtag" => Some(TokenKind::Pushtag),
            _ => None,
        },
        8 => match text {
            "document" => Some(TokenKind::Document),
            "pushmeta" => Some(TokenKind::Pushmeta),
            _ => None,
        },
        9 => match text {
            "commodity" => Some(TokenKind::Commodity),
            _ => None,
        },
        _ => None,
    }
}
