use super::*;
use crate::SourceBuffer;
use pretty_assertions::assert_eq;

/// Helper: scan a source string in normal mode, stepping through string
/// literals piece by piece, and collect all tokens (excluding Eof).
fn scan(source: &str) -> Vec<RawToken> {
    let buf = SourceBuffer::new(source);
    let mut scanner = RawScanner::new(buf.cursor());
    let mut tokens = Vec::new();
    let mut in_string = false;
    loop {
        let tok = if in_string {
            scanner.next_string_piece()
        } else {
            scanner.next_token()
        };
        match tok.tag {
            RawTag::Eof => break,
            RawTag::Quote => in_string = true,
            RawTag::StrClose => in_string = false,
            _ => {}
        }
        tokens.push(tok);
    }
    tokens
}

/// Helper: scan and return tags only.
fn scan_tags(source: &str) -> Vec<RawTag> {
    scan(source).iter().map(|t| t.tag).collect()
}

/// Helper: scan and return `(tag, text)` pairs.
fn scan_texts(source: &str) -> Vec<(RawTag, String)> {
    let mut pos = 0usize;
    scan(source)
        .into_iter()
        .map(|t| {
            let end = pos + t.len as usize;
            let text = source[pos..end].to_owned();
            pos = end;
            (t.tag, text)
        })
        .collect()
}

/// Helper: first token of `source`, scanned mid-line.
fn first_mid_line(source: &str) -> RawToken {
    let padded = format!("x {source}");
    let buf = SourceBuffer::new(&padded);
    let mut scanner = RawScanner::new(buf.cursor());
    assert_eq!(scanner.next_token().tag, RawTag::Ident);
    assert_eq!(scanner.next_token().tag, RawTag::Whitespace);
    scanner.next_token()
}

// ─── Coverage ───────────────────────────────────────────────────

#[test]
fn total_len_equals_source_len() {
    let sources = [
        "",
        "2024-01-01 open Assets:Cash USD",
        "  Assets:Cash  -10.00 USD\n",
        "2024-01-01 * \"Payee\" \"Narration\" #tag ^link\n",
        "* org header\n; comment\n",
        "key: \"va\\\"lue\"\n",
        "@@ @ {{ }} { } , ~ + - / ( ) = |",
        "é ~ \u{1F600}",
    ];
    for source in sources {
        let total: u32 = scan(source).iter().map(|t| t.len).sum();
        assert_eq!(
            total as usize,
            source.len(),
            "total token length mismatch for {source:?}"
        );
    }
}

#[test]
fn empty_source_is_immediately_eof() {
    let buf = SourceBuffer::new("");
    let mut scanner = RawScanner::new(buf.cursor());
    let tok = scanner.next_token();
    assert_eq!(tok, RawToken { tag: RawTag::Eof, len: 0 });
    assert_eq!(scanner.next_token().tag, RawTag::Eof);
}

#[test]
fn bom_is_skipped() {
    let buf = SourceBuffer::new("\u{FEFF}open");
    let mut scanner = RawScanner::new(buf.cursor());
    assert_eq!(scanner.pos(), 3);
    assert_eq!(scanner.next_token(), RawToken { tag: RawTag::Ident, len: 4 });
}

// ─── Line structure ─────────────────────────────────────────────

#[test]
fn indent_only_at_line_start_before_content() {
    assert_eq!(
        scan_tags("  Assets:Cash\n"),
        vec![RawTag::Indent, RawTag::Account, RawTag::Newline]
    );
    assert_eq!(
        scan_tags("open  close"),
        vec![RawTag::Ident, RawTag::Whitespace, RawTag::Ident]
    );
}

#[test]
fn blank_line_whitespace_is_not_indent() {
    assert_eq!(
        scan_tags("   \nopen"),
        vec![RawTag::Whitespace, RawTag::Newline, RawTag::Ident]
    );
    assert_eq!(scan_tags("  \r\n"), vec![RawTag::Whitespace, RawTag::Newline]);
    assert_eq!(scan_tags("\t"), vec![RawTag::Whitespace]);
}

#[test]
fn comment_stops_before_newline() {
    assert_eq!(
        scan_texts("; hello\nopen"),
        vec![
            (RawTag::Comment, "; hello".to_owned()),
            (RawTag::Newline, "\n".to_owned()),
            (RawTag::Ident, "open".to_owned()),
        ]
    );
}

#[test]
fn org_mode_lines_are_skipped_at_line_start() {
    for marker in ["*", ":", "#", "!", "&", "%", "?", "^", "~"] {
        let source = format!("{marker} heading text\n");
        assert_eq!(
            scan_tags(&source),
            vec![RawTag::SkippedLine, RawTag::Newline],
            "{source:?}"
        );
    }
}

#[test]
fn markers_mid_line_are_punctuation_or_flags() {
    assert_eq!(first_mid_line("*").tag, RawTag::Asterisk);
    assert_eq!(first_mid_line(":").tag, RawTag::Colon);
    assert_eq!(first_mid_line("!").tag, RawTag::Flag);
    assert_eq!(first_mid_line("~").tag, RawTag::Tilde);
    assert_eq!(first_mid_line("# ").tag, RawTag::Hash);
}

#[test]
fn line_start_resets_after_newline() {
    let buf = SourceBuffer::new("open\n");
    let mut scanner = RawScanner::new(buf.cursor());
    assert!(scanner.at_line_start());
    scanner.next_token();
    assert!(!scanner.at_line_start());
    scanner.next_token();
    assert!(scanner.at_line_start());
}

// ─── Dates and numbers ──────────────────────────────────────────

#[test]
fn dates_with_either_separator() {
    assert_eq!(
        scan_texts("2024-01-31 2024/1/5"),
        vec![
            (RawTag::Date, "2024-01-31".to_owned()),
            (RawTag::Whitespace, " ".to_owned()),
            (RawTag::Date, "2024/1/5".to_owned()),
        ]
    );
}

#[test]
fn short_year_is_not_a_date() {
    assert_eq!(
        scan_tags("24-01-01"),
        vec![
            RawTag::Number,
            RawTag::Minus,
            RawTag::Number,
            RawTag::Minus,
            RawTag::Number,
        ]
    );
}

#[test]
fn incomplete_date_falls_back_to_number() {
    assert_eq!(
        scan_tags("2024-01"),
        vec![RawTag::Number, RawTag::Minus, RawTag::Number]
    );
}

#[test]
fn numbers_with_grouping_and_fraction() {
    for (source, len) in [
        ("42", 2),
        ("1,234.56", 8),
        ("1,234,567", 9),
        ("10.", 3),
        ("0.5", 3),
        (".5", 2),
    ] {
        let toks = scan(source);
        assert_eq!(toks[0], RawToken { tag: RawTag::Number, len }, "{source:?}");
    }
}

#[test]
fn trailing_comma_is_not_part_of_number() {
    assert_eq!(
        scan_texts("100,"),
        vec![
            (RawTag::Number, "100".to_owned()),
            (RawTag::Comma, ",".to_owned()),
        ]
    );
}

#[test]
fn lone_dot_is_invalid() {
    assert_eq!(first_mid_line(". ").tag, RawTag::InvalidByte);
}

// ─── Words ──────────────────────────────────────────────────────

#[test]
fn lowercase_word_followed_by_colon_is_key() {
    assert_eq!(
        scan_texts("filename: txn"),
        vec![
            (RawTag::Key, "filename".to_owned()),
            (RawTag::Colon, ":".to_owned()),
            (RawTag::Whitespace, " ".to_owned()),
            (RawTag::Ident, "txn".to_owned()),
        ]
    );
}

#[test]
fn key_allows_dashes_and_underscores() {
    assert_eq!(scan("import_file-v2:")[0].len, 14);
}

#[test]
fn accounts() {
    for account in [
        "Assets:Bank:Checking",
        "Liabilities:CreditCard",
        "Expenses:Food:2024",
        "Income:Job-1",
        "Équité:Café",
    ] {
        assert_eq!(
            scan_texts(account),
            vec![(RawTag::Account, account.to_owned())],
            "{account:?}"
        );
    }
}

#[test]
fn account_type_without_component_is_not_an_account() {
    assert_eq!(scan_tags("Assets"), vec![RawTag::InvalidByte, RawTag::Ident]);
    assert_eq!(scan_tags("ASSETS"), vec![RawTag::Currency]);
}

#[test]
fn account_component_must_start_uppercase_or_digit() {
    assert_eq!(
        scan_tags("Assets:cash"),
        vec![RawTag::InvalidByte, RawTag::Key, RawTag::Colon, RawTag::Ident]
    );
}

#[test]
fn currencies() {
    for currency in ["USD", "VACHR", "HOOL.A", "RGAGX", "A1", "BRK'B", "T_BILL"] {
        assert_eq!(
            scan_texts(currency),
            vec![(RawTag::Currency, currency.to_owned())],
            "{currency:?}"
        );
    }
}

#[test]
fn currency_cannot_end_with_punctuation() {
    assert_eq!(
        scan_texts("ABC. "),
        vec![
            (RawTag::Currency, "ABC".to_owned()),
            (RawTag::InvalidByte, ".".to_owned()),
            (RawTag::Whitespace, " ".to_owned()),
        ]
    );
}

#[test]
fn currency_is_capped_at_24_bytes() {
    let long = "A".repeat(30);
    assert_eq!(scan(&long)[0], RawToken { tag: RawTag::Currency, len: 24 });
}

#[test]
fn single_uppercase_flag_letters() {
    assert_eq!(first_mid_line("P ").tag, RawTag::Flag);
    assert_eq!(first_mid_line("M ").tag, RawTag::Flag);
    assert_eq!(first_mid_line("X ").tag, RawTag::InvalidByte);
}

#[test]
fn tags_and_links() {
    assert_eq!(
        scan_texts("x #trip-2024 ^invoice/17"),
        vec![
            (RawTag::Ident, "x".to_owned()),
            (RawTag::Whitespace, " ".to_owned()),
            (RawTag::Tag, "#trip-2024".to_owned()),
            (RawTag::Whitespace, " ".to_owned()),
            (RawTag::Link, "^invoice/17".to_owned()),
        ]
    );
}

#[test]
fn bare_caret_is_invalid() {
    assert_eq!(first_mid_line("^ ").tag, RawTag::InvalidByte);
}

// ─── Punctuation ────────────────────────────────────────────────

#[test]
fn doubled_punctuation_prefers_longest() {
    assert_eq!(
        scan_tags("x @@ @ {{ }} { }"),
        vec![
            RawTag::Ident,
            RawTag::Whitespace,
            RawTag::AtAt,
            RawTag::Whitespace,
            RawTag::At,
            RawTag::Whitespace,
            RawTag::LeftCurlCurl,
            RawTag::Whitespace,
            RawTag::RightCurlCurl,
            RawTag::Whitespace,
            RawTag::LeftCurl,
            RawTag::Whitespace,
            RawTag::RightCurl,
        ]
    );
}

// ─── Invalid input ──────────────────────────────────────────────

#[test]
fn invalid_multibyte_char_is_consumed_whole() {
    let toks = scan("x \u{1F600}");
    assert_eq!(toks[2], RawToken { tag: RawTag::InvalidByte, len: 4 });
}

#[test]
fn interior_null_is_invalid() {
    assert_eq!(
        scan_tags("x\0y"),
        vec![RawTag::Ident, RawTag::InvalidByte, RawTag::Ident]
    );
}

// ─── String pieces ──────────────────────────────────────────────

#[test]
fn string_pieces() {
    assert_eq!(
        scan_texts("\"a\\tb\nc\""),
        vec![
            (RawTag::Quote, "\"".to_owned()),
            (RawTag::StrText, "a".to_owned()),
            (RawTag::StrEscape, "\\t".to_owned()),
            (RawTag::StrText, "b".to_owned()),
            (RawTag::StrNewline, "\n".to_owned()),
            (RawTag::StrText, "c".to_owned()),
            (RawTag::StrClose, "\"".to_owned()),
        ]
    );
}

#[test]
fn escape_of_multibyte_char_spans_whole_char() {
    let toks = scan("\"\\é\"");
    assert_eq!(toks[1], RawToken { tag: RawTag::StrEscape, len: 3 });
}

#[test]
fn backslash_crlf_is_one_escape() {
    assert_eq!(
        scan_texts("\"a\\\r\nb\""),
        vec![
            (RawTag::Quote, "\"".to_owned()),
            (RawTag::StrText, "a".to_owned()),
            (RawTag::StrEscape, "\\\r\n".to_owned()),
            (RawTag::StrText, "b".to_owned()),
            (RawTag::StrClose, "\"".to_owned()),
        ]
    );
}

#[test]
fn backslash_lone_cr_is_two_byte_escape() {
    let toks = scan("\"\\\rx\"");
    assert_eq!(toks[1], RawToken { tag: RawTag::StrEscape, len: 2 });
}

#[test]
fn unterminated_string_reaches_eof() {
    let buf = SourceBuffer::new("\"abc");
    let mut scanner = RawScanner::new(buf.cursor());
    assert_eq!(scanner.next_token().tag, RawTag::Quote);
    assert_eq!(scanner.next_string_piece(), RawToken { tag: RawTag::StrText, len: 3 });
    assert_eq!(scanner.next_string_piece(), RawToken { tag: RawTag::Eof, len: 0 });
}

#[test]
fn trailing_backslash_is_text() {
    let buf = SourceBuffer::new("\"\\");
    let mut scanner = RawScanner::new(buf.cursor());
    scanner.next_token();
    assert_eq!(scanner.next_string_piece(), RawToken { tag: RawTag::StrText, len: 1 });
    assert_eq!(scanner.next_string_piece().tag, RawTag::Eof);
}

#[test]
fn skip_string_rest_honors_escaped_quotes() {
    let source = "\"bad\\q rest \\\" more\" after";
    let buf = SourceBuffer::new(source);
    let mut scanner = RawScanner::new(buf.cursor());
    scanner.next_token();
    scanner.next_string_piece();
    scanner.next_string_piece();
    let rest = scanner.skip_string_rest();
    assert_eq!(rest.tag, RawTag::Discarded);
    assert_eq!(scanner.slice(6, scanner.pos()), " rest \\\" more\"");
    assert_eq!(scanner.next_token().tag, RawTag::Whitespace);
}

#[test]
fn skip_string_rest_stops_at_eof() {
    let source = "\" never closed\n";
    let buf = SourceBuffer::new(source);
    let mut scanner = RawScanner::new(buf.cursor());
    scanner.next_token();
    let rest = scanner.skip_string_rest();
    assert_eq!(rest.len as usize, source.len() - 1);
    assert_eq!(scanner.next_string_piece().tag, RawTag::Eof);
}

// ─── Recovery ───────────────────────────────────────────────────

#[test]
fn skip_line_stops_at_newline() {
    let source = "bad stuff here\nopen";
    let buf = SourceBuffer::new(source);
    let mut scanner = RawScanner::new(buf.cursor());
    scanner.next_token();
    let skipped = scanner.skip_line();
    assert_eq!(skipped.tag, RawTag::Discarded);
    assert_eq!(scanner.slice(3, scanner.pos()), " stuff here");
    assert!(!scanner.at_line_start());
    assert_eq!(scanner.next_token(), RawToken { tag: RawTag::Newline, len: 1 });
    assert!(scanner.at_line_start());
    assert_eq!(scanner.next_token(), RawToken { tag: RawTag::Ident, len: 4 });
}

#[test]
fn skip_line_at_eof_is_empty() {
    let buf = SourceBuffer::new("x");
    let mut scanner = RawScanner::new(buf.cursor());
    scanner.next_token();
    assert_eq!(scanner.skip_line(), RawToken { tag: RawTag::Discarded, len: 0 });
    assert!(!scanner.at_line_start());
}

// ─── Realistic ledger input ─────────────────────────────────────

#[test]
fn realistic_transaction() {
    let source = "2024-03-01 * \"Cafe\" \"Coffee\"\n  Expenses:Food  4.50 USD\n";
    assert_eq!(
        scan_tags(source),
        vec![
            RawTag::Date,
            RawTag::Whitespace,
            RawTag::Asterisk,
            RawTag::Whitespace,
            RawTag::Quote,
            RawTag::StrText,
            RawTag::StrClose,
            RawTag::Whitespace,
            RawTag::Quote,
            RawTag::StrText,
            RawTag::StrClose,
            RawTag::Newline,
            RawTag::Indent,
            RawTag::Account,
            RawTag::Whitespace,
            RawTag::Number,
            RawTag::Whitespace,
            RawTag::Currency,
            RawTag::Newline,
        ]
    );
}

// ─── Property tests ─────────────────────────────────────────────

mod proptest_coverage {
    use super::scan;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tokens_cover_source_exactly(source in "[ -~\n\té]{0,96}") {
            let total: u64 = scan(&source).iter().map(|t| u64::from(t.len)).sum();
            prop_assert_eq!(total, source.len() as u64);
        }

        #[test]
        fn only_eof_is_empty(source in "[ -~\n\t]{0,96}") {
            prop_assert!(scan(&source).iter().all(|t| t.len > 0));
        }
    }
}
