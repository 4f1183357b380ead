//! Shared fixtures for the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Once;

use ledger_lexer::{
    BuildArgs, BuildError, BuildRequest, Builder, LexError, ScanOptions, Scanner, SourceBuffer,
    Token, TokenKind,
};

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=ledger_lexer=trace cargo test -p ledger_lexer`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_test_writer().with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// A value as the ledger builder would construct it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Flag(char),
    Bool(bool),
    Date(u32, u32, u32),
    Str { contents: String, lines: u32 },
}

/// Builds [`Value`]s and keeps every reported error.
#[derive(Default)]
pub struct Recorder {
    pub errors: Vec<LexError>,
    /// Fail every build of this kind.
    pub fail_on: Option<TokenKind>,
}

impl Recorder {
    pub fn failing_on(kind: TokenKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::default()
        }
    }
}

impl Builder for Recorder {
    type Value = Value;

    fn build(&mut self, request: &BuildRequest<'_>) -> Result<Option<Value>, BuildError> {
        if self.fail_on == Some(request.kind) {
            return Err(BuildError::new(format!(
                "malformed {}: {}",
                request.kind, request.lexeme
            )));
        }
        Ok(Some(match request.args {
            BuildArgs::Text(text) => Value::Text(text.to_owned()),
            BuildArgs::Flag(flag) => Value::Flag(flag),
            BuildArgs::Bool(b) => Value::Bool(b),
            BuildArgs::Date { year, month, day } => Value::Date(year, month, day),
            BuildArgs::Str { contents, lines, .. } => Value::Str {
                contents: contents.to_owned(),
                lines,
            },
        }))
    }

    fn report_error(&mut self, error: &LexError) -> Result<(), BuildError> {
        self.errors.push(error.clone());
        Ok(())
    }
}

/// Scan `source` through the first `EOF`.
pub fn scan(
    source: &str,
    options: ScanOptions,
    builder: &mut Recorder,
) -> Vec<Token<'static, Value>> {
    init_tracing();
    let buffer = SourceBuffer::new(source);
    let mut scanner = Scanner::new(&buffer, "input.ledger", options);
    let mut tokens = Vec::new();
    loop {
        let token = scanner
            .next_token(builder)
            .expect("recorder accepts every error");
        let done = token.kind == TokenKind::Eof;
        tokens.push(token.into_owned());
        if done {
            return tokens;
        }
    }
}

pub fn kinds(tokens: &[Token<'_, Value>]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}
