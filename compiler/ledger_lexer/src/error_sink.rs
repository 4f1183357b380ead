//! Forwards lexical errors to the builder.

use tracing::debug;

use crate::{Builder, LexError, ScanError};

/// Counts and forwards every error the scanner produces.
///
/// A builder that fails to accept an error ends the scan: the failure comes
/// back as [`ScanError::ErrorSink`] carrying both the error and the cause.
#[derive(Debug, Default)]
pub struct ErrorSink {
    reported: usize,
}

impl ErrorSink {
    pub fn report<B: Builder + ?Sized>(
        &mut self,
        builder: &mut B,
        error: LexError,
    ) -> Result<(), ScanError> {
        debug!(
            line = error.location.line,
            column = error.location.first_column,
            error = %error.kind,
            "lex error"
        );
        self.reported += 1;
        builder
            .report_error(&error)
            .map_err(|source| ScanError::ErrorSink {
                error: Box::new(error),
                source,
            })
    }

    /// Errors reported so far, including one whose report failed.
    pub fn reported(&self) -> usize {
        self.reported
    }
}
