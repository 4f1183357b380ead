//! Scanner configuration.

/// Knobs for one [`Scanner`](crate::Scanner).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Bytes allocated up front for string literal contents.
    pub initial_string_capacity: usize,
    /// Emit a synthetic `EOL` before the first `EOF` so the last line is
    /// always terminated.
    pub terminate_last_line: bool,
    /// Encoding label forwarded to the builder with string values.
    pub encoding: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            initial_string_capacity: 64,
            terminate_last_line: true,
            encoding: "utf-8".to_owned(),
        }
    }
}

impl ScanOptions {
    #[must_use]
    pub fn with_initial_string_capacity(mut self, capacity: usize) -> Self {
        self.initial_string_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_terminate_last_line(mut self, terminate: bool) -> Self {
        self.terminate_last_line = terminate;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }
}
