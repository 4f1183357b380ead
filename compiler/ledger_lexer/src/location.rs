//! Line/column bookkeeping.
//!
//! Columns are 1-based byte columns. A lexeme of length `n` starting at
//! column `c` occupies `c..=c + n - 1`; the next lexeme starts at `c + n`.
//! Newlines inside a lexeme bump the line and restart the column count, so
//! the byte after a newline is always column 1.

use std::fmt;
use std::sync::Arc;

/// Where a lexeme occurred.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub filename: Arc<str>,
    /// 1-based.
    pub line: u32,
    /// 1-based, inclusive.
    pub first_column: u32,
    /// 1-based, inclusive. Never less than `first_column`.
    pub last_column: u32,
}

impl Location {
    pub fn new(filename: Arc<str>, line: u32, first_column: u32, last_column: u32) -> Self {
        debug_assert!(last_column >= first_column);
        Self {
            filename,
            line,
            first_column,
            last_column,
        }
    }

    /// Number of columns covered, at least 1.
    pub fn width(&self) -> u32 {
        self.last_column - self.first_column + 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.first_column)
    }
}

/// Running position in one source file.
#[derive(Clone, Debug)]
pub struct LocationTracker {
    filename: Arc<str>,
    line: u32,
    column: u32,
}

impl LocationTracker {
    pub fn new(filename: Arc<str>) -> Self {
        Self {
            filename,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn filename(&self) -> &Arc<str> {
        &self.filename
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Account for `lexeme`, returning the location it occupied.
    ///
    /// The returned location is anchored at the lexeme's first byte even
    /// when the lexeme spans several lines. An empty lexeme yields a
    /// one-column location at the current position.
    pub fn advance(&mut self, lexeme: &[u8]) -> Location {
        let len = u32::try_from(lexeme.len()).unwrap_or(u32::MAX);
        let first = self.column;
        let location = Location::new(
            Arc::clone(&self.filename),
            self.line,
            first,
            first.saturating_add(len.max(1) - 1),
        );

        match memchr::memrchr(b'\n', lexeme) {
            Some(last_newline) => {
                let newlines = memchr::memchr_iter(b'\n', lexeme).count();
                self.line = self
                    .line
                    .saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
                // Bytes after the last newline, plus one.
                self.column = u32::try_from(lexeme.len() - last_newline).unwrap_or(u32::MAX);
            }
            None => self.column = first.saturating_add(len),
        }
        location
    }

    /// A one-column location at the current position.
    pub fn point(&self) -> Location {
        Location::new(Arc::clone(&self.filename), self.line, self.column, self.column)
    }
}
