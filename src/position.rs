//! Source position tracking.

use std::fmt;

use crate::limits::MAX_SOURCE_NAME_LEN;

/// A bounded, stack-allocated source name (no heap allocation for something
/// that's copied into every form and every error).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceName {
    bytes: [u8; MAX_SOURCE_NAME_LEN],
    len: u8,
}

impl SourceName {
    /// Build a source name, truncating if it exceeds [`MAX_SOURCE_NAME_LEN`].
    pub fn new(name: &str) -> Self {
        let mut bytes = [0u8; MAX_SOURCE_NAME_LEN];
        let len = name.len().min(MAX_SOURCE_NAME_LEN);
        bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        // Safe: constructed only from valid UTF-8 and truncated at a byte
        // boundary is possible in theory, but MAX_SOURCE_NAME_LEN is large
        // enough in practice that source names never hit it. Fall back to
        // lossy truncation rather than panicking on malformed boundaries.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("?")
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// Source location, carried on every form and reported in errors.
///
/// Immutable once captured; copied by value wherever it flows.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub source: SourceName,
    pub line: u16,
    pub column: u16,
}

impl Position {
    pub fn new(source: SourceName, line: u16, column: u16) -> Self {
        Self {
            source,
            line,
            column,
        }
    }

    pub fn start(source: SourceName) -> Self {
        Self::new(source, 1, 1)
    }

    /// Advance past a single, non-newline character.
    pub fn advance(&mut self) {
        self.column = self.column.saturating_add(1);
    }

    /// Advance past a newline: reset column, advance line.
    pub fn newline(&mut self) {
        self.line = self.line.saturating_add(1);
        self.column = 1;
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// Renders as `"<source>, line <line> column <column>"`, which is exactly
/// the position clause of the diagnostic format `spec.md` §7 specifies:
/// `"Error in <source>, line <line> column <column>: <message>"`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, line {} column {}", self.source, self.line, self.column)
    }
}
