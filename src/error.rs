//! Runtime and compile-time error representation.
//!
//! Mirrors the teacher's [`thiserror`]-based `InterpreterError`: a single
//! typed enum carrying the [`Position`] at which the error occurred, whose
//! `Display` implementation renders the exact diagnostic format `spec.md` §7
//! specifies: `"Error in <source>, line <line> column <column>: <message>"`.

use thiserror::Error;

use crate::position::Position;

/// A single formatted error, positioned in the source that produced it.
///
/// `spec.md` §7 describes this as a fixed-size slot that later errors
/// overwrite; here errors are plain values threaded through `Result`, which
/// gives the same "later error replaces earlier" behavior for free (each
/// stage simply returns as soon as it has one).
#[derive(Debug, Error)]
#[error("Error in {position}: {kind}")]
pub struct InterpreterError {
    pub position: Position,
    pub kind: ErrorKind,
}

impl InterpreterError {
    pub fn new(position: Position, kind: ErrorKind) -> Self {
        Self { position, kind }
    }

    pub fn unknown_identifier(position: Position, name: impl Into<String>) -> Self {
        Self::new(position, ErrorKind::UnknownIdentifier(name.into()))
    }

    pub fn open_group(position: Position) -> Self {
        Self::new(position, ErrorKind::OpenGroup)
    }

    pub fn missing_macro_arguments(position: Position, name: &'static str, index: usize) -> Self {
        Self::new(position, ErrorKind::MissingMacroArguments { name, index })
    }

    pub fn semi_in_emit(position: Position) -> Self {
        Self::new(position, ErrorKind::SemiInEmit)
    }

    pub fn stack_underflow(position: Position) -> Self {
        Self::new(position, ErrorKind::StackUnderflow)
    }
}

/// The distinct error kinds a REPL turn can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Unknown id: {0}")]
    UnknownIdentifier(String),

    #[error("Open group")]
    OpenGroup,

    #[error("Missing macro arguments: {name} {index}")]
    MissingMacroArguments { name: &'static str, index: usize },

    #[error("Semi emit")]
    SemiInEmit,

    #[error("Not enough values")]
    StackUnderflow,

    #[error("Duplicate binding: {0}")]
    DuplicateBinding(String),

    #[error("Malformed macro form: {0}")]
    MalformedMacroForm(&'static str),

    #[error("Invalid integer literal")]
    InvalidInteger,

    #[error("Reserved identifier: {0}")]
    ReservedIdentifier(String),
}
