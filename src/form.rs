//! The reader's output: a tree of forms, not yet compiled.

use std::collections::VecDeque;

use crate::position::Position;
use crate::value::Value;

/// A single parsed form. Groups own their children directly (index-based
/// arenas buy nothing here since forms are consumed once by the compiler and
/// never revisited or shared).
#[derive(Debug, Clone)]
pub enum FormKind {
    Identifier(String),
    Literal(Value),
    Group(Vec<Form>),
    Semicolon,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub pos: Position,
}

impl Form {
    pub fn identifier(name: impl Into<String>, pos: Position) -> Self {
        Form {
            kind: FormKind::Identifier(name.into()),
            pos,
        }
    }

    pub fn literal(value: Value, pos: Position) -> Self {
        Form {
            kind: FormKind::Literal(value),
            pos,
        }
    }

    pub fn group(children: Vec<Form>, pos: Position) -> Self {
        Form {
            kind: FormKind::Group(children),
            pos,
        }
    }

    pub fn semicolon(pos: Position) -> Self {
        Form {
            kind: FormKind::Semicolon,
            pos,
        }
    }

    pub fn is_semicolon(&self) -> bool {
        matches!(self.kind, FormKind::Semicolon)
    }
}

/// Turns a flat list of top-level forms into the deque the compiler consumes
/// one macro/function call at a time, splicing as it goes (`spec.md` §4's
/// "macros consume the remaining form list").
pub fn to_deque(forms: Vec<Form>) -> VecDeque<Form> {
    VecDeque::from(forms)
}
