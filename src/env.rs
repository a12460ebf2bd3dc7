//! Lexical environments: name-to-value bindings with unique-name enforcement.
//!
//! Grounded on the teacher's fixed-capacity, index-addressed register file
//! (`consts::VM_REGISTER_COUNT`, `src/interpreter.rs` register accessors) —
//! here generalized from a flat register bank to a stack of nested scopes,
//! each bounded the same way.

use crate::error::InterpreterError;
use crate::limits::{MAX_ENV_ENTRIES, MAX_SCOPE_DEPTH};
use crate::position::Position;
use crate::value::{RegId, Value};

/// A single lexical scope's bindings, kept sorted by name for fast lookup
/// and to give deterministic dump ordering.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    entries: Vec<(String, Value)>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Binds `name` to `value`. Rejects shadowing within the same scope
    /// (`spec.md`'s "duplicate binding" edge case) and rejects `d+`-shaped
    /// names, which are reserved for the DROP-repetition shorthand.
    pub fn bind(&mut self, pos: Position, name: String, value: Value) -> Result<(), InterpreterError> {
        if is_drop_run(&name) {
            return Err(InterpreterError::new(
                pos,
                crate::error::ErrorKind::ReservedIdentifier(name),
            ));
        }
        match self.entries.binary_search_by(|(n, _)| n.as_str().cmp(&name)) {
            Ok(_) => Err(InterpreterError::new(
                pos,
                crate::error::ErrorKind::DuplicateBinding(name),
            )),
            Err(insert_at) => {
                assert!(self.entries.len() < MAX_ENV_ENTRIES, "scope exhausted");
                self.entries.insert(insert_at, (name, value));
                Ok(())
            }
        }
    }
}

/// An identifier consisting entirely of one or more `d` characters denotes
/// that many repeated DROP operations rather than a binding lookup
/// (`spec.md`'s `d+` shorthand), and so can never be a user-defined name.
pub fn is_drop_run(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b == b'd')
}

/// One lexical frame: its own environment plus how many registers it has
/// claimed so far.
#[derive(Debug, Clone)]
pub struct Scope {
    pub env: Environment,
    pub reg_count: u16,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            reg_count: 0,
        }
    }

    pub fn alloc_register(&mut self) -> RegId {
        assert!((self.reg_count as usize) < crate::limits::MAX_REGISTERS, "register file exhausted");
        let id = RegId(self.reg_count);
        self.reg_count += 1;
        id
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack of nested scopes, innermost last. Bounded by `MAX_SCOPE_DEPTH`.
#[derive(Debug)]
pub struct Scopes {
    stack: Vec<Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self {
            stack: vec![Scope::new()],
        }
    }

    pub fn push(&mut self) {
        assert!(self.stack.len() < MAX_SCOPE_DEPTH, "scope nesting too deep");
        self.stack.push(Scope::new());
    }

    pub fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn current(&mut self) -> &mut Scope {
        self.stack.last_mut().expect("scope stack is never empty")
    }

    /// Resolves a name by searching from the innermost scope outward.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        self.stack.iter().rev().find_map(|s| s.env.get(name))
    }

    pub fn bind(&mut self, pos: Position, name: String, value: Value) -> Result<(), InterpreterError> {
        self.current().env.bind(pos, name, value)
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_run_detection() {
        assert!(is_drop_run("d"));
        assert!(is_drop_run("ddd"));
        assert!(!is_drop_run(""));
        assert!(!is_drop_run("dog"));
        assert!(!is_drop_run("dd1"));
    }

    #[test]
    fn rebinding_same_name_in_scope_is_rejected() {
        let src = crate::position::SourceName::new("test");
        let pos = crate::position::Position::start(src);
        let mut env = Environment::new();
        env.bind(pos, "x".into(), Value::int(1)).unwrap();
        let err = env.bind(pos, "x".into(), Value::int(2)).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::DuplicateBinding(_)));
    }

    #[test]
    fn drop_run_names_are_reserved() {
        let src = crate::position::SourceName::new("test");
        let pos = crate::position::Position::start(src);
        let mut env = Environment::new();
        let err = env.bind(pos, "dd".into(), Value::int(1)).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::ReservedIdentifier(_)));
    }

    #[test]
    fn outer_scope_is_visible_from_inner() {
        let src = crate::position::SourceName::new("test");
        let pos = crate::position::Position::start(src);
        let mut scopes = Scopes::new();
        scopes.bind(pos, "x".into(), Value::int(7)).unwrap();
        scopes.push();
        assert_eq!(scopes.resolve("x"), Some(Value::int(7)));
    }
}
