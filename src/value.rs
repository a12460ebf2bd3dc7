//! The polymorphic value representation and its type dispatch table.
//!
//! Mirrors the teacher's "tagged payload + per-type method table" split
//! (compare `fuel_asm::OpcodeRepr` dispatch in
//! `src/interpreter/executors/instruction.rs`, which matches a closed
//! discriminant to behavior) rather than class inheritance, per `spec.md`
//! §9's explicit design note.

use std::fmt;

use crate::compiler::Compiler;
use crate::error::InterpreterError;
use crate::form::Form;
use crate::function::FuncId;
use crate::macros::MacroId;
use crate::opcode::Opcode;

/// Index into the register file. Carried both as a `Value` payload (the
/// spec's "register index" variant) and as opcode immediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegId(pub u16);

/// The closed set of built-in types. `spec.md`'s Non-goals forbid a module
/// system, so there is no open type registry — every type a value can carry
/// is one of these five, fixed for the interpreter's lifetime. Identity is
/// simply enum equality, which stands in for the source's address-equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Meta,
    Bool,
    Int,
    Func,
    Macro,
}

impl BuiltinType {
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinType::Meta => "Meta",
            BuiltinType::Bool => "Bool",
            BuiltinType::Int => "Int",
            BuiltinType::Func => "Func",
            BuiltinType::Macro => "Macro",
        }
    }

    const fn methods(self) -> &'static TypeMethods {
        match self {
            BuiltinType::Meta => &META_METHODS,
            BuiltinType::Bool => &BOOL_METHODS,
            BuiltinType::Int => &INT_METHODS,
            BuiltinType::Func => &FUNC_METHODS,
            BuiltinType::Macro => &MACRO_METHODS,
        }
    }
}

/// Tagged value. Copied by value wherever it flows: operand stack, register
/// file, opcode immediates, environment entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value {
    pub ty: BuiltinType,
    pub payload: Payload,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Bool(bool),
    Int(i32),
    Func(FuncId),
    Macro(MacroId),
    Type(BuiltinType),
    Register(RegId),
}

impl Value {
    pub const fn bool(v: bool) -> Self {
        Value {
            ty: BuiltinType::Bool,
            payload: Payload::Bool(v),
        }
    }

    pub const fn int(v: i32) -> Self {
        Value {
            ty: BuiltinType::Int,
            payload: Payload::Int(v),
        }
    }

    pub const fn func(id: FuncId) -> Self {
        Value {
            ty: BuiltinType::Func,
            payload: Payload::Func(id),
        }
    }

    pub const fn macro_(id: MacroId) -> Self {
        Value {
            ty: BuiltinType::Macro,
            payload: Payload::Macro(id),
        }
    }

    pub const fn type_(ty: BuiltinType) -> Self {
        Value {
            ty: BuiltinType::Meta,
            payload: Payload::Type(ty),
        }
    }

    /// Default register-file slot value: functions get a reset register file
    /// on entry (see `spec.md` §4.6 resolution in `SPEC_FULL.md`).
    pub const fn default_register() -> Self {
        Value::int(0)
    }

    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        (self.ty.methods().dump)(self, out)
    }

    pub fn emit(
        &self,
        form: &Form,
        remaining: &mut std::collections::VecDeque<Form>,
        compiler: &mut Compiler,
    ) -> Result<(), InterpreterError> {
        (self.ty.methods().emit)(self, form, remaining, compiler)
    }

    pub fn equal(&self, other: &Value) -> bool {
        match self.ty.methods().equal {
            Some(f) => f(self, other),
            None => false,
        }
    }

    pub fn is_true(&self) -> bool {
        (self.ty.methods().is_true)(self)
    }

    /// The compile-time constant this value denotes, if any. Functions and
    /// macros return `None` ("not a compile-time constant"), matching
    /// `spec.md` §4.2.
    pub fn literal(&self) -> Option<Value> {
        (self.ty.methods().literal)(self)
    }
}

/// Per-type method table. `dump`/`equal` have no universal default per
/// `spec.md` §3 and are `Option`/required depending on the type; `emit`,
/// `is_true` and `literal` have the defaults §4.2 specifies.
pub struct TypeMethods {
    pub dump: fn(&Value, &mut dyn fmt::Write) -> fmt::Result,
    pub emit: fn(&Value, &Form, &mut std::collections::VecDeque<Form>, &mut Compiler) -> Result<(), InterpreterError>,
    pub equal: Option<fn(&Value, &Value) -> bool>,
    pub is_true: fn(&Value) -> bool,
    pub literal: fn(&Value) -> Option<Value>,
}

fn default_is_true(_v: &Value) -> bool {
    true
}

fn default_literal(v: &Value) -> Option<Value> {
    Some(*v)
}

fn default_emit(
    v: &Value,
    form: &Form,
    _remaining: &mut std::collections::VecDeque<Form>,
    compiler: &mut Compiler,
) -> Result<(), InterpreterError> {
    compiler.push_op_at(form.pos, Opcode::Push(*v));
    Ok(())
}

fn bool_dump(v: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
    match v.payload {
        Payload::Bool(b) => write!(out, "{}", if b { "T" } else { "F" }),
        _ => unreachable!("Bool value with non-bool payload"),
    }
}

fn bool_equal(a: &Value, b: &Value) -> bool {
    matches!(
        (a.payload, b.payload),
        (Payload::Bool(x), Payload::Bool(y)) if x == y
    )
}

fn bool_is_true(v: &Value) -> bool {
    matches!(v.payload, Payload::Bool(b) if b)
}

const BOOL_METHODS: TypeMethods = TypeMethods {
    dump: bool_dump,
    emit: default_emit,
    equal: Some(bool_equal),
    is_true: bool_is_true,
    literal: default_literal,
};

fn int_dump(v: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
    match v.payload {
        Payload::Int(n) => write!(out, "{}", n),
        _ => unreachable!("Int value with non-int payload"),
    }
}

fn int_equal(a: &Value, b: &Value) -> bool {
    matches!(
        (a.payload, b.payload),
        (Payload::Int(x), Payload::Int(y)) if x == y
    )
}

fn int_is_true(v: &Value) -> bool {
    matches!(v.payload, Payload::Int(n) if n != 0)
}

const INT_METHODS: TypeMethods = TypeMethods {
    dump: int_dump,
    emit: default_emit,
    equal: Some(int_equal),
    is_true: int_is_true,
    literal: default_literal,
};

fn meta_dump(v: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
    match v.payload {
        Payload::Type(t) => write!(out, "{}", t.name()),
        _ => unreachable!("Meta value with non-type payload"),
    }
}

fn meta_equal(a: &Value, b: &Value) -> bool {
    matches!(
        (a.payload, b.payload),
        (Payload::Type(x), Payload::Type(y)) if x == y
    )
}

const META_METHODS: TypeMethods = TypeMethods {
    dump: meta_dump,
    emit: default_emit,
    equal: Some(meta_equal),
    is_true: default_is_true,
    literal: default_literal,
};

fn func_dump(v: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
    match v.payload {
        Payload::Func(id) => write!(out, "<func #{}>", id.0),
        _ => unreachable!("Func value with non-func payload"),
    }
}

fn func_literal(_v: &Value) -> Option<Value> {
    // A function isn't a compile-time constant the compiler can fold into
    // an opcode immediate; it must be called through its `emit`.
    None
}

fn func_emit(
    v: &Value,
    form: &Form,
    remaining: &mut std::collections::VecDeque<Form>,
    compiler: &mut Compiler,
) -> Result<(), InterpreterError> {
    let id = match v.payload {
        Payload::Func(id) => id,
        _ => unreachable!("Func value with non-func payload"),
    };
    compiler.emit_call(id, form, remaining)
}

const FUNC_METHODS: TypeMethods = TypeMethods {
    dump: func_dump,
    emit: func_emit,
    equal: None,
    is_true: default_is_true,
    literal: func_literal,
};

fn macro_dump(v: &Value, out: &mut dyn fmt::Write) -> fmt::Result {
    match v.payload {
        Payload::Macro(id) => write!(out, "<macro {}>", id.name()),
        _ => unreachable!("Macro value with non-macro payload"),
    }
}

fn macro_literal(_v: &Value) -> Option<Value> {
    None
}

fn macro_emit(
    v: &Value,
    form: &Form,
    remaining: &mut std::collections::VecDeque<Form>,
    compiler: &mut Compiler,
) -> Result<(), InterpreterError> {
    let id = match v.payload {
        Payload::Macro(id) => id,
        _ => unreachable!("Macro value with non-macro payload"),
    };
    let arity = id.arity();
    if remaining.len() < arity {
        return Err(InterpreterError::missing_macro_arguments(
            form.pos,
            id.name(),
            remaining.len(),
        ));
    }
    id.expand(form, remaining, compiler)
}

const MACRO_METHODS: TypeMethods = TypeMethods {
    dump: macro_dump,
    emit: macro_emit,
    equal: None,
    is_true: default_is_true,
    literal: macro_literal,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_equality_is_by_value() {
        assert!(Value::int(3).equal(&Value::int(3)));
        assert!(!Value::int(3).equal(&Value::int(4)));
    }

    #[test]
    fn bool_truthiness() {
        assert!(Value::bool(true).is_true());
        assert!(!Value::bool(false).is_true());
    }

    #[test]
    fn int_truthiness_is_nonzero() {
        assert!(Value::int(1).is_true());
        assert!(!Value::int(0).is_true());
    }

    #[test]
    fn default_truthiness_for_types_and_funcs() {
        assert!(Value::type_(BuiltinType::Int).is_true());
    }

    #[test]
    fn functions_and_macros_have_no_literal() {
        assert!(Value::func(FuncId(0)).literal().is_none());
        assert!(Value::macro_(MacroId::If).literal().is_none());
    }

    #[test]
    fn dump_renders_expected_text() {
        let mut s = String::new();
        Value::int(42).dump(&mut s).unwrap();
        assert_eq!(s, "42");

        let mut s = String::new();
        Value::bool(true).dump(&mut s).unwrap();
        assert_eq!(s, "T");

        let mut s = String::new();
        Value::bool(false).dump(&mut s).unwrap();
        assert_eq!(s, "F");
    }
}
