//! Macro protocol: compile-time callables that directly emit opcodes and
//! consume/splice the remaining form list.
//!
//! Grounded on the teacher's `if`/jump-patching idiom in
//! `src/interpreter/flow.rs` for control flow, generalized here to also
//! cover binding (`=`) and function definition (`func`).

use std::collections::VecDeque;

use crate::compiler::Compiler;
use crate::error::InterpreterError;
use crate::form::{Form, FormKind};
use crate::opcode::Opcode;
use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroId {
    /// `= x y` — compares `x` and `y` for equality, pushing the `Bool`.
    Eq,
    /// `if cond then else` — evaluates `then` if `cond` is true, `else`
    /// otherwise.
    If,
    /// `func name (args) (rets) body` — defines a new function.
    FuncDef,
    /// `_` — placeholder identifier, ignored wherever it's bound.
    Placeholder,
}

impl MacroId {
    pub const fn name(self) -> &'static str {
        match self {
            MacroId::Eq => "=",
            MacroId::If => "if",
            MacroId::FuncDef => "func",
            MacroId::Placeholder => "_",
        }
    }

    /// Number of forms this macro consumes from the remaining list.
    pub const fn arity(self) -> usize {
        match self {
            MacroId::Eq => 2,
            MacroId::If => 3,
            MacroId::FuncDef => 4,
            MacroId::Placeholder => 0,
        }
    }

    pub fn expand(
        self,
        form: &Form,
        remaining: &mut VecDeque<Form>,
        compiler: &mut Compiler,
    ) -> Result<(), InterpreterError> {
        match self {
            MacroId::Eq => expand_eq(form.pos, remaining, compiler),
            MacroId::If => expand_if(form.pos, remaining, compiler),
            MacroId::FuncDef => expand_func_def(form.pos, remaining, compiler),
            MacroId::Placeholder => Ok(()),
        }
    }
}

fn take_identifier(
    pos: Position,
    remaining: &mut VecDeque<Form>,
    what: &'static str,
) -> Result<String, InterpreterError> {
    match remaining.pop_front() {
        Some(Form {
            kind: FormKind::Identifier(name),
            ..
        }) => Ok(name),
        _ => Err(InterpreterError::new(
            pos,
            crate::error::ErrorKind::MalformedMacroForm(what),
        )),
    }
}

fn take_group(
    pos: Position,
    remaining: &mut VecDeque<Form>,
    what: &'static str,
) -> Result<Vec<Form>, InterpreterError> {
    match remaining.pop_front() {
        Some(Form {
            kind: FormKind::Group(children),
            ..
        }) => Ok(children),
        _ => Err(InterpreterError::new(
            pos,
            crate::error::ErrorKind::MalformedMacroForm(what),
        )),
    }
}

/// `= x y;` compares `x` and `y` for equality. A form that denotes a
/// compile-time literal (a literal form, or an identifier bound to a value
/// whose `literal` projection is non-nil) is inlined directly into the
/// EQUAL op's immediate slot; otherwise the form is compiled so its value
/// lands on the operand stack and the slot is left empty.
fn expand_eq(
    pos: Position,
    remaining: &mut VecDeque<Form>,
    compiler: &mut Compiler,
) -> Result<(), InterpreterError> {
    let x_form = remaining
        .pop_front()
        .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm("= expects a left operand")))?;
    let y_form = remaining
        .pop_front()
        .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm("= expects a right operand")))?;

    let x_imm = compiler.literal_of_form(&x_form);
    if x_imm.is_none() {
        compiler.emit_one(x_form, remaining)?;
    }
    let y_imm = compiler.literal_of_form(&y_form);
    if y_imm.is_none() {
        compiler.emit_one(y_form, remaining)?;
    }
    compiler.push_op_at(pos, Opcode::Equal(x_imm, y_imm));
    Ok(())
}

/// `if cond then else` emits a branch that skips `then` when `cond` is
/// false, jumping past `else` otherwise. Grounded directly on the teacher's
/// forward-jump-then-patch idiom for conditional control flow.
fn expand_if(
    pos: Position,
    remaining: &mut VecDeque<Form>,
    compiler: &mut Compiler,
) -> Result<(), InterpreterError> {
    let cond = remaining
        .pop_front()
        .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm("if expects a condition")))?;
    let then_form = remaining
        .pop_front()
        .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm("if expects a then branch")))?;
    let else_form = remaining
        .pop_front()
        .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm("if expects an else branch")))?;

    compiler.emit_one(cond, remaining)?;
    let branch_pc = compiler.push_op_at(pos, Opcode::Nop);
    compiler.emit_one(then_form, remaining)?;
    let jump_pc = compiler.push_op_at(pos, Opcode::Nop);
    let else_target = compiler.current_pc();
    compiler.patch(branch_pc, Opcode::Branch(else_target));
    compiler.emit_one(else_form, remaining)?;
    let end_target = compiler.current_pc();
    compiler.patch(jump_pc, Opcode::Jump(end_target));
    Ok(())
}

/// `func name (args) (rets) body` defines a new function whose arity is
/// its argument-form count; return-form shapes are validated but otherwise
/// unused at call time (an Open Question resolution, see `DESIGN.md`).
fn expand_func_def(
    pos: Position,
    remaining: &mut VecDeque<Form>,
    compiler: &mut Compiler,
) -> Result<(), InterpreterError> {
    let name = take_identifier(pos, remaining, "func expects a name")?;
    let args = take_group(pos, remaining, "func expects an args group")?;
    let _rets = take_group(pos, remaining, "func expects a rets group")?;
    let body = remaining
        .pop_front()
        .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm("func expects a body")))?;

    let arg_names = args
        .into_iter()
        .map(|f| match f.kind {
            FormKind::Identifier(n) => Ok(n),
            _ => Err(InterpreterError::new(
                f.pos,
                crate::error::ErrorKind::MalformedMacroForm("func args must be identifiers"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    compiler.compile_func_def(name, arg_names, body, remaining, pos)
}
