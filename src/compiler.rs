//! The compiler: walks a form tree, resolving identifiers and dispatching to
//! each resolved value's `emit` method, producing flat bytecode.
//!
//! Grounded on the teacher's `Interpreter` struct as "one stateful object
//! threading several owned subsystems" (`src/interpreter.rs`), generalized
//! here from runtime interpretation to compile-time emission.

use std::collections::VecDeque;

use crate::env::{is_drop_run, Scopes};
use crate::error::InterpreterError;
use crate::form::{Form, FormKind};
use crate::function::{Function, FunctionTable};
use crate::macros::MacroId;
use crate::opcode::{Opcode, Pc, Program};
use crate::position::Position;
use crate::value::{RegId, Value};

pub struct Compiler {
    pub program: Program,
    pub scopes: Scopes,
    pub functions: FunctionTable,
}

impl Compiler {
    pub fn new() -> Self {
        let mut scopes = Scopes::new();
        let pos = Position::start(crate::position::SourceName::new("<builtin>"));

        for macro_id in [MacroId::Eq, MacroId::If, MacroId::FuncDef, MacroId::Placeholder] {
            scopes
                .bind(pos, macro_id.name().to_string(), Value::macro_(macro_id))
                .expect("builtin macro names never collide");
        }

        scopes.bind(pos, "T".to_string(), Value::bool(true)).expect("builtin constant names never collide");
        scopes.bind(pos, "F".to_string(), Value::bool(false)).expect("builtin constant names never collide");

        use crate::value::BuiltinType;
        for ty in [BuiltinType::Meta, BuiltinType::Bool, BuiltinType::Int, BuiltinType::Func, BuiltinType::Macro] {
            scopes
                .bind(pos, ty.name().to_string(), Value::type_(ty))
                .expect("builtin type names never collide");
        }

        let functions = FunctionTable::new();
        for (i, name) in ["+", "-", "debug"].iter().enumerate() {
            scopes
                .bind(pos, name.to_string(), Value::func(crate::function::FuncId(i as u32)))
                .expect("builtin function names never collide");
        }

        Compiler {
            program: Program::new(),
            scopes,
            functions,
        }
    }

    pub fn current_pc(&self) -> Pc {
        self.program.pc()
    }

    pub fn push_op_at(&mut self, pos: Position, opcode: Opcode) -> Pc {
        self.program.push(opcode, pos)
    }

    pub fn patch(&mut self, pc: Pc, opcode: Opcode) {
        self.program.patch(pc, opcode);
    }

    /// Compiles a full top-level turn: a flat list of forms ending where the
    /// reader found `;`. All of the turn's forms share one remaining-forms
    /// list, so a function or macro invocation anywhere in the turn can
    /// splice/drain forms that follow it — this is how nested calls chain
    /// without requiring a `Group` at every level (`spec.md` §4.4's "groups
    /// are reserved for future grouping/precedence").
    pub fn compile_turn(&mut self, forms: Vec<Form>) -> Result<(), InterpreterError> {
        self.drain_forms(VecDeque::from(forms))
    }

    /// Emits every form in `forms` in order, letting each drain further
    /// forms from the same list as needed. Used both for a whole turn and
    /// for a `Group`'s own children, which get their own such list scoped to
    /// just that group.
    fn drain_forms(&mut self, mut forms: VecDeque<Form>) -> Result<(), InterpreterError> {
        while let Some(form) = forms.pop_front() {
            self.emit_one(form, &mut forms)?;
        }
        Ok(())
    }

    /// Emits one form, which may itself pop further forms from `remaining`
    /// if it resolves to a function or macro — this is the one place the
    /// "current remaining forms list" is threaded through, so callers must
    /// always pass the list they actually want drained from, never a copy.
    pub(crate) fn emit_one(&mut self, form: Form, remaining: &mut VecDeque<Form>) -> Result<(), InterpreterError> {
        match &form.kind {
            FormKind::Semicolon => Err(InterpreterError::new(
                form.pos,
                crate::error::ErrorKind::SemiInEmit,
            )),
            FormKind::Literal(v) => {
                self.push_op_at(form.pos, Opcode::Push(*v));
                Ok(())
            }
            FormKind::Group(children) => self.drain_forms(VecDeque::from(children.clone())),
            FormKind::Identifier(name) => self.emit_identifier(name.clone(), form, remaining),
        }
    }

    /// Pops and emits one form from `remaining`, reporting `what` at `pos`
    /// if the list is already empty. Used by macro expansions that need
    /// "the next expression", which — since expressions can themselves
    /// drain further forms — is not the same as "the next already-complete
    /// form".
    pub fn compile_next(
        &mut self,
        remaining: &mut VecDeque<Form>,
        pos: Position,
        what: &'static str,
    ) -> Result<(), InterpreterError> {
        let form = remaining
            .pop_front()
            .ok_or_else(|| InterpreterError::new(pos, crate::error::ErrorKind::MalformedMacroForm(what)))?;
        self.emit_one(form, remaining)
    }

    fn emit_identifier(
        &mut self,
        name: String,
        form: Form,
        remaining: &mut VecDeque<Form>,
    ) -> Result<(), InterpreterError> {
        if is_drop_run(&name) {
            self.push_op_at(form.pos, Opcode::Drop(name.len() as u32));
            return Ok(());
        }

        let value = self
            .scopes
            .resolve(&name)
            .ok_or_else(|| InterpreterError::unknown_identifier(form.pos, name.clone()))?;

        if let Some(reg) = as_register(&value) {
            self.push_op_at(form.pos, Opcode::Load(reg));
            return Ok(());
        }

        value.emit(&form, remaining, self)
    }

    pub fn emit_call(
        &mut self,
        id: crate::function::FuncId,
        form: &Form,
        remaining: &mut VecDeque<Form>,
    ) -> Result<(), InterpreterError> {
        let function = self.functions.get(id).clone();
        if remaining.len() < function.arity {
            return Err(InterpreterError::new(
                form.pos,
                crate::error::ErrorKind::MalformedMacroForm("function called with too few arguments"),
            ));
        }
        for _ in 0..function.arity {
            let arg = remaining.pop_front().expect("checked above");
            self.emit_one(arg, remaining)?;
        }
        match function.body {
            crate::function::FunctionBody::Intrinsic(_) => {
                self.push_op_at(form.pos, Opcode::CallIntrinsic(id));
            }
            crate::function::FunctionBody::Defined { .. } => {
                self.push_op_at(form.pos, Opcode::Call(id));
            }
        }
        Ok(())
    }

    /// The compile-time constant a form denotes, if any: a literal form's
    /// own value, or (recursively) the `literal` projection of whatever an
    /// identifier form resolves to. Used by `=` to decide whether an
    /// operand can be inlined into an opcode immediate instead of compiled.
    pub fn literal_of_form(&self, form: &Form) -> Option<Value> {
        match &form.kind {
            FormKind::Literal(v) => Some(*v),
            FormKind::Identifier(name) => self.scopes.resolve(name).and_then(|v| v.literal()),
            _ => None,
        }
    }

    pub fn compile_func_def(
        &mut self,
        name: String,
        arg_names: Vec<String>,
        body: Form,
        remaining: &mut VecDeque<Form>,
        pos: Position,
    ) -> Result<(), InterpreterError> {
        let skip_pc = self.push_op_at(pos, Opcode::Nop);
        let start_pc = self.current_pc();

        self.scopes.push();
        let mut arg_regs = Vec::with_capacity(arg_names.len());
        for arg_name in &arg_names {
            let reg = self.scopes.current().alloc_register();
            self.scopes
                .bind(pos, arg_name.clone(), Value::type_(crate::value::BuiltinType::Meta).with_register(reg))?;
            arg_regs.push(reg);
        }
        // The caller leaves its arguments on the operand stack in
        // left-to-right order; pop them into registers here, last argument
        // first, so each ends up in the register matching its parameter.
        for reg in arg_regs.into_iter().rev() {
            self.push_op_at(pos, Opcode::Store(reg));
        }
        self.emit_one(body, remaining)?;
        self.push_op_at(pos, Opcode::Ret);
        self.scopes.pop();

        self.patch(skip_pc, Opcode::Jump(self.current_pc()));

        let function = Function::defined(name.clone(), arg_names, start_pc);
        let id = self.functions.define(function);

        if name == "_" {
            // Anonymous: the function value isn't bound to anything, it's
            // left on the operand stack for whatever follows to consume.
            self.push_op_at(pos, Opcode::Push(Value::func(id)));
        } else {
            self.scopes.bind(pos, name, Value::func(id))?;
        }
        Ok(())
    }

    pub fn ops(&self) -> &Program {
        &self.program
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

fn as_register(v: &Value) -> Option<RegId> {
    match v.payload {
        crate::value::Payload::Register(r) => Some(r),
        _ => None,
    }
}

impl Value {
    /// Wraps this value's type tag into a register reference, used only by
    /// the compiler when a binding resolves to a computed (non-constant)
    /// value. The original type information isn't needed at lookup time:
    /// the register load recovers the real value's type from the runtime
    /// stack slot it was stored from.
    fn with_register(self, reg: RegId) -> Value {
        Value {
            ty: self.ty,
            payload: crate::value::Payload::Register(reg),
        }
    }
}
