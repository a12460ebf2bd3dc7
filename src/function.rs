//! Function protocol: runtime callables, fixed arity, intrinsic or defined.
//!
//! Grounded on the teacher's `CallFrame`/jump-to-entry-point mechanics in
//! `src/interpreter/flow.rs` (`jump`, `call`) for the defined-function case;
//! intrinsics (`+`, `-`, `debug`) have no teacher counterpart (the teacher
//! has no host-native builtins) and are modeled after the plain `fn` table
//! dispatch idiom instead.

use crate::opcode::Pc;
use crate::value::Value;

/// Index into the function table. Functions are never removed once defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);

/// `debug` is the only intrinsic that needs to touch interpreter-global
/// state (the debug-mode flag), so every intrinsic takes it by mutable
/// reference even though `+`/`-` ignore it.
pub type IntrinsicFn = fn(&[Value], &mut bool) -> Result<Value, &'static str>;

#[derive(Clone, Copy)]
pub enum FunctionBody {
    /// A host-native function, invoked directly without pushing a call
    /// frame or touching the register file.
    Intrinsic(IntrinsicFn),
    /// An interpreter-defined function: pushing a call invokes a fresh
    /// register-file snapshot and jumps to `start_pc` (see `spec.md` §4.6's
    /// resolution in `SPEC_FULL.md`).
    Defined { start_pc: Pc },
}

#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub arg_names: Vec<String>,
    pub arity: usize,
    pub body: FunctionBody,
}

impl Function {
    pub fn intrinsic(name: &str, arity: usize, f: IntrinsicFn) -> Self {
        Function {
            name: name.to_string(),
            arg_names: Vec::new(),
            arity,
            body: FunctionBody::Intrinsic(f),
        }
    }

    pub fn defined(name: String, arg_names: Vec<String>, start_pc: Pc) -> Self {
        let arity = arg_names.len();
        Function {
            name,
            arg_names,
            arity,
            body: FunctionBody::Defined { start_pc },
        }
    }
}

fn intrinsic_add(args: &[Value], _debug: &mut bool) -> Result<Value, &'static str> {
    let (a, b) = binary_ints(args)?;
    Ok(Value::int(a.wrapping_add(b)))
}

fn intrinsic_sub(args: &[Value], _debug: &mut bool) -> Result<Value, &'static str> {
    let (a, b) = binary_ints(args)?;
    Ok(Value::int(a.wrapping_sub(b)))
}

/// Toggles the interpreter's debug-mode flag and pushes its new value
/// (`spec.md` §4.6/§6): takes no arguments, flips the flag the evaluator's
/// dispatch loop traces opcodes under.
fn intrinsic_debug(args: &[Value], debug: &mut bool) -> Result<Value, &'static str> {
    if !args.is_empty() {
        return Err("arity mismatch");
    }
    *debug = !*debug;
    tracing::debug!(debug = *debug, "debug mode toggled");
    Ok(Value::bool(*debug))
}

fn binary_ints(args: &[Value]) -> Result<(i32, i32), &'static str> {
    use crate::value::Payload;
    let [a, b] = args else {
        return Err("arity mismatch");
    };
    let (Payload::Int(a), Payload::Int(b)) = (a.payload, b.payload) else {
        return Err("operands must be Int");
    };
    Ok((a, b))
}

/// Registers the always-available intrinsics. Grounded on the teacher's
/// `Interpreter::new`/constructors idiom (`src/interpreter/constructors.rs`),
/// which seeds fixed state at construction rather than lazily.
pub fn builtins() -> Vec<Function> {
    vec![
        Function::intrinsic("+", 2, intrinsic_add),
        Function::intrinsic("-", 2, intrinsic_sub),
        Function::intrinsic("debug", 0, intrinsic_debug),
    ]
}

/// Table of all functions known to the interpreter, intrinsic and defined.
/// Append-only; bounded by `MAX_FUNCTIONS`.
#[derive(Clone)]
pub struct FunctionTable {
    functions: Vec<Function>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self {
            functions: builtins(),
        }
    }

    pub fn get(&self, id: FuncId) -> &Function {
        &self.functions[id.0 as usize]
    }

    pub fn find_by_name(&self, name: &str) -> Option<FuncId> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|i| FuncId(i as u32))
    }

    pub fn define(&mut self, function: Function) -> FuncId {
        assert!(self.functions.len() < crate::limits::MAX_FUNCTIONS, "function table exhausted");
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(function);
        id
    }
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
    }
}
