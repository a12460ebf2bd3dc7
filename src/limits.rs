//! Fixed capacities for the interpreter's working sets.
//!
//! Every pool in `fibr` is bounded at construction time; there is no growth
//! and no reclamation within a REPL session (`spec.md` §5). These are design
//! limits, not runtime conditions: exceeding any of them is a fatal
//! assertion (`spec.md` §5/§9), not a recoverable `InterpreterError` — unlike
//! the five error kinds a turn can legitimately fail with (unknown
//! identifier, open group, missing macro arguments, semicolon mid-emit,
//! stack underflow), a capacity violation means the input was bigger than
//! the interpreter was ever sized to handle.

/// Maximum length of a source name (e.g. `"repl"`), in bytes.
pub const MAX_SOURCE_NAME_LEN: usize = 32;

/// Maximum length of an identifier, in bytes.
pub const MAX_IDENT_LEN: usize = 64;

/// Maximum length of the formatted error buffer, in bytes.
pub const MAX_ERROR_LEN: usize = 256;

/// Maximum number of forms read in a single REPL turn.
pub const MAX_FORMS_PER_TURN: usize = 4096;

/// Maximum number of opcodes the bytecode store may hold.
pub const MAX_OPS: usize = 16 * 1024;

/// Maximum lexical scope nesting depth.
pub const MAX_SCOPE_DEPTH: usize = 32;

/// Maximum number of bindings in a single scope's environment.
pub const MAX_ENV_ENTRIES: usize = 256;

/// Maximum number of registers live at once.
pub const MAX_REGISTERS: usize = 256;

/// Maximum operand stack depth.
pub const MAX_STACK_DEPTH: usize = 2048;

/// Maximum call frame nesting depth.
pub const MAX_FRAME_DEPTH: usize = 256;

/// Maximum number of user-defined functions.
pub const MAX_FUNCTIONS: usize = 1024;
