//! [`Interpreter`] implementation: the public entry point tying the reader,
//! compiler and evaluator together into one REPL turn at a time.
//!
//! The internal state isn't exposed directly; callers drive it turn by turn
//! via [`Interpreter::read_and_run`] and inspect the resulting stack with
//! [`Interpreter::dump_stack`].

use crate::compiler::Compiler;
use crate::error::InterpreterError;
use crate::evaluator::Machine;
use crate::opcode::Pc;
use crate::reader::{CharSource, ReadTurn, Reader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Ran,
    Eof,
}

/// The whole of `fibr`'s evaluation state for one session: a compiler whose
/// program grows monotonically turn after turn, and a machine whose operand
/// stack persists across turns (`spec.md` §8's worked REPL transcript
/// depends on values surviving from one line to the next).
pub struct Interpreter<S: CharSource> {
    reader: Reader<S>,
    compiler: Compiler,
    machine: Machine,
}

impl<S: CharSource> Interpreter<S> {
    pub fn new(source: S, source_name: &str) -> Self {
        Self {
            reader: Reader::new(source, source_name),
            compiler: Compiler::new(),
            machine: Machine::new(),
        }
    }

    /// Reads one REPL turn, compiles it onto the end of the running
    /// program, and executes exactly the newly compiled ops.
    pub fn read_and_run(&mut self) -> Result<TurnOutcome, InterpreterError> {
        let forms = match self.reader.read_turn().map_err(|e| {
            tracing::warn!(error = %e, "turn read failed");
            e
        })? {
            ReadTurn::Forms(forms) => forms,
            ReadTurn::Eof => return Ok(TurnOutcome::Eof),
        };
        let form_count = forms.len();
        let start_pc = self.compiler.current_pc();
        self.compiler.compile_turn(forms).map_err(|e| {
            tracing::warn!(error = %e, "turn compilation failed");
            e
        })?;
        let stop_pc = self.compiler.push_op_at(
            self.reader_pos_hint(),
            crate::opcode::Opcode::Stop,
        );
        self.run_from(start_pc, stop_pc).map_err(|e| {
            tracing::warn!(error = %e, "turn evaluation failed");
            e
        })?;
        tracing::debug!(form_count, start_pc = start_pc.0, stop_pc = stop_pc.0, "turn complete");
        Ok(TurnOutcome::Ran)
    }

    fn reader_pos_hint(&self) -> crate::position::Position {
        crate::position::Position::start(self.reader.source_name())
    }

    fn run_from(&mut self, start_pc: Pc, _stop_pc: Pc) -> Result<(), InterpreterError> {
        self.machine.run(self.compiler.ops(), &self.compiler.functions, start_pc)
    }

    /// Renders the current operand stack bottom-to-top, space-separated,
    /// matching the worked transcript format in `spec.md` §8.
    pub fn dump_stack(&self) -> Result<String, InterpreterError> {
        let mut out = String::new();
        for (i, v) in self.machine.stack().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            v.dump(&mut out)
                .map_err(|_| InterpreterError::new(self.reader_pos_hint(), crate::error::ErrorKind::InvalidInteger))?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::StrSource;

    fn run_turn(interp: &mut Interpreter<StrSource<'_>>) -> String {
        interp.read_and_run().unwrap();
        interp.dump_stack().unwrap()
    }

    #[test]
    fn arithmetic_turn() {
        let mut interp = Interpreter::new(StrSource::new("+ 35 7;"), "test");
        assert_eq!(run_turn(&mut interp), "42");
    }

    #[test]
    fn drop_shorthand_removes_n_values() {
        let mut interp = Interpreter::new(StrSource::new("1 2 3 4 5 dd;"), "test");
        assert_eq!(run_turn(&mut interp), "1 2 3");
    }

    #[test]
    fn if_true_keeps_the_then_branch() {
        // The condition is left on the stack, not popped (`spec.md` §8).
        let mut interp = Interpreter::new(StrSource::new("if 1 T F;"), "test");
        assert_eq!(run_turn(&mut interp), "1 T");
    }

    #[test]
    fn if_false_keeps_the_else_branch() {
        let mut interp = Interpreter::new(StrSource::new("if 0 T F;"), "test");
        assert_eq!(run_turn(&mut interp), "0 F");
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let mut interp = Interpreter::new(StrSource::new("foo;"), "test");
        let err = interp.read_and_run().unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::UnknownIdentifier(_)));
    }

    #[test]
    fn eof_on_empty_input() {
        let mut interp = Interpreter::new(StrSource::new(""), "test");
        assert_eq!(interp.read_and_run().unwrap(), TurnOutcome::Eof);
    }
}
