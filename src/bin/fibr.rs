//! Interactive REPL shell around the `fibr` library.
//!
//! Grounded on `reifydb-reifydb`'s `bin/cli/src/ws/repl.rs`: a
//! `rustyline`-backed editor, a prompt that changes while a form is left
//! open across lines, and `Ctrl-C`/`Ctrl-D` handling distinct from a plain
//! read error. The library itself never imports `rustyline` — only this
//! binary does, via the [`fibr::reader::CharSource`] seam.

use std::collections::VecDeque;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use fibr::interpreter::{Interpreter, TurnOutcome};
use fibr::reader::CharSource;

const PRIMARY_PROMPT: &str = ">>> ";
const CONTINUATION_PROMPT: &str = "... ";

/// Pulls characters from `rustyline`, one line at a time, prompting for
/// continuation whenever the reader asks for more without having seen a
/// line's worth of characters yet.
struct RustylineSource {
    editor: DefaultEditor,
    buffer: VecDeque<char>,
    at_eof: bool,
    asked_once: bool,
}

impl RustylineSource {
    fn new(editor: DefaultEditor) -> Self {
        Self {
            editor,
            buffer: VecDeque::new(),
            at_eof: false,
            asked_once: false,
        }
    }

    fn fetch_line(&mut self) -> Option<()> {
        let prompt = if self.asked_once { CONTINUATION_PROMPT } else { PRIMARY_PROMPT };
        self.asked_once = true;
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                self.buffer.extend(line.chars());
                self.buffer.push_back('\n');
                Some(())
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C: discard whatever was buffered for this turn and
                // start fresh, matching a shell's line-edit cancel.
                self.buffer.clear();
                self.asked_once = false;
                Some(())
            }
            Err(ReadlineError::Eof) => {
                self.at_eof = true;
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "line read failed");
                self.at_eof = true;
                None
            }
        }
    }

}

impl CharSource for RustylineSource {
    fn next_char(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.buffer.pop_front() {
                return Some(c);
            }
            if self.at_eof {
                return None;
            }
            self.fetch_line()?;
        }
    }

    fn on_turn_end(&mut self) {
        self.asked_once = false;
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn main() {
    init_tracing();
    println!("fibr {}\n", env!("CARGO_PKG_VERSION"));

    let editor = match DefaultEditor::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("fibr: failed to start line editor: {e}");
            std::process::exit(1);
        }
    };

    let source = RustylineSource::new(editor);
    let mut interpreter = Interpreter::new(source, "repl");

    loop {
        match interpreter.read_and_run() {
            Ok(TurnOutcome::Ran) => match interpreter.dump_stack() {
                Ok(stack) => println!("[ {stack} ]"),
                Err(e) => println!("{e}"),
            },
            Ok(TurnOutcome::Eof) => break,
            Err(e) => println!("{e}"),
        }
    }
}
