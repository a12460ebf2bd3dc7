//! Property-based coverage, grounded on the teacher's own quickcheck usage
//! (`src/interpreter/executors/instruction/tests/reserved_registers.rs`):
//! arithmetic wraps the same way a reference evaluator would, the
//! DROP-repetition shorthand matches repeated single drops, and the built-in
//! macros never panic when starved of arguments.

use fibr::interpreter::Interpreter;
use fibr::reader::StrSource;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn stack_of(src: &str) -> Vec<i32> {
    let mut interp = Interpreter::new(StrSource::new(src), "prop");
    interp.read_and_run().expect("turn must succeed");
    interp
        .dump_stack()
        .expect("dump must succeed")
        .split_whitespace()
        .map(|s| s.parse().expect("every pushed value here is an Int"))
        .collect()
}

/// `+`/`-` on two literals must agree with plain `i32` wrapping arithmetic,
/// matching the Open Question resolution that the intrinsics wrap rather
/// than panic or saturate.
#[quickcheck]
fn add_and_sub_agree_with_wrapping_reference_arithmetic(a: i32, b: i32) -> TestResult {
    let src = format!("+ {a} {b} - {a} {b};");
    let stack = stack_of(&src);
    let expected = [a.wrapping_add(b), a.wrapping_sub(b)];
    TestResult::from_bool(stack == expected)
}

/// `dd...d` of length k must leave the stack exactly as k single `d` drops
/// would, for any starting stack deep enough to absorb it.
#[quickcheck]
fn drop_run_matches_that_many_single_drops(depth: u8, run_len: u8) -> TestResult {
    let depth = (depth % 16) as usize;
    let run_len = 1 + (run_len % 8) as usize;
    if run_len > depth {
        return TestResult::discard();
    }

    let pushes: String = (0..depth).map(|i| format!("{i} ")).collect();
    let single_drops: String = "d ".repeat(run_len);
    let run: String = "d".repeat(run_len);

    let lhs = stack_of(&format!("{pushes}{single_drops};"));
    let rhs = stack_of(&format!("{pushes}{run};"));
    TestResult::from_bool(lhs == rhs)
}

/// Calling any built-in macro with fewer remaining forms than its arity is
/// always a `MissingMacroArguments` error, never a panic, regardless of how
/// many (too few) trailing literals follow it.
#[quickcheck]
fn macro_starved_of_arguments_errors_cleanly(extra: u8) -> TestResult {
    let extra = (extra % 4) as usize;
    let cases: [(&str, usize); 4] = [("=", 2), ("if", 3), ("func", 4), ("_", 0)];

    for (name, arity) in cases {
        if extra >= arity {
            continue;
        }
        let trailing: String = (0..extra).map(|i| format!("{i} ")).collect();
        let src = format!("{name} {trailing};");
        let mut interp = Interpreter::new(StrSource::new(&src), "prop");
        match interp.read_and_run() {
            Err(e) => {
                if !matches!(e.kind, fibr::error::ErrorKind::MissingMacroArguments { .. }) {
                    return TestResult::error(format!(
                        "expected MissingMacroArguments for `{src}`, got {:?}",
                        e.kind
                    ));
                }
            }
            Ok(_) => {
                return TestResult::error(format!("expected an error for `{src}`, turn succeeded"));
            }
        }
    }
    TestResult::passed()
}
