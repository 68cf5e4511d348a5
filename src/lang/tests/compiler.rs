use std::rc::Rc;

use crate::error::{CompileError, ScriptError};
use crate::lang::compile_source;
use crate::lang::program::Op;

fn steps_of(source: &str) -> Vec<Op> {
    match compile_source(source) {
        Ok(program) => program.ops().to_vec(),
        Err(err) => panic!("compilation failed: {err}"),
    }
}

#[test]
fn every_program_starts_by_installing_builtins() {
    let steps = steps_of("console");
    assert_eq!(steps[0], Op::InstallBuiltins);
}

#[test]
fn calls_and_literals_compile_in_order() {
    assert_eq!(
        steps_of("console 'hi' log"),
        vec![
            Op::InstallBuiltins,
            Op::CallName("console".to_owned()),
            Op::PushLiteral("hi".to_owned()),
            Op::CallName("log".to_owned()),
        ]
    );
}

#[test]
fn assignment_compiles_value_then_binding() {
    assert_eq!(
        steps_of("a = 'x'"),
        vec![
            Op::InstallBuiltins,
            Op::PushLiteral("x".to_owned()),
            Op::BindName("a".to_owned()),
        ]
    );
}

#[test]
fn quoted_list_defers_its_steps() {
    assert_eq!(
        steps_of("`(console 'hi' log)"),
        vec![
            Op::InstallBuiltins,
            Op::PushQuote(Rc::new(vec![
                Op::CallName("console".to_owned()),
                Op::PushLiteral("hi".to_owned()),
                Op::CallName("log".to_owned()),
            ])),
        ]
    );
}

#[test]
fn quoted_name_pushes_the_binding() {
    assert_eq!(
        steps_of("`a"),
        vec![Op::InstallBuiltins, Op::PushBound("a".to_owned())]
    );
}

#[test]
fn bare_list_runs_inline() {
    assert_eq!(
        steps_of("m = (a b)"),
        vec![
            Op::InstallBuiltins,
            Op::RunInline(Rc::new(vec![
                Op::CallName("a".to_owned()),
                Op::CallName("b".to_owned()),
            ])),
            Op::BindName("m".to_owned()),
        ]
    );
}

#[test]
fn quotes_nest() {
    assert_eq!(
        steps_of("`(a `(b))"),
        vec![
            Op::InstallBuiltins,
            Op::PushQuote(Rc::new(vec![
                Op::CallName("a".to_owned()),
                Op::PushQuote(Rc::new(vec![Op::CallName("b".to_owned())])),
            ])),
        ]
    );
}

#[test]
fn quote_of_a_quote_is_rejected() {
    assert!(matches!(
        compile_source("``a"),
        Err(ScriptError::Compile(
            CompileError::UnsupportedQuoteTarget { .. }
        ))
    ));
}

#[test]
fn quote_of_a_literal_is_rejected() {
    // A backtick straight before an apostrophe never lexes, so the quoted
    // literal has to follow something that classifies the backtick.
    assert!(matches!(
        compile_source("`(a)`'x'"),
        Err(ScriptError::Compile(
            CompileError::UnsupportedQuoteTarget { .. }
        ))
    ));
}
