use super::offline_handle;
use crate::error::ScriptError;
use crate::lang::{DrumScript, Language, LanguageElement, builtins, run_source};

#[test]
fn descriptor_names_the_language() {
    assert_eq!(DrumScript.name(), "drumscript");
    assert_eq!(DrumScript.version(), (0, 1, 0));
}

#[test]
fn descriptor_lists_the_syntax_tokens() {
    let syntax = DrumScript.syntax().expect("the language has syntax");
    for token in ["'", "=", "`", "(", ")"] {
        assert!(syntax.tokens.contains_key(token), "missing token {token}");
    }
}

#[test]
fn descriptor_documents_every_builtin() {
    let docs = DrumScript.documentation();
    for name in builtins::registry().keys() {
        let entry = LanguageElement::Word((*name).to_owned());
        assert!(
            docs.reference.contains_key(&entry),
            "missing reference entry for {name}"
        );
    }
}

#[test]
fn run_source_hands_output_to_the_callback() {
    let (handle, _machine) = offline_handle(&["one"]);

    let mut output = None;
    let mut failure = None;
    run_source(
        "console 'hi' log",
        handle,
        |stdout| output = Some(stdout.to_owned()),
        |err| failure = Some(err),
    );

    assert_eq!(output.as_deref(), Some("hi"));
    assert!(failure.is_none());
}

#[test]
fn run_source_reports_syntax_errors() {
    let (handle, _machine) = offline_handle(&["one"]);

    let mut output = None;
    let mut failure = None;
    run_source(
        "'unterminated",
        handle,
        |stdout| output = Some(stdout.to_owned()),
        |err| failure = Some(err),
    );

    assert_eq!(output, None);
    assert!(matches!(failure, Some(ScriptError::Syntax(_))));
}

#[test]
fn run_source_reports_runtime_errors() {
    let (handle, _machine) = offline_handle(&["one"]);

    let mut failure = None;
    run_source("nope", handle, |_| {}, |err| failure = Some(err));

    assert!(matches!(failure, Some(ScriptError::Runtime(_))));
}
