//! The scripting language: lexer, parser, compiler and the compiled program
//! they produce.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;
use crate::machine::MachineHandle;
use crate::{log_debug, log_error};

pub mod ast;
pub mod builtins;
pub mod compiler;
pub mod lexer;
pub mod matching;
pub mod parser;
pub mod program;
pub mod value;

#[cfg(test)]
mod tests;

use compiler::Compiler;
use lexer::Lexer;
use parser::Parser;
use program::Program;

/// Run the full front half of the pipeline: source text to compiled program.
pub fn compile_source(source: &str) -> Result<Program, ScriptError> {
    let tokens = Lexer::new().lex(source);
    log_debug!("lexed {} tokens", tokens.len());

    let ast = Parser::new(tokens).parse()?;
    let program = Compiler::new().compile(&ast)?;
    log_debug!("compiled {} steps", program.len());

    Ok(program)
}

/// Compile and run a script against a host in one shot. Output goes to
/// `on_output` when the run succeeds; any pipeline error is logged and
/// handed to `on_error`.
pub fn run_source<O, E>(source: &str, context: MachineHandle, on_output: O, on_error: E)
where
    O: FnOnce(&str),
    E: FnOnce(ScriptError),
{
    let report = |err: ScriptError| {
        log_error!("{err}");
        on_error(err);
    };

    let program = match compile_source(source) {
        Ok(program) => program,
        Err(err) => return report(err),
    };

    match program.execute(context) {
        Ok(state) => on_output(&state.stdout),
        Err(err) => report(err.into()),
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LanguageSyntax {
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum LanguageElement {
    Word(String),
    Brackets(String, String),
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LanguageDocumentation {
    pub articles: Vec<(String, String)>,
    pub reference: BTreeMap<LanguageElement, String>,
}

pub trait Language {
    fn name(&self) -> &str;

    fn version(&self) -> (usize, usize, usize);

    fn documentation(&self) -> LanguageDocumentation {
        Default::default()
    }

    fn syntax(&self) -> Option<LanguageSyntax> {
        None
    }
}

/// The descriptor editors and frontends query for the language.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrumScript;

impl Language for DrumScript {
    fn name(&self) -> &str {
        "drumscript"
    }

    fn version(&self) -> (usize, usize, usize) {
        (0, 1, 0)
    }

    fn documentation(&self) -> LanguageDocumentation {
        let word = |name: &str| LanguageElement::Word(name.to_owned());
        let mut reference = BTreeMap::new();
        reference.insert(
            word("drum-machine"),
            "Push the drum machine onto the stack.".to_owned(),
        );
        reference.insert(
            word("pattern"),
            "Pop a pattern name and the drum machine, switch to that pattern and start the clock."
                .to_owned(),
        );
        reference.insert(
            word("patterns"),
            "Pop the drum machine and print the names of its patterns.".to_owned(),
        );
        reference.insert(
            word("console"),
            "Push a console object onto the stack.".to_owned(),
        );
        reference.insert(
            word("log"),
            "Pop a string and a console object, print the string.".to_owned(),
        );
        reference.insert(
            word("match-function"),
            "Pop a quote of pattern/result pairs, push a function that dispatches on the stack."
                .to_owned(),
        );
        reference.insert(
            word("extend-match-function"),
            "Pop a quote of new pairs and a match function, append the pairs to it.".to_owned(),
        );
        LanguageDocumentation {
            articles: Vec::new(),
            reference,
        }
    }

    fn syntax(&self) -> Option<LanguageSyntax> {
        let mut tokens = BTreeMap::new();
        tokens.insert("'".to_owned(), "string delimiter".to_owned());
        tokens.insert("=".to_owned(), "assignment".to_owned());
        tokens.insert("`".to_owned(), "quote the next word".to_owned());
        tokens.insert("(".to_owned(), "open a list".to_owned());
        tokens.insert(")".to_owned(), "close a list".to_owned());
        Some(LanguageSyntax { tokens })
    }
}
