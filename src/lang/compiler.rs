use std::rc::Rc;

use crate::error::CompileError;
use crate::lang::ast::{AstNode, LiteralValue};
use crate::lang::program::{Op, Program};

/// Lowers an AST into an ordered program of steps. The walk is depth first
/// in tree order; handlers that need a detached sub-sequence (lists, quoted
/// lists) compile their children into a separate buffer and emit a single
/// step wrapping it.
#[derive(Debug, Default)]
pub struct Compiler {
    program: Vec<Op>,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    pub fn compile(mut self, ast: &AstNode) -> Result<Program, CompileError> {
        match ast {
            AstNode::Root(children) => {
                for child in children {
                    self.visit_top_level(child)?;
                }
                Ok(Program::new(self.program))
            }
            other => Err(CompileError::MisplacedNode {
                found: other.kind_name().to_owned(),
            }),
        }
    }

    fn visit_top_level(&mut self, node: &AstNode) -> Result<(), CompileError> {
        match node {
            AstNode::TopLevel(words) => {
                // The first step of every program establishes the initial
                // scope from the builtin registry.
                self.program.push(Op::InstallBuiltins);
                for word in words {
                    self.visit_word(word)?;
                }
                Ok(())
            }
            other => Err(CompileError::MisplacedNode {
                found: other.kind_name().to_owned(),
            }),
        }
    }

    fn visit_word(&mut self, node: &AstNode) -> Result<(), CompileError> {
        match node {
            AstNode::FunctionCall { name } => {
                self.program.push(Op::CallName(name.clone()));
                Ok(())
            }
            AstNode::Literal(LiteralValue::Str(text)) => {
                self.program.push(Op::PushLiteral(text.clone()));
                Ok(())
            }
            AstNode::Assignment { name, word } => {
                // The right-hand word runs first; the binding step then pops
                // whatever it left on top of the stack.
                self.visit_word(word)?;
                self.program.push(Op::BindName(name.clone()));
                Ok(())
            }
            AstNode::List(words) => {
                let ops = self.compile_subsequence(words)?;
                self.program.push(Op::RunInline(Rc::new(ops)));
                Ok(())
            }
            AstNode::Quote(word) => match word.as_ref() {
                AstNode::List(words) => {
                    let ops = self.compile_subsequence(words)?;
                    self.program.push(Op::PushQuote(Rc::new(ops)));
                    Ok(())
                }
                AstNode::FunctionCall { name } => {
                    self.program.push(Op::PushBound(name.clone()));
                    Ok(())
                }
                other => Err(CompileError::UnsupportedQuoteTarget {
                    found: other.kind_name().to_owned(),
                }),
            },
            other => Err(CompileError::MisplacedNode {
                found: other.kind_name().to_owned(),
            }),
        }
    }

    /// Compile words into a detached buffer, leaving the main program
    /// untouched until the caller wraps the result in a single step.
    fn compile_subsequence(&mut self, words: &[AstNode]) -> Result<Vec<Op>, CompileError> {
        let parent = std::mem::take(&mut self.program);
        let compiled = words.iter().try_for_each(|word| self.visit_word(word));
        let ops = std::mem::replace(&mut self.program, parent);
        compiled?;
        Ok(ops)
    }
}
