use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Any failure the scripting pipeline can report, from source text to
/// finished run. Syntax and compile errors abort before execution; runtime
/// errors abort the run in progress and discard its partial output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Malformed input the parser cannot continue past.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("syntax error: expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },
    #[error("syntax error: expected a word, found {found}")]
    ExpectedWord { found: String },
    #[error("syntax error: unexpected end of input while expecting {expected}")]
    UnexpectedEnd { expected: String },
    #[error("syntax error: unexpected trailing input starting at {found}")]
    TrailingInput { found: String },
}

/// An AST shape the compiler does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("compile error: a quote may only wrap a list or a name, found {found}")]
    UnsupportedQuoteTarget { found: String },
    #[error("compile error: {found} is not allowed here")]
    MisplacedNode { found: String },
}

/// The originating cause of a runtime failure, before the executor attaches
/// the state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("name '{0}' is not bound in the current scope")]
    UnboundName(String),
    #[error("a value of kind {0} cannot be called")]
    NotCallable(&'static str),
    #[error("stack underflow while {0}")]
    StackUnderflow(&'static str),
    #[error("{builtin} expected {expected}, found {found}")]
    TypeMismatch {
        builtin: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("match entries must come in pattern/result pairs")]
    UnpairedMatchEntry,
}

/// Failure during execution, carrying the cause and a snapshot of the state
/// at the point of failure. `NoMatch` is the specialized variant raised when
/// a pattern match function exhausts its entries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("runtime error: {cause}\nstate at time of error: {state}")]
    Failed { cause: Fault, state: StateSnapshot },
    #[error("runtime error: no pattern matched the stack\nstate at time of error: {state}")]
    NoMatch { state: StateSnapshot },
}

impl RuntimeError {
    /// The state captured when the run failed.
    pub fn state(&self) -> &StateSnapshot {
        match self {
            RuntimeError::Failed { state, .. } | RuntimeError::NoMatch { state } => state,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, RuntimeError::NoMatch { .. })
    }
}

/// Failure raised inside a single step. A bare fault is wrapped with a state
/// snapshot by the top-level execution fold; an already classified runtime
/// error propagates through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum StepFailure {
    Fault(Fault),
    Runtime(RuntimeError),
}

impl From<Fault> for StepFailure {
    fn from(fault: Fault) -> Self {
        StepFailure::Fault(fault)
    }
}

impl From<RuntimeError> for StepFailure {
    fn from(err: RuntimeError) -> Self {
        StepFailure::Runtime(err)
    }
}

/// Diagnostic image of an execution state, detached from the live values so
/// it can travel inside an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    /// Rendered stack contents, bottom first.
    pub stack: Vec<String>,
    /// Names bound in scope, sorted.
    pub scope: Vec<String>,
    pub stdout: String,
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
