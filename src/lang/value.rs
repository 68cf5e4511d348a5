use std::fmt;

use uuid::Uuid;

use crate::error::{Fault, StepFailure};
use crate::lang::matching::MatchFn;
use crate::lang::program::{Quote, State};
use crate::machine::{MachineHandle, Pending};

/// A named step function from the builtin registry.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub run: fn(State) -> Result<State, StepFailure>,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        // Registry names are unique, so the name is the identity.
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin:{}", self.name)
    }
}

/// A runtime value on the stack or in scope.
///
/// Equality follows the source semantics exactly: strings compare by value,
/// everything else by identity. A quote pushed twice by the same compiled
/// step yields two distinct values; copies of one pushed value stay equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Quote(Quote),
    Builtin(Builtin),
    Machine(MachineHandle),
    Console(Uuid),
    Pending(Pending),
    Matcher(MatchFn),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Quote(_) => "quote",
            Value::Builtin(_) => "builtin",
            Value::Machine(_) => "drum machine",
            Value::Console(_) => "console",
            Value::Pending(_) => "pending completion",
            Value::Matcher(_) => "match function",
        }
    }

    /// Invoke the value against the given state, the way a function call
    /// step does after looking its name up in scope.
    pub fn invoke(self, state: State) -> Result<State, StepFailure> {
        match self {
            Value::Builtin(builtin) => (builtin.run)(state),
            Value::Quote(quote) => quote.call(state),
            Value::Matcher(matcher) => matcher.invoke(state),
            other => Err(Fault::NotCallable(other.kind_name()).into()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(text) => write!(f, "'{}'", text),
            Value::Quote(quote) => write!(f, "quote({} steps)", quote.len()),
            Value::Builtin(builtin) => write!(f, "builtin:{}", builtin.name),
            Value::Machine(_) => f.write_str("drum-machine"),
            Value::Console(_) => f.write_str("console"),
            Value::Pending(_) => f.write_str("pending"),
            Value::Matcher(matcher) => write!(f, "match-function({} entries)", matcher.entry_count()),
        }
    }
}
