//! The executable form of a script: compiled steps, first-class quotes, and
//! the state they fold over.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Fault, RuntimeError, StateSnapshot, StepFailure};
use crate::lang::builtins;
use crate::lang::value::Value;
use crate::machine::MachineHandle;

/// A single compiled step. Each step consumes a state and produces the next
/// one; names are resolved against the scope at the moment the step runs,
/// never at compile time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Op {
    /// Merge the builtin registry into scope. Emitted once, first, for the
    /// top level; existing bindings are left alone.
    InstallBuiltins,
    /// Push a literal value.
    PushLiteral(String),
    /// Look the name up in the current scope and invoke whatever is bound.
    CallName(String),
    /// Pop the top of the stack and bind it to the name.
    BindName(String),
    /// Run the sub-sequence in place, as an anonymous quote invoked
    /// immediately. This is what a bare list compiles to.
    RunInline(Rc<Vec<Op>>),
    /// Push a quote wrapping the sub-sequence, without executing it. This is
    /// what a quoted list compiles to.
    PushQuote(Rc<Vec<Op>>),
    /// Push the value currently bound to the name, without invoking it. This
    /// is what a quoted call compiles to.
    PushBound(String),
}

impl Op {
    pub fn apply(&self, mut state: State) -> Result<State, StepFailure> {
        match self {
            Op::InstallBuiltins => {
                for (name, builtin) in builtins::registry() {
                    state
                        .scope
                        .entry(name.to_owned())
                        .or_insert(Value::Builtin(builtin));
                }
                Ok(state)
            }
            Op::PushLiteral(text) => {
                state.stack.push(Value::Str(text.clone()));
                Ok(state)
            }
            Op::CallName(name) => {
                let callee = state
                    .scope
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Fault::UnboundName(name.clone()))?;
                callee.invoke(state)
            }
            Op::BindName(name) => {
                let value = state.pop("binding a name")?;
                state.scope.insert(name.clone(), value);
                Ok(state)
            }
            Op::RunInline(ops) => Quote::instantiate(ops.clone()).call(state),
            Op::PushQuote(ops) => {
                state
                    .stack
                    .push(Value::Quote(Quote::instantiate(ops.clone())));
                Ok(state)
            }
            Op::PushBound(name) => {
                let value = state
                    .scope
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Fault::UnboundName(name.clone()))?;
                state.stack.push(value);
                Ok(state)
            }
        }
    }

    /// The quote a match-function result position denotes. A quote step
    /// contributes its own body; any other step becomes a one-step quote, so
    /// dispatching to it executes exactly that step.
    pub(crate) fn as_result_quote(&self) -> Quote {
        match self {
            Op::PushQuote(ops) => Quote::instantiate(ops.clone()),
            other => Quote::instantiate(Rc::new(vec![other.clone()])),
        }
    }
}

/// A first-class deferred block of compiled steps.
///
/// Quotes capture only their steps, never an environment; calling one folds
/// its steps over whatever state it is handed. The id carries object
/// identity: every execution of a push-quote step mints a fresh id over the
/// shared steps, while clones of an already pushed quote keep theirs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    id: Uuid,
    ops: Rc<Vec<Op>>,
}

impl Quote {
    pub fn instantiate(ops: Rc<Vec<Op>>) -> Self {
        Quote {
            id: Uuid::new_v4(),
            ops,
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn call(&self, state: State) -> Result<State, StepFailure> {
        self.ops.iter().try_fold(state, |state, op| op.apply(state))
    }
}

impl PartialEq for Quote {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// The single value threaded through execution.
#[derive(Debug, Clone)]
pub struct State {
    pub context: MachineHandle,
    pub stack: Vec<Value>,
    pub scope: HashMap<String, Value>,
    pub stdout: String,
}

impl State {
    pub fn initial(context: MachineHandle) -> Self {
        State {
            context,
            stack: Vec::new(),
            scope: HashMap::new(),
            stdout: String::new(),
        }
    }

    pub fn pop(&mut self, while_doing: &'static str) -> Result<Value, Fault> {
        self.stack.pop().ok_or(Fault::StackUnderflow(while_doing))
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let mut scope: Vec<String> = self.scope.keys().cloned().collect();
        scope.sort();
        StateSnapshot {
            stack: self.stack.iter().map(Value::to_string).collect(),
            scope,
            stdout: self.stdout.clone(),
        }
    }
}

/// An ordered sequence of compiled steps, produced once per compilation and
/// runnable any number of times. Runs never share state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub(crate) fn new(ops: Vec<Op>) -> Self {
        Program { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Fold the steps over a fresh state. A fault is classified here with a
    /// snapshot of the state before the failing step; an error that is
    /// already a runtime error propagates unchanged.
    pub fn execute(&self, context: MachineHandle) -> Result<State, RuntimeError> {
        let mut state = State::initial(context);
        for op in &self.ops {
            // Kept for the error report if this step fails.
            let before = state.clone();
            state = match op.apply(state) {
                Ok(next) => next,
                Err(StepFailure::Runtime(err)) => return Err(err),
                Err(StepFailure::Fault(cause)) => {
                    return Err(RuntimeError::Failed {
                        cause,
                        state: before.snapshot(),
                    });
                }
            };
        }
        Ok(state)
    }

    /// Run the program against a host. On success the accumulated stdout is
    /// handed to `on_output`; on failure the classified error goes to
    /// `on_error` and partial output is discarded.
    pub fn run<O, E>(&self, context: MachineHandle, on_output: O, on_error: E)
    where
        O: FnOnce(&str),
        E: FnOnce(RuntimeError),
    {
        match self.execute(context) {
            Ok(state) => on_output(&state.stdout),
            Err(err) => on_error(err),
        }
    }
}
