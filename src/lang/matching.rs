//! Match functions: callable values that dispatch on the shape of the stack.
//!
//! A match function holds an ordered list of entries. Each entry pairs a
//! pattern, a sequence of values, with a result quote. Invoking the match
//! function compares each pattern against the top of the stack in order and
//! calls the first entry whose pattern matches; the matched values stay on
//! the stack for the result to consume.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Fault, RuntimeError, StepFailure};
use crate::lang::program::{Quote, State};
use crate::lang::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry {
    pub pattern: Vec<Value>,
    pub result: Quote,
}

/// The shared entry table behind a match function value. Extending a match
/// function mutates the table in place, so every copy of the value sees the
/// new entries; copies compare equal exactly when they share a table.
#[derive(Clone)]
pub struct MatchFn {
    entries: Rc<RefCell<Vec<MatchEntry>>>,
}

impl MatchFn {
    pub fn new(entries: Vec<MatchEntry>) -> Self {
        MatchFn {
            entries: Rc::new(RefCell::new(entries)),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Append entries behind the existing ones. Earlier entries keep
    /// priority, so an extension can only cover cases the original missed.
    pub fn extend_with(&self, entries: Vec<MatchEntry>) {
        self.entries.borrow_mut().extend(entries);
    }

    /// Dispatch against the current stack. The first entry whose pattern
    /// matches the top of the stack wins; with no match the whole run fails
    /// with a report of the state that nothing covered.
    pub fn invoke(&self, state: State) -> Result<State, StepFailure> {
        let selected = {
            let entries = self.entries.borrow();
            entries
                .iter()
                .find(|entry| stack_matches(&entry.pattern, &state.stack))
                .map(|entry| entry.result.clone())
        };

        match selected {
            Some(result) => result.call(state),
            None => Err(RuntimeError::NoMatch {
                state: state.snapshot(),
            }
            .into()),
        }
    }
}

impl PartialEq for MatchFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Debug for MatchFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchFn")
            .field("entries", &self.entries.borrow().len())
            .finish()
    }
}

/// A pattern matches when the top of the stack equals it value for value.
/// Strings compare by content, everything else by identity, so a pattern
/// holding a fresh object can never match.
fn stack_matches(pattern: &[Value], stack: &[Value]) -> bool {
    if pattern.len() > stack.len() {
        return false;
    }
    let top = &stack[stack.len() - pattern.len()..];
    top == pattern
}

/// Build the entry table from a quote of alternating pattern producers and
/// results. Each pattern step runs against a probe state with an empty
/// stack; whatever it leaves there is the pattern. The step after it is the
/// result, taken as a quote.
pub fn build_entries(source: &Quote, state: &State) -> Result<Vec<MatchEntry>, StepFailure> {
    let ops = source.ops();
    let mut entries = Vec::with_capacity(ops.len() / 2);

    let mut index = 0;
    while index < ops.len() {
        let probe = State {
            context: state.context.clone(),
            stack: Vec::new(),
            scope: state.scope.clone(),
            stdout: state.stdout.clone(),
        };
        let produced = ops[index].apply(probe)?;

        let result = ops
            .get(index + 1)
            .ok_or(Fault::UnpairedMatchEntry)?
            .as_result_quote();

        entries.push(MatchEntry {
            pattern: produced.stack,
            result,
        });
        index += 2;
    }

    Ok(entries)
}
