//! The fixed builtin registry. The first step of every compiled program
//! merges these bindings into the scope; everything a script can do to the
//! host goes through them.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{Fault, StepFailure};
use crate::lang::matching::{self, MatchFn};
use crate::lang::program::State;
use crate::lang::value::{Builtin, Value};

pub fn registry() -> HashMap<&'static str, Builtin> {
    let mut builtins = HashMap::new();

    let mut add = |name: &'static str, run: fn(State) -> Result<State, StepFailure>| {
        builtins.insert(name, Builtin { name, run });
    };

    add("drum-machine", drum_machine);
    add("pattern", pattern);
    add("console", console);
    add("log", log);
    add("patterns", patterns);
    add("match-function", match_function);
    add("extend-match-function", extend_match_function);

    builtins
}

/// Push the host context handle.
fn drum_machine(mut state: State) -> Result<State, StepFailure> {
    let machine = Value::Machine(state.context.clone());
    state.stack.push(machine);
    Ok(state)
}

/// Pop a pattern name and the machine, resolve the name to a catalog index,
/// ask the host to switch to it and start the clock once the switch
/// completes. The completion ticket is pushed so a script can carry it.
fn pattern(mut state: State) -> Result<State, StepFailure> {
    let name = state.pop("selecting a pattern")?;
    let machine = state.pop("selecting a pattern")?;

    let Value::Str(name) = name else {
        return Err(Fault::TypeMismatch {
            builtin: "pattern",
            expected: "a pattern name string",
            found: name.kind_name(),
        }
        .into());
    };
    let Value::Machine(handle) = machine else {
        return Err(Fault::TypeMismatch {
            builtin: "pattern",
            expected: "the drum machine",
            found: machine.kind_name(),
        }
        .into());
    };

    // An unknown name resolves to -1; what to do with that is the host's
    // decision.
    let index = handle
        .pattern_names()
        .iter()
        .position(|candidate| *candidate == name)
        .map(|found| found as i64)
        .unwrap_or(-1);

    let ticket = handle.select_pattern(index);
    handle.start_clock();

    state.stack.push(Value::Pending(ticket));
    Ok(state)
}

/// Push a fresh console object. Each call mints a new identity.
fn console(mut state: State) -> Result<State, StepFailure> {
    state.stack.push(Value::Console(Uuid::new_v4()));
    Ok(state)
}

/// Pop a string and a console object, append the string to stdout.
fn log(mut state: State) -> Result<State, StepFailure> {
    let text = state.pop("logging")?;
    let receiver = state.pop("logging")?;

    let Value::Str(text) = text else {
        return Err(Fault::TypeMismatch {
            builtin: "log",
            expected: "a string",
            found: text.kind_name(),
        }
        .into());
    };
    if !matches!(receiver, Value::Console(_)) {
        return Err(Fault::TypeMismatch {
            builtin: "log",
            expected: "the console",
            found: receiver.kind_name(),
        }
        .into());
    }

    state.stdout.push_str(&text);
    Ok(state)
}

/// Pop the machine and append the comma-joined catalog names to stdout.
fn patterns(mut state: State) -> Result<State, StepFailure> {
    let machine = state.pop("listing patterns")?;
    let Value::Machine(handle) = machine else {
        return Err(Fault::TypeMismatch {
            builtin: "patterns",
            expected: "the drum machine",
            found: machine.kind_name(),
        }
        .into());
    };

    let names = handle.pattern_names().join(",");
    state.stdout.push_str(&names);
    Ok(state)
}

/// Pop a quote of alternating pattern producers and results, and push the
/// match function built from it.
fn match_function(mut state: State) -> Result<State, StepFailure> {
    let source = state.pop("building a match function")?;
    let Value::Quote(quote) = source else {
        return Err(Fault::TypeMismatch {
            builtin: "match-function",
            expected: "a quote of pattern/result pairs",
            found: source.kind_name(),
        }
        .into());
    };

    let entries = matching::build_entries(&quote, &state)?;
    state.stack.push(Value::Matcher(MatchFn::new(entries)));
    Ok(state)
}

/// Pop a quote of new pattern/result pairs and a match function, and append
/// the new entries behind the existing ones. Existing entries keep priority.
fn extend_match_function(mut state: State) -> Result<State, StepFailure> {
    let extension = state.pop("extending a match function")?;
    let target = state.pop("extending a match function")?;

    let Value::Quote(quote) = extension else {
        return Err(Fault::TypeMismatch {
            builtin: "extend-match-function",
            expected: "a quote of pattern/result pairs",
            found: extension.kind_name(),
        }
        .into());
    };
    let Value::Matcher(matcher) = target else {
        return Err(Fault::TypeMismatch {
            builtin: "extend-match-function",
            expected: "a match function",
            found: target.kind_name(),
        }
        .into());
    };

    let entries = matching::build_entries(&quote, &state)?;
    matcher.extend_with(entries);
    Ok(state)
}
