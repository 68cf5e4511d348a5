use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{RuntimeError, ScriptError};
use crate::lang::compile_source;
use crate::lang::program::State;
use crate::machine::{MachineHandle, OfflineMachine};

mod compiler;
mod facade;
mod parser;

/// Catalog backing `run_script`; assertions on pattern names use this too.
pub const CATALOG: [&str; 3] = ["one", "two", "three"];

/// A three-pattern offline host plus a handle on it, so a test can run a
/// script and then inspect what the script did to the machine.
pub fn offline_handle(names: &[&str]) -> (MachineHandle, Rc<RefCell<OfflineMachine>>) {
    let machine = Rc::new(RefCell::new(OfflineMachine::new(names)));
    let handle = MachineHandle::from_shared(machine.clone());
    (handle, machine)
}

pub fn run_script_on(source: &str, context: MachineHandle) -> Result<State, ScriptError> {
    let program = compile_source(source)?;
    Ok(program.execute(context)?)
}

pub fn run_script(source: &str) -> Result<State, ScriptError> {
    let (handle, _machine) = offline_handle(&CATALOG);
    run_script_on(source, handle)
}

pub fn stdout_of(source: &str) -> String {
    match run_script(source) {
        Ok(state) => state.stdout,
        Err(err) => panic!("script failed: {err}"),
    }
}

pub fn runtime_error_of(source: &str) -> RuntimeError {
    match run_script(source) {
        Err(ScriptError::Runtime(err)) => err,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}
