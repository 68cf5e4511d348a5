pub mod error;
pub mod lang;
pub mod logger;
pub mod machine;

pub use error::{RuntimeError, ScriptError};
pub use lang::program::Program;
pub use lang::{compile_source, run_source};
pub use machine::{MachineContext, MachineHandle, OfflineMachine, PatternSlot, Pending};
