//! The seam between the language core and the host drum machine. The core
//! never talks to the audio clock or the pattern service directly; it goes
//! through [`MachineContext`], and the host decides what selection and
//! playback actually mean.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the host's pattern catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSlot {
    pub name: String,
}

impl PatternSlot {
    pub fn new(name: impl Into<String>) -> Self {
        PatternSlot { name: name.into() }
    }
}

/// Ticket for an asynchronous host action. The language never waits on it;
/// scripts carry it on the stack so the host can chain from it. Two tickets
/// compare equal only when they identify the same action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pending(Uuid);

impl Pending {
    pub fn new() -> Self {
        Pending(Uuid::new_v4())
    }
}

impl Default for Pending {
    fn default() -> Self {
        Pending::new()
    }
}

/// What the surrounding application must provide to the language core.
///
/// `select_pattern` receives the raw catalog index the `pattern` builtin
/// resolved, including -1 for an unknown name; out-of-range semantics are the
/// host's concern. The host owns tempo as well: it starts the clock at the
/// beats-per-minute of whichever pattern is selected.
pub trait MachineContext {
    /// The ordered pattern catalog.
    fn patterns(&self) -> &[PatternSlot];

    /// Begin switching to the pattern at `index` and return a completion
    /// ticket for the switch.
    fn select_pattern(&mut self, index: i64) -> Pending;

    /// Start playback once the pending selection completes.
    fn start_clock(&mut self);

    /// Stop playback.
    fn stop_clock(&mut self);
}

/// Shared handle to the host machine, threaded through execution as the
/// `context` field of every state. Equality is identity: two handles are
/// equal only when they point at the same host.
#[derive(Clone)]
pub struct MachineHandle(Rc<RefCell<dyn MachineContext>>);

impl MachineHandle {
    pub fn new(machine: impl MachineContext + 'static) -> Self {
        MachineHandle(Rc::new(RefCell::new(machine)))
    }

    /// Wrap an already shared host so the embedder can keep inspecting it
    /// while scripts run against it.
    pub fn from_shared(machine: Rc<RefCell<dyn MachineContext>>) -> Self {
        MachineHandle(machine)
    }

    pub fn pattern_names(&self) -> Vec<String> {
        self.0
            .borrow()
            .patterns()
            .iter()
            .map(|slot| slot.name.clone())
            .collect()
    }

    pub fn select_pattern(&self, index: i64) -> Pending {
        self.0.borrow_mut().select_pattern(index)
    }

    pub fn start_clock(&self) {
        self.0.borrow_mut().start_clock();
    }

    pub fn stop_clock(&self) {
        self.0.borrow_mut().stop_clock();
    }

    pub fn borrow(&self) -> Ref<'_, dyn MachineContext> {
        self.0.borrow()
    }
}

impl PartialEq for MachineHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MachineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MachineHandle")
    }
}

/// In-memory host for offline use: a fixed catalog, no audio, no network.
/// Backs the crate's tests and serves as a starting point for embedders.
#[derive(Debug, Default)]
pub struct OfflineMachine {
    patterns: Vec<PatternSlot>,
    requests: Vec<i64>,
    selected: Option<usize>,
    clock_running: bool,
    issued: Vec<Pending>,
}

impl OfflineMachine {
    pub fn new(names: &[&str]) -> Self {
        OfflineMachine {
            patterns: names.iter().copied().map(PatternSlot::new).collect(),
            ..Default::default()
        }
    }

    pub fn with_patterns(patterns: Vec<PatternSlot>) -> Self {
        OfflineMachine {
            patterns,
            ..Default::default()
        }
    }

    /// Raw indices handed to `select_pattern`, in request order.
    pub fn requests(&self) -> &[i64] {
        &self.requests
    }

    /// The currently selected catalog index, after wrap-around.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn clock_running(&self) -> bool {
        self.clock_running
    }

    /// Completion tickets issued so far.
    pub fn issued(&self) -> &[Pending] {
        &self.issued
    }
}

impl MachineContext for OfflineMachine {
    fn patterns(&self) -> &[PatternSlot] {
        &self.patterns
    }

    fn select_pattern(&mut self, index: i64) -> Pending {
        self.requests.push(index);

        // Below the catalog wraps to the last slot, past the end back to
        // the first.
        if !self.patterns.is_empty() {
            let wrapped = if index < 0 {
                self.patterns.len() - 1
            } else if index as usize >= self.patterns.len() {
                0
            } else {
                index as usize
            };
            if self.clock_running {
                self.stop_clock();
            }
            self.selected = Some(wrapped);
        }

        let ticket = Pending::new();
        self.issued.push(ticket);
        ticket
    }

    fn start_clock(&mut self) {
        self.clock_running = true;
    }

    fn stop_clock(&mut self) {
        self.clock_running = false;
    }
}
