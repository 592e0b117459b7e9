//! A machine shared between threads.

use crate::core::{Event, State};
use crate::machine::{DispatchError, Machine, MachineStatus};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a machine behind a mutex.
///
/// Events sent from several threads are processed one at a time, in the
/// order the lock is acquired. The lock is held for the whole of each
/// `process` call, including hooks and any events they post. A hook must
/// not call back into the same handle or it will deadlock.
pub struct SharedMachine<S: State, E, D = ()> {
    inner: Arc<Mutex<Machine<S, E, D>>>,
}

impl<S: State, E, D> Clone for SharedMachine<S, E, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event, D> SharedMachine<S, E, D> {
    pub fn new(machine: Machine<S, E, D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    pub fn start(&self) -> Result<(), DispatchError> {
        self.inner.lock().start()
    }

    pub fn process(&self, event: E) -> Result<(), DispatchError> {
        self.inner.lock().process(event)
    }

    pub fn stop(&self) {
        self.inner.lock().stop();
    }

    pub fn status(&self) -> MachineStatus {
        self.inner.lock().status()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lock().is_finished()
    }

    /// Snapshot of the active states.
    pub fn active_states(&self) -> Vec<S> {
        self.inner
            .lock()
            .active_states()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn export_diagram(&self) -> String {
        self.inner.lock().export_diagram()
    }

    /// Run `f` with exclusive access to the machine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Machine<S, E, D>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<S: State, E: Event, D> From<Machine<S, E, D>> for SharedMachine<S, E, D> {
    fn from(machine: Machine<S, E, D>) -> Self {
        Self::new(machine)
    }
}
