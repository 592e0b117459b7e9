//! Observer interface for host applications.
//!
//! Hooks belong to the topology; listeners belong to whoever owns the
//! machine. A UI layer typically registers one listener and reacts to
//! state changes without the machine knowing anything about it.

use super::state::State;

/// Receives notifications as the machine changes state.
///
/// Every method has a no-op default. Listeners are called synchronously
/// from inside `Machine::start` and `Machine::process`, after the hooks
/// of the state or transition they describe.
pub trait MachineListener<S: State, E>: Send + Sync {
    /// A state became active. `event` is `None` during start-up.
    fn on_state_entered(&self, _state: &S, _event: Option<&E>) {}

    fn on_state_exited(&self, _state: &S, _event: &E) {}

    /// A transition fired. `target` is `None` for targetless transitions.
    fn on_transition(&self, _source: &S, _target: Option<&S>, _event: &E) {}

    /// Every top-level region rests in a final state.
    fn on_finished(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, PartialEq, Debug)]
    struct Tag(&'static str);

    impl State for Tag {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[derive(Default)]
    struct Counting {
        finished: AtomicUsize,
    }

    impl MachineListener<Tag, ()> for Counting {
        fn on_finished(&self) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn unimplemented_methods_are_no_ops() {
        let listener = Counting::default();
        listener.on_state_entered(&Tag("A"), None);
        listener.on_state_exited(&Tag("A"), &());
        listener.on_transition(&Tag("A"), None, &());
        listener.on_finished();

        assert_eq!(listener.finished.load(Ordering::SeqCst), 1);
    }
}
