//! Context handed to entry, exit and triggered hooks.

use std::cell::RefCell;
use std::collections::VecDeque;

/// Events posted by hooks while an event is being processed.
///
/// Posted events are not dispatched re-entrantly: the machine drains them
/// one at a time after the current event has completed.
pub(crate) struct Outbox<E> {
    pending: RefCell<VecDeque<E>>,
}

impl<E> Outbox<E> {
    pub(crate) fn new() -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, event: E) {
        self.pending.borrow_mut().push_back(event);
    }

    pub(crate) fn pop(&self) -> Option<E> {
        self.pending.borrow_mut().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Context provided to entry and exit hooks.
pub struct HookContext<'a, S, E, D> {
    /// The state being entered or exited.
    pub state: &'a S,
    /// The event that caused the change; `None` while the machine starts.
    pub event: Option<&'a E>,
    /// Read access to the machine's data.
    pub data: &'a D,
    outbox: &'a Outbox<E>,
}

impl<'a, S, E, D> HookContext<'a, S, E, D> {
    pub(crate) fn new(
        state: &'a S,
        event: Option<&'a E>,
        data: &'a D,
        outbox: &'a Outbox<E>,
    ) -> Self {
        Self {
            state,
            event,
            data,
            outbox,
        }
    }

    /// Queue an event for processing once the current one completes.
    pub fn post(&self, event: E) {
        self.outbox.push(event);
    }
}

/// Context provided to a transition's triggered hooks.
pub struct TransitionContext<'a, S, E, D> {
    /// Declared transition name, if any.
    pub name: Option<&'a str>,
    pub source: &'a S,
    /// Resolved target; `None` for targetless transitions.
    pub target: Option<&'a S>,
    pub event: &'a E,
    pub data: &'a D,
    outbox: &'a Outbox<E>,
}

impl<'a, S, E, D> TransitionContext<'a, S, E, D> {
    pub(crate) fn new(
        name: Option<&'a str>,
        source: &'a S,
        target: Option<&'a S>,
        event: &'a E,
        data: &'a D,
        outbox: &'a Outbox<E>,
    ) -> Self {
        Self {
            name,
            source,
            target,
            event,
            data,
            outbox,
        }
    }

    /// Queue an event for processing once the current one completes.
    pub fn post(&self, event: E) {
        self.outbox.push(event);
    }
}

/// Hook run when a state is entered or exited.
pub type StateHook<S, E, D> = Box<dyn Fn(&HookContext<'_, S, E, D>) + Send + Sync>;

/// Hook run when a transition fires, between exit and entry.
pub type TriggeredHook<S, E, D> = Box<dyn Fn(&TransitionContext<'_, S, E, D>) + Send + Sync>;
