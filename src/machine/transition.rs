//! Transitions as stored in a built machine.

use crate::core::{Guard, HookError, Resolver, State, TriggeredHook};
use crate::machine::tree::StateId;

/// Target of a built transition, resolved to tree positions.
pub(crate) enum Target<S: State, E, D> {
    Fixed(StateId),
    Computed {
        candidates: Vec<StateId>,
        resolver: Resolver<S, E, D>,
    },
}

/// A transition attached to a source state.
pub(crate) struct Transition<S: State, E, D> {
    pub(crate) event: String,
    pub(crate) name: Option<String>,
    pub(crate) guard: Option<Guard<E, D>>,
    /// `None` for targetless transitions.
    pub(crate) target: Option<Target<S, E, D>>,
    pub(crate) on_triggered: Vec<TriggeredHook<S, E, D>>,
}

impl<S: State, E, D> Transition<S, E, D> {
    /// Check if this transition fires for `event` (pure unless the guard isn't).
    pub(crate) fn can_execute(&self, event_name: &str, event: &E, data: &D) -> Result<bool, HookError> {
        if self.event != event_name {
            return Ok(false);
        }

        match &self.guard {
            None => Ok(true),
            Some(guard) => guard.check(event, data),
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.event)
    }

    /// Every state this transition can lead to, in declaration order.
    pub(crate) fn targets(&self) -> Vec<StateId> {
        match &self.target {
            None => Vec::new(),
            Some(Target::Fixed(id)) => vec![*id],
            Some(Target::Computed { candidates, .. }) => candidates.clone(),
        }
    }
}
