//! Read-only views over a machine's tree.
//!
//! Views borrow the machine, so the topology they show is always the
//! live one. Diagram export is built on them.

use crate::core::{ChildMode, State, StateKind};
use crate::machine::region::Regions;
use crate::machine::transition::{Target, Transition};
use crate::machine::tree::{StateId, StateTree};

/// A state in a built machine.
pub struct StateView<'m, S: State, E, D> {
    tree: &'m StateTree<S, E, D>,
    regions: &'m Regions,
    id: StateId,
}

impl<S: State, E, D> Clone for StateView<'_, S, E, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: State, E, D> Copy for StateView<'_, S, E, D> {}

impl<'m, S: State, E, D> StateView<'m, S, E, D> {
    pub(crate) fn new(tree: &'m StateTree<S, E, D>, regions: &'m Regions, id: StateId) -> Self {
        Self { tree, regions, id }
    }

    pub fn state(&self) -> &'m S {
        &self.tree.node(self.id).state
    }

    pub fn name(&self) -> &'m str {
        self.state().name()
    }

    pub fn kind(&self) -> StateKind {
        self.tree.node(self.id).kind
    }

    pub fn mode(&self) -> Option<ChildMode> {
        self.tree.mode(self.id)
    }

    pub fn is_active(&self) -> bool {
        self.regions.is_active(self.tree, self.id)
    }

    /// Whether this state is its exclusive parent's initial child.
    pub fn is_initial(&self) -> bool {
        self.tree
            .node(self.id)
            .parent
            .is_some_and(|parent| self.tree.node(parent).initial == Some(self.id))
    }

    pub fn parent(&self) -> Option<StateView<'m, S, E, D>> {
        self.tree.node(self.id).parent.map(|id| self.at(id))
    }

    /// Children in declaration order.
    pub fn children(&self) -> Vec<StateView<'m, S, E, D>> {
        self.tree
            .node(self.id)
            .children
            .iter()
            .map(|id| self.at(*id))
            .collect()
    }

    /// Outgoing transitions in registration order.
    pub fn transitions(&self) -> Vec<TransitionView<'m, S, E, D>> {
        let tree = self.tree;
        tree.node(self.id)
            .transitions
            .iter()
            .map(|transition| TransitionView { tree, transition })
            .collect()
    }

    fn at(&self, id: StateId) -> Self {
        Self::new(self.tree, self.regions, id)
    }
}

/// A transition in a built machine.
pub struct TransitionView<'m, S: State, E, D> {
    tree: &'m StateTree<S, E, D>,
    transition: &'m Transition<S, E, D>,
}

impl<S: State, E, D> Clone for TransitionView<'_, S, E, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: State, E, D> Copy for TransitionView<'_, S, E, D> {}

impl<'m, S: State, E, D> TransitionView<'m, S, E, D> {
    /// Name of the event type that triggers this transition.
    pub fn event(&self) -> &'m str {
        &self.transition.event
    }

    pub fn name(&self) -> Option<&'m str> {
        self.transition.name.as_deref()
    }

    /// The declared name, or the event name when there is none.
    pub fn label(&self) -> &'m str {
        self.transition.label()
    }

    pub fn has_guard(&self) -> bool {
        self.transition.guard.is_some()
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.transition.target, Some(Target::Computed { .. }))
    }

    pub fn is_targetless(&self) -> bool {
        self.transition.target.is_none()
    }

    /// Every state this transition can lead to. Computed transitions list
    /// their declared candidates.
    pub fn targets(&self) -> Vec<&'m S> {
        let tree = self.tree;
        self.transition
            .targets()
            .into_iter()
            .map(|id| &tree.node(id).state)
            .collect()
    }
}
