//! Active-state cursors.
//!
//! Every exclusive composite owns one region: a cursor naming its active
//! child. Parallel composites need no cursor because all their children
//! are active whenever they are. Which states are active is therefore
//! fully derived from the cursors plus whether the root has been entered.

use crate::core::{ChildMode, State, StateKind};
use crate::machine::tree::{StateId, StateTree};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Regions {
    root_entered: bool,
    cursors: Vec<Option<StateId>>,
}

impl Regions {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            root_entered: false,
            cursors: vec![None; len],
        }
    }

    pub(crate) fn enter_root(&mut self) {
        self.root_entered = true;
    }

    pub(crate) fn active_child(&self, owner: StateId) -> Option<StateId> {
        self.cursors[owner.0]
    }

    pub(crate) fn set_active_child(&mut self, owner: StateId, child: StateId) {
        self.cursors[owner.0] = Some(child);
    }

    pub(crate) fn clear(&mut self, owner: StateId) {
        self.cursors[owner.0] = None;
    }

    /// Children of `id` that are active while `id` is.
    pub(crate) fn active_children<S: State, E, D>(
        &self,
        tree: &StateTree<S, E, D>,
        id: StateId,
    ) -> Vec<StateId> {
        match tree.mode(id) {
            Some(ChildMode::Exclusive) => self.active_child(id).into_iter().collect(),
            Some(ChildMode::Parallel) => tree.node(id).children.clone(),
            None => Vec::new(),
        }
    }

    pub(crate) fn is_active<S: State, E, D>(&self, tree: &StateTree<S, E, D>, id: StateId) -> bool {
        if !self.root_entered {
            return false;
        }
        tree.ancestors(id).all(|current| match tree.node(current).parent {
            None => true,
            Some(parent) => match tree.mode(parent) {
                Some(ChildMode::Exclusive) => self.active_child(parent) == Some(current),
                _ => true,
            },
        })
    }

    /// Every active state, in pre-order.
    pub(crate) fn active_states<S: State, E, D>(&self, tree: &StateTree<S, E, D>) -> Vec<StateId> {
        let mut active = Vec::new();
        if self.root_entered {
            self.collect(tree, StateTree::<S, E, D>::ROOT, &mut active);
        }
        active
    }

    fn collect<S: State, E, D>(
        &self,
        tree: &StateTree<S, E, D>,
        id: StateId,
        active: &mut Vec<StateId>,
    ) {
        active.push(id);
        for child in self.active_children(tree, id) {
            self.collect(tree, child, active);
        }
    }

    /// Active states with no active children, in document order.
    pub(crate) fn active_leaves<S: State, E, D>(&self, tree: &StateTree<S, E, D>) -> Vec<StateId> {
        self.active_states(tree)
            .into_iter()
            .filter(|id| self.active_children(tree, *id).is_empty())
            .collect()
    }

    /// Active descendants of `owner` in exit order: innermost first,
    /// later siblings before earlier ones. `owner` itself is excluded.
    pub(crate) fn exit_order<S: State, E, D>(
        &self,
        tree: &StateTree<S, E, D>,
        owner: StateId,
    ) -> Vec<StateId> {
        let mut order = Vec::new();
        self.collect_exits(tree, owner, &mut order);
        order
    }

    fn collect_exits<S: State, E, D>(
        &self,
        tree: &StateTree<S, E, D>,
        id: StateId,
        order: &mut Vec<StateId>,
    ) {
        for child in self.active_children(tree, id).into_iter().rev() {
            self.collect_exits(tree, child, order);
            order.push(child);
        }
    }

    /// Whether the region(s) under `id` rest in final states.
    ///
    /// An exclusive composite is done when its active child is final; a
    /// parallel composite when every child is done.
    pub(crate) fn is_done<S: State, E, D>(&self, tree: &StateTree<S, E, D>, id: StateId) -> bool {
        match tree.node(id).kind {
            StateKind::Final => true,
            StateKind::Simple => false,
            StateKind::Composite(ChildMode::Exclusive) => self
                .active_child(id)
                .is_some_and(|child| tree.node(child).kind == StateKind::Final),
            StateKind::Composite(ChildMode::Parallel) => tree
                .node(id)
                .children
                .iter()
                .all(|child| self.is_done(tree, *child)),
        }
    }
}
