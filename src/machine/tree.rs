//! Arena-allocated state tree.
//!
//! Nodes are stored in pre-order, so index 0 is the root and every parent
//! precedes its children. Topology is fixed once a machine is built.

use crate::core::{ChildMode, State, StateHook, StateKind};
use crate::machine::transition::Transition;

/// Position of a state in its machine's tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct StateId(pub(crate) usize);

pub(crate) struct Node<S: State, E, D> {
    pub(crate) state: S,
    pub(crate) kind: StateKind,
    pub(crate) parent: Option<StateId>,
    pub(crate) children: Vec<StateId>,
    /// Designated initial child of an exclusive composite.
    pub(crate) initial: Option<StateId>,
    pub(crate) transitions: Vec<Transition<S, E, D>>,
    pub(crate) on_entry: Vec<StateHook<S, E, D>>,
    pub(crate) on_exit: Vec<StateHook<S, E, D>>,
}

pub(crate) struct StateTree<S: State, E, D> {
    nodes: Vec<Node<S, E, D>>,
}

impl<S: State, E, D> StateTree<S, E, D> {
    pub(crate) const ROOT: StateId = StateId(0);

    pub(crate) fn new(nodes: Vec<Node<S, E, D>>) -> Self {
        Self { nodes }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: StateId) -> &Node<S, E, D> {
        &self.nodes[id.0]
    }

    pub(crate) fn find(&self, state: &S) -> Option<StateId> {
        self.nodes
            .iter()
            .position(|node| &node.state == state)
            .map(StateId)
    }

    pub(crate) fn mode(&self, id: StateId) -> Option<ChildMode> {
        match self.node(id).kind {
            StateKind::Composite(mode) => Some(mode),
            _ => None,
        }
    }

    /// `id` followed by each of its ancestors up to the root.
    pub(crate) fn ancestors(&self, id: StateId) -> impl Iterator<Item = StateId> + '_ {
        std::iter::successors(Some(id), move |current| self.node(*current).parent)
    }

    pub(crate) fn is_ancestor(&self, ancestor: StateId, id: StateId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// Least common ancestor; a state counts as its own ancestor.
    pub(crate) fn lca(&self, a: StateId, b: StateId) -> StateId {
        self.ancestors(a)
            .find(|candidate| self.is_ancestor(*candidate, b))
            .unwrap_or(Self::ROOT)
    }

    /// The state whose active descendants a transition replaces.
    ///
    /// Transitions are external: when source and target are in an
    /// ancestor relation, the outer one is exited and re-entered too.
    /// The root itself is never exited.
    pub(crate) fn domain(&self, source: StateId, target: StateId) -> StateId {
        let lca = self.lca(source, target);
        if lca == source || lca == target {
            self.node(lca).parent.unwrap_or(lca)
        } else {
            lca
        }
    }

    /// States strictly below `ancestor` down to and including `id`,
    /// outermost first.
    pub(crate) fn path_below(&self, ancestor: StateId, id: StateId) -> Vec<StateId> {
        let mut path: Vec<StateId> = self
            .ancestors(id)
            .take_while(|candidate| *candidate != ancestor)
            .collect();
        path.reverse();
        path
    }
}
