//! Builder for constructing machines from a declared state tree.

use crate::builder::error::{BuildError, TopologyViolation};
use crate::builder::state::StateBuilder;
use crate::builder::transition::{TargetDecl, TransitionBuilder};
use crate::builder::validate::{flatten, validate, Draft};
use crate::core::{Event, MachineListener, State};
use crate::machine::transition::{Target, Transition};
use crate::machine::tree::{Node, StateId, StateTree};
use crate::machine::{Machine, MachineConfig};
use stillwater::validation::Validation;
use tracing::debug;

/// Builder for constructing a [`Machine`] with a fluent API.
///
/// # Example
///
/// ```
/// use statecraft::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
/// use statecraft::{event_enum, state_enum};
///
/// state_enum! {
///     enum Door {
///         Root,
///         Closed,
///         Open,
///     }
/// }
///
/// event_enum! {
///     enum DoorEvent {
///         Push,
///     }
/// }
///
/// let root = StateBuilder::new(Door::Root)
///     .initial(
///         StateBuilder::new(Door::Closed)
///             .transition(TransitionBuilder::on("Push").target(Door::Open)),
///     )
///     .child(StateBuilder::new(Door::Open));
///
/// let mut machine = MachineBuilder::<Door, DoorEvent>::new(root).build().unwrap();
/// machine.start().unwrap();
/// machine.process(DoorEvent::Push).unwrap();
/// assert!(machine.is_active(&Door::Open));
/// ```
pub struct MachineBuilder<S: State, E, D = ()> {
    root: StateBuilder<S, E, D>,
    data: D,
    config: MachineConfig,
    listeners: Vec<Box<dyn MachineListener<S, E>>>,
}

impl<S, E, D> MachineBuilder<S, E, D>
where
    S: State + 'static,
    E: Event + 'static,
    D: Default + 'static,
{
    /// Create a builder whose machine starts with default data.
    pub fn new(root: StateBuilder<S, E, D>) -> Self {
        Self::with_data(root, D::default())
    }
}

impl<S, E, D> MachineBuilder<S, E, D>
where
    S: State + 'static,
    E: Event + 'static,
    D: 'static,
{
    /// Create a builder whose machine owns `data`.
    pub fn with_data(root: StateBuilder<S, E, D>, data: D) -> Self {
        Self {
            root,
            data,
            config: MachineConfig::default(),
            listeners: Vec::new(),
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Name used in logs, errors and diagrams.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Replace the machine's data.
    pub fn data(mut self, data: D) -> Self {
        self.data = data;
        self
    }

    /// Register a listener notified of entries, exits and transitions.
    pub fn listener(mut self, listener: impl MachineListener<S, E> + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Validate the declared tree and build the machine.
    ///
    /// Returns every topology violation found, not just the first. Besides
    /// the per-state checks, the root itself must have children.
    pub fn build(self) -> Result<Machine<S, E, D>, BuildError> {
        let drafts = flatten(self.root);

        match validate(&drafts) {
            Validation::Success(_) => {}
            Validation::Failure(errors) => {
                return Err(BuildError::InvalidTopology {
                    violations: errors.iter().cloned().collect(),
                })
            }
        }

        let tree = assemble(drafts)?;
        debug!(states = tree.len(), "state tree built");

        Ok(Machine::new(tree, self.data, self.config, self.listeners))
    }
}

/// Convert validated drafts into tree nodes, resolving state values to ids.
fn assemble<S: State, E, D>(drafts: Vec<Draft<S, E, D>>) -> Result<StateTree<S, E, D>, BuildError> {
    let states: Vec<S> = drafts.iter().map(|draft| draft.state.clone()).collect();
    let lookup = |state: &S| states.iter().position(|known| known == state).map(StateId);

    let mut nodes = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let initial = draft.initial.first().and_then(|state| lookup(state));

        let mut transitions = Vec::with_capacity(draft.transitions.len());
        for transition in draft.transitions {
            transitions.push(resolve_transition(&draft.state, transition, &lookup)?);
        }

        nodes.push(Node {
            state: draft.state,
            kind: draft.kind,
            parent: draft.parent.map(StateId),
            children: draft.children.into_iter().map(StateId).collect(),
            initial,
            transitions,
            on_entry: draft.on_entry,
            on_exit: draft.on_exit,
        });
    }

    Ok(StateTree::new(nodes))
}

fn resolve_transition<S: State, E, D>(
    source: &S,
    transition: TransitionBuilder<S, E, D>,
    lookup: &impl Fn(&S) -> Option<StateId>,
) -> Result<Transition<S, E, D>, BuildError> {
    let TransitionBuilder {
        event,
        name,
        guard,
        target,
        on_triggered,
    } = transition;
    let label = name.clone().unwrap_or_else(|| event.clone());

    let find = |state: &S| {
        lookup(state).ok_or_else(|| BuildError::InvalidTopology {
            violations: vec![TopologyViolation::UnknownTarget {
                state: source.name().to_string(),
                transition: label.clone(),
                target: state.name().to_string(),
            }],
        })
    };

    let target = match target {
        None => None,
        Some(TargetDecl::Fixed(state)) => Some(Target::Fixed(find(&state)?)),
        Some(TargetDecl::Computed {
            candidates,
            resolver,
        }) => Some(Target::Computed {
            candidates: candidates.iter().map(&find).collect::<Result<_, _>>()?,
            resolver,
        }),
    };

    Ok(Transition {
        event,
        name,
        guard,
        target,
        on_triggered,
    })
}
