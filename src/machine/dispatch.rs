//! Event dispatch: transition selection and execution.
//!
//! Dispatch runs in two phases. Selection walks every active leaf and
//! picks at most one transition per leaf, closest ancestor first and then
//! registration order, resolving computed targets as it goes. Nothing is
//! mutated during selection, so a failing guard or resolver leaves the
//! machine untouched. A transition is dropped when a transition of a
//! descendant state claims any of the states it would exit, so the deepest
//! transition wins in every region whatever the region order. Execution
//! then applies the remaining transitions in document order: exit hooks
//! innermost first, triggered hooks, cursor updates and entry hooks
//! outermost first. A transition whose states were already changed by an
//! earlier one for the same event is skipped.

use crate::core::{
    ChildMode, Event, HookContext, MachineListener, Outbox, State, TransitionContext,
};
use crate::machine::error::DispatchError;
use crate::machine::region::Regions;
use crate::machine::transition::{Target, Transition};
use crate::machine::tree::{StateId, StateTree};
use tracing::{debug, trace};

/// A transition chosen during selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) source: StateId,
    pub(crate) index: usize,
    pub(crate) target: Option<StateId>,
}

/// The states a transition with a target leaves, and where entry resumes.
struct Plan {
    domain: StateId,
    path: Vec<StateId>,
    /// Set when a parallel domain keeps every branch but this one.
    branch: Option<StateId>,
    exits: Vec<StateId>,
}

pub(crate) struct Dispatcher<'m, S: State, E, D> {
    tree: &'m StateTree<S, E, D>,
    regions: &'m mut Regions,
    data: &'m D,
    listeners: &'m [Box<dyn MachineListener<S, E>>],
    outbox: &'m Outbox<E>,
    /// States entered or exited while handling the current event.
    touched: Vec<bool>,
}

impl<'m, S: State, E: Event, D> Dispatcher<'m, S, E, D> {
    pub(crate) fn new(
        tree: &'m StateTree<S, E, D>,
        regions: &'m mut Regions,
        data: &'m D,
        listeners: &'m [Box<dyn MachineListener<S, E>>],
        outbox: &'m Outbox<E>,
    ) -> Self {
        Self {
            tree,
            regions,
            data,
            listeners,
            outbox,
            touched: vec![false; tree.len()],
        }
    }

    /// Enter the root and establish the initial configuration.
    pub(crate) fn start(&mut self) {
        self.regions.enter_root();
        self.enter(StateTree::<S, E, D>::ROOT, &[], None);
    }

    /// Pick the transitions `event` fires, without mutating anything.
    pub(crate) fn select(&self, event: &E) -> Result<Vec<Step>, DispatchError> {
        let mut steps: Vec<Step> = Vec::new();

        for leaf in self.regions.active_leaves(self.tree) {
            let Some((source, index)) = self.find_transition(leaf, event)? else {
                continue;
            };
            // Leaves under a parallel state can reach the same ancestor transition.
            if steps.iter().any(|s| s.source == source && s.index == index) {
                continue;
            }
            let transition = &self.tree.node(source).transitions[index];
            let target = self.resolve(source, transition, event)?;
            steps.push(Step {
                source,
                index,
                target,
            });
        }

        Ok(self.preempt(steps))
    }

    /// Drop steps overridden by a step whose source lies deeper in the tree
    /// and claims a state they would exit.
    fn preempt(&self, steps: Vec<Step>) -> Vec<Step> {
        let claims: Vec<Vec<StateId>> = steps.iter().map(|step| self.claimed(step)).collect();
        let keep: Vec<bool> = steps
            .iter()
            .zip(&claims)
            .map(|(step, claim)| {
                !steps.iter().zip(&claims).any(|(deeper, deeper_claim)| {
                    deeper.source != step.source
                        && self.tree.is_ancestor(step.source, deeper.source)
                        && deeper_claim.iter().any(|id| claim.contains(id))
                })
            })
            .collect();

        steps
            .into_iter()
            .zip(keep)
            .filter_map(|(step, keep)| {
                if !keep {
                    let node = self.tree.node(step.source);
                    trace!(
                        state = node.state.name(),
                        transition = node.transitions[step.index].label(),
                        "overridden by a deeper transition"
                    );
                }
                keep.then_some(step)
            })
            .collect()
    }

    /// States a step takes over: everything it exits, or its own source
    /// when it has no target.
    fn claimed(&self, step: &Step) -> Vec<StateId> {
        match step.target {
            Some(target) => self.plan(step.source, target).exits,
            None => vec![step.source],
        }
    }

    fn plan(&self, source: StateId, target: StateId) -> Plan {
        let tree = self.tree;
        let domain = tree.domain(source, target);
        let path = tree.path_below(domain, target);
        // Under a parallel domain only the branch holding both ends is replaced.
        let branch = path.first().copied().filter(|branch| {
            tree.mode(domain) == Some(ChildMode::Parallel) && tree.is_ancestor(*branch, source)
        });
        let exits = match branch {
            Some(branch) => {
                let mut exits = self.regions.exit_order(tree, branch);
                exits.push(branch);
                exits
            }
            None => self.regions.exit_order(tree, domain),
        };

        Plan {
            domain,
            path,
            branch,
            exits,
        }
    }

    fn find_transition(
        &self,
        leaf: StateId,
        event: &E,
    ) -> Result<Option<(StateId, usize)>, DispatchError> {
        let event_name = event.name();

        for source in self.tree.ancestors(leaf) {
            let node = self.tree.node(source);
            for (index, transition) in node.transitions.iter().enumerate() {
                let enabled = transition
                    .can_execute(event_name, event, self.data)
                    .map_err(|err| DispatchError::GuardFailed {
                        state: node.state.name().to_string(),
                        transition: transition.label().to_string(),
                        source: err,
                    })?;
                if enabled {
                    return Ok(Some((source, index)));
                }
            }
        }

        Ok(None)
    }

    fn resolve(
        &self,
        source: StateId,
        transition: &Transition<S, E, D>,
        event: &E,
    ) -> Result<Option<StateId>, DispatchError> {
        let Some(Target::Computed {
            candidates,
            resolver,
        }) = &transition.target
        else {
            return Ok(transition.targets().first().copied());
        };

        let source_name = self.tree.node(source).state.name();
        let state = resolver
            .resolve(event, self.data)
            .map_err(|err| DispatchError::ResolverFailed {
                state: source_name.to_string(),
                transition: transition.label().to_string(),
                source: err,
            })?;

        candidates
            .iter()
            .copied()
            .find(|id| self.tree.node(*id).state == state)
            .map(Some)
            .ok_or_else(|| DispatchError::UndeclaredTarget {
                state: source_name.to_string(),
                transition: transition.label().to_string(),
                target: state.name().to_string(),
            })
    }

    /// Apply one selected transition. Returns `false` when it was skipped
    /// because an earlier transition of the same event already changed
    /// the states it would leave.
    pub(crate) fn execute(&mut self, step: &Step, event: &E) -> bool {
        let tree = self.tree;
        let source = tree.node(step.source);
        let transition = &source.transitions[step.index];

        if self.touched[step.source.0] || !self.regions.is_active(tree, step.source) {
            trace!(
                state = source.state.name(),
                transition = transition.label(),
                "source already left; skipped"
            );
            return false;
        }

        let Some(target) = step.target else {
            self.trigger(step.source, transition, None, event);
            return true;
        };

        let Plan {
            domain,
            path,
            branch,
            exits,
        } = self.plan(step.source, target);
        if exits.iter().any(|id| self.touched[id.0]) {
            trace!(
                state = source.state.name(),
                transition = transition.label(),
                "region already changed; skipped"
            );
            return false;
        }

        for id in exits {
            self.exit(id, event);
        }
        self.trigger(step.source, transition, Some(target), event);
        match branch {
            Some(branch) => self.enter(branch, path.get(1..).unwrap_or(&[]), Some(event)),
            None => self.enter_children(domain, &path, Some(event)),
        }
        true
    }

    fn trigger(
        &self,
        source: StateId,
        transition: &Transition<S, E, D>,
        target: Option<StateId>,
        event: &E,
    ) {
        let source_state = &self.tree.node(source).state;
        let target_state = target.map(|id| &self.tree.node(id).state);

        debug!(
            from = source_state.name(),
            to = target_state.map(|s| s.name()),
            transition = transition.label(),
            "transition triggered"
        );

        let ctx = TransitionContext::new(
            transition.name.as_deref(),
            source_state,
            target_state,
            event,
            self.data,
            self.outbox,
        );
        for hook in &transition.on_triggered {
            hook(&ctx);
        }
        for listener in self.listeners {
            listener.on_transition(source_state, target_state, event);
        }
    }

    fn exit(&mut self, id: StateId, event: &E) {
        let tree = self.tree;
        let node = tree.node(id);
        trace!(state = node.state.name(), "exit");

        let ctx = HookContext::new(&node.state, Some(event), self.data, self.outbox);
        for hook in &node.on_exit {
            hook(&ctx);
        }
        for listener in self.listeners {
            listener.on_state_exited(&node.state, event);
        }

        self.regions.clear(id);
        self.touched[id.0] = true;
    }

    fn enter(&mut self, id: StateId, path: &[StateId], event: Option<&E>) {
        let tree = self.tree;
        let node = tree.node(id);
        trace!(state = node.state.name(), "enter");

        let ctx = HookContext::new(&node.state, event, self.data, self.outbox);
        for hook in &node.on_entry {
            hook(&ctx);
        }
        for listener in self.listeners {
            listener.on_state_entered(&node.state, event);
        }

        self.touched[id.0] = true;
        self.enter_children(id, path, event);
    }

    /// Enter the children of an active `owner`, following `path` where it
    /// leads and default entry everywhere else.
    fn enter_children(&mut self, owner: StateId, path: &[StateId], event: Option<&E>) {
        let tree = self.tree;
        let next = path.first().copied();
        let rest = path.get(1..).unwrap_or(&[]);

        match tree.mode(owner) {
            Some(ChildMode::Exclusive) => {
                let Some(child) = next.or(tree.node(owner).initial) else {
                    return;
                };
                self.regions.set_active_child(owner, child);
                let sub_path: &[StateId] = if next == Some(child) { rest } else { &[] };
                self.enter(child, sub_path, event);
            }
            Some(ChildMode::Parallel) => {
                for &child in &tree.node(owner).children {
                    let sub_path: &[StateId] = if next == Some(child) { rest } else { &[] };
                    self.enter(child, sub_path, event);
                }
            }
            None => {}
        }
    }
}
