//! Flattening and validation of declared state trees.
//!
//! Validation accumulates every violation instead of stopping at the
//! first, so a malformed tree is reported in a single pass.

use crate::builder::error::TopologyViolation;
use crate::builder::state::StateBuilder;
use crate::builder::transition::{TargetDecl, TransitionBuilder};
use crate::core::{ChildMode, Event, State, StateHook, StateKind};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TopologyViolation>>;

/// A declared state with its position in the flattened tree.
pub(crate) struct Draft<S: State, E, D> {
    pub(crate) state: S,
    pub(crate) kind: StateKind,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) initial: Vec<S>,
    pub(crate) transitions: Vec<TransitionBuilder<S, E, D>>,
    pub(crate) on_entry: Vec<StateHook<S, E, D>>,
    pub(crate) on_exit: Vec<StateHook<S, E, D>>,
}

/// Flatten a declared tree in pre-order. The root lands at index 0.
pub(crate) fn flatten<S: State, E, D>(root: StateBuilder<S, E, D>) -> Vec<Draft<S, E, D>> {
    let mut drafts = Vec::new();
    flatten_into(root, None, &mut drafts);
    drafts
}

fn flatten_into<S: State, E, D>(
    builder: StateBuilder<S, E, D>,
    parent: Option<usize>,
    drafts: &mut Vec<Draft<S, E, D>>,
) -> usize {
    let StateBuilder {
        state,
        mode,
        initial,
        children,
        transitions,
        on_entry,
        on_exit,
    } = builder;

    let kind = match (mode, children.is_empty()) {
        (Some(mode), _) => StateKind::Composite(mode),
        (None, false) => StateKind::Composite(ChildMode::Exclusive),
        (None, true) if state.is_final() => StateKind::Final,
        (None, true) => StateKind::Simple,
    };

    let id = drafts.len();
    drafts.push(Draft {
        state,
        kind,
        parent,
        children: Vec::new(),
        initial,
        transitions,
        on_entry,
        on_exit,
    });

    for child in children {
        let child_id = flatten_into(child, Some(id), drafts);
        drafts[id].children.push(child_id);
    }
    id
}

/// Validate a flattened tree, accumulating ALL violations.
pub(crate) fn validate<S: State, E: Event, D>(drafts: &[Draft<S, E, D>]) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    if let Some(root) = drafts.first() {
        checks.push(require(root.kind.is_composite(), || {
            TopologyViolation::RootNotComposite {
                state: root.state.name().to_string(),
            }
        }));
    }

    for (index, draft) in drafts.iter().enumerate() {
        // Reported once, on the second occurrence.
        let first_seen = !drafts[..index].iter().any(|d| d.state == draft.state);
        checks.push(require(first_seen, || TopologyViolation::DuplicateState {
            state: draft.state.name().to_string(),
        }));

        checks.extend(composite_checks(draft));
        checks.extend(transition_checks(draft, drafts));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn composite_checks<S: State, E, D>(draft: &Draft<S, E, D>) -> Vec<Check> {
    let name = draft.state.name();
    let mut checks = Vec::new();

    let StateKind::Composite(mode) = draft.kind else {
        return checks;
    };

    checks.push(require(!draft.state.is_final(), || {
        TopologyViolation::FinalWithChildren {
            state: name.to_string(),
        }
    }));

    if draft.children.is_empty() {
        checks.push(Validation::fail(TopologyViolation::EmptyComposite {
            state: name.to_string(),
        }));
        return checks;
    }

    if mode == ChildMode::Exclusive {
        let check = match draft.initial.len() {
            0 => Validation::fail(TopologyViolation::MissingInitialState {
                state: name.to_string(),
            }),
            1 => Validation::success(()),
            count => Validation::fail(TopologyViolation::MultipleInitialStates {
                state: name.to_string(),
                count,
            }),
        };
        checks.push(check);
    }

    checks
}

fn transition_checks<S: State, E: Event, D>(
    draft: &Draft<S, E, D>,
    drafts: &[Draft<S, E, D>],
) -> Vec<Check> {
    let name = draft.state.name();
    let known_events = E::kinds();
    let mut checks = Vec::new();

    if draft.kind == StateKind::Final {
        checks.push(require(draft.transitions.is_empty(), || {
            TopologyViolation::FinalWithTransitions {
                state: name.to_string(),
            }
        }));
    }

    for transition in &draft.transitions {
        let label = transition.label();

        if let Some(TargetDecl::Computed { candidates, .. }) = &transition.target {
            checks.push(require(!candidates.is_empty(), || {
                TopologyViolation::NoCandidateTargets {
                    state: name.to_string(),
                    transition: label.to_string(),
                }
            }));
        }

        for target in transition.declared_targets() {
            let exists = drafts.iter().any(|d| &d.state == target);
            checks.push(require(exists, || TopologyViolation::UnknownTarget {
                state: name.to_string(),
                transition: label.to_string(),
                target: target.name().to_string(),
            }));
        }

        if !known_events.is_empty() {
            let known = known_events.iter().any(|known| *known == transition.event);
            checks.push(require(known, || TopologyViolation::UnknownEvent {
                state: name.to_string(),
                transition: label.to_string(),
                event: transition.event.clone(),
            }));
        }
    }

    checks
}

fn require(condition: bool, violation: impl FnOnce() -> TopologyViolation) -> Check {
    if condition {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState {
            Root,
            Login,
            Progress,
            Exit,
            Nowhere,
        }
        final: [Exit]
    }

    event_enum! {
        enum TestEvent {
            Submit,
            Quit,
        }
    }

    type Builder = StateBuilder<TestState, TestEvent, ()>;

    fn violations(root: Builder) -> Vec<TopologyViolation> {
        match validate(&flatten(root)) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    #[test]
    fn flatten_is_pre_order_with_parent_links() {
        let root = Builder::new(TestState::Root)
            .initial(Builder::new(TestState::Login))
            .child(Builder::new(TestState::Exit));

        let drafts = flatten(root);

        assert_eq!(drafts.len(), 3);
        assert_eq!(drafts[0].kind, StateKind::Composite(ChildMode::Exclusive));
        assert_eq!(drafts[0].children, vec![1, 2]);
        assert_eq!(drafts[1].parent, Some(0));
        assert_eq!(drafts[1].kind, StateKind::Simple);
        assert_eq!(drafts[2].kind, StateKind::Final);
    }

    #[test]
    fn valid_tree_passes() {
        let root = Builder::new(TestState::Root)
            .initial(
                Builder::new(TestState::Login)
                    .transition(TransitionBuilder::on("Submit").target(TestState::Progress)),
            )
            .child(
                Builder::new(TestState::Progress)
                    .transition(TransitionBuilder::on("Quit").target(TestState::Exit)),
            )
            .child(Builder::new(TestState::Exit));

        assert!(violations(root).is_empty());
    }

    #[test]
    fn root_must_be_composite() {
        let found = violations(Builder::new(TestState::Root));

        assert_eq!(
            found,
            vec![TopologyViolation::RootNotComposite {
                state: "Root".to_string()
            }]
        );
    }

    #[test]
    fn exclusive_composite_needs_initial_child() {
        let root = Builder::new(TestState::Root)
            .child(Builder::new(TestState::Login))
            .child(Builder::new(TestState::Progress));

        assert_eq!(
            violations(root),
            vec![TopologyViolation::MissingInitialState {
                state: "Root".to_string()
            }]
        );
    }

    #[test]
    fn parallel_composite_needs_no_initial_child() {
        let root = Builder::new(TestState::Root)
            .parallel()
            .child(Builder::new(TestState::Login))
            .child(Builder::new(TestState::Progress));

        assert!(violations(root).is_empty());
    }

    #[test]
    fn accumulates_all_violations() {
        let root = Builder::new(TestState::Root)
            .initial(Builder::new(TestState::Login))
            .initial(
                Builder::new(TestState::Progress)
                    .transition(TransitionBuilder::on("Submit").target(TestState::Nowhere))
                    .transition(TransitionBuilder::on("Jump").target(TestState::Login)),
            )
            .child(
                Builder::new(TestState::Exit)
                    .transition(TransitionBuilder::on("Quit").target(TestState::Login)),
            )
            .child(Builder::new(TestState::Login));

        let found = violations(root);

        assert!(found.contains(&TopologyViolation::MultipleInitialStates {
            state: "Root".to_string(),
            count: 2,
        }));
        assert!(found.contains(&TopologyViolation::UnknownTarget {
            state: "Progress".to_string(),
            transition: "Submit".to_string(),
            target: "Nowhere".to_string(),
        }));
        assert!(found.contains(&TopologyViolation::UnknownEvent {
            state: "Progress".to_string(),
            transition: "Jump".to_string(),
            event: "Jump".to_string(),
        }));
        assert!(found.contains(&TopologyViolation::FinalWithTransitions {
            state: "Exit".to_string(),
        }));
        assert!(found.contains(&TopologyViolation::DuplicateState {
            state: "Login".to_string(),
        }));
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn final_state_cannot_own_children() {
        let root = Builder::new(TestState::Root).initial(
            Builder::new(TestState::Exit).initial(Builder::new(TestState::Login)),
        );

        assert_eq!(
            violations(root),
            vec![TopologyViolation::FinalWithChildren {
                state: "Exit".to_string()
            }]
        );
    }

    #[test]
    fn declared_mode_without_children_is_empty_composite() {
        let root = Builder::new(TestState::Root)
            .initial(Builder::new(TestState::Login).parallel());

        assert_eq!(
            violations(root),
            vec![TopologyViolation::EmptyComposite {
                state: "Login".to_string()
            }]
        );
    }

    #[test]
    fn computed_transition_needs_candidates() {
        let root = Builder::new(TestState::Root).initial(Builder::new(TestState::Login).transition(
            TransitionBuilder::on("Submit").target_fn(Vec::new(), |_, _| TestState::Progress),
        ));

        assert_eq!(
            violations(root),
            vec![TopologyViolation::NoCandidateTargets {
                state: "Login".to_string(),
                transition: "Submit".to_string(),
            }]
        );
    }
}
