//! Build errors for machine construction.

use thiserror::Error;

/// A single defect in a declared state tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyViolation {
    #[error("Root state '{state}' has no children")]
    RootNotComposite { state: String },

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Exclusive state '{state}' has no initial child")]
    MissingInitialState { state: String },

    #[error("Exclusive state '{state}' has {count} initial children, expected one")]
    MultipleInitialStates { state: String, count: usize },

    #[error("Composite state '{state}' declares no children")]
    EmptyComposite { state: String },

    #[error("Final state '{state}' cannot have children")]
    FinalWithChildren { state: String },

    #[error("Final state '{state}' cannot have outgoing transitions")]
    FinalWithTransitions { state: String },

    #[error("Transition '{transition}' on '{state}' targets '{target}', which is not in the machine")]
    UnknownTarget {
        state: String,
        transition: String,
        target: String,
    },

    #[error("Computed transition '{transition}' on '{state}' declares no candidate targets")]
    NoCandidateTargets { state: String, transition: String },

    #[error("Transition '{transition}' on '{state}' listens for unknown event '{event}'")]
    UnknownEvent {
        state: String,
        transition: String,
        event: String,
    },
}

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid state tree: {}", render(.violations))]
    InvalidTopology { violations: Vec<TopologyViolation> },
}

impl BuildError {
    /// All violations found, in tree order.
    pub fn violations(&self) -> &[TopologyViolation] {
        match self {
            Self::InvalidTopology { violations } => violations,
        }
    }
}

fn render(violations: &[TopologyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_every_violation() {
        let err = BuildError::InvalidTopology {
            violations: vec![
                TopologyViolation::MissingInitialState {
                    state: "AppState".to_string(),
                },
                TopologyViolation::FinalWithTransitions {
                    state: "AppExit".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Invalid state tree: Exclusive state 'AppState' has no initial child; \
             Final state 'AppExit' cannot have outgoing transitions"
        );
        assert_eq!(err.violations().len(), 2);
    }
}
