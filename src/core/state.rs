//! Core State trait and the structural kinds of nodes in a state tree.
//!
//! User states are plain enum values. Where a value sits in the tree
//! (leaf, exclusive composite, parallel composite) is decided by the
//! builder; whether it is a final state is decided by the value itself.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure - no side effects. A state value is the identity
/// of a node in the machine's tree, so every value must appear at most once
/// in a given machine.
///
/// # Required Traits
///
/// - `Clone`: States are handed to listeners and stored as targets
/// - `PartialEq`: States are looked up by value when resolving targets
/// - `Debug`: States must be debuggable for diagnostics
///
/// # Example
///
/// ```rust
/// use statecraft::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum CallState {
///     Idle,
///     Ringing,
///     HungUp,
/// }
///
/// impl State for CallState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Ringing => "Ringing",
///             Self::HungUp => "HungUp",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::HungUp)
///     }
/// }
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync {
    /// Get the state's name for display, logging and diagram export.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Entering a final state ends its enclosing region. Final states
    /// cannot own children or outgoing transitions.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// How the children of a composite state are activated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildMode {
    /// Exactly one child is active at a time.
    Exclusive,
    /// Every child is active at once and evolves independently.
    Parallel,
}

/// Structural kind of a node in a built tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Simple,
    Composite(ChildMode),
    Final,
}

impl StateKind {
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Login,
        GroupCall,
        Exit,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Login => "Login",
                Self::GroupCall => "GroupCall",
                Self::Exit => "Exit",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Exit)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Login.name(), "Login");
        assert_eq!(TestState::GroupCall.name(), "GroupCall");
        assert_eq!(TestState::Exit.name(), "Exit");
    }

    #[test]
    fn is_final_identifies_terminal_states() {
        assert!(!TestState::Login.is_final());
        assert!(!TestState::GroupCall.is_final());
        assert!(TestState::Exit.is_final());
    }

    #[test]
    fn composite_kinds_report_composite() {
        assert!(StateKind::Composite(ChildMode::Parallel).is_composite());
        assert!(StateKind::Composite(ChildMode::Exclusive).is_composite());
        assert!(!StateKind::Simple.is_composite());
        assert!(!StateKind::Final.is_composite());
    }

    #[test]
    fn child_mode_deserializes_from_snake_case() {
        let mode: ChildMode = serde_json::from_str("\"parallel\"").unwrap();
        assert_eq!(mode, ChildMode::Parallel);
    }
}
