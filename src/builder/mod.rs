//! Builder API for declaring state trees and building machines.
//!
//! A tree is declared with nested [`StateBuilder`]s carrying their
//! [`TransitionBuilder`]s and hooks, then handed to a [`MachineBuilder`].
//! Building validates the whole tree and reports every violation at once.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;
pub mod transition;
mod validate;

pub use error::{BuildError, TopologyViolation};
pub use machine::MachineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Screen {
            Root,
            Login,
            Progress,
            Exit,
        }
        final: [Exit]
    }

    event_enum! {
        enum Input {
            Submit,
            Quit,
        }
    }

    #[test]
    fn build_reports_every_violation() {
        let root = StateBuilder::<Screen, Input, ()>::new(Screen::Root)
            .child(
                StateBuilder::new(Screen::Login)
                    .transition(TransitionBuilder::on("Sumbit").target(Screen::Progress)),
            )
            .child(StateBuilder::new(Screen::Exit));

        let err = MachineBuilder::new(root).build().err().unwrap();

        assert_eq!(
            err.violations(),
            &[
                TopologyViolation::MissingInitialState {
                    state: "Root".to_string()
                },
                TopologyViolation::UnknownTarget {
                    state: "Login".to_string(),
                    transition: "Sumbit".to_string(),
                    target: "Progress".to_string(),
                },
                TopologyViolation::UnknownEvent {
                    state: "Login".to_string(),
                    transition: "Sumbit".to_string(),
                    event: "Sumbit".to_string(),
                },
            ]
        );
    }

    #[test]
    fn valid_tree_builds_idle_machine() {
        let root = StateBuilder::<Screen, Input, ()>::new(Screen::Root)
            .initial(
                StateBuilder::new(Screen::Login)
                    .transition(TransitionBuilder::on("Submit").target(Screen::Progress)),
            )
            .child(
                StateBuilder::new(Screen::Progress)
                    .transition(TransitionBuilder::on("Quit").target(Screen::Exit)),
            )
            .child(StateBuilder::new(Screen::Exit));

        let machine = MachineBuilder::new(root).name("login").build().unwrap();

        assert_eq!(machine.name(), "login");
        assert!(!machine.is_running());
        assert_eq!(machine.root().children().len(), 3);
    }
}
