//! Errors raised while starting a machine or processing events.
//!
//! An event that matches no transition is not an error: it is ignored.

use crate::core::HookError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Machine '{machine}' has not been started")]
    NotStarted { machine: String },

    #[error("Machine '{machine}' has already been started")]
    AlreadyStarted { machine: String },

    #[error("Guard of transition '{transition}' on state '{state}' failed: {source}")]
    GuardFailed {
        state: String,
        transition: String,
        #[source]
        source: HookError,
    },

    #[error("Target resolver of transition '{transition}' on state '{state}' failed: {source}")]
    ResolverFailed {
        state: String,
        transition: String,
        #[source]
        source: HookError,
    },

    #[error("Transition '{transition}' on state '{state}' resolved to undeclared target '{target}'")]
    UndeclaredTarget {
        state: String,
        transition: String,
        target: String,
    },

    #[error("More than {limit} events were posted while processing one event")]
    QueueOverflow { limit: usize },
}
