//! Core state machine types.
//!
//! This module contains the vocabulary every other layer speaks:
//! - State and Event traits for closed, typed enumerations
//! - Guard predicates and target resolvers
//! - Hook contexts and the listener interface

mod context;
mod event;
mod guard;
mod listener;
mod state;

pub(crate) use context::Outbox;
pub use context::{HookContext, StateHook, TransitionContext, TriggeredHook};
pub use event::Event;
pub use guard::{Guard, HookError, Resolver};
pub use listener::MachineListener;
pub use state::{ChildMode, State, StateKind};
