//! Statecraft: hierarchical, parallel-composable state machines
//!
//! A machine is a tree of states. Composite states own children that are
//! either exclusive (one active at a time) or parallel (all active at
//! once). Events are typed values dispatched to every active region;
//! transitions may be guarded, may compute their target from the event,
//! and run entry, exit and triggered hooks in a well-defined order. A
//! machine finishes once every top-level region rests in a final state,
//! and its live tree can be exported as a PlantUML or Mermaid diagram.
//!
//! # Core Concepts
//!
//! - **State**: user enums implementing [`State`], one value per tree node
//! - **Event**: user enums implementing [`Event`], keyed by variant name
//! - **Builders**: [`StateBuilder`], [`TransitionBuilder`] and
//!   [`MachineBuilder`] declare and validate the tree
//! - **Machine**: [`Machine`] runs the tree; [`SharedMachine`] shares it
//!   between threads
//! - **Export**: [`DiagramExporter`] renders the live tree as text
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
//! use statecraft::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum Session {
//!         App,
//!         Login,
//!         LoginProgress,
//!         GroupCall,
//!         Exit,
//!     }
//!     final: [Exit]
//! }
//!
//! event_enum! {
//!     enum SessionEvent {
//!         SubmitLoginDetails { user: String },
//!         LoginSuccess,
//!         ExitApp,
//!     }
//! }
//!
//! let root = StateBuilder::new(Session::App)
//!     .initial(StateBuilder::new(Session::Login).transition(
//!         TransitionBuilder::on("SubmitLoginDetails")
//!             .named("submit login details")
//!             .target(Session::LoginProgress),
//!     ))
//!     .child(StateBuilder::new(Session::LoginProgress).transition(
//!         TransitionBuilder::on("LoginSuccess").target(Session::GroupCall),
//!     ))
//!     .child(StateBuilder::new(Session::GroupCall).transition(
//!         TransitionBuilder::on("ExitApp").target(Session::Exit),
//!     ))
//!     .child(StateBuilder::new(Session::Exit));
//!
//! let mut machine = MachineBuilder::<Session, SessionEvent>::new(root).build().unwrap();
//! machine.start().unwrap();
//!
//! machine
//!     .process(SessionEvent::SubmitLoginDetails { user: "ada".to_string() })
//!     .unwrap();
//! machine.process(SessionEvent::LoginSuccess).unwrap();
//! machine.process(SessionEvent::ExitApp).unwrap();
//!
//! assert!(machine.is_finished());
//! assert!(machine.export_diagram().contains("Login --> LoginProgress : submit login details"));
//! ```

pub mod builder;
pub mod core;
pub mod export;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder, StateBuilder, TransitionBuilder};
pub use crate::core::{ChildMode, Event, Guard, HookContext, MachineListener, State, TransitionContext};
pub use export::{DiagramExporter, DiagramFormat, ExportOptions};
pub use machine::{DispatchError, Machine, MachineConfig, MachineStatus, SharedMachine};
