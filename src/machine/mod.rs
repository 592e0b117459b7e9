//! Runtime for built state machines.
//!
//! A [`Machine`] owns its state tree, the region cursors describing the
//! active configuration, and the data guards and hooks read from. It is
//! driven by explicit calls: [`Machine::start`] enters the initial
//! configuration, [`Machine::process`] handles one event to completion,
//! and [`Machine::stop`] ends processing.
//!
//! # Processing model
//!
//! Events are processed one at a time. Each event fires at most one
//! transition per region and is never re-dispatched after a transition
//! fires. Hooks run synchronously inside `process`; a hook that blocks
//! stalls the machine. Events posted from hooks are queued and processed
//! after the current event, each in its own pass.

mod config;
mod dispatch;
mod error;
mod region;
mod shared;
pub(crate) mod transition;
pub(crate) mod tree;
mod view;

pub use config::{ConfigError, MachineConfig, DEFAULT_MAX_POSTED_EVENTS};
pub use error::DispatchError;
pub use shared::SharedMachine;
pub use view::{StateView, TransitionView};

use crate::core::{Event, MachineListener, Outbox, State};
use crate::export::{DiagramExporter, ExportOptions};
use dispatch::Dispatcher;
use region::Regions;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info};
use tree::StateTree;
use uuid::Uuid;

/// Lifecycle of a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    /// Built but not started.
    Idle,
    Running,
    /// Every top-level region rests in a final state. Never reverts.
    Finished,
    /// Stopped by its owner.
    Stopped,
}

/// A built hierarchical state machine.
pub struct Machine<S: State, E, D = ()> {
    id: Uuid,
    name: String,
    tree: StateTree<S, E, D>,
    regions: Regions,
    status: MachineStatus,
    data: D,
    config: MachineConfig,
    listeners: Vec<Box<dyn MachineListener<S, E>>>,
}

impl<S: State, E: Event, D> Machine<S, E, D> {
    pub(crate) fn new(
        tree: StateTree<S, E, D>,
        data: D,
        config: MachineConfig,
        listeners: Vec<Box<dyn MachineListener<S, E>>>,
    ) -> Self {
        let name = config
            .name
            .clone()
            .unwrap_or_else(|| tree.node(StateTree::<S, E, D>::ROOT).state.name().to_string());
        let regions = Regions::new(tree.len());

        Self {
            id: Uuid::new_v4(),
            name,
            tree,
            regions,
            status: MachineStatus::Idle,
            data,
            config,
            listeners,
        }
    }

    /// Unique identifier of this machine instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == MachineStatus::Running
    }

    /// Whether every top-level region rests in a final state.
    pub fn is_finished(&self) -> bool {
        self.status == MachineStatus::Finished
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the machine's data between events.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Every active state, outermost first, in declaration order.
    pub fn active_states(&self) -> Vec<&S> {
        self.regions
            .active_states(&self.tree)
            .into_iter()
            .map(|id| &self.tree.node(id).state)
            .collect()
    }

    pub fn is_active(&self, state: &S) -> bool {
        self.tree
            .find(state)
            .is_some_and(|id| self.regions.is_active(&self.tree, id))
    }

    /// Read-only view of the root state.
    pub fn root(&self) -> StateView<'_, S, E, D> {
        StateView::new(&self.tree, &self.regions, StateTree::<S, E, D>::ROOT)
    }

    /// Look up a state's view by value.
    pub fn state(&self, state: &S) -> Option<StateView<'_, S, E, D>> {
        self.tree
            .find(state)
            .map(|id| StateView::new(&self.tree, &self.regions, id))
    }

    /// Enter the initial configuration, running entry hooks outermost first.
    pub fn start(&mut self) -> Result<(), DispatchError> {
        if self.status != MachineStatus::Idle {
            return Err(DispatchError::AlreadyStarted {
                machine: self.name.clone(),
            });
        }

        let span = debug_span!("start", machine = %self.name, id = %self.id);
        let _enter = span.enter();

        info!("starting machine");
        self.status = MachineStatus::Running;

        let outbox = Outbox::new();
        Dispatcher::new(
            &self.tree,
            &mut self.regions,
            &self.data,
            &self.listeners,
            &outbox,
        )
        .start();
        self.check_finished();
        self.drain(&outbox)
    }

    /// Stop processing. The active configuration is kept for inspection
    /// and export; no exit hooks run.
    pub fn stop(&mut self) {
        if matches!(self.status, MachineStatus::Idle | MachineStatus::Running) {
            info!(machine = %self.name, "machine stopped");
            self.status = MachineStatus::Stopped;
        }
    }

    /// Process one event to completion.
    ///
    /// An event that matches no transition is ignored. Once the machine
    /// has finished or been stopped every event is ignored.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::NotStarted`] before [`start`](Self::start)
    /// - [`DispatchError::GuardFailed`] / [`DispatchError::ResolverFailed`]
    ///   / [`DispatchError::UndeclaredTarget`]: the event is abandoned and
    ///   the active configuration is left exactly as it was
    /// - [`DispatchError::QueueOverflow`] when hooks post too many events
    ///
    /// Posted events are processed after `event` and report their errors
    /// here too. When one fails, the posted events still queued behind it
    /// are discarded.
    pub fn process(&mut self, event: E) -> Result<(), DispatchError> {
        match self.status {
            MachineStatus::Idle => {
                return Err(DispatchError::NotStarted {
                    machine: self.name.clone(),
                })
            }
            MachineStatus::Finished | MachineStatus::Stopped => {
                debug!(
                    machine = %self.name,
                    event = event.name(),
                    status = ?self.status,
                    "machine not running; event ignored"
                );
                return Ok(());
            }
            MachineStatus::Running => {}
        }

        let outbox = Outbox::new();
        self.dispatch(&event, &outbox)?;
        self.drain(&outbox)
    }

    /// Process events posted by hooks until none remain.
    fn drain(&mut self, outbox: &Outbox<E>) -> Result<(), DispatchError> {
        let limit = self.config.max_posted_events;
        let mut drained = 0;

        while let Some(event) = outbox.pop() {
            if self.status != MachineStatus::Running {
                debug!(
                    dropped = outbox.len() + 1,
                    "machine no longer running; posted events dropped"
                );
                break;
            }
            drained += 1;
            if drained > limit {
                return Err(DispatchError::QueueOverflow { limit });
            }
            self.dispatch(&event, outbox)?;
        }

        Ok(())
    }

    fn dispatch(&mut self, event: &E, outbox: &Outbox<E>) -> Result<(), DispatchError> {
        let span = debug_span!("process", machine = %self.name, id = %self.id, event = event.name());
        let _enter = span.enter();

        let mut dispatcher = Dispatcher::new(
            &self.tree,
            &mut self.regions,
            &self.data,
            &self.listeners,
            outbox,
        );
        let steps = dispatcher.select(event)?;
        if steps.is_empty() {
            debug!("no transition matched; event ignored");
            return Ok(());
        }

        let fired = steps
            .iter()
            .filter(|step| dispatcher.execute(step, event))
            .count();
        debug!(selected = steps.len(), fired, "event processed");

        self.check_finished();
        Ok(())
    }

    fn check_finished(&mut self) {
        if self.status == MachineStatus::Running
            && self.regions.is_done(&self.tree, StateTree::<S, E, D>::ROOT)
        {
            self.status = MachineStatus::Finished;
            info!(machine = %self.name, "machine finished");
            for listener in &self.listeners {
                listener.on_finished();
            }
        }
    }

    /// Export the live tree using the configured [`ExportOptions`].
    pub fn export_diagram(&self) -> String {
        DiagramExporter::new(self.config.export.clone()).export(self)
    }

    pub fn export_diagram_with(&self, options: &ExportOptions) -> String {
        DiagramExporter::new(options.clone()).export(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
    use crate::{event_enum, state_enum};
    use std::sync::{Arc, Mutex};

    state_enum! {
        enum Flow {
            Root,
            A,
            B,
            C,
        }
        final: [C]
    }

    event_enum! {
        enum Signal {
            E1,
            E2,
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, entry: String) {
        log.lock().unwrap().push(entry);
    }

    fn leaf(state: Flow, log: &Log) -> StateBuilder<Flow, Signal, ()> {
        let (entry_log, exit_log) = (log.clone(), log.clone());
        StateBuilder::new(state)
            .on_entry(move |ctx| record(&entry_log, format!("enter {}", ctx.state.name())))
            .on_exit(move |ctx| record(&exit_log, format!("exit {}", ctx.state.name())))
    }

    fn linear(log: &Log) -> Machine<Flow, Signal> {
        let root = StateBuilder::new(Flow::Root)
            .initial(leaf(Flow::A, log).transition(TransitionBuilder::on("E1").target(Flow::B)))
            .child(leaf(Flow::B, log).transition(TransitionBuilder::on("E2").target(Flow::C)))
            .child(leaf(Flow::C, log));
        MachineBuilder::new(root).build().unwrap()
    }

    #[test]
    fn new_machine_is_idle_with_nothing_active() {
        let log = Log::default();
        let machine = linear(&log);

        assert_eq!(machine.status(), MachineStatus::Idle);
        assert!(machine.active_states().is_empty());
        assert_eq!(machine.name(), "Root");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn process_before_start_is_rejected() {
        let mut machine = linear(&Log::default());

        let err = machine.process(Signal::E1).unwrap_err();
        assert!(matches!(err, DispatchError::NotStarted { .. }));
    }

    #[test]
    fn start_enters_initial_configuration() {
        let log = Log::default();
        let mut machine = linear(&log);

        machine.start().unwrap();

        assert!(machine.is_running());
        assert_eq!(machine.active_states(), vec![&Flow::Root, &Flow::A]);
        assert_eq!(*log.lock().unwrap(), vec!["enter A"]);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut machine = linear(&Log::default());
        machine.start().unwrap();

        assert!(matches!(
            machine.start(),
            Err(DispatchError::AlreadyStarted { .. })
        ));
    }

    #[test]
    fn linear_scenario_runs_to_completion() {
        let log = Log::default();
        let mut machine = linear(&log);
        machine.start().unwrap();

        machine.process(Signal::E1).unwrap();
        assert!(machine.is_active(&Flow::B));
        assert!(!machine.is_finished());

        machine.process(Signal::E2).unwrap();
        assert!(machine.is_active(&Flow::C));
        assert!(machine.is_finished());

        machine.process(Signal::E1).unwrap();
        assert!(machine.is_active(&Flow::C));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter A", "exit A", "enter B", "exit B", "enter C"]
        );
    }

    #[test]
    fn stopped_machine_ignores_events() {
        let mut machine = linear(&Log::default());
        machine.start().unwrap();
        machine.stop();

        machine.process(Signal::E1).unwrap();

        assert_eq!(machine.status(), MachineStatus::Stopped);
        assert!(machine.is_active(&Flow::A));
    }

    #[test]
    fn config_name_overrides_root_name() {
        let root = StateBuilder::<Flow, Signal, ()>::new(Flow::Root)
            .initial(StateBuilder::new(Flow::A));
        let machine = MachineBuilder::new(root)
            .config(MachineConfig {
                name: Some("calls".to_string()),
                ..MachineConfig::default()
            })
            .build()
            .unwrap();

        assert_eq!(machine.name(), "calls");
    }

    #[test]
    fn data_is_mutable_between_events() {
        let root = StateBuilder::<Flow, Signal, u32>::new(Flow::Root)
            .initial(StateBuilder::new(Flow::A));
        let mut machine = MachineBuilder::with_data(root, 1).build().unwrap();

        *machine.data_mut() += 41;

        assert_eq!(*machine.data(), 42);
    }
}
