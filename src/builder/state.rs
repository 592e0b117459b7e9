//! Builder for declaring states and their children.

use crate::builder::transition::TransitionBuilder;
use crate::core::{ChildMode, HookContext, State, StateHook};

/// Builder for one node of the state tree.
///
/// A state with no children is a leaf: simple, or final when its value
/// reports [`State::is_final`]. Adding children makes it composite, in
/// [`ChildMode::Exclusive`] mode unless [`parallel`](Self::parallel) is
/// called.
///
/// # Example
///
/// ```
/// use statecraft::builder::{StateBuilder, TransitionBuilder};
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Phone {
///         Root,
///         Idle,
///         Calling,
///         Off,
///     }
///     final: [Off]
/// }
///
/// let root = StateBuilder::<Phone, (), ()>::new(Phone::Root)
///     .initial(
///         StateBuilder::new(Phone::Idle)
///             .transition(TransitionBuilder::on("Dial").target(Phone::Calling)),
///     )
///     .child(StateBuilder::new(Phone::Calling))
///     .child(StateBuilder::new(Phone::Off));
/// ```
pub struct StateBuilder<S: State, E, D> {
    pub(crate) state: S,
    pub(crate) mode: Option<ChildMode>,
    pub(crate) initial: Vec<S>,
    pub(crate) children: Vec<StateBuilder<S, E, D>>,
    pub(crate) transitions: Vec<TransitionBuilder<S, E, D>>,
    pub(crate) on_entry: Vec<StateHook<S, E, D>>,
    pub(crate) on_exit: Vec<StateHook<S, E, D>>,
}

impl<S: State + 'static, E: 'static, D: 'static> StateBuilder<S, E, D> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            mode: None,
            initial: Vec::new(),
            children: Vec::new(),
            transitions: Vec::new(),
            on_entry: Vec::new(),
            on_exit: Vec::new(),
        }
    }

    /// Set how children are activated.
    pub fn mode(mut self, mode: ChildMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Activate every child at once.
    pub fn parallel(self) -> Self {
        self.mode(ChildMode::Parallel)
    }

    /// Add a child and designate it as the initial one.
    ///
    /// Exclusive composites need exactly one initial child. Parallel
    /// composites enter every child, so the designation has no effect there.
    pub fn initial(mut self, child: StateBuilder<S, E, D>) -> Self {
        self.initial.push(child.state.clone());
        self.children.push(child);
        self
    }

    /// Add a child state.
    pub fn child(mut self, child: StateBuilder<S, E, D>) -> Self {
        self.children.push(child);
        self
    }

    /// Attach an outgoing transition.
    ///
    /// When several transitions of one state match the same event, the
    /// first one added whose guard passes wins.
    pub fn transition(mut self, transition: TransitionBuilder<S, E, D>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add an entry hook. Hooks run in the order they were added.
    pub fn on_entry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HookContext<'_, S, E, D>) + Send + Sync + 'static,
    {
        self.on_entry.push(Box::new(hook));
        self
    }

    /// Add an exit hook. Hooks run in the order they were added.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HookContext<'_, S, E, D>) + Send + Sync + 'static,
    {
        self.on_exit.push(Box::new(hook));
        self
    }
}
