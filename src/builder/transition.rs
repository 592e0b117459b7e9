//! Builder for declaring transitions.

use crate::core::{Guard, HookError, Resolver, State, TransitionContext, TriggeredHook};

/// How a declared transition picks its target.
pub(crate) enum TargetDecl<S: State, E, D> {
    Fixed(S),
    Computed {
        candidates: Vec<S>,
        resolver: Resolver<S, E, D>,
    },
}

/// Builder for a transition attached to a state.
///
/// A transition is keyed by event name. Without a target it is
/// targetless: only its triggered hooks run and the active state is left
/// alone.
///
/// # Example
///
/// ```
/// use statecraft::builder::TransitionBuilder;
/// use statecraft::state_enum;
///
/// state_enum! {
///     enum Screen {
///         Login,
///         LoginProgress,
///     }
/// }
///
/// let submit = TransitionBuilder::<Screen, (), ()>::on("SubmitLoginDetails")
///     .named("submit login details")
///     .target(Screen::LoginProgress)
///     .on_triggered(|ctx| println!("leaving {:?}", ctx.source));
/// ```
pub struct TransitionBuilder<S: State, E, D> {
    pub(crate) event: String,
    pub(crate) name: Option<String>,
    pub(crate) guard: Option<Guard<E, D>>,
    pub(crate) target: Option<TargetDecl<S, E, D>>,
    pub(crate) on_triggered: Vec<TriggeredHook<S, E, D>>,
}

impl<S: State + 'static, E: 'static, D: 'static> TransitionBuilder<S, E, D> {
    /// Start a transition triggered by events named `event`.
    pub fn on(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            name: None,
            guard: None,
            target: None,
            on_triggered: Vec::new(),
        }
    }

    /// Label used in diagrams and logs instead of the event name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a fixed target state.
    pub fn target(mut self, state: S) -> Self {
        self.target = Some(TargetDecl::Fixed(state));
        self
    }

    /// Compute the target when the transition fires.
    ///
    /// `candidates` lists every state the resolver may return; they are
    /// checked at build time and drawn in exported diagrams.
    pub fn target_fn<I, F>(self, candidates: I, resolve: F) -> Self
    where
        I: IntoIterator<Item = S>,
        F: Fn(&E, &D) -> S + Send + Sync + 'static,
    {
        self.resolver(candidates, Resolver::new(resolve))
    }

    /// Like [`target_fn`](Self::target_fn) with a resolver that may fail.
    pub fn try_target_fn<I, F>(self, candidates: I, resolve: F) -> Self
    where
        I: IntoIterator<Item = S>,
        F: Fn(&E, &D) -> Result<S, HookError> + Send + Sync + 'static,
    {
        self.resolver(candidates, Resolver::try_new(resolve))
    }

    fn resolver<I>(mut self, candidates: I, resolver: Resolver<S, E, D>) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.target = Some(TargetDecl::Computed {
            candidates: candidates.into_iter().collect(),
            resolver,
        });
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<E, D>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &D) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Add a guard that may fail (optional).
    pub fn try_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &D) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        self.guard = Some(Guard::try_new(predicate));
        self
    }

    /// Add a hook run after exits and before entries. Hooks run in the
    /// order they were added.
    pub fn on_triggered<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E, D>) + Send + Sync + 'static,
    {
        self.on_triggered.push(Box::new(hook));
        self
    }
}

impl<S: State, E, D> TransitionBuilder<S, E, D> {
    /// Every state this transition can lead to, in declaration order.
    pub(crate) fn declared_targets(&self) -> Vec<&S> {
        match &self.target {
            None => Vec::new(),
            Some(TargetDecl::Fixed(state)) => vec![state],
            Some(TargetDecl::Computed { candidates, .. }) => candidates.iter().collect(),
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.event)
    }
}
