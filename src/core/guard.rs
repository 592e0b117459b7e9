//! Guard predicates and target resolvers for transitions.
//!
//! Guards decide whether a transition is eligible for an incoming event;
//! resolvers compute a transition's target from the event and the
//! machine's data. Both are evaluated before any hook runs, so a failure
//! in either leaves the machine untouched.

use super::state::State;
use std::error::Error;

/// Error type returned by fallible user callbacks.
pub type HookError = Box<dyn Error + Send + Sync + 'static>;

type Predicate<E, D> = Box<dyn Fn(&E, &D) -> Result<bool, HookError> + Send + Sync>;
type ResolveFn<S, E, D> = Box<dyn Fn(&E, &D) -> Result<S, HookError> + Send + Sync>;

/// Predicate that determines if a transition can fire for an event.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
///
/// let only_small = Guard::<u32, ()>::new(|value, _data| *value < 10);
///
/// assert!(only_small.check(&3, &()).unwrap());
/// assert!(!only_small.check(&30, &()).unwrap());
/// ```
pub struct Guard<E, D> {
    predicate: Predicate<E, D>,
}

impl<E, D> Guard<E, D> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&E, &D) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(move |event, data| Ok(predicate(event, data))),
        }
    }

    /// Create a guard from a predicate that may fail.
    ///
    /// A failure propagates to the caller of `Machine::process`.
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&E, &D) -> Result<bool, HookError> + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against an event and the machine's data.
    pub fn check(&self, event: &E, data: &D) -> Result<bool, HookError> {
        (self.predicate)(event, data)
    }
}

/// Function computing a transition's target state at trigger time.
pub struct Resolver<S: State, E, D> {
    resolve: ResolveFn<S, E, D>,
}

impl<S: State, E, D> Resolver<S, E, D> {
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn(&E, &D) -> S + Send + Sync + 'static,
    {
        Resolver {
            resolve: Box::new(move |event, data| Ok(resolve(event, data))),
        }
    }

    pub fn try_new<F>(resolve: F) -> Self
    where
        F: Fn(&E, &D) -> Result<S, HookError> + Send + Sync + 'static,
    {
        Resolver {
            resolve: Box::new(resolve),
        }
    }

    pub fn resolve(&self, event: &E, data: &D) -> Result<S, HookError> {
        (self.resolve)(event, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum Screen {
        GroupCall,
        RequestPermission,
    }

    impl State for Screen {
        fn name(&self) -> &str {
            match self {
                Self::GroupCall => "GroupCall",
                Self::RequestPermission => "RequestPermission",
            }
        }
    }

    struct Session {
        permission_granted: bool,
    }

    #[test]
    fn guard_reads_event_and_data() {
        let guard = Guard::new(|attempts: &u8, session: &Session| {
            session.permission_granted && *attempts < 3
        });
        let granted = Session {
            permission_granted: true,
        };
        let denied = Session {
            permission_granted: false,
        };

        assert!(guard.check(&1, &granted).unwrap());
        assert!(!guard.check(&5, &granted).unwrap());
        assert!(!guard.check(&1, &denied).unwrap());
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|value: &i32, _: &()| value % 2 == 0);

        assert_eq!(guard.check(&4, &()).unwrap(), guard.check(&4, &()).unwrap());
    }

    #[test]
    fn fallible_guard_surfaces_error() {
        let guard = Guard::try_new(|_: &(), _: &()| Err("sensor offline".into()));

        let err = guard.check(&(), &()).unwrap_err();
        assert_eq!(err.to_string(), "sensor offline");
    }

    #[test]
    fn resolver_picks_target_from_data() {
        let resolver = Resolver::new(|_: &(), session: &Session| {
            if session.permission_granted {
                Screen::GroupCall
            } else {
                Screen::RequestPermission
            }
        });

        let target = resolver
            .resolve(
                &(),
                &Session {
                    permission_granted: false,
                },
            )
            .unwrap();
        assert_eq!(target, Screen::RequestPermission);
    }

    #[test]
    fn fallible_resolver_surfaces_error() {
        let resolver: Resolver<Screen, (), ()> = Resolver::try_new(|_, _| Err("no route".into()));

        assert!(resolver.resolve(&(), &()).is_err());
    }
}
