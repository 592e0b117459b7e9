//! Typed events delivered to a machine.

use std::fmt::Debug;

/// Trait for events that drive transitions.
///
/// Events are usually enums whose variants may carry payload data. The
/// variant's name is the event-type key: transitions are registered against
/// it, and guards or resolvers `match` on the full value to inspect payloads.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Event;
///
/// #[derive(Debug)]
/// enum CallEvent {
///     Dial { peer: u32 },
///     HangUp,
/// }
///
/// impl Event for CallEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Dial { .. } => "Dial",
///             Self::HangUp => "HangUp",
///         }
///     }
///
///     fn kinds() -> &'static [&'static str] {
///         &["Dial", "HangUp"]
///     }
/// }
///
/// assert_eq!(CallEvent::Dial { peer: 7 }.name(), "Dial");
/// ```
pub trait Event: Debug + Send + Sync {
    /// Event-type key used for transition lookup and diagram labels.
    fn name(&self) -> &str;

    /// Every key this event type can produce.
    ///
    /// When non-empty, building a machine rejects transitions keyed on a
    /// name outside this list. The default (empty) disables that check.
    fn kinds() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}
