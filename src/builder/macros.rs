//! Macros for declaring state and event enums.

/// Generate a State trait implementation for a fieldless enum.
///
/// `Clone`, `PartialEq` and `Debug` are derived.
///
/// # Example
///
/// ```
/// use statecraft::state_enum;
///
/// state_enum! {
///     pub enum AppState {
///         Login,
///         GroupCall,
///         Logout,
///         AppExit,
///     }
///     final: [Logout, AppExit]
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate an Event trait implementation for an enum.
///
/// Variants may be unit, tuple or struct-like; the variant name is the
/// event key. `Debug` is derived.
///
/// # Example
///
/// ```
/// use statecraft::core::Event;
/// use statecraft::event_enum;
///
/// event_enum! {
///     pub enum AppEvent {
///         SubmitLoginDetails { user: String },
///         LoginFailed(u16),
///         Logout,
///     }
/// }
///
/// let event = AppEvent::LoginFailed(401);
/// assert_eq!(event.name(), "LoginFailed");
/// assert_eq!(AppEvent::kinds(), &["SubmitLoginDetails", "LoginFailed", "Logout"]);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $(( $($tuple:ty),* $(,)? ))?
                $({ $($field:ident : $field_ty:ty),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $(( $($tuple),* ))?
                $({ $($field : $field_ty),* })?
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }

            fn kinds() -> &'static [&'static str] {
                &[$(stringify!($variant)),*]
            }
        }
    };
}
