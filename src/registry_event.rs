//! Events reported to a registry's trace callback.

use crate::host::HostMode;

/// Events emitted by a registry during lifecycle operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use singleton_component::RegistryEvent;
///
/// let event = RegistryEvent::Activate { type_name: "Hud" };
/// assert_eq!(event.to_string(), "activate { type_name: Hud }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// An instance was constructed and became live.
    Construct {
        /// The component type (e.g., "game::Hud")
        type_name: &'static str,
    },

    /// An instance became the registered singleton of its type.
    Activate { type_name: &'static str },

    /// The registered instance ran its deactivation hook.
    Deactivate { type_name: &'static str },

    /// The registered instance ran its start hook.
    Start { type_name: &'static str },

    /// An instance was removed from the live set.
    Destroy {
        type_name: &'static str,
        /// Whether the destroyed instance was the registered one
        was_registered: bool,
    },

    /// The singleton of a type was requested.
    Lookup {
        type_name: &'static str,
        /// Whether an instance was returned
        found: bool,
    },

    /// An editing-mode lookup scanned the live instances of a type.
    Discover {
        type_name: &'static str,
        /// Number of live instances found
        count: usize,
    },

    /// The host mode was switched.
    Mode { mode: HostMode },

    /// The registry was cleared.
    Clear,
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Construct { type_name } => {
                write!(f, "construct {{ type_name: {type_name} }}")
            }
            RegistryEvent::Activate { type_name } => {
                write!(f, "activate {{ type_name: {type_name} }}")
            }
            RegistryEvent::Deactivate { type_name } => {
                write!(f, "deactivate {{ type_name: {type_name} }}")
            }
            RegistryEvent::Start { type_name } => {
                write!(f, "start {{ type_name: {type_name} }}")
            }
            RegistryEvent::Destroy {
                type_name,
                was_registered,
            } => write!(
                f,
                "destroy {{ type_name: {type_name}, was_registered: {was_registered} }}"
            ),
            RegistryEvent::Lookup { type_name, found } => {
                write!(f, "lookup {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Discover { type_name, count } => {
                write!(f, "discover {{ type_name: {type_name}, count: {count} }}")
            }
            RegistryEvent::Mode { mode } => write!(f, "mode {{ mode: {mode} }}"),
            RegistryEvent::Clear => write!(f, "Clearing the Registry"),
        }
    }
}
