//! The host runtime's side of the contract: its running mode and the callback
//! names it dispatches.

use std::fmt;

/// The mode the host runtime is currently in.
///
/// The mode selects how [`RegistryApi::singleton`](crate::RegistryApi::singleton)
/// resolves a lookup:
///
/// - [`HostMode::Running`]: lookups only read the slot filled by activation.
/// - [`HostMode::Editing`]: lifecycle callbacks may not have run yet, so an empty
///   slot is filled lazily by scanning the live instances of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HostMode {
    /// Normal play mode. Activation is the only way a slot gets filled.
    #[default]
    Running,
    /// Authoring mode. The host is not ticking, lookups discover instances.
    Editing,
}

impl fmt::Display for HostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostMode::Running => write!(f, "running"),
            HostMode::Editing => write!(f, "editing"),
        }
    }
}

/// Lifecycle callbacks the host dispatches to every component, by name.
///
/// The registry owns all four names. A component must not subscribe to any of
/// them itself, see [`SingletonComponent::CALLBACKS`](crate::SingletonComponent::CALLBACKS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCallback {
    /// The owning object was instantiated and activated.
    Awake,
    /// The owning object was enabled. Reserved, no registry behavior.
    Enable,
    /// The owning object was disabled or is being destroyed.
    Disable,
    /// First update after activation.
    Start,
}

/// Callback names a singleton component may not declare.
pub const RESERVED_CALLBACKS: [&str; 4] = [
    HostCallback::Awake.name(),
    HostCallback::Enable.name(),
    HostCallback::Disable.name(),
    HostCallback::Start.name(),
];

impl HostCallback {
    /// All callbacks, in the order the host fires them for one object.
    pub const ALL: [HostCallback; 4] = [
        HostCallback::Awake,
        HostCallback::Enable,
        HostCallback::Start,
        HostCallback::Disable,
    ];

    /// The name the host dispatches this callback under.
    pub const fn name(self) -> &'static str {
        match self {
            HostCallback::Awake => "awake",
            HostCallback::Enable => "enable",
            HostCallback::Disable => "disable",
            HostCallback::Start => "start",
        }
    }

    /// Resolves a dispatched name back to its callback.
    pub fn from_name(name: &str) -> Option<HostCallback> {
        Self::ALL.into_iter().find(|callback| callback.name() == name)
    }

    /// Returns `true` if `name` is one of the reserved callback names.
    pub fn is_reserved(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl fmt::Display for HostCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
