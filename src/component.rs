//! The extension surface of a singleton component.

use std::fmt;

/// Error a component returns from [`SingletonComponent::validate_activation`].
pub type ValidationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A component type of which at most one instance may be active per registry.
///
/// The registry drives the host's lifecycle callbacks itself and calls into the
/// four hooks below at fixed points. Hooks default to no-ops. They take `&self`
/// because instances are shared as `Arc<Self>`; keep mutable state behind
/// interior mutability.
///
/// No registry lock is held while a hook runs, so hooks may look up other
/// singletons.
///
/// # Examples
///
/// ```rust
/// use singleton_component::{define_registry, SingletonComponent};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// #[derive(Default)]
/// struct AudioMixer {
///     ready: AtomicBool,
/// }
///
/// impl SingletonComponent for AudioMixer {
///     fn on_activated(&self) {
///         self.ready.store(true, Ordering::SeqCst);
///     }
/// }
///
/// define_registry!(scene);
///
/// let mixer = scene::construct(AudioMixer::default()).unwrap();
/// scene::activate(&mixer).unwrap();
///
/// let current = scene::singleton::<AudioMixer>().unwrap().unwrap();
/// assert!(current.ready.load(Ordering::SeqCst));
/// ```
pub trait SingletonComponent: Send + Sync + 'static {
    /// Names of the host callbacks this type subscribes to directly.
    ///
    /// Construction fails if any entry is one of
    /// [`RESERVED_CALLBACKS`](crate::RESERVED_CALLBACKS).
    const CALLBACKS: &'static [&'static str] = &[];

    /// Runs before the instance is registered. Returning an error aborts activation.
    fn validate_activation(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Runs right after the instance became the registered singleton.
    fn on_activated(&self) {}

    /// Runs when the registered instance is deactivated, before it becomes unusable.
    fn on_deactivating(&self) {}

    /// Runs once on the first update after activation, when every other object
    /// has finished activating.
    fn on_started(&self) {}
}

/// Where a live instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceState {
    /// Instantiated by the host, not activated yet.
    Constructed,
    /// Activation completed. `started` is set once the start hook has fired.
    Active { started: bool },
    /// Deactivated. No further transitions.
    Deactivated,
}

impl InstanceState {
    /// Returns `true` for the [`InstanceState::Active`] state.
    pub fn is_active(&self) -> bool {
        matches!(self, InstanceState::Active { .. })
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceState::Constructed => write!(f, "constructed"),
            InstanceState::Active { started: false } => write!(f, "active"),
            InstanceState::Active { started: true } => write!(f, "active (started)"),
            InstanceState::Deactivated => write!(f, "deactivated"),
        }
    }
}
