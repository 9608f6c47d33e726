//! Macros for creating isolated singleton registries.
//!
//! Each registry is a scoped context: its own slots, its own live instances, its
//! own host mode and trace callback. Tests and separate scenes get full isolation
//! by defining one registry each.

/// Creates a complete singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`, and an `API` constant
/// - Free functions mirroring every `RegistryApi` operation
///
/// # Examples
///
/// ```rust
/// use singleton_component::{define_registry, SingletonComponent};
///
/// struct Hud;
/// impl SingletonComponent for Hud {}
///
/// define_registry!(scene);
///
/// let hud = scene::construct(Hud).unwrap();
/// scene::activate(&hud).unwrap();
/// scene::start(&hud);
///
/// assert!(scene::contains::<Hud>());
/// ```
///
/// # Multiple Registries
///
/// ```rust
/// use singleton_component::{define_registry, SingletonComponent};
///
/// struct Hud;
/// impl SingletonComponent for Hud {}
///
/// define_registry!(level_one);
/// define_registry!(level_two);
///
/// let first = level_one::construct(Hud).unwrap();
/// let second = level_two::construct(Hud).unwrap();
///
/// // One singleton per type per registry
/// level_one::activate(&first).unwrap();
/// level_two::activate(&second).unwrap();
/// ```
///
/// # Trait-Based Usage
///
/// ```rust
/// use singleton_component::{define_registry, HostMode, RegistryApi};
///
/// define_registry!(editor);
///
/// editor::API.set_mode(HostMode::Editing);
/// assert_eq!(editor::API.mode(), HostMode::Editing);
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock, Mutex};

            // Slots, live instances and host mode (module-private)
            static STORAGE: $crate::RegistryStorage =
                LazyLock::new(|| Mutex::new($crate::RegistryState::default()));

            // Trace callback storage (module-private)
            static TRACE: $crate::TraceStorage = LazyLock::new(|| Mutex::new(None));

            /// Zero-sized type that implements the registry API.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn storage() -> &'static $crate::RegistryStorage {
                    &STORAGE
                }

                fn trace() -> &'static $crate::TraceStorage {
                    &TRACE
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// Instantiate a component in this registry.
            pub fn construct<T: $crate::SingletonComponent>(
                value: T,
            ) -> Result<Arc<T>, $crate::SingletonError> {
                use $crate::RegistryApi;
                API.construct(value)
            }

            /// Activate an instance, making it the singleton of its type.
            pub fn activate<T: $crate::SingletonComponent>(
                instance: &Arc<T>,
            ) -> Result<(), $crate::SingletonError> {
                use $crate::RegistryApi;
                API.activate(instance)
            }

            /// Deactivate an instance. No-op unless it is the active singleton.
            pub fn deactivate<T: $crate::SingletonComponent>(instance: &Arc<T>) {
                use $crate::RegistryApi;
                API.deactivate(instance)
            }

            /// Run the first-update hook. No-op unless it is the active singleton.
            pub fn start<T: $crate::SingletonComponent>(instance: &Arc<T>) {
                use $crate::RegistryApi;
                API.start(instance)
            }

            /// Destroy an instance, clearing the slot if it was registered.
            pub fn destroy<T: $crate::SingletonComponent>(instance: &Arc<T>) {
                use $crate::RegistryApi;
                API.destroy(instance)
            }

            /// Dispatch a host callback by name.
            pub fn dispatch<T: $crate::SingletonComponent>(
                instance: &Arc<T>,
                callback: $crate::HostCallback,
            ) -> Result<(), $crate::SingletonError> {
                use $crate::RegistryApi;
                API.dispatch(instance, callback)
            }

            /// Retrieve the singleton of `T`, if any.
            pub fn singleton<T: $crate::SingletonComponent>(
            ) -> Result<Option<Arc<T>>, $crate::SingletonError> {
                use $crate::RegistryApi;
                API.singleton::<T>()
            }

            /// Check if an instance of `T` holds the slot.
            pub fn contains<T: $crate::SingletonComponent>() -> bool {
                use $crate::RegistryApi;
                API.contains::<T>()
            }

            /// Lifecycle state of a live instance.
            pub fn instance_state<T: $crate::SingletonComponent>(
                instance: &Arc<T>,
            ) -> Option<$crate::InstanceState> {
                use $crate::RegistryApi;
                API.instance_state(instance)
            }

            /// Number of live instances of `T`.
            pub fn live_count<T: $crate::SingletonComponent>() -> usize {
                use $crate::RegistryApi;
                API.live_count::<T>()
            }

            /// Switch the host mode.
            pub fn set_mode(mode: $crate::HostMode) {
                use $crate::RegistryApi;
                API.set_mode(mode)
            }

            /// The current host mode.
            pub fn mode() -> $crate::HostMode {
                use $crate::RegistryApi;
                API.mode()
            }

            /// Tear the registry down.
            pub fn clear() {
                use $crate::RegistryApi;
                API.clear()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                use $crate::RegistryApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::RegistryApi;
                API.clear_trace_callback()
            }
        }
    };
}
