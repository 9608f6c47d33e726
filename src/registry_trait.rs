//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! the whole singleton lifecycle: construction, activation, deactivation, start,
//! destruction and lookup.
//!
//! The registry is type-based: each component type (`TypeId`) has one slot holding
//! at most one registered instance, plus the list of its live instances.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, trace, warn};

use crate::{
    HostCallback, HostMode, InstanceState, RegistryEvent, SingletonComponent, SingletonError,
    RESERVED_CALLBACKS,
};

/// Type alias for the trace callback storage.
pub type TraceStorage = LazyLock<Mutex<Option<Arc<dyn Fn(&RegistryEvent) + Send + Sync>>>>;

/// Type alias for the slot storage of one registry.
pub type RegistryStorage = LazyLock<Mutex<RegistryState>>;

/// Everything a registry knows: the host mode and one slot per component type.
///
/// Only reachable through [`RegistryApi`]; implementors just need a static of
/// type [`RegistryStorage`] built from `RegistryState::default()`.
#[derive(Default)]
pub struct RegistryState {
    mode: HostMode,
    slots: HashMap<TypeId, Slot>,
}

impl RegistryState {
    fn slot_mut(&mut self, key: TypeId) -> &mut Slot {
        self.slots.entry(key).or_default()
    }
}

#[derive(Default)]
struct Slot {
    current: Option<Arc<dyn Any + Send + Sync>>,
    live: Vec<LiveInstance>,
}

struct LiveInstance {
    instance: Arc<dyn Any + Send + Sync>,
    state: InstanceState,
}

impl Slot {
    fn is_current(&self, addr: *const ()) -> bool {
        self.current.as_ref().is_some_and(|c| address(c) == addr)
    }

    fn is_held_by_other(&self, addr: *const ()) -> bool {
        self.current.as_ref().is_some_and(|c| address(c) != addr)
    }

    fn position(&self, addr: *const ()) -> Option<usize> {
        self.live.iter().position(|l| address(&l.instance) == addr)
    }

    fn entry_mut(&mut self, addr: *const ()) -> Option<&mut LiveInstance> {
        self.live.iter_mut().find(|l| address(&l.instance) == addr)
    }
}

/// Identity of an instance, independent of how its `Arc` is typed.
fn address<T: ?Sized>(arc: &Arc<T>) -> *const () {
    Arc::as_ptr(arc) as *const ()
}

fn lock(storage: &'static RegistryStorage) -> MutexGuard<'static, RegistryState> {
    storage.lock().unwrap_or_else(PoisonError::into_inner)
}

fn reject(err: SingletonError) -> SingletonError {
    error!(type_name = err.type_name(), "{err}");
    err
}

/// Core trait defining registry behavior.
///
/// Provides default implementations for all lifecycle operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
///
/// The sequencing methods (`activate`, `deactivate`, `start`) live here rather than
/// on [`SingletonComponent`], so a component can only customize the four hooks and
/// never the order they run in.
///
/// No lock is held while a component hook runs. The trace callback is invoked while
/// holding the trace lock, so it must not touch the trace callback of the same
/// registry.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback static.
    fn trace() -> &'static TraceStorage;

    /// Set a tracing callback for registry operations.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned, this method automatically recovers by extracting
    /// the inner value.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = Self::trace().lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Does not affect registered instances, only the tracing callback.
    fn clear_trace_callback(&self) {
        let mut guard = Self::trace().lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// Invokes the current trace callback, if any, with `event`.
    fn emit_event(&self, event: &RegistryEvent) {
        let guard = Self::trace().lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(callback) = guard.as_ref() {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Host mode
    // -------------------------------------------------------------------------------------------------

    /// Access the storage static.
    fn storage() -> &'static RegistryStorage;

    /// Switch the host mode, which decides how [`RegistryApi::singleton`] resolves.
    fn set_mode(&self, mode: HostMode) {
        let previous = std::mem::replace(&mut lock(Self::storage()).mode, mode);
        if previous != mode {
            debug!(%previous, %mode, "host mode changed");
        }
        self.emit_event(&RegistryEvent::Mode { mode });
    }

    /// The current host mode.
    fn mode(&self) -> HostMode {
        lock(Self::storage()).mode
    }

    // -------------------------------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------------------------------

    /// Instantiate a component: the host created a new object carrying `value`.
    ///
    /// The instance becomes live in [`InstanceState::Constructed`] and is visible to
    /// editing-mode discovery.
    ///
    /// # Errors
    ///
    /// - [`SingletonError::ReservedCallback`] if `T::CALLBACKS` names a reserved
    ///   host callback. Nothing is registered in that case.
    fn construct<T: SingletonComponent>(&self, value: T) -> Result<Arc<T>, SingletonError> {
        let type_name = std::any::type_name::<T>();

        if let Some(callback) = RESERVED_CALLBACKS
            .into_iter()
            .find(|reserved| T::CALLBACKS.contains(reserved))
        {
            return Err(reject(SingletonError::ReservedCallback {
                type_name,
                callback,
            }));
        }

        let instance = Arc::new(value);
        let erased: Arc<dyn Any + Send + Sync> = instance.clone();

        lock(Self::storage())
            .slot_mut(TypeId::of::<T>())
            .live
            .push(LiveInstance {
                instance: erased,
                state: InstanceState::Constructed,
            });

        trace!(type_name, "singleton component constructed");
        self.emit_event(&RegistryEvent::Construct { type_name });

        Ok(instance)
    }

    /// Activation sequencing, run once when the host activates the owning object.
    ///
    /// Runs [`SingletonComponent::validate_activation`], registers the instance into
    /// the slot, then runs [`SingletonComponent::on_activated`].
    ///
    /// # Errors
    ///
    /// - [`SingletonError::DoubleActivation`] if the instance was already activated,
    ///   or another instance of `T` holds the slot
    /// - [`SingletonError::ActivationRejected`] if the validation hook fails
    /// - [`SingletonError::UnknownInstance`] if the instance is not live here
    fn activate<T: SingletonComponent>(&self, instance: &Arc<T>) -> Result<(), SingletonError> {
        let type_name = std::any::type_name::<T>();
        let key = TypeId::of::<T>();
        let addr = address(instance);

        {
            let mut state = lock(Self::storage());
            let slot = state.slot_mut(key);
            let held_by_other = slot.is_held_by_other(addr);
            match slot.entry_mut(addr) {
                None => return Err(reject(SingletonError::UnknownInstance { type_name })),
                Some(entry) if entry.state != InstanceState::Constructed || held_by_other => {
                    return Err(reject(SingletonError::DoubleActivation { type_name }));
                }
                Some(_) => {}
            }
        }

        instance
            .validate_activation()
            .map_err(|source| reject(SingletonError::ActivationRejected { type_name, source }))?;

        // The validation hook ran unlocked, so check the slot again.
        {
            let mut state = lock(Self::storage());
            let slot = state.slot_mut(key);
            if slot.is_held_by_other(addr) {
                return Err(reject(SingletonError::DoubleActivation { type_name }));
            }
            let registered = match slot.entry_mut(addr) {
                None => return Err(reject(SingletonError::UnknownInstance { type_name })),
                Some(entry) if entry.state != InstanceState::Constructed => {
                    return Err(reject(SingletonError::DoubleActivation { type_name }));
                }
                Some(entry) => {
                    entry.state = InstanceState::Active { started: false };
                    entry.instance.clone()
                }
            };
            slot.current = Some(registered);
        }

        debug!(type_name, "singleton activated");
        self.emit_event(&RegistryEvent::Activate { type_name });

        instance.on_activated();
        Ok(())
    }

    /// Deactivation sequencing, run when the host disables or destroys the owning object.
    ///
    /// A no-op unless `instance` is the registered, active singleton. Otherwise runs
    /// [`SingletonComponent::on_deactivating`] once. The slot keeps pointing at the
    /// instance until it is destroyed.
    fn deactivate<T: SingletonComponent>(&self, instance: &Arc<T>) {
        let type_name = std::any::type_name::<T>();
        let addr = address(instance);

        let deactivated = {
            let mut state = lock(Self::storage());
            match state.slots.get_mut(&TypeId::of::<T>()) {
                Some(slot) if slot.is_current(addr) => match slot.entry_mut(addr) {
                    Some(entry) if entry.state.is_active() => {
                        entry.state = InstanceState::Deactivated;
                        true
                    }
                    _ => false,
                },
                _ => false,
            }
        };

        if !deactivated {
            warn!(type_name, "ignoring deactivation of a non-registered instance");
            return;
        }

        debug!(type_name, "singleton deactivated");
        self.emit_event(&RegistryEvent::Deactivate { type_name });

        instance.on_deactivating();
    }

    /// Post-start sequencing, run by the host on the first update after activation.
    ///
    /// A no-op unless `instance` is the registered, active singleton that has not
    /// started yet. Otherwise runs [`SingletonComponent::on_started`].
    fn start<T: SingletonComponent>(&self, instance: &Arc<T>) {
        let type_name = std::any::type_name::<T>();
        let addr = address(instance);

        let started = {
            let mut state = lock(Self::storage());
            match state.slots.get_mut(&TypeId::of::<T>()) {
                Some(slot) if slot.is_current(addr) => match slot.entry_mut(addr) {
                    Some(entry) if entry.state == (InstanceState::Active { started: false }) => {
                        entry.state = InstanceState::Active { started: true };
                        true
                    }
                    _ => false,
                },
                _ => false,
            }
        };

        if !started {
            warn!(type_name, "ignoring start of a non-registered instance");
            return;
        }

        debug!(type_name, "singleton started");
        self.emit_event(&RegistryEvent::Start { type_name });

        instance.on_started();
    }

    /// The host destroys the owning object.
    ///
    /// Deactivates the instance first if it is the active singleton, then removes it
    /// from the live set. If it was the registered instance the slot is cleared, so a
    /// new instance of `T` may be activated afterwards.
    fn destroy<T: SingletonComponent>(&self, instance: &Arc<T>) {
        let type_name = std::any::type_name::<T>();
        let addr = address(instance);

        self.deactivate(instance);

        let removed = {
            let mut state = lock(Self::storage());
            state.slots.get_mut(&TypeId::of::<T>()).and_then(|slot| {
                let pos = slot.position(addr)?;
                let was_registered = slot.is_current(addr);
                if was_registered {
                    slot.current = None;
                }
                Some((slot.live.remove(pos), was_registered))
            })
        };

        let Some((entry, was_registered)) = removed else {
            warn!(type_name, "destroy called for an instance that is not live");
            return;
        };
        drop(entry);

        debug!(type_name, was_registered, "singleton component destroyed");
        self.emit_event(&RegistryEvent::Destroy {
            type_name,
            was_registered,
        });
    }

    /// Entry point for hosts that dispatch lifecycle callbacks by name.
    ///
    /// `Awake` activates, `Disable` deactivates, `Start` starts. `Enable` is reserved
    /// and does nothing.
    fn dispatch<T: SingletonComponent>(
        &self,
        instance: &Arc<T>,
        callback: HostCallback,
    ) -> Result<(), SingletonError> {
        match callback {
            HostCallback::Awake => self.activate(instance)?,
            HostCallback::Enable => {}
            HostCallback::Disable => self.deactivate(instance),
            HostCallback::Start => self.start(instance),
        }
        Ok(())
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Retrieve the registered instance of `T`.
    ///
    /// In [`HostMode::Running`] this only reads the slot. In [`HostMode::Editing`] an
    /// empty slot is resolved by scanning the live instances of `T`: none yields
    /// `Ok(None)`, exactly one is cached into the slot and returned.
    ///
    /// # Errors
    ///
    /// - [`SingletonError::MultipleInstances`] if an editing-mode scan finds more
    ///   than one live instance
    fn singleton<T: SingletonComponent>(&self) -> Result<Option<Arc<T>>, SingletonError> {
        let type_name = std::any::type_name::<T>();
        let key = TypeId::of::<T>();

        let (current, discovered) = {
            let mut state = lock(Self::storage());
            let mode = state.mode;
            match state.slots.get_mut(&key) {
                Some(slot) if slot.current.is_none() && mode == HostMode::Editing => {
                    let count = slot.live.len();
                    if count == 1 {
                        slot.current = Some(slot.live[0].instance.clone());
                    }
                    (slot.current.clone(), Some(count))
                }
                Some(slot) => (slot.current.clone(), None),
                None if mode == HostMode::Editing => (None, Some(0)),
                None => (None, None),
            }
        };

        if let Some(count) = discovered {
            trace!(type_name, count, "discovering singleton among live instances");
            self.emit_event(&RegistryEvent::Discover { type_name, count });
            if count > 1 {
                return Err(reject(SingletonError::MultipleInstances { type_name, count }));
            }
        }

        let found = current.and_then(|any| any.downcast::<T>().ok());

        self.emit_event(&RegistryEvent::Lookup {
            type_name,
            found: found.is_some(),
        });

        Ok(found)
    }

    /// Check whether an instance of `T` currently holds the slot.
    ///
    /// Never discovers, regardless of the host mode.
    fn contains<T: SingletonComponent>(&self) -> bool {
        lock(Self::storage())
            .slots
            .get(&TypeId::of::<T>())
            .is_some_and(|slot| slot.current.is_some())
    }

    /// Lifecycle state of `instance`, or `None` if it is not live in this registry.
    fn instance_state<T: SingletonComponent>(&self, instance: &Arc<T>) -> Option<InstanceState> {
        let addr = address(instance);
        lock(Self::storage())
            .slots
            .get_mut(&TypeId::of::<T>())
            .and_then(|slot| slot.entry_mut(addr).map(|entry| entry.state))
    }

    /// Number of live (constructed and not destroyed) instances of `T`.
    fn live_count<T: SingletonComponent>(&self) -> usize {
        lock(Self::storage())
            .slots
            .get(&TypeId::of::<T>())
            .map_or(0, |slot| slot.live.len())
    }

    /// Tear the registry down: drop every slot and live instance and reset the mode
    /// to [`HostMode::Running`].
    ///
    /// Already-retrieved `Arc<T>` references stay valid. The tracing callback is kept.
    /// No hooks run.
    fn clear(&self) {
        self.emit_event(&RegistryEvent::Clear);

        let previous = std::mem::take(&mut *lock(Self::storage()));
        drop(previous);
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{RegistryApi, RegistryState, RegistryStorage, TraceStorage};
    use crate::{HostCallback, HostMode, InstanceState, SingletonComponent, SingletonError};

    use serial_test::serial;
    use tracing_test::traced_test;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, LazyLock, Mutex};

    static STORAGE: RegistryStorage = LazyLock::new(|| Mutex::new(RegistryState::default()));

    static TRACE: TraceStorage = LazyLock::new(|| Mutex::new(None));

    struct Api;

    impl RegistryApi for Api {
        fn storage() -> &'static RegistryStorage {
            &STORAGE
        }

        fn trace() -> &'static TraceStorage {
            &TRACE
        }
    }

    const API: Api = Api;

    #[derive(Debug, Default)]
    struct Counter {
        validated: AtomicUsize,
        activated: AtomicUsize,
        deactivated: AtomicUsize,
        started: AtomicUsize,
    }

    impl SingletonComponent for Counter {
        fn validate_activation(&self) -> Result<(), crate::ValidationError> {
            self.validated.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_activated(&self) {
            self.activated.fetch_add(1, Ordering::SeqCst);
        }

        fn on_deactivating(&self) {
            self.deactivated.fetch_add(1, Ordering::SeqCst);
        }

        fn on_started(&self) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    struct Declares;

    impl SingletonComponent for Declares {
        const CALLBACKS: &'static [&'static str] = &["update", "disable"];
    }

    #[test]
    #[serial]
    fn test_construct_is_live_but_not_registered() {
        API.clear();

        let instance = API.construct(Counter::default()).unwrap();

        assert_eq!(API.live_count::<Counter>(), 1);
        assert_eq!(API.instance_state(&instance), Some(InstanceState::Constructed));
        assert!(!API.contains::<Counter>());
        assert!(API.singleton::<Counter>().unwrap().is_none());
    }

    #[test]
    #[serial]
    fn test_construct_rejects_reserved_callback() {
        API.clear();

        let err = API.construct(Declares).unwrap_err();
        assert!(matches!(
            err,
            SingletonError::ReservedCallback {
                callback: "disable",
                ..
            }
        ));
        assert_eq!(API.live_count::<Declares>(), 0);
    }

    #[test]
    #[serial]
    fn test_activate_registers_and_runs_hooks() {
        API.clear();

        let instance = API.construct(Counter::default()).unwrap();
        API.activate(&instance).unwrap();

        let current = API.singleton::<Counter>().unwrap().unwrap();
        assert!(Arc::ptr_eq(&current, &instance));
        assert_eq!(instance.validated.load(Ordering::SeqCst), 1);
        assert_eq!(instance.activated.load(Ordering::SeqCst), 1);
        assert_eq!(
            API.instance_state(&instance),
            Some(InstanceState::Active { started: false })
        );
    }

    #[test]
    #[serial]
    fn test_activate_same_instance_twice() {
        API.clear();

        let instance = API.construct(Counter::default()).unwrap();
        API.activate(&instance).unwrap();

        let err = API.activate(&instance).unwrap_err();
        assert!(matches!(err, SingletonError::DoubleActivation { .. }));
        assert_eq!(instance.activated.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_activate_unknown_instance() {
        API.clear();

        let stray = Arc::new(Counter::default());
        let err = API.activate(&stray).unwrap_err();
        assert!(matches!(err, SingletonError::UnknownInstance { .. }));
        assert_eq!(stray.validated.load(Ordering::SeqCst), 0);
    }

    #[test]
    #[serial]
    fn test_start_runs_once() {
        API.clear();

        let instance = API.construct(Counter::default()).unwrap();
        API.start(&instance);
        assert_eq!(instance.started.load(Ordering::SeqCst), 0);

        API.activate(&instance).unwrap();
        API.start(&instance);
        API.start(&instance);
        assert_eq!(instance.started.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial]
    fn test_destroy_clears_slot() {
        API.clear();

        let first = API.construct(Counter::default()).unwrap();
        API.activate(&first).unwrap();
        API.destroy(&first);

        assert_eq!(first.deactivated.load(Ordering::SeqCst), 1);
        assert!(!API.contains::<Counter>());
        assert_eq!(API.instance_state(&first), None);

        let second = API.construct(Counter::default()).unwrap();
        API.activate(&second).unwrap();
        assert!(Arc::ptr_eq(
            &API.singleton::<Counter>().unwrap().unwrap(),
            &second
        ));
    }

    #[test]
    #[serial]
    fn test_dispatch_by_callback() {
        API.clear();

        let instance = API.construct(Counter::default()).unwrap();
        for callback in HostCallback::ALL {
            API.dispatch(&instance, callback).unwrap();
        }

        assert_eq!(instance.activated.load(Ordering::SeqCst), 1);
        assert_eq!(instance.started.load(Ordering::SeqCst), 1);
        assert_eq!(instance.deactivated.load(Ordering::SeqCst), 1);
        assert_eq!(API.instance_state(&instance), Some(InstanceState::Deactivated));
    }

    #[test]
    #[serial]
    fn test_mode_switch_and_clear_resets() {
        API.clear();

        API.set_mode(HostMode::Editing);
        assert_eq!(API.mode(), HostMode::Editing);

        API.clear();
        assert_eq!(API.mode(), HostMode::Running);
    }

    #[test]
    #[serial]
    fn test_trace_callback_events() {
        API.clear();
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        API.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        let instance = API.construct(Counter::default()).unwrap();
        API.activate(&instance).unwrap();
        let _ = API.singleton::<Counter>();

        API.clear_trace_callback();

        let captured = events.lock().unwrap();
        let name = std::any::type_name::<Counter>();
        assert_eq!(
            *captured,
            vec![
                format!("construct {{ type_name: {name} }}"),
                format!("activate {{ type_name: {name} }}"),
                format!("lookup {{ type_name: {name}, found: true }}"),
            ]
        );
    }

    #[test]
    #[serial]
    #[traced_test]
    fn test_ignored_lifecycle_calls_warn() {
        API.clear();

        let first = API.construct(Counter::default()).unwrap();
        let second = API.construct(Counter::default()).unwrap();
        API.activate(&first).unwrap();

        API.deactivate(&second);
        API.start(&second);

        assert_eq!(second.deactivated.load(Ordering::SeqCst), 0);
        assert_eq!(second.started.load(Ordering::SeqCst), 0);

        logs_assert(|lines: &[&str]| {
            let warned = |needle: &str| {
                lines
                    .iter()
                    .any(|line| line.contains("WARN") && line.contains(needle))
            };
            if !warned("ignoring deactivation of a non-registered instance") {
                return Err("ignored deactivation was not logged at warn".to_string());
            }
            if !warned("ignoring start of a non-registered instance") {
                return Err("ignored start was not logged at warn".to_string());
            }
            Ok(())
        });
    }
}
