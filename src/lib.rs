//! # Singleton Component
//!
//! A registry that keeps at most one active instance of each component type, for
//! components whose lifecycle is driven by a host runtime (a game engine's scene).
//!
//! The host instantiates components and fires lifecycle callbacks; the registry
//! sequences those callbacks, owns the one slot per type, and calls four hooks a
//! component can customize.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_component::{define_registry, SingletonComponent};
//! use std::sync::Arc;
//!
//! struct WeatherSystem;
//! impl SingletonComponent for WeatherSystem {}
//!
//! define_registry!(scene);
//!
//! // The host instantiates the object and activates it
//! let weather = scene::construct(WeatherSystem).unwrap();
//! scene::activate(&weather).unwrap();
//!
//! // Anyone can look it up
//! let current: Arc<WeatherSystem> = scene::singleton().unwrap().unwrap();
//! assert!(Arc::ptr_eq(&current, &weather));
//!
//! // A second instance cannot become active
//! let duplicate = scene::construct(WeatherSystem).unwrap();
//! assert!(scene::activate(&duplicate).is_err());
//! ```
//!
//! ## Lifecycle
//!
//! - [`RegistryApi::construct`] - the host instantiated an object
//! - [`RegistryApi::activate`] - validate hook, register, activated hook
//! - [`RegistryApi::start`] - started hook on the first update
//! - [`RegistryApi::deactivate`] - deactivating hook
//! - [`RegistryApi::destroy`] - remove the instance and free its slot
//! - [`RegistryApi::singleton`] - look up the registered instance
//!
//! In [`HostMode::Editing`] lookups discover an instance among the live ones when
//! nothing has been activated yet.

mod component;
mod host;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

pub use component::{InstanceState, SingletonComponent, ValidationError};
pub use host::{HostCallback, HostMode, RESERVED_CALLBACKS};
pub use registry::global;
pub use registry_error::SingletonError;
pub use registry_event::RegistryEvent;
pub use registry_trait::{RegistryApi, RegistryState, RegistryStorage, TraceStorage};

// Free functions over the process-wide registry
pub use registry::global::{
    activate, clear, clear_trace_callback, construct, contains, deactivate, destroy, dispatch,
    instance_state, live_count, mode, set_mode, set_trace_callback, singleton, start,
};
