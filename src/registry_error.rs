use thiserror::Error;

use crate::component::ValidationError;
use crate::host::RESERVED_CALLBACKS;

/// Misuse of the singleton contract.
///
/// Every variant is fatal for the operation that produced it: the registry never
/// retries or corrects anything on its own.
#[derive(Debug, Error)]
pub enum SingletonError {
    /// A component type declares one of the callbacks the registry owns.
    #[error(
        "{type_name} is using reserved callback `{callback}`; singleton components must not declare any of: {}",
        RESERVED_CALLBACKS.join(", ")
    )]
    ReservedCallback {
        type_name: &'static str,
        callback: &'static str,
    },

    /// Activation was requested twice for the same instance, or while another
    /// instance of the type is registered.
    #[error("activation called twice for singleton of type {type_name}")]
    DoubleActivation { type_name: &'static str },

    /// An editing-mode lookup found more than one live instance.
    #[error(
        "found {count} singleton objects of type {type_name}; make sure there is only 1 singleton object created per type"
    )]
    MultipleInstances { type_name: &'static str, count: usize },

    /// The component's validation hook refused activation.
    #[error("activation of {type_name} rejected: {source}")]
    ActivationRejected {
        type_name: &'static str,
        #[source]
        source: ValidationError,
    },

    /// The instance was not constructed through this registry, or was destroyed.
    #[error("instance of {type_name} is not live in this registry")]
    UnknownInstance { type_name: &'static str },
}

impl SingletonError {
    /// Name of the component type the error is about.
    pub fn type_name(&self) -> &'static str {
        match self {
            SingletonError::ReservedCallback { type_name, .. }
            | SingletonError::DoubleActivation { type_name }
            | SingletonError::MultipleInstances { type_name, .. }
            | SingletonError::ActivationRejected { type_name, .. }
            | SingletonError::UnknownInstance { type_name } => type_name,
        }
    }
}
