//! The process-wide default registry.
//!
//! Most hosts run a single scene and only need this one. The free functions at the
//! crate root delegate to it.
//!
//! # Examples
//!
//! ```
//! use singleton_component::{activate, construct, singleton, SingletonComponent};
//!
//! struct PlayerInput;
//! impl SingletonComponent for PlayerInput {}
//!
//! let input = construct(PlayerInput).unwrap();
//! activate(&input).unwrap();
//!
//! assert!(singleton::<PlayerInput>().unwrap().is_some());
//! ```

crate::define_registry!(global);

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
