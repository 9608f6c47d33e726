//! Integration tests for lookups while the host is in editing mode.
//!
//! In editing mode nothing has been activated, so an empty slot is resolved by
//! scanning the live instances of the requested type.

use singleton_component::{
    define_registry, HostMode, InstanceState, SingletonComponent, SingletonError,
};
use std::sync::Arc;

#[derive(Debug)]
struct LevelSettings {
    gravity: f32,
}

impl SingletonComponent for LevelSettings {}

fn settings(gravity: f32) -> LevelSettings {
    LevelSettings { gravity }
}

#[test]
fn test_no_live_instance_is_absent() {
    define_registry!(editor);
    editor::set_mode(HostMode::Editing);

    assert!(editor::singleton::<LevelSettings>().unwrap().is_none());
}

#[test]
fn test_single_live_instance_is_discovered_and_cached() {
    define_registry!(editor);
    editor::set_mode(HostMode::Editing);

    let only = editor::construct(settings(9.81)).unwrap();

    let found = editor::singleton::<LevelSettings>().unwrap().unwrap();
    assert!(Arc::ptr_eq(&found, &only));
    assert_eq!(found.gravity, 9.81);
    assert!(editor::contains::<LevelSettings>());

    // Cached: a later duplicate does not change the answer
    let _late = editor::construct(settings(1.62)).unwrap();
    let again = editor::singleton::<LevelSettings>().unwrap().unwrap();
    assert!(Arc::ptr_eq(&again, &only));
}

#[test]
fn test_multiple_live_instances_fail() {
    define_registry!(editor);
    editor::set_mode(HostMode::Editing);

    let _a = editor::construct(settings(9.81)).unwrap();
    let _b = editor::construct(settings(3.71)).unwrap();

    let err = editor::singleton::<LevelSettings>().unwrap_err();
    assert!(matches!(err, SingletonError::MultipleInstances { count: 2, .. }));
    assert!(err.to_string().contains("LevelSettings"));

    // Nothing was cached
    assert!(!editor::contains::<LevelSettings>());
}

#[test]
fn test_running_mode_never_discovers() {
    define_registry!(play);

    let _only = play::construct(settings(9.81)).unwrap();
    let _other = play::construct(settings(3.71)).unwrap();

    assert_eq!(play::mode(), HostMode::Running);
    assert!(play::singleton::<LevelSettings>().unwrap().is_none());
}

#[test]
fn test_registered_instance_wins_over_scan() {
    define_registry!(editor);

    let active = editor::construct(settings(9.81)).unwrap();
    editor::activate(&active).unwrap();
    let _duplicate = editor::construct(settings(3.71)).unwrap();

    editor::set_mode(HostMode::Editing);

    let found = editor::singleton::<LevelSettings>().unwrap().unwrap();
    assert!(Arc::ptr_eq(&found, &active));
}

#[test]
fn test_discovered_instance_can_still_activate() {
    define_registry!(editor);
    editor::set_mode(HostMode::Editing);

    let only = editor::construct(settings(9.81)).unwrap();
    assert!(editor::singleton::<LevelSettings>().unwrap().is_some());

    // Entering play mode: the cached instance is the one being activated
    editor::set_mode(HostMode::Running);
    editor::activate(&only).unwrap();

    assert_eq!(
        editor::instance_state(&only),
        Some(InstanceState::Active { started: false })
    );
}

#[test]
fn test_discovered_instance_blocks_other_activation() {
    define_registry!(editor);
    editor::set_mode(HostMode::Editing);

    let cached = editor::construct(settings(9.81)).unwrap();
    assert!(editor::singleton::<LevelSettings>().unwrap().is_some());

    let other = editor::construct(settings(3.71)).unwrap();
    let err = editor::activate(&other).unwrap_err();
    assert!(matches!(err, SingletonError::DoubleActivation { .. }));

    drop(cached);
}

#[test]
fn test_destroying_duplicate_allows_discovery() {
    define_registry!(editor);
    editor::set_mode(HostMode::Editing);

    let keep = editor::construct(settings(9.81)).unwrap();
    let stray = editor::construct(settings(3.71)).unwrap();
    assert!(editor::singleton::<LevelSettings>().is_err());

    editor::destroy(&stray);

    let found = editor::singleton::<LevelSettings>().unwrap().unwrap();
    assert!(Arc::ptr_eq(&found, &keep));
}
