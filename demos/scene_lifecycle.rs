//! Scene lifecycle example for singleton-component.
//!
//! Demonstrates:
//! - A host loop firing awake / start / disable for a handful of objects
//! - Singletons looking each other up once every object has activated
//! - Editing-mode discovery before the scene is played
//!
//! Run with: `RUST_LOG=debug cargo run --example scene_lifecycle`

use singleton_component::{define_registry, HostCallback, HostMode, SingletonComponent};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing_subscriber::EnvFilter;

define_registry!(scene);

/// Keeps the score; other systems report to it.
#[derive(Default)]
struct ScoreKeeper {
    score: AtomicU32,
}

impl SingletonComponent for ScoreKeeper {
    fn on_activated(&self) {
        println!("   ScoreKeeper is now the singleton");
    }

    fn on_deactivating(&self) {
        println!(
            "   ScoreKeeper shutting down with {} points",
            self.score.load(Ordering::SeqCst)
        );
    }
}

/// Awards points, relying on the ScoreKeeper having activated first.
struct BonusSpawner {
    bonus: u32,
}

impl SingletonComponent for BonusSpawner {
    const CALLBACKS: &'static [&'static str] = &["update"];

    fn on_started(&self) {
        if let Ok(Some(keeper)) = scene::singleton::<ScoreKeeper>() {
            keeper.score.fetch_add(self.bonus, Ordering::SeqCst);
            println!("   BonusSpawner awarded {} points", self.bonus);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== singleton-component: Scene Lifecycle ===\n");

    // -------------------------------------------------------------------------
    // 1. Authoring: objects exist, nothing has run
    // -------------------------------------------------------------------------
    println!("1. Editing the scene...");
    scene::set_mode(HostMode::Editing);

    let keeper = scene::construct(ScoreKeeper::default()).expect("ScoreKeeper is valid");
    let spawner = scene::construct(BonusSpawner { bonus: 50 }).expect("BonusSpawner is valid");

    let discovered = scene::singleton::<ScoreKeeper>().expect("only one ScoreKeeper");
    println!("   Discovered ScoreKeeper: {}", discovered.is_some());

    // -------------------------------------------------------------------------
    // 2. Play: awake for every object, then the first update
    // -------------------------------------------------------------------------
    println!("\n2. Playing the scene...");
    scene::set_mode(HostMode::Running);

    scene::dispatch(&keeper, HostCallback::Awake).expect("first ScoreKeeper activation");
    scene::dispatch(&spawner, HostCallback::Awake).expect("first BonusSpawner activation");

    scene::dispatch(&spawner, HostCallback::Start).expect("start never fails");
    scene::dispatch(&keeper, HostCallback::Start).expect("start never fails");

    // -------------------------------------------------------------------------
    // 3. A duplicate is dropped into the running scene
    // -------------------------------------------------------------------------
    println!("\n3. Spawning a duplicate ScoreKeeper...");
    let duplicate = scene::construct(ScoreKeeper::default()).expect("ScoreKeeper is valid");
    match scene::activate(&duplicate) {
        Ok(()) => println!("   Unexpected: duplicate activated"),
        Err(err) => println!("   Refused: {err}"),
    }
    scene::destroy(&duplicate);

    // -------------------------------------------------------------------------
    // 4. Unloading the scene
    // -------------------------------------------------------------------------
    println!("\n4. Unloading...");
    scene::destroy(&spawner);
    scene::destroy(&keeper);

    println!(
        "   ScoreKeeper still registered: {}",
        scene::contains::<ScoreKeeper>()
    );

    println!("\n=== Done ===");
}
