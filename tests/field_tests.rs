//! Headless tests for the field lifecycle and frame driver.
//!
//! These tests use [`MinimalPlugins`] with the simulation and input plugins
//! only (no window, no rendering) so they run fast and deterministically.
//! Window and pointer events are written straight into their message queues.
//!
//! Covered scenarios:
//! 1. Mount seeds the configured population inside the surface.
//! 2. No drawable surface: nothing is spawned and the driver stays idle.
//! 3. A resize updates the extent and comets stay inside the new one.
//! 4. Teardown despawns everything and stops the clock; remount restores it.
//! 5. Pointer movement retargets the attractor, which eases towards it.

use bevy::prelude::*;
use bevy::window::{CursorMoved, WindowResized};
use starfield::attractor::Attractor;
use starfield::comet::Comet;
use starfield::config::FieldConfig;
use starfield::input::PointerInputPlugin;
use starfield::simulation::{
    FieldClock, FieldCommand, FieldLifecycle, FieldMember, FieldSimulationPlugin,
};
use starfield::star::Star;
use starfield::surface::SurfaceExtent;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn seeded_config() -> FieldConfig {
    FieldConfig {
        seed: Some(42),
        ..Default::default()
    }
}

/// Headless app mounted on an 800×600 surface after its first update.
fn mounted_app() -> App {
    let mut app = app_with_extent(SurfaceExtent::new(800.0, 600.0));
    app.update();
    app
}

fn app_with_extent(extent: SurfaceExtent) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, FieldSimulationPlugin, PointerInputPlugin));
    app.insert_resource(seeded_config());
    app.insert_resource(extent);
    app
}

fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<C>>()
        .iter(app.world())
        .count()
}

fn comets(app: &mut App) -> Vec<Comet> {
    app.world_mut()
        .query::<&Comet>()
        .iter(app.world())
        .cloned()
        .collect()
}

fn attractor(app: &mut App) -> Attractor {
    app.world_mut()
        .query::<&Attractor>()
        .single(app.world())
        .expect("exactly one attractor")
        .clone()
}

fn request(app: &mut App, command: FieldCommand) {
    app.world_mut()
        .resource_mut::<Messages<FieldCommand>>()
        .write(command);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn mount_seeds_configured_population() {
    let mut app = mounted_app();

    assert!(app.world().resource::<FieldLifecycle>().live);
    assert_eq!(count::<Star>(&mut app), 100);
    assert_eq!(count::<Comet>(&mut app), 5);
    assert_eq!(count::<Attractor>(&mut app), 1);
    assert_eq!(count::<FieldMember>(&mut app), 106);
    assert_eq!(attractor(&mut app).sparks.len(), 100);

    let extent = SurfaceExtent::new(800.0, 600.0);
    let stars: Vec<Vec2> = app
        .world_mut()
        .query::<&Star>()
        .iter(app.world())
        .map(|s| s.position)
        .collect();
    for p in stars {
        assert!(extent.contains(p), "star at {p:?} outside surface");
    }
    for comet in comets(&mut app) {
        assert!(extent.contains(comet.position));
    }
}

#[test]
fn no_surface_means_no_field() {
    let mut app = app_with_extent(SurfaceExtent::default());
    for _ in 0..5 {
        app.update();
    }

    let lifecycle = *app.world().resource::<FieldLifecycle>();
    assert!(!lifecycle.live, "field must not start without a surface");
    assert_eq!(lifecycle.mounts, 0);
    assert_eq!(count::<FieldMember>(&mut app), 0);
    assert_eq!(app.world().resource::<FieldClock>().frame, 0);
}

#[test]
fn frames_advance_clock_while_live() {
    let mut app = mounted_app();
    for _ in 0..9 {
        app.update();
    }
    assert_eq!(app.world().resource::<FieldClock>().frame, 10);
}

#[test]
fn resize_updates_extent_and_comets_follow() {
    let mut app = mounted_app();
    let resets_before: Vec<u32> = comets(&mut app).iter().map(|c| c.resets).collect();

    app.world_mut()
        .resource_mut::<Messages<WindowResized>>()
        .write(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 1200.0,
            height: 800.0,
        });
    app.update();

    let resized = SurfaceExtent::new(1200.0, 800.0);
    assert_eq!(*app.world().resource::<SurfaceExtent>(), resized);

    // Slowest comet: 1 px/frame at 70° covers 800 px in under 900 frames.
    for _ in 0..1000 {
        app.update();
        for comet in comets(&mut app) {
            assert!(
                resized.contains(comet.position),
                "comet at {:?} outside resized surface",
                comet.position
            );
        }
    }

    let after = comets(&mut app);
    for (comet, before) in after.iter().zip(resets_before) {
        assert!(comet.resets > before, "every comet should have reset");
    }
}

#[test]
fn teardown_stops_driver_and_remount_restores() {
    let mut app = mounted_app();
    for _ in 0..4 {
        app.update();
    }

    request(&mut app, FieldCommand::Teardown);
    app.update();
    // Despawns are applied at the end of the lifecycle set.
    app.update();

    let lifecycle = *app.world().resource::<FieldLifecycle>();
    assert!(!lifecycle.live);
    assert_eq!(lifecycle.teardowns, 1);
    assert_eq!(count::<FieldMember>(&mut app), 0);

    let stopped_at = app.world().resource::<FieldClock>().frame;
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<FieldClock>().frame,
        stopped_at,
        "clock must not advance after teardown"
    );

    request(&mut app, FieldCommand::Mount);
    app.update();
    app.update();

    let lifecycle = *app.world().resource::<FieldLifecycle>();
    assert!(lifecycle.live);
    assert_eq!(lifecycle.mounts, 2);
    assert_eq!(count::<FieldMember>(&mut app), 106);
    assert!(app.world().resource::<FieldClock>().frame > stopped_at);
}

#[test]
fn pointer_retargets_attractor() {
    let mut app = mounted_app();
    let start = attractor(&mut app).position;

    app.world_mut()
        .resource_mut::<Messages<CursorMoved>>()
        .write(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(100.0, 100.0),
            delta: None,
        });
    app.update();

    let a = attractor(&mut app);
    assert_eq!(a.target, Vec2::new(100.0, 100.0));
    let moved = a.position;
    assert!(moved.distance(a.target) < start.distance(a.target));
    assert!(moved != a.target, "easing approaches gradually");
}
