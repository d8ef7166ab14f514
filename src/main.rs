use bevy::prelude::*;
use bevy::window::WindowResolution;
use std::env;

use starfield::config::{self, FieldConfig};
use starfield::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use starfield::graphics::FieldRenderPlugin;
use starfield::input::PointerInputPlugin;
use starfield::simulation::{FieldCommand, FieldSet, FieldSimulationPlugin};
use starfield::testing::{self, TEST_ENV};

/// Escape tears the field down, R remounts a fresh one, Q quits.
fn field_hotkey_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut requests: MessageWriter<FieldCommand>,
    mut exit: MessageWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        requests.write(FieldCommand::Teardown);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        requests.write(FieldCommand::Mount);
    }
    if keys.just_pressed(KeyCode::KeyQ) {
        exit.write(AppExit::Success);
    }
}

fn main() {
    // Check for test mode
    let test_mode = env::var(TEST_ENV).ok();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Starfield".into(),
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Compiled defaults; load_field_config overwrites them from
    // assets/field.toml (if present) before the field is mounted.
    .insert_resource(FieldConfig::default())
    .add_systems(Startup, config::load_field_config)
    .add_plugins((FieldSimulationPlugin, PointerInputPlugin, FieldRenderPlugin))
    .add_systems(Update, field_hotkey_system.before(FieldSet::Lifecycle));

    if let Some(test_name) = test_mode {
        testing::configure_test_mode(&mut app, &test_name);
    }

    app.run();
}
