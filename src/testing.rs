//! Verification scenarios run with `STARFIELD_TEST=<name>`.
//!
//! Each scenario pins the RNG seed, optionally scripts an event (a resize or a
//! teardown), and runs for a fixed number of frames while
//! [`test_verification_system`] checks the field invariants every frame.  At
//! the frame limit a report is printed and the app exits, with a non-zero
//! code if anything was violated.
//!
//! | Scenario     | Frames | Script                                    | Extra pass condition          |
//! |--------------|--------|-------------------------------------------|-------------------------------|
//! | `invariants` | 300    | none                                      | —                             |
//! | `resize`     | 300    | window → 1200×800 at frame 150            | extent updated                |
//! | `flare`      | 600    | flare interval 0.1 s, decay 0.05          | at least one flare observed   |
//! | `teardown`   | 120    | `FieldCommand::Teardown` at frame 60      | no members, clock stopped     |

use crate::attractor::Attractor;
use crate::comet::Comet;
use crate::config::{self, FieldConfig};
use crate::simulation::{
    field_command_system, mount_field_system, FieldClock, FieldCommand, FieldLifecycle,
    FieldMember,
};
use crate::star::Star;
use crate::surface::SurfaceExtent;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::io::Write;

/// Environment variable selecting a verification scenario.
pub const TEST_ENV: &str = "STARFIELD_TEST";

/// Seed used by every scenario so failures reproduce.
pub const TEST_SEED: u64 = 0x5eed;

/// Extent the `resize` scenario switches to.
pub const RESIZED_EXTENT: SurfaceExtent = SurfaceExtent {
    width: 1200.0,
    height: 800.0,
};

/// Test configuration
#[derive(Resource, Debug)]
pub struct TestConfig {
    pub enabled: bool,
    pub test_name: String,
    pub frame_limit: u32,
    pub frame_count: u32,
    /// Frame at which the scenario's scripted event fires, if any.
    pub script_frame: Option<u32>,
    pub violations: Vec<String>,
    pub flares_seen: u32,
    pub last_flare_intensity: Option<f32>,
    /// Clock frame recorded when the field was first seen torn down.
    pub clock_frame_at_teardown: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            test_name: String::new(),
            frame_limit: 300,
            frame_count: 0,
            script_frame: None,
            violations: Vec::new(),
            flares_seen: 0,
            last_flare_intensity: None,
            clock_frame_at_teardown: None,
        }
    }
}

impl TestConfig {
    /// Scenario defaults for `name`; unknown names fall back to `invariants`.
    pub fn for_scenario(name: &str) -> Self {
        let (test_name, frame_limit, script_frame) = match name {
            "resize" => ("resize", 300, Some(150)),
            "flare" => ("flare", 600, None),
            "teardown" => ("teardown", 120, Some(60)),
            _ => ("invariants", 300, None),
        };
        Self {
            enabled: true,
            test_name: test_name.to_string(),
            frame_limit,
            script_frame,
            ..Default::default()
        }
    }
}

pub fn configure_test_mode(app: &mut App, test_name: &str) {
    app.insert_resource(TestConfig::for_scenario(test_name))
        .add_systems(
            Startup,
            apply_test_scenario
                .after(config::load_field_config)
                .before(mount_field_system),
        )
        .add_systems(Update, scenario_script_system.before(field_command_system))
        .add_systems(PostUpdate, test_verification_system);

    println!("Running test: {}", test_name);
}

/// Startup system: pin the seed and apply per-scenario config tweaks.
pub fn apply_test_scenario(test_config: Res<TestConfig>, mut config: ResMut<FieldConfig>) {
    config.seed = Some(TEST_SEED);
    if test_config.test_name == "flare" {
        config.flare_interval_secs = 0.1;
        config.flare_decay_per_frame = 0.05;
    }
    println!("✓ Scenario '{}' configured", test_config.test_name);
}

/// Fire the scenario's scripted event on its frame.
pub fn scenario_script_system(
    test_config: Res<TestConfig>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut extent: ResMut<SurfaceExtent>,
    mut requests: MessageWriter<FieldCommand>,
) {
    if !test_config.enabled || test_config.script_frame != Some(test_config.frame_count) {
        return;
    }
    match test_config.test_name.as_str() {
        "resize" => {
            if let Ok(mut window) = windows.single_mut() {
                window
                    .resolution
                    .set(RESIZED_EXTENT.width, RESIZED_EXTENT.height);
            } else {
                *extent = RESIZED_EXTENT;
            }
            println!("→ Resizing surface to {}×{}", RESIZED_EXTENT.width, RESIZED_EXTENT.height);
        }
        "teardown" => {
            requests.write(FieldCommand::Teardown);
            println!("→ Tearing down field");
        }
        _ => {}
    }
}

// ── Invariant checks ──────────────────────────────────────────────────────────

/// Check every per-frame invariant of the field; returns one message per
/// violation.
pub fn verify_field<'a>(
    stars: impl IntoIterator<Item = &'a Star>,
    comets: impl IntoIterator<Item = &'a Comet>,
    attractors: impl IntoIterator<Item = &'a Attractor>,
    extent: SurfaceExtent,
    config: &FieldConfig,
) -> Vec<String> {
    let mut violations = Vec::new();

    for (i, star) in stars.into_iter().enumerate() {
        if !(0.0..=1.0).contains(&star.opacity) {
            violations.push(format!("star {i}: opacity {} outside [0, 1]", star.opacity));
        }
    }

    for (i, comet) in comets.into_iter().enumerate() {
        if !extent.contains(comet.position) {
            violations.push(format!(
                "comet {i}: head {:?} outside {}×{}",
                comet.position, extent.width, extent.height
            ));
        }
    }

    let radius_range = config.spark_recycle_radius..=config.spark_outer_radius_max;
    for attractor in attractors {
        if !(0.0..=1.0).contains(&attractor.flare.intensity) {
            violations.push(format!(
                "attractor: flare intensity {} outside [0, 1]",
                attractor.flare.intensity
            ));
        }
        for (i, spark) in attractor.sparks.iter().enumerate() {
            if !radius_range.contains(&spark.radius) {
                violations.push(format!("spark {i}: radius {} out of range", spark.radius));
            }
        }
    }

    violations
}

/// Intensity may only rise by being reset to exactly 1 at a trigger.
pub fn flare_step_violation(previous: Option<f32>, current: f32) -> Option<String> {
    match previous {
        Some(prev) if current > prev && current != 1.0 => Some(format!(
            "flare intensity rose from {prev} to {current} without a trigger"
        )),
        _ => None,
    }
}

/// Scenario-specific pass conditions evaluated once at the frame limit.
pub fn verify_test_result(
    test_config: &TestConfig,
    extent: SurfaceExtent,
    lifecycle: &FieldLifecycle,
    clock: &FieldClock,
    member_count: usize,
) -> Result<String, String> {
    if let Some(first) = test_config.violations.first() {
        return Err(format!(
            "✗ FAIL: {} invariant violations (first: {first})",
            test_config.violations.len()
        ));
    }
    match test_config.test_name.as_str() {
        "resize" if extent != RESIZED_EXTENT => Err(format!(
            "✗ FAIL: extent is {}×{}, expected {}×{}",
            extent.width, extent.height, RESIZED_EXTENT.width, RESIZED_EXTENT.height
        )),
        "flare" if test_config.flares_seen == 0 => {
            Err("✗ FAIL: no flare observed".to_string())
        }
        "teardown" if lifecycle.live || member_count > 0 => Err(format!(
            "✗ FAIL: field still live={} with {member_count} members",
            lifecycle.live
        )),
        "teardown" if test_config.clock_frame_at_teardown != Some(clock.frame) => Err(format!(
            "✗ FAIL: frame driver kept running after teardown ({:?} → {})",
            test_config.clock_frame_at_teardown, clock.frame
        )),
        _ => Ok("✓ PASS".to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn test_verification_system(
    mut test_config: ResMut<TestConfig>,
    config: Res<FieldConfig>,
    extent: Res<SurfaceExtent>,
    clock: Res<FieldClock>,
    lifecycle: Res<FieldLifecycle>,
    stars: Query<&Star>,
    comets: Query<&Comet>,
    attractors: Query<&Attractor>,
    members: Query<(), With<FieldMember>>,
    mut exit: MessageWriter<AppExit>,
) {
    if !test_config.enabled {
        return;
    }
    test_config.frame_count += 1;

    let frame = test_config.frame_count;
    let found = verify_field(&stars, &comets, &attractors, *extent, &config);
    test_config
        .violations
        .extend(found.into_iter().map(|v| format!("frame {frame}: {v}")));

    for attractor in attractors.iter() {
        let current = attractor.flare.intensity;
        if let Some(v) = flare_step_violation(test_config.last_flare_intensity, current) {
            test_config.violations.push(format!("frame {frame}: {v}"));
        }
        test_config.flares_seen = test_config.flares_seen.max(attractor.flare_count);
        test_config.last_flare_intensity = Some(current);
    }

    if !lifecycle.live && test_config.clock_frame_at_teardown.is_none() {
        test_config.clock_frame_at_teardown = Some(clock.frame);
    }

    if test_config.frame_count != test_config.frame_limit {
        return;
    }

    let member_count = members.iter().count();
    println!("\n╔════════════════════════════════════════════╗");
    println!("║           TEST COMPLETE                    ║");
    println!("╚════════════════════════════════════════════╝");
    println!("Test: {}", test_config.test_name);
    println!("Frames: {}", test_config.frame_count);
    println!("Field members: {}", member_count);
    println!("Flares: {}", test_config.flares_seen);
    println!("Extent: {}×{}", extent.width, extent.height);

    let result = verify_test_result(&test_config, *extent, &lifecycle, &clock, member_count);
    let passed = result.is_ok();
    match result {
        Ok(msg) | Err(msg) => println!("{}\n", msg),
    }
    let _ = std::io::stdout().flush();

    exit.write(if passed {
        AppExit::Success
    } else {
        AppExit::error()
    });
}
