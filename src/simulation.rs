//! Frame driver: field lifecycle, clock, and the per-frame update chain.
//!
//! ## Frame order
//!
//! | Set                  | Systems                                              |
//! |----------------------|------------------------------------------------------|
//! | `FieldSet::Lifecycle`| `field_command_system` (mount / teardown requests)   |
//! | `FieldSet::Input`    | `window_resize_system`, pointer + touch listeners    |
//! | `FieldSet::Update`   | clock → stars → comets → attractor (chained)         |
//! | `FieldSet::Draw`     | `draw_field_system` (see [`crate::graphics`])        |
//!
//! Everything from `Input` onwards runs under `.run_if(field_is_live)`.  A
//! teardown despawns the population and clears the flag, after which the frame
//! driver does nothing until the next mount.  Only the lifecycle set keeps
//! listening so a remount request can still be served.

use crate::attractor::Attractor;
use crate::comet::Comet;
use crate::config::{self, FieldConfig};
use crate::error::{FieldError, FieldResult};
use crate::particle::{StepContext, Steppable};
use crate::star::Star;
use crate::surface::SurfaceExtent;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Sets, resources, messages ─────────────────────────────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSet {
    Lifecycle,
    Input,
    Update,
    Draw,
}

/// Random source shared by every entity that samples positions or paths.
#[derive(Resource)]
pub struct FieldRng(pub StdRng);

impl FieldRng {
    /// Seeded when `seed` is set, otherwise from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl Default for FieldRng {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Elapsed time driving twinkles and flare intervals.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FieldClock {
    pub elapsed_ms: f64,
    /// Frames stepped since the app started.
    pub frame: u64,
}

/// Liveness flag guarding the frame driver.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FieldLifecycle {
    pub live: bool,
    pub mounts: u32,
    pub teardowns: u32,
}

/// Marker on every entity owned by the field.
#[derive(Component, Debug, Clone, Copy)]
pub struct FieldMember;

/// Requests that change the field's lifecycle.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCommand {
    /// Tear down any existing population and seed a fresh one.
    Mount,
    /// Despawn the population and stop the frame driver.
    Teardown,
}

/// Run condition: true while a population is mounted.
pub fn field_is_live(lifecycle: Res<FieldLifecycle>) -> bool {
    lifecycle.live
}

// ── Population ────────────────────────────────────────────────────────────────

/// A freshly seeded set of field entities, before they are spawned.
#[derive(Debug, Clone)]
pub struct Population {
    pub stars: Vec<Star>,
    pub comets: Vec<Comet>,
    pub attractor: Option<Attractor>,
}

impl Population {
    /// Seed every entity inside `extent`.
    pub fn seed<R: rand::Rng + ?Sized>(
        extent: SurfaceExtent,
        config: &FieldConfig,
        now_ms: f64,
        rng: &mut R,
    ) -> FieldResult<Self> {
        if !extent.is_drawable() {
            return Err(FieldError::InvalidExtent {
                width: extent.width,
                height: extent.height,
            });
        }
        let stars = (0..config.star_count)
            .map(|_| Star::new(extent, config, rng))
            .collect();
        let comets = (0..config.comet_count)
            .map(|_| Comet::new(extent, config, rng))
            .collect();
        let attractor = config
            .attractor_enabled
            .then(|| Attractor::new(extent.center(), now_ms, config, rng));
        Ok(Self {
            stars,
            comets,
            attractor,
        })
    }

    pub fn spark_count(&self) -> usize {
        self.attractor.as_ref().map_or(0, |a| a.sparks.len())
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Field lifecycle and update chain.  Rendering lives in
/// [`crate::graphics::FieldRenderPlugin`] so the simulation can run headless.
pub struct FieldSimulationPlugin;

impl Plugin for FieldSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FieldConfig>()
            .init_resource::<SurfaceExtent>()
            .init_resource::<FieldClock>()
            .init_resource::<FieldLifecycle>()
            .init_resource::<FieldRng>()
            .add_message::<FieldCommand>()
            // Registered by WindowPlugin when there is one; needed headless.
            .add_message::<WindowResized>()
            .configure_sets(
                Update,
                (
                    FieldSet::Lifecycle,
                    FieldSet::Input,
                    FieldSet::Update,
                    FieldSet::Draw,
                )
                    .chain(),
            )
            .add_systems(Startup, mount_field_system.after(config::load_field_config))
            .add_systems(Update, field_command_system.in_set(FieldSet::Lifecycle))
            .add_systems(
                Update,
                window_resize_system
                    .in_set(FieldSet::Input)
                    .run_if(field_is_live),
            )
            .add_systems(
                Update,
                (
                    advance_field_clock_system,
                    star_update_system,
                    comet_update_system,
                    attractor_update_system,
                )
                    .chain()
                    .in_set(FieldSet::Update)
                    .run_if(field_is_live),
            );
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Read the primary window's logical size, if there is a window.
fn window_extent(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<SurfaceExtent> {
    windows
        .single()
        .ok()
        .map(|w| SurfaceExtent::new(w.width(), w.height()))
}

/// Seed a population and spawn it.  Leaves the field not-live when there is
/// no drawable surface.
#[allow(clippy::too_many_arguments)]
fn mount(
    commands: &mut Commands,
    windows: &Query<&Window, With<PrimaryWindow>>,
    config: &FieldConfig,
    extent: &mut SurfaceExtent,
    clock: &FieldClock,
    rng: &mut FieldRng,
    lifecycle: &mut FieldLifecycle,
) {
    if let Some(from_window) = window_extent(windows) {
        *extent = from_window;
    }
    *rng = FieldRng::new(config.seed);

    let population = match Population::seed(*extent, config, clock.elapsed_ms, &mut rng.0) {
        Ok(population) => population,
        Err(e) => {
            warn!("Field not started: {e}");
            lifecycle.live = false;
            return;
        }
    };

    let (stars, comets, sparks) = (
        population.stars.len(),
        population.comets.len(),
        population.spark_count(),
    );
    commands.spawn_batch(population.stars.into_iter().map(|s| (s, FieldMember)));
    commands.spawn_batch(population.comets.into_iter().map(|c| (c, FieldMember)));
    if let Some(attractor) = population.attractor {
        commands.spawn((attractor, FieldMember));
    }

    lifecycle.live = true;
    lifecycle.mounts += 1;
    info!(
        "Field mounted on {}×{}: {} stars, {} comets, {} sparks",
        extent.width, extent.height, stars, comets, sparks
    );
}

fn teardown(
    commands: &mut Commands,
    members: &Query<Entity, With<FieldMember>>,
    lifecycle: &mut FieldLifecycle,
) {
    for entity in members.iter() {
        commands.entity(entity).despawn();
    }
    if lifecycle.live {
        lifecycle.teardowns += 1;
        info!("Field torn down");
    }
    lifecycle.live = false;
}

/// Startup system: mount the initial population.
pub fn mount_field_system(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<FieldConfig>,
    mut extent: ResMut<SurfaceExtent>,
    clock: Res<FieldClock>,
    mut rng: ResMut<FieldRng>,
    mut lifecycle: ResMut<FieldLifecycle>,
) {
    mount(
        &mut commands,
        &windows,
        &config,
        &mut extent,
        &clock,
        &mut rng,
        &mut lifecycle,
    );
}

/// Serve [`FieldCommand`] requests.  Runs whether or not the field is live.
#[allow(clippy::too_many_arguments)]
pub fn field_command_system(
    mut commands: Commands,
    mut requests: MessageReader<FieldCommand>,
    windows: Query<&Window, With<PrimaryWindow>>,
    members: Query<Entity, With<FieldMember>>,
    config: Res<FieldConfig>,
    mut extent: ResMut<SurfaceExtent>,
    clock: Res<FieldClock>,
    mut rng: ResMut<FieldRng>,
    mut lifecycle: ResMut<FieldLifecycle>,
) {
    for request in requests.read() {
        match request {
            FieldCommand::Teardown => teardown(&mut commands, &members, &mut lifecycle),
            FieldCommand::Mount => {
                teardown(&mut commands, &members, &mut lifecycle);
                mount(
                    &mut commands,
                    &windows,
                    &config,
                    &mut extent,
                    &clock,
                    &mut rng,
                    &mut lifecycle,
                );
            }
        }
    }
}

// ── Per-frame systems ─────────────────────────────────────────────────────────

/// Re-sync the stored extent when the window is resized.
pub fn window_resize_system(
    mut resized: MessageReader<WindowResized>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut extent: ResMut<SurfaceExtent>,
) {
    let primary = windows.single().ok();
    for event in resized.read() {
        if primary.is_some_and(|p| p != event.window) {
            continue;
        }
        let next = SurfaceExtent::new(event.width, event.height);
        if next != *extent {
            info!("Surface resized to {}×{}", next.width, next.height);
            *extent = next;
        }
    }
}

/// Advance the field clock by the real (wall-clock) frame delta.
pub fn advance_field_clock_system(time: Res<Time<Real>>, mut clock: ResMut<FieldClock>) {
    clock.elapsed_ms += time.delta_secs_f64() * 1000.0;
    clock.frame += 1;
}

pub fn star_update_system(
    clock: Res<FieldClock>,
    extent: Res<SurfaceExtent>,
    config: Res<FieldConfig>,
    mut rng: ResMut<FieldRng>,
    mut q: Query<&mut Star>,
) {
    let ctx = StepContext {
        now_ms: clock.elapsed_ms,
        extent: *extent,
        config: &config,
    };
    for mut star in q.iter_mut() {
        star.step(&ctx, &mut rng.0);
    }
}

pub fn comet_update_system(
    clock: Res<FieldClock>,
    extent: Res<SurfaceExtent>,
    config: Res<FieldConfig>,
    mut rng: ResMut<FieldRng>,
    mut q: Query<&mut Comet>,
) {
    let ctx = StepContext {
        now_ms: clock.elapsed_ms,
        extent: *extent,
        config: &config,
    };
    for mut comet in q.iter_mut() {
        comet.step(&ctx, &mut rng.0);
    }
}

pub fn attractor_update_system(
    clock: Res<FieldClock>,
    extent: Res<SurfaceExtent>,
    config: Res<FieldConfig>,
    mut rng: ResMut<FieldRng>,
    mut q: Query<&mut Attractor>,
) {
    let ctx = StepContext {
        now_ms: clock.elapsed_ms,
        extent: *extent,
        config: &config,
    };
    for mut attractor in q.iter_mut() {
        attractor.step(&ctx, &mut rng.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_population_matches_configured_counts() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let extent = SurfaceExtent::new(800.0, 600.0);
        let pop = Population::seed(extent, &cfg, 0.0, &mut rng).expect("drawable extent");
        assert_eq!(pop.stars.len(), 100);
        assert_eq!(pop.comets.len(), 5);
        assert_eq!(pop.spark_count(), 100);

        for star in &pop.stars {
            assert!(extent.contains(star.position));
        }
        for comet in &pop.comets {
            assert_eq!(comet.position.y, 0.0);
            assert!(extent.contains(comet.position));
        }
        let attractor = pop.attractor.as_ref().expect("attractor enabled by default");
        assert_eq!(attractor.position, Vec2::new(400.0, 300.0));
        for spark in &attractor.sparks {
            assert!(extent.contains(spark.position));
        }
    }

    #[test]
    fn disabled_attractor_is_absent() {
        let cfg = FieldConfig {
            attractor_enabled: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let pop = Population::seed(SurfaceExtent::new(800.0, 600.0), &cfg, 0.0, &mut rng)
            .expect("drawable extent");
        assert!(pop.attractor.is_none());
        assert_eq!(pop.spark_count(), 0);
    }

    #[test]
    fn zero_extent_refuses_to_seed() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = Population::seed(SurfaceExtent::default(), &FieldConfig::default(), 0.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidExtent { .. }));
    }

    #[test]
    fn same_seed_same_field() {
        let cfg = FieldConfig::default();
        let extent = SurfaceExtent::new(640.0, 480.0);
        let a = Population::seed(extent, &cfg, 0.0, &mut FieldRng::new(Some(5)).0).unwrap();
        let b = Population::seed(extent, &cfg, 0.0, &mut FieldRng::new(Some(5)).0).unwrap();
        let pa: Vec<Vec2> = a.stars.iter().map(|s| s.position).collect();
        let pb: Vec<Vec2> = b.stars.iter().map(|s| s.position).collect();
        assert_eq!(pa, pb);
    }
}
