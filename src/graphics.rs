//! Camera setup and the draw pass of the frame driver.

use crate::attractor::Attractor;
use crate::comet::Comet;
use crate::config::FieldConfig;
use crate::particle::Drawable;
use crate::simulation::{field_is_live, FieldSet};
use crate::star::Star;
use crate::surface::{GizmoSurface, Surface, SurfaceExtent};
use bevy::prelude::*;

/// Camera, gizmo line config and the draw system.
pub struct FieldRenderPlugin;

impl Plugin for FieldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, configure_gizmos))
            .add_systems(
                Update,
                draw_field_system
                    .in_set(FieldSet::Draw)
                    .run_if(field_is_live),
            );
    }
}

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d maps one world unit to one logical pixel, centred on the window.
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}

/// Thin 1 px gizmo lines; wider strokes are built from parallel lines.
fn configure_gizmos(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = 1.0;
}

/// Clear the surface, then draw stars, comets and attractors in that order so
/// the attractor's glow lands on top.
pub fn draw_field<'a, S: Surface + ?Sized>(
    surface: &mut S,
    stars: impl IntoIterator<Item = &'a Star>,
    comets: impl IntoIterator<Item = &'a Comet>,
    attractors: impl IntoIterator<Item = &'a Attractor>,
) {
    surface.clear();
    for star in stars {
        star.draw(surface);
    }
    for comet in comets {
        comet.draw(surface);
    }
    for attractor in attractors {
        attractor.draw(surface);
    }
}

pub fn draw_field_system(
    mut gizmos: Gizmos,
    extent: Res<SurfaceExtent>,
    config: Res<FieldConfig>,
    stars: Query<&Star>,
    comets: Query<&Comet>,
    attractors: Query<&Attractor>,
) {
    let mut surface = GizmoSurface::new(
        &mut gizmos,
        *extent,
        config.curve_segments,
        config.glow_rings,
    );
    draw_field(&mut surface, &stars, &comets, &attractors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Population;
    use crate::surface::{DrawCommand, DrawList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draw_order_is_stars_comets_attractor() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(12);
        let pop = Population::seed(SurfaceExtent::new(800.0, 600.0), &cfg, 0.0, &mut rng).unwrap();

        let mut list = DrawList::new();
        list.fill_circle(Vec2::ZERO, 1.0, Color::WHITE); // stale frame content
        draw_field(&mut list, &pop.stars, &pop.comets, pop.attractor.as_ref());

        assert_eq!(list.clears, 1);
        let cmds = &list.commands;
        assert!(cmds[..100]
            .iter()
            .all(|c| matches!(c, DrawCommand::Circle { .. })));
        assert!(cmds[100..105]
            .iter()
            .all(|c| matches!(c, DrawCommand::Line { .. })));
        assert!(matches!(cmds[105], DrawCommand::Glow { .. }));
    }
}
