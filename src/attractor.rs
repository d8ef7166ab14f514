//! The black-hole attractor: pointer-driven easing, a rotating accretion ring,
//! an owned swarm of [`Spark`]s and periodic flares.
//!
//! ## Flare state
//!
//! | Phase      | Condition             | Per frame                                  |
//! |------------|-----------------------|--------------------------------------------|
//! | `Idle`     | `intensity == 0`      | ease toward target, rotate ring            |
//! | `Flaring`  | `intensity > 0`       | as Idle, plus intensity -= decay (floor 0) |
//!
//! A flare fires when at least `flare_interval_secs` have elapsed on the field
//! clock since the previous one (or since the attractor was created).  Firing
//! sets intensity to exactly 1 and rolls 3–5 new branches.

use crate::config::{rgba, FieldConfig};
use crate::particle::{sample, Drawable, StepContext, Steppable};
use crate::spark::Spark;
use crate::surface::{Stroke, Surface};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// One curved stroke of a flare.
#[derive(Debug, Clone, PartialEq)]
pub struct FlareBranch {
    /// Offset from the flare's base angle (radians).
    pub angle_offset: f32,
    /// Reach beyond the event horizon (px).
    pub length: f32,
    pub width: f32,
    /// Angular deflection of the curve's control point (radians).
    pub bend: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Flare {
    /// 1 at trigger, decays linearly to 0.
    pub intensity: f32,
    /// Base angle the branches radiate around (radians).
    pub angle: f32,
    pub branches: Vec<FlareBranch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlarePhase {
    Idle,
    Flaring,
}

#[derive(Component, Debug, Clone)]
pub struct Attractor {
    /// Current canvas-space centre (px).
    pub position: Vec2,
    /// Where the pointer last asked the attractor to go.
    pub target: Vec2,
    pub radius: f32,
    /// Accretion ring rotation (radians).
    pub rotation: f32,
    pub flare: Flare,
    /// Field clock reading of the last flare (or of creation).
    pub last_flare_ms: f64,
    /// Total flares fired since creation.
    pub flare_count: u32,
    pub sparks: Vec<Spark>,
    pub glow_color: [f32; 3],
}

impl Attractor {
    /// Create an idle attractor at `center` with a full spark swarm.
    pub fn new<R: Rng + ?Sized>(center: Vec2, now_ms: f64, config: &FieldConfig, rng: &mut R) -> Self {
        let sparks = (0..config.spark_count)
            .map(|_| Spark::new(center, config, rng))
            .collect();
        Self {
            position: center,
            target: center,
            radius: config.attractor_radius,
            rotation: 0.0,
            flare: Flare::default(),
            last_flare_ms: now_ms,
            flare_count: 0,
            sparks,
            glow_color: config.attractor_glow_color,
        }
    }

    /// Set the pointer target.  The attractor eases towards it over the
    /// following frames rather than jumping.
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
    }

    pub fn flare_phase(&self) -> FlarePhase {
        if self.flare.intensity > 0.0 {
            FlarePhase::Flaring
        } else {
            FlarePhase::Idle
        }
    }

    fn trigger_flare<R: Rng + ?Sized>(&mut self, now_ms: f64, config: &FieldConfig, rng: &mut R) {
        let count = if config.flare_branches_max > config.flare_branches_min {
            rng.gen_range(config.flare_branches_min..=config.flare_branches_max)
        } else {
            config.flare_branches_min
        };
        self.flare = Flare {
            intensity: 1.0,
            angle: sample(rng, 0.0, TAU),
            branches: (0..count)
                .map(|_| FlareBranch {
                    angle_offset: sample(rng, -0.6, 0.6),
                    length: self.radius
                        * sample(rng, config.flare_length_scale_min, config.flare_length_scale_max),
                    width: sample(rng, config.flare_width_min, config.flare_width_max),
                    bend: sample(rng, -0.5, 0.5),
                })
                .collect(),
        };
        self.last_flare_ms = now_ms;
        self.flare_count += 1;
    }

    fn decay_flare(&mut self, decay: f32) {
        if self.flare.intensity <= 0.0 {
            return;
        }
        self.flare.intensity = (self.flare.intensity - decay).max(0.0);
        if self.flare.intensity == 0.0 {
            self.flare.branches.clear();
        }
    }

    /// Advance one frame at field-clock time `now_ms`.
    pub fn advance<R: Rng + ?Sized>(&mut self, now_ms: f64, config: &FieldConfig, rng: &mut R) {
        self.position += (self.target - self.position) * config.attractor_easing;
        self.rotation = (self.rotation + config.attractor_rotation_step) % TAU;

        if now_ms - self.last_flare_ms >= config.flare_interval_ms() {
            self.trigger_flare(now_ms, config, rng);
        } else {
            self.decay_flare(config.flare_decay_per_frame);
        }

        let center = self.position;
        for spark in &mut self.sparks {
            spark.step(center, config, rng);
        }
    }
}

impl Steppable for Attractor {
    fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext<'_>, rng: &mut R) {
        self.advance(ctx.now_ms, ctx.config, rng);
    }
}

impl Drawable for Attractor {
    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let intensity = self.flare.intensity;
        surface.fill_glow(
            self.position,
            self.radius * (3.0 + intensity),
            rgba(self.glow_color, 0.35 + 0.4 * intensity),
            rgba(self.glow_color, 0.0),
        );

        for branch in &self.flare.branches {
            let angle = self.flare.angle + branch.angle_offset;
            let dir = Vec2::from_angle(angle);
            let from = self.position + dir * self.radius;
            let to = self.position + dir * (self.radius + branch.length);
            let control = self.position
                + Vec2::from_angle(angle + branch.bend) * (self.radius + branch.length * 0.5);
            let stroke = Stroke::gradient(
                rgba(self.glow_color, intensity),
                rgba(self.glow_color, 0.0),
                branch.width,
            );
            surface.stroke_curve(from, control, to, stroke);
        }

        for spark in &self.sparks {
            spark.draw(surface);
        }

        let ring = Stroke::gradient(
            rgba(self.glow_color, 0.8),
            rgba(self.glow_color, 0.1),
            2.0,
        );
        for k in 0..3 {
            let start = self.rotation + k as f32 * TAU / 3.0;
            surface.stroke_arc(self.position, self.radius * 1.4, start, TAU / 6.0, ring);
        }

        surface.fill_circle(self.position, self.radius, Color::BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn attractor(cfg: &FieldConfig, rng: &mut StdRng) -> Attractor {
        Attractor::new(Vec2::new(400.0, 300.0), 0.0, cfg, rng)
    }

    #[test]
    fn eases_towards_target_without_teleporting() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut bh = attractor(&cfg, &mut rng);
        bh.set_target(500.0, 300.0);
        bh.advance(FRAME_MS, &cfg, &mut rng);
        assert!((bh.position.x - 405.0).abs() < 1e-3, "x = {}", bh.position.x);
        let mut last_gap = (bh.target - bh.position).length();
        for i in 2..200 {
            bh.advance(i as f64 * FRAME_MS, &cfg, &mut rng);
            let gap = (bh.target - bh.position).length();
            assert!(gap < last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 0.01);
    }

    #[test]
    fn thirty_five_seconds_yield_exactly_one_flare() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut bh = attractor(&cfg, &mut rng);
        let mut now = 0.0;
        while now <= 35_000.0 {
            bh.advance(now, &cfg, &mut rng);
            now += FRAME_MS;
        }
        assert_eq!(bh.flare_count, 1);
    }

    #[test]
    fn one_huge_gap_fires_only_once() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut bh = attractor(&cfg, &mut rng);
        bh.advance(95_000.0, &cfg, &mut rng);
        assert_eq!(bh.flare_count, 1);
        bh.advance(95_016.0, &cfg, &mut rng);
        assert_eq!(bh.flare_count, 1);
    }

    #[test]
    fn intensity_decays_monotonically_back_to_idle() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut bh = attractor(&cfg, &mut rng);
        bh.advance(30_000.0, &cfg, &mut rng);
        assert_eq!(bh.flare.intensity, 1.0);
        assert_eq!(bh.flare_phase(), FlarePhase::Flaring);
        assert!((3..=5).contains(&bh.flare.branches.len()));

        let mut last = bh.flare.intensity;
        let mut now = 30_000.0;
        while bh.flare_phase() == FlarePhase::Flaring {
            now += FRAME_MS;
            bh.advance(now, &cfg, &mut rng);
            assert!(bh.flare.intensity <= last);
            last = bh.flare.intensity;
        }
        assert_eq!(bh.flare.intensity, 0.0);
        assert!(bh.flare.branches.is_empty());
        assert!(now - 30_000.0 < 2.0 * 1000.0, "flare should fade in ~100 frames");
    }

    #[test]
    fn sparks_orbit_the_current_not_target_centre() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut bh = attractor(&cfg, &mut rng);
        bh.set_target(0.0, 0.0);
        bh.advance(FRAME_MS, &cfg, &mut rng);
        for spark in &bh.sparks {
            assert_eq!(spark.center, bh.position);
        }
        assert_ne!(bh.position, bh.target);
    }

    #[test]
    fn draw_puts_flare_curves_and_core_on_surface() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut bh = attractor(&cfg, &mut rng);
        bh.advance(30_000.0, &cfg, &mut rng);
        let mut list = DrawList::new();
        bh.draw(&mut list);

        let curves = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Curve { .. }))
            .count();
        assert_eq!(curves, bh.flare.branches.len());
        assert!(matches!(list.commands.first(), Some(DrawCommand::Glow { .. })));
        match list.commands.last() {
            Some(DrawCommand::Circle { center, radius, .. }) => {
                assert_eq!(*center, bh.position);
                assert_eq!(*radius, bh.radius);
            }
            other => panic!("core must be drawn last, got {other:?}"),
        }
        assert_eq!(list.circles().count(), cfg.spark_count + 1);
    }
}
