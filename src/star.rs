//! Twinkling background stars.

use crate::config::{rgba, FieldConfig};
use crate::particle::{sample, Drawable, StepContext, Steppable};
use crate::surface::{Surface, SurfaceExtent};
use bevy::prelude::*;
use rand::Rng;

/// A fixed-position star whose opacity oscillates with the field clock.
#[derive(Component, Debug, Clone)]
pub struct Star {
    /// Canvas-space position (px).
    pub position: Vec2,
    /// Dot radius (px).
    pub size: f32,
    /// Current opacity, always within `[0, 1]` after a step.
    pub opacity: f32,
    /// Oscillator rate in radians per elapsed millisecond.
    pub twinkle_rate: f32,
    pub color: [f32; 3],
}

impl Star {
    /// Seed a star at a random point of `extent`.
    pub fn new<R: Rng + ?Sized>(extent: SurfaceExtent, config: &FieldConfig, rng: &mut R) -> Self {
        Self {
            position: Vec2::new(
                sample(rng, 0.0, extent.width),
                sample(rng, 0.0, extent.height),
            ),
            size: sample(rng, config.star_size_min, config.star_size_max),
            opacity: rng.gen_range(0.0..1.0),
            twinkle_rate: sample(rng, 0.0, config.star_twinkle_rate_max),
            color: config.star_color,
        }
    }

    /// Nudge opacity by `sin(now_ms · rate) · step` and clamp to `[0, 1]`.
    ///
    /// The phase is the elapsed clock rather than a frame counter, so a
    /// dropped frame does not stall the twinkle.
    pub fn twinkle(&mut self, now_ms: f64, step: f32) {
        let wave = (now_ms * f64::from(self.twinkle_rate)).sin() as f32;
        self.opacity = (self.opacity + wave * step).clamp(0.0, 1.0);
    }
}

impl Steppable for Star {
    fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext<'_>, _rng: &mut R) {
        self.twinkle(ctx.now_ms, ctx.config.star_twinkle_step);
    }
}

impl Drawable for Star {
    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.position, self.size, rgba(self.color, self.opacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn opacity_stays_clamped_for_any_clock() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let extent = SurfaceExtent::new(800.0, 600.0);
        let mut stars: Vec<Star> = (0..50).map(|_| Star::new(extent, &cfg, &mut rng)).collect();
        // An oversized step drives opacity into both clamps quickly.
        for frame in 0..2_000 {
            let now = frame as f64 * 16.7;
            for star in &mut stars {
                star.twinkle(now, 0.5);
                assert!((0.0..=1.0).contains(&star.opacity), "opacity {}", star.opacity);
            }
        }
    }

    #[test]
    fn zero_rate_star_never_changes() {
        let mut star = Star {
            position: Vec2::ZERO,
            size: 1.0,
            opacity: 0.4,
            twinkle_rate: 0.0,
            color: [1.0, 1.0, 1.0],
        };
        star.twinkle(123_456.0, 0.02);
        assert_eq!(star.opacity, 0.4);
    }

    #[test]
    fn new_star_lies_inside_extent() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let extent = SurfaceExtent::new(320.0, 200.0);
        for _ in 0..500 {
            let star = Star::new(extent, &cfg, &mut rng);
            assert!(extent.contains(star.position));
            assert!((cfg.star_size_min..cfg.star_size_max).contains(&star.size));
        }
    }

    #[test]
    fn draws_one_circle_with_its_opacity() {
        let star = Star {
            position: Vec2::new(10.0, 20.0),
            size: 2.0,
            opacity: 0.25,
            twinkle_rate: 0.01,
            color: [1.0, 0.4, 0.4],
        };
        let mut list = DrawList::new();
        star.draw(&mut list);
        match list.commands.as_slice() {
            [DrawCommand::Circle { center, radius, color }] => {
                assert_eq!(*center, Vec2::new(10.0, 20.0));
                assert_eq!(*radius, 2.0);
                assert!((color.to_srgba().alpha - 0.25).abs() < 1e-6);
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }
}
