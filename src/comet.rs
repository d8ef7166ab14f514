//! Pooled comets streaking down from the top edge.
//!
//! The comet population is fixed.  A comet that leaves the surface is reset to
//! a fresh random start on the top edge instead of being despawned, and its
//! angle, speed and trail length are re-rolled so paths do not repeat.

use crate::config::{rgba, FieldConfig};
use crate::particle::{sample, Drawable, StepContext, Steppable};
use crate::surface::{Stroke, Surface, SurfaceExtent};
use bevy::prelude::*;
use rand::Rng;

#[derive(Component, Debug, Clone)]
pub struct Comet {
    /// Canvas-space head position (px).
    pub position: Vec2,
    /// Trail length (px).
    pub length: f32,
    /// Distance travelled per frame (px).
    pub speed: f32,
    /// Travel direction in degrees clockwise from +x (canvas y points down).
    pub angle_deg: f32,
    pub opacity: f32,
    pub stroke_width: f32,
    pub color: [f32; 3],
    /// How many times this comet has been recycled.
    pub resets: u32,
}

impl Comet {
    pub fn new<R: Rng + ?Sized>(extent: SurfaceExtent, config: &FieldConfig, rng: &mut R) -> Self {
        let mut comet = Self {
            position: Vec2::ZERO,
            length: 0.0,
            speed: 0.0,
            angle_deg: 0.0,
            opacity: 1.0,
            stroke_width: config.comet_stroke_width,
            color: config.comet_color,
            resets: 0,
        };
        comet.reroll(extent, config, rng);
        comet
    }

    fn reroll<R: Rng + ?Sized>(&mut self, extent: SurfaceExtent, config: &FieldConfig, rng: &mut R) {
        self.position = Vec2::new(sample(rng, 0.0, extent.width), 0.0);
        self.length = sample(rng, config.comet_length_min, config.comet_length_max);
        self.speed = sample(rng, config.comet_speed_min, config.comet_speed_max);
        self.angle_deg = sample(rng, config.comet_angle_min_deg, config.comet_angle_max_deg);
        self.opacity = 1.0;
    }

    /// Restart on the top edge with a new path.
    pub fn reset<R: Rng + ?Sized>(&mut self, extent: SurfaceExtent, config: &FieldConfig, rng: &mut R) {
        self.reroll(extent, config, rng);
        self.resets += 1;
    }

    /// Unit vector along the direction of travel.
    pub fn direction(&self) -> Vec2 {
        let rad = self.angle_deg.to_radians();
        Vec2::new(rad.cos(), rad.sin())
    }

    /// Canvas-space end of the trail.
    pub fn tail(&self) -> Vec2 {
        self.position - self.direction() * self.length
    }

    /// Whether the head has left the surface through a side or the bottom.
    pub fn is_outside(&self, extent: SurfaceExtent) -> bool {
        self.position.x < 0.0 || self.position.x > extent.width || self.position.y > extent.height
    }
}

impl Steppable for Comet {
    fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext<'_>, rng: &mut R) {
        self.position += self.direction() * self.speed;
        if self.is_outside(ctx.extent) {
            self.reset(ctx.extent, ctx.config, rng);
        }
    }
}

impl Drawable for Comet {
    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let stroke = Stroke::gradient(
            rgba(self.color, self.opacity),
            rgba(self.color, 0.0),
            self.stroke_width,
        );
        surface.stroke_line(self.position, self.tail(), stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx(config: &FieldConfig, extent: SurfaceExtent) -> StepContext<'_> {
        StepContext {
            now_ms: 0.0,
            extent,
            config,
        }
    }

    #[test]
    fn new_comet_starts_on_top_edge() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let extent = SurfaceExtent::new(800.0, 600.0);
        for _ in 0..200 {
            let c = Comet::new(extent, &cfg, &mut rng);
            assert_eq!(c.position.y, 0.0);
            assert!((0.0..800.0).contains(&c.position.x));
            assert!((70.0..90.0).contains(&c.angle_deg));
            assert!((1.0..3.0).contains(&c.speed));
            assert!((20.0..100.0).contains(&c.length));
            assert_eq!(c.opacity, 1.0);
        }
    }

    #[test]
    fn comet_never_stays_off_surface() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let extent = SurfaceExtent::new(400.0, 300.0);
        let mut comet = Comet::new(extent, &cfg, &mut rng);
        let step_ctx = ctx(&cfg, extent);
        for _ in 0..5_000 {
            comet.step(&step_ctx, &mut rng);
            assert!(extent.contains(comet.position), "escaped at {:?}", comet.position);
        }
        assert!(comet.resets > 0, "5000 frames must cross a 300 px surface");
    }

    #[test]
    fn leaving_bottom_edge_resets_with_full_opacity() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let extent = SurfaceExtent::new(800.0, 600.0);
        let mut comet = Comet::new(extent, &cfg, &mut rng);
        comet.position = Vec2::new(100.0, 599.5);
        comet.opacity = 0.3;
        comet.step(&ctx(&cfg, extent), &mut rng);
        assert_eq!(comet.resets, 1);
        assert_eq!(comet.position.y, 0.0);
        assert_eq!(comet.opacity, 1.0);
    }

    #[test]
    fn shrinking_extent_resets_into_new_bounds() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut comet = Comet::new(SurfaceExtent::new(1200.0, 800.0), &cfg, &mut rng);
        comet.position = Vec2::new(1100.0, 10.0);
        let small = SurfaceExtent::new(400.0, 300.0);
        comet.step(&ctx(&cfg, small), &mut rng);
        assert!(small.contains(comet.position));
    }

    #[test]
    fn trail_fades_from_head_to_tail() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let comet = Comet::new(SurfaceExtent::new(800.0, 600.0), &cfg, &mut rng);
        let mut list = DrawList::new();
        comet.draw(&mut list);
        let [DrawCommand::Line { from, to, stroke }] = list.commands.as_slice() else {
            panic!("comet must draw exactly one line");
        };
        assert_eq!(*from, comet.position);
        assert!(((*from - *to).length() - comet.length).abs() < 1e-3);
        assert_eq!(stroke.head.to_srgba().alpha, 1.0);
        assert_eq!(stroke.tail.to_srgba().alpha, 0.0);
        assert_eq!(stroke.width, 2.0);
    }
}
