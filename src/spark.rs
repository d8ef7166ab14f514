//! Sparks spiralling into the attractor.
//!
//! A spark keeps polar state around its owner's *current* centre: each step it
//! turns by a fixed angle and loses a fixed amount of radius.  Once inside the
//! recycle radius it jumps back out to a random outer orbit.  Sparks are never
//! removed from the swarm.

use crate::config::{rgba, FieldConfig};
use crate::particle::{sample, Drawable};
use crate::surface::Surface;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Spark {
    /// Orbit origin, copied from the attractor every step.
    pub center: Vec2,
    /// Current orbital radius (px).
    pub radius: f32,
    /// Current orbital angle (radians).
    pub angle: f32,
    /// Peak opacity, re-rolled on every recycle.
    pub brightness: f32,
    /// Derived opacity: `brightness` scaled by how much radius remains.
    pub opacity: f32,
    /// Canvas-space position derived from the polar state.
    pub position: Vec2,
    pub size: f32,
    pub color: [f32; 3],
}

impl Spark {
    pub fn new<R: Rng + ?Sized>(center: Vec2, config: &FieldConfig, rng: &mut R) -> Self {
        let mut spark = Self {
            center,
            radius: 0.0,
            angle: 0.0,
            brightness: 0.0,
            opacity: 0.0,
            position: center,
            size: config.spark_size,
            color: config.attractor_glow_color,
        };
        spark.recycle(config, rng);
        spark
    }

    /// Jump back out to a random outer orbit with a fresh brightness.
    pub fn recycle<R: Rng + ?Sized>(&mut self, config: &FieldConfig, rng: &mut R) {
        self.radius = if config.spark_outer_radius_max > config.spark_outer_radius_min {
            rng.gen_range(config.spark_outer_radius_min..=config.spark_outer_radius_max)
        } else {
            config.spark_outer_radius_min
        };
        self.angle = sample(rng, 0.0, std::f32::consts::TAU);
        self.brightness = rng.gen_range(0.3..=1.0);
        self.refresh(config);
    }

    /// Advance one frame around `center`.  Returns `true` if the spark was
    /// recycled this step.
    pub fn step<R: Rng + ?Sized>(&mut self, center: Vec2, config: &FieldConfig, rng: &mut R) -> bool {
        self.center = center;
        self.angle = (self.angle + config.spark_angular_step) % std::f32::consts::TAU;
        self.radius -= config.spark_radial_step;
        if self.radius < config.spark_recycle_radius {
            self.recycle(config, rng);
            return true;
        }
        self.refresh(config);
        false
    }

    /// Recompute position and opacity from the polar state.
    fn refresh(&mut self, config: &FieldConfig) {
        self.position = self.center + Vec2::new(self.angle.cos(), self.angle.sin()) * self.radius;
        let span = (config.spark_outer_radius_max - config.spark_recycle_radius).max(f32::EPSILON);
        let remaining = ((self.radius - config.spark_recycle_radius) / span).clamp(0.0, 1.0);
        self.opacity = self.brightness * remaining;
    }
}

impl Drawable for Spark {
    fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.position, self.size, rgba(self.color, self.opacity));
    }
}
