//! Runtime field configuration loaded from `assets/field.toml`.
//!
//! [`FieldConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_field_config`] reads
//! `assets/field.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! star_count = 250
//! flare_interval_secs = 10.0
//! attractor_enabled = false
//! ```
//!
//! A file that fails to parse or validate is reported and ignored; the field
//! still starts with defaults.

use crate::constants::*;
use crate::error::{validate_positive, validate_range, validate_unit, FieldError, FieldResult};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/field.toml";

/// Environment variable that pins the RNG seed for reproducible fields.
pub const SEED_ENV: &str = "STARFIELD_SEED";

/// Runtime-tunable animation configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // ── Population ───────────────────────────────────────────────────────────
    pub star_count: usize,
    pub comet_count: usize,
    pub spark_count: usize,
    pub attractor_enabled: bool,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,

    // ── Stars ────────────────────────────────────────────────────────────────
    pub star_size_min: f32,
    pub star_size_max: f32,
    pub star_twinkle_rate_max: f32,
    pub star_twinkle_step: f32,
    pub star_color: [f32; 3],

    // ── Comets ───────────────────────────────────────────────────────────────
    pub comet_length_min: f32,
    pub comet_length_max: f32,
    pub comet_speed_min: f32,
    pub comet_speed_max: f32,
    pub comet_angle_min_deg: f32,
    pub comet_angle_max_deg: f32,
    pub comet_stroke_width: f32,
    pub comet_color: [f32; 3],

    // ── Attractor ────────────────────────────────────────────────────────────
    pub attractor_radius: f32,
    pub attractor_easing: f32,
    pub attractor_rotation_step: f32,
    pub attractor_glow_color: [f32; 3],
    pub flare_interval_secs: f32,
    pub flare_decay_per_frame: f32,
    pub flare_branches_min: usize,
    pub flare_branches_max: usize,
    pub flare_length_scale_min: f32,
    pub flare_length_scale_max: f32,
    pub flare_width_min: f32,
    pub flare_width_max: f32,

    // ── Sparks ───────────────────────────────────────────────────────────────
    pub spark_outer_radius_min: f32,
    pub spark_outer_radius_max: f32,
    pub spark_recycle_radius: f32,
    pub spark_angular_step: f32,
    pub spark_radial_step: f32,
    pub spark_size: f32,

    // ── Input ────────────────────────────────────────────────────────────────
    pub touch_slop: f32,

    // ── Rendering ────────────────────────────────────────────────────────────
    pub curve_segments: usize,
    pub glow_rings: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            // Population
            star_count: STAR_COUNT,
            comet_count: COMET_COUNT,
            spark_count: SPARK_COUNT,
            attractor_enabled: ATTRACTOR_ENABLED,
            seed: None,
            // Stars
            star_size_min: STAR_SIZE_MIN,
            star_size_max: STAR_SIZE_MAX,
            star_twinkle_rate_max: STAR_TWINKLE_RATE_MAX,
            star_twinkle_step: STAR_TWINKLE_STEP,
            star_color: STAR_COLOR,
            // Comets
            comet_length_min: COMET_LENGTH_MIN,
            comet_length_max: COMET_LENGTH_MAX,
            comet_speed_min: COMET_SPEED_MIN,
            comet_speed_max: COMET_SPEED_MAX,
            comet_angle_min_deg: COMET_ANGLE_MIN_DEG,
            comet_angle_max_deg: COMET_ANGLE_MAX_DEG,
            comet_stroke_width: COMET_STROKE_WIDTH,
            comet_color: COMET_COLOR,
            // Attractor
            attractor_radius: ATTRACTOR_RADIUS,
            attractor_easing: ATTRACTOR_EASING,
            attractor_rotation_step: ATTRACTOR_ROTATION_STEP,
            attractor_glow_color: ATTRACTOR_GLOW_COLOR,
            flare_interval_secs: FLARE_INTERVAL_SECS,
            flare_decay_per_frame: FLARE_DECAY_PER_FRAME,
            flare_branches_min: FLARE_BRANCHES_MIN,
            flare_branches_max: FLARE_BRANCHES_MAX,
            flare_length_scale_min: FLARE_LENGTH_SCALE_MIN,
            flare_length_scale_max: FLARE_LENGTH_SCALE_MAX,
            flare_width_min: FLARE_WIDTH_MIN,
            flare_width_max: FLARE_WIDTH_MAX,
            // Sparks
            spark_outer_radius_min: SPARK_OUTER_RADIUS_MIN,
            spark_outer_radius_max: SPARK_OUTER_RADIUS_MAX,
            spark_recycle_radius: SPARK_RECYCLE_RADIUS,
            spark_angular_step: SPARK_ANGULAR_STEP,
            spark_radial_step: SPARK_RADIAL_STEP,
            spark_size: SPARK_SIZE,
            // Input
            touch_slop: TOUCH_SLOP,
            // Rendering
            curve_segments: CURVE_SEGMENTS,
            glow_rings: GLOW_RINGS,
        }
    }
}

impl FieldConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(path: &str, contents: &str) -> FieldResult<Self> {
        let config: FieldConfig = toml::from_str(contents).map_err(|source| {
            FieldError::ConfigParse {
                path: path.to_string(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the config at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> FieldResult<Option<Self>> {
        let display = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&display, &contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FieldError::ConfigRead {
                path: display,
                source,
            }),
        }
    }

    /// Reject values that would stall or break the animation.
    ///
    /// `spark_outer_radius_min` must stay above `spark_recycle_radius`, or a
    /// freshly recycled spark would be recycled again on its next step.
    pub fn validate(&self) -> FieldResult<()> {
        validate_range("star_size", self.star_size_min, self.star_size_max)?;
        validate_positive("star_size_min", self.star_size_min)?;
        validate_unit("star_twinkle_step", self.star_twinkle_step)?;
        validate_range("comet_length", self.comet_length_min, self.comet_length_max)?;
        validate_range("comet_speed", self.comet_speed_min, self.comet_speed_max)?;
        validate_positive("comet_speed_min", self.comet_speed_min)?;
        validate_range(
            "comet_angle_deg",
            self.comet_angle_min_deg,
            self.comet_angle_max_deg,
        )?;
        if self.comet_angle_min_deg < 0.0 || self.comet_angle_max_deg > 180.0 {
            // Comets must travel downwards or they never leave through an edge
            // that triggers a reset.
            return Err(FieldError::UnsafeConstant {
                name: "comet_angle_deg",
                value: self.comet_angle_min_deg.min(self.comet_angle_max_deg),
                safe_range: "[0.0, 180.0]",
            });
        }
        validate_positive("attractor_radius", self.attractor_radius)?;
        validate_unit("attractor_easing", self.attractor_easing)?;
        validate_positive("flare_interval_secs", self.flare_interval_secs)?;
        validate_positive("flare_decay_per_frame", self.flare_decay_per_frame)?;
        validate_range(
            "flare_branches",
            self.flare_branches_min as f32,
            self.flare_branches_max as f32,
        )?;
        validate_range(
            "flare_length_scale",
            self.flare_length_scale_min,
            self.flare_length_scale_max,
        )?;
        validate_range("flare_width", self.flare_width_min, self.flare_width_max)?;
        validate_range(
            "spark_outer_radius",
            self.spark_outer_radius_min,
            self.spark_outer_radius_max,
        )?;
        validate_positive("spark_radial_step", self.spark_radial_step)?;
        if self.spark_outer_radius_min <= self.spark_recycle_radius {
            return Err(FieldError::UnsafeConstant {
                name: "spark_outer_radius_min",
                value: self.spark_outer_radius_min,
                safe_range: "(spark_recycle_radius, ∞)",
            });
        }
        validate_positive("touch_slop", self.touch_slop)?;
        Ok(())
    }

    /// Flare interval in milliseconds, the unit of the field clock.
    pub fn flare_interval_ms(&self) -> f64 {
        f64::from(self.flare_interval_secs) * 1000.0
    }
}

/// Build an sRGB colour from a config triple plus alpha.
pub fn rgba(rgb: [f32; 3], alpha: f32) -> Color {
    Color::srgba(rgb[0], rgb[1], rgb[2], alpha)
}

/// Startup system: attempt to load `assets/field.toml` and overwrite the
/// `FieldConfig` resource with any values present in the file, then apply the
/// `STARFIELD_SEED` override.
pub fn load_field_config(mut config: ResMut<FieldConfig>) {
    match FieldConfig::load(Path::new(CONFIG_PATH)) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded field config from {CONFIG_PATH}");
        }
        Ok(None) => {
            eprintln!("[SETUP] No {CONFIG_PATH} found; using compiled defaults");
        }
        Err(e) => {
            warn!("{e}; using defaults");
        }
    }

    if let Ok(raw) = std::env::var(SEED_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(seed) => config.seed = Some(seed),
            Err(_) => warn!("Ignoring {SEED_ENV}={raw:?}: not an unsigned integer"),
        }
    }
}
