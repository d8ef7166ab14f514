//! Centralised animation constants.
//!
//! Every tuneable value of the particle field lives here so it can be found and
//! changed in one place.  [`crate::config::FieldConfig::default`] mirrors these
//! values; `assets/field.toml` may override any subset at startup.
//!
//! Rates marked "per frame" are applied once per `Update` tick, not scaled by
//! frame time.  The star twinkle is the exception: its oscillator phase comes
//! from the elapsed clock, so dropped frames do not slow it down.

// ── Surface ───────────────────────────────────────────────────────────────────

/// Initial window width in logical pixels.
pub const WINDOW_WIDTH: u32 = 1200;

/// Initial window height in logical pixels.
pub const WINDOW_HEIGHT: u32 = 680;

// ── Population ────────────────────────────────────────────────────────────────

/// Number of stars seeded at mount.
pub const STAR_COUNT: usize = 100;

/// Number of pooled comets.  Comets are recycled, never despawned.
pub const COMET_COUNT: usize = 5;

/// Number of sparks owned by the attractor.
pub const SPARK_COUNT: usize = 100;

/// Whether the black-hole attractor is part of the field.
pub const ATTRACTOR_ENABLED: bool = true;

// ── Stars ─────────────────────────────────────────────────────────────────────

/// Smallest star radius (px).
pub const STAR_SIZE_MIN: f32 = 1.0;

/// Upper bound (exclusive) of the star radius (px).
pub const STAR_SIZE_MAX: f32 = 3.0;

/// Upper bound (exclusive) of the per-star twinkle rate (radians per elapsed ms).
///
/// At 0.02 the fastest star completes a full twinkle cycle in ~314 ms.
pub const STAR_TWINKLE_RATE_MAX: f32 = 0.02;

/// Opacity change applied per frame at the oscillator peak.
pub const STAR_TWINKLE_STEP: f32 = 0.02;

/// Star fill colour (sRGB 0–1).
pub const STAR_COLOR: [f32; 3] = [1.0, 100.0 / 255.0, 100.0 / 255.0];

// ── Comets ────────────────────────────────────────────────────────────────────

/// Shortest comet trail (px).
pub const COMET_LENGTH_MIN: f32 = 20.0;

/// Upper bound (exclusive) of the comet trail length (px).
pub const COMET_LENGTH_MAX: f32 = 100.0;

/// Slowest comet speed (px per frame).
pub const COMET_SPEED_MIN: f32 = 1.0;

/// Upper bound (exclusive) of the comet speed (px per frame).
pub const COMET_SPEED_MAX: f32 = 3.0;

/// Shallowest travel angle, in degrees clockwise from the +x axis (y points down).
pub const COMET_ANGLE_MIN_DEG: f32 = 70.0;

/// Upper bound (exclusive) of the travel angle in degrees.
pub const COMET_ANGLE_MAX_DEG: f32 = 90.0;

/// Trail stroke width (px).
pub const COMET_STROKE_WIDTH: f32 = 2.0;

/// Comet trail colour (sRGB 0–1).
pub const COMET_COLOR: [f32; 3] = [1.0, 50.0 / 255.0, 50.0 / 255.0];

// ── Attractor ─────────────────────────────────────────────────────────────────

/// Radius of the attractor's event horizon (px).
pub const ATTRACTOR_RADIUS: f32 = 28.0;

/// Fraction of the remaining distance to the target covered each frame.
///
/// 0.05 closes ~95 % of a gap in 60 frames, about one second at 60 Hz.
pub const ATTRACTOR_EASING: f32 = 0.05;

/// Accretion ring rotation per frame (radians).
pub const ATTRACTOR_ROTATION_STEP: f32 = 0.01;

/// Seconds between flares.
pub const FLARE_INTERVAL_SECS: f32 = 30.0;

/// Flare intensity lost per frame.  At 0.01 a flare lasts 100 frames.
pub const FLARE_DECAY_PER_FRAME: f32 = 0.01;

/// Fewest branches emitted by one flare.
pub const FLARE_BRANCHES_MIN: usize = 3;

/// Most branches emitted by one flare (inclusive).
pub const FLARE_BRANCHES_MAX: usize = 5;

/// Branch length range as a multiple of the attractor radius.
pub const FLARE_LENGTH_SCALE_MIN: f32 = 2.0;
pub const FLARE_LENGTH_SCALE_MAX: f32 = 5.0;

/// Branch stroke width range (px).
pub const FLARE_WIDTH_MIN: f32 = 1.0;
pub const FLARE_WIDTH_MAX: f32 = 4.0;

/// Glow and flare colour (sRGB 0–1).
pub const ATTRACTOR_GLOW_COLOR: [f32; 3] = [1.0, 0.35, 0.2];

// ── Sparks ────────────────────────────────────────────────────────────────────

/// Smallest orbital radius a recycled spark starts at (px).
pub const SPARK_OUTER_RADIUS_MIN: f32 = 50.0;

/// Largest orbital radius a recycled spark starts at (px, inclusive).
pub const SPARK_OUTER_RADIUS_MAX: f32 = 150.0;

/// Sparks closer than this to the centre are recycled (px).
pub const SPARK_RECYCLE_RADIUS: f32 = 5.0;

/// Orbital angle advanced per frame (radians).
pub const SPARK_ANGULAR_STEP: f32 = 0.02;

/// Orbital radius lost per frame (px).
pub const SPARK_RADIAL_STEP: f32 = 0.3;

/// Spark dot radius (px).
pub const SPARK_SIZE: f32 = 1.2;

// ── Input ─────────────────────────────────────────────────────────────────────

/// Distance a touch may travel before it is classified as steer or scroll (px).
pub const TOUCH_SLOP: f32 = 10.0;

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Segments used when flattening curves and arcs into gizmo line strips.
pub const CURVE_SEGMENTS: usize = 24;

/// Concentric rings used to approximate radial glows.
pub const GLOW_RINGS: usize = 12;
