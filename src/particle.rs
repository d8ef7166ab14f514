//! Shared capability pair for field entities.
//!
//! Stars, comets and the attractor share no behaviour beyond "advance one
//! frame" and "draw yourself", so that is all these traits describe.  Sparks
//! are stepped by their owning [`crate::attractor::Attractor`] and only
//! implement [`Drawable`].

use crate::config::FieldConfig;
use crate::surface::{Surface, SurfaceExtent};
use rand::Rng;

/// Per-frame inputs handed to every [`Steppable`] entity.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Field clock reading in milliseconds.
    pub now_ms: f64,
    /// Surface extent at the start of this frame.
    pub extent: SurfaceExtent,
    pub config: &'a FieldConfig,
}

/// An entity that advances its own state once per frame.
pub trait Steppable {
    fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext<'_>, rng: &mut R);
}

/// An entity that renders itself onto a [`Surface`].
pub trait Drawable {
    fn draw<S: Surface + ?Sized>(&self, surface: &mut S);
}

/// Uniform sample from `[min, max)`, or `min` when the range is empty.
///
/// Config validation allows `min == max` to pin a value.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_pins_degenerate_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(&mut rng, 4.0, 4.0), 4.0);
        assert_eq!(sample(&mut rng, 4.0, 2.0), 4.0);
        for _ in 0..100 {
            let v = sample(&mut rng, 1.0, 3.0);
            assert!((1.0..3.0).contains(&v));
        }
    }
}
