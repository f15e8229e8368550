//! Seeded noise fields.
//!
//! - Memoized 2D value noise over an integer lattice
//! - Fractal (fBm / ridged) composition of that field

pub mod fbm;
pub mod value;

pub use fbm::{fbm, FbmParams};
pub use value::ValueNoise;

use serde::{Deserialize, Serialize};

/// Which formulation the primary terrain layer samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// A single pass of the base value-noise field.
    Value,
    /// Standard fractal Brownian motion.
    Fbm,
    /// fBm with per-octave folding for mountain-ridge structure.
    Ridged,
}

/// Cubic smoothstep ease `t²(3 - 2t)`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Quintic smootherstep `6t⁵ - 15t⁴ + 10t³`, used by falloff curves.
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_curves_hit_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-6);
    }
}
