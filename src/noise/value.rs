//! Memoized 2D value noise.

use std::collections::HashMap;

use crate::noise::{lerp, smoothstep};
use crate::rng::Mulberry32;

/// Continuous seeded scalar field over the plane.
///
/// Lattice corner values are produced by hashing the integer corner
/// coordinates together with the field seed into a [`Mulberry32`] state and
/// drawing one output. Values are cached per corner, so repeated queries are
/// cheap and a corner never changes for the lifetime of a seeding. Because
/// the value comes from a hash rather than a shared stream, cache warm order
/// cannot affect results.
pub struct ValueNoise {
    seed: u32,
    lattice: HashMap<(i32, i32), f32>,
}

impl ValueNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            lattice: HashMap::new(),
        }
    }

    /// Reset to a new seed, dropping every cached lattice value.
    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
        self.lattice.clear();
    }

    /// Cached pseudo-random scalar in `[0, 1)` at an integer lattice corner.
    fn lattice_value(&mut self, ix: i32, iy: i32) -> f32 {
        let seed = self.seed;
        *self.lattice.entry((ix, iy)).or_insert_with(|| {
            let mix = seed
                ^ (ix as u32).wrapping_mul(0x9E37_79B1)
                ^ (iy as u32).wrapping_mul(0x85EB_CA77);
            Mulberry32::new(mix).next_f32()
        })
    }

    /// Noise value in `[0, 1)` at a real coordinate.
    ///
    /// Smoothstep-eased bilinear interpolation between the four surrounding
    /// lattice corners keeps the field continuous across lattice lines.
    pub fn get(&mut self, x: f32, y: f32) -> f32 {
        let xi = x.floor();
        let yi = y.floor();
        let xf = x - xi;
        let yf = y - yi;
        let (ix, iy) = (xi as i32, yi as i32);

        let n00 = self.lattice_value(ix, iy);
        let n10 = self.lattice_value(ix + 1, iy);
        let n01 = self.lattice_value(ix, iy + 1);
        let n11 = self.lattice_value(ix + 1, iy + 1);

        let tx = smoothstep(xf);
        let ty = smoothstep(yf);
        let top = lerp(n00, n10, tx);
        let bottom = lerp(n01, n11, tx);
        lerp(top, bottom, ty)
    }

    /// Noise remapped to `[-1, 1]`.
    pub fn get_signed(&mut self, x: f32, y: f32) -> f32 {
        self.get(x, y) * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_origin_reference_value() {
        // Regression fixture: at an exact lattice point the interpolation
        // collapses to the corner hash, so this pins the hash chain itself.
        let mut noise = ValueNoise::new(42);
        assert!((noise.get(0.0, 0.0) - 0.6011037).abs() < 1e-6);
    }

    #[test]
    fn deterministic_across_instances_and_query_order() {
        let mut a = ValueNoise::new(7);
        let mut b = ValueNoise::new(7);
        // Warm the caches in different orders.
        let pts = [(0.3, 0.7), (5.5, -2.2), (-1.1, 4.4), (0.0, 0.0)];
        let forward: Vec<f32> = pts.iter().map(|&(x, y)| a.get(x, y)).collect();
        let backward: Vec<f32> = pts.iter().rev().map(|&(x, y)| b.get(x, y)).collect();
        for (av, bv) in forward.iter().zip(backward.iter().rev()) {
            assert_eq!(av, bv);
        }
    }

    #[test]
    fn continuous_across_lattice_boundaries() {
        let mut noise = ValueNoise::new(3);
        let eps = 1e-3;
        for k in -3..4 {
            let k = k as f32;
            let at = noise.get(k, 0.25);
            let before = noise.get(k - eps, 0.25);
            let after = noise.get(k + eps, 0.25);
            assert!((at - before).abs() < 0.01, "jump below x={k}");
            assert!((at - after).abs() < 0.01, "jump above x={k}");

            let at = noise.get(0.25, k);
            let before = noise.get(0.25, k - eps);
            let after = noise.get(0.25, k + eps);
            assert!((at - before).abs() < 0.01, "jump below y={k}");
            assert!((at - after).abs() < 0.01, "jump above y={k}");
        }
    }

    #[test]
    fn reseed_clears_the_lattice() {
        let mut noise = ValueNoise::new(1);
        let before = noise.get(0.5, 0.5);
        noise.reseed(2);
        let after = noise.get(0.5, 0.5);
        assert_ne!(before, after);
        noise.reseed(1);
        assert_eq!(noise.get(0.5, 0.5), before);
    }

    #[test]
    fn stays_in_unit_interval() {
        let mut noise = ValueNoise::new(11);
        for i in 0..64 {
            for j in 0..64 {
                let v = noise.get(i as f32 * 0.37 - 9.0, j as f32 * 0.53 - 9.0);
                assert!((0.0..1.0).contains(&v));
            }
        }
    }
}
