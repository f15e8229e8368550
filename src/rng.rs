//! Seedable 32-bit PRNG backing the noise lattice.

/// Mulberry32 generator: 32-bit state with an add/xorshift/multiply mix.
///
/// Small and fast, and nearby seeds produce uncorrelated streams, so
/// per-concern streams (terrain, color jitter, accent index) can be derived
/// from one user seed with fixed offsets.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f64 / 4_294_967_296.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Mulberry32::new(1234);
        let mut b = Mulberry32::new(1234);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn outputs_stay_in_unit_interval() {
        let mut rng = Mulberry32::new(99);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn adjacent_seeds_diverge() {
        let mut a = Mulberry32::new(7);
        let mut b = Mulberry32::new(8);
        let differing = (0..32).filter(|_| a.next_u32() != b.next_u32()).count();
        assert!(differing >= 30);
    }
}
