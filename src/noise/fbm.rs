//! Fractal composition over the value-noise field.

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::noise::value::ValueNoise;

/// Octave-stacking parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FbmParams {
    /// Number of octaves, minimum 1.
    pub octaves: u32,
    /// Amplitude multiplier per octave, `(0, 1]`.
    pub persistence: f32,
    /// Frequency multiplier per octave, `>= 1`.
    pub lacunarity: f32,
    /// Fold each octave into ridges.
    pub ridged: bool,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            ridged: false,
        }
    }
}

impl FbmParams {
    /// Explicit parameter check for callers that want an error instead of
    /// the clamped defaults applied during generation.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.octaves == 0 {
            return Err(ParamError::ZeroOctaves);
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(ParamError::BadPersistence(self.persistence));
        }
        if self.lacunarity < 1.0 {
            return Err(ParamError::BadLacunarity(self.lacunarity));
        }
        Ok(())
    }
}

/// Composed fractal noise in `[-1, 1]`.
///
/// The base field is `[0, 1]`-valued, so the octave sum is divided by the
/// tracked amplitude total and then remapped with `* 2 - 1`. A single
/// standard octave therefore reduces exactly to [`ValueNoise::get_signed`].
///
/// The ridged variant folds each octave around the midline, squares it for
/// sharpness, and damps it by the previous octave's clamped contribution so
/// ridges stay crisp inside valleys.
pub fn fbm(noise: &mut ValueNoise, x: f32, y: f32, params: &FbmParams) -> f32 {
    let octaves = params.octaves.max(1);
    let mut total = 0.0f32;
    let mut frequency = 1.0f32;
    let mut amplitude = 1.0f32;
    let mut max_amplitude = 0.0f32;
    let mut weight = 1.0f32;

    for _ in 0..octaves {
        let n = noise.get(x * frequency, y * frequency);
        let contribution = if params.ridged {
            let mut r = 1.0 - (n * 2.0 - 1.0).abs();
            r *= r;
            r *= weight;
            weight = (r * params.persistence).clamp(0.0, 1.0);
            r
        } else {
            n
        };

        total += contribution * amplitude;
        max_amplitude += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    (total / max_amplitude) * 2.0 - 1.0
}
