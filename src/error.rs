//! Configuration validation errors.

use thiserror::Error;

/// Invalid configuration detected synchronously, before generation.
///
/// The generation entry points prefer clamping to failing (a degraded frame
/// beats a crashed renderer), so these only surface through the explicit
/// `validate` calls on the parameter structs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("octave count must be at least 1")]
    ZeroOctaves,
    #[error("persistence must be in (0, 1], got {0}")]
    BadPersistence(f32),
    #[error("lacunarity must be at least 1, got {0}")]
    BadLacunarity(f32),
    #[error("heightmap dimensions must be at least 2x2, got {width}x{height}")]
    DegenerateDimensions { width: usize, height: usize },
    #[error("cell height range is inverted: min {min} > max {max}")]
    InvertedHeightRange { min: f32, max: f32 },
    #[error("palette has no stops")]
    EmptyPalette,
    #[error("palette stops must be non-decreasing")]
    UnsortedPalette,
}
