//! Terrain composition: layered fields to heightmaps and vertex colors.
//!
//! [`TerrainGenerator`] owns every seeded field explicitly: the primary
//! noise lattice, the derived color-jitter and accent-index streams, and the
//! cellular site field. Callers construct one generator, reconfigure it as
//! the user tunes parameters, and pull freshly generated arrays from it.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::cellular::{CellField, CellParams};
use crate::heightmap::HeightMap;
use crate::noise::{fbm, smootherstep, FbmParams, NoiseKind, ValueNoise};
use crate::palette::{Palette, Rgb};

/// How far below the plateau the radial falloff pulls terrain, as a
/// multiple of the layer height scale.
const FALLOFF_DEPTH: f32 = 2.5;
/// How quickly accent colors dominate as the bump factor grows.
const ACCENT_BOOST: f32 = 1.5;
/// Bump factors below this leave the palette color untouched.
const ACCENT_THRESHOLD: f32 = 0.01;
/// Sampling frequency of the color-jitter stream.
const COLOR_NOISE_FREQ: f32 = 8.0;
/// Sampling frequency of the accent-index stream.
const ACCENT_NOISE_FREQ: f32 = 12.0;
/// Derived-stream seed offsets, one uncorrelated stream per concern.
const COLOR_SEED_OFFSET: u32 = 1;
const ACCENT_SEED_OFFSET: u32 = 4;

/// Parameters for the primary noise layer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NoiseLayerParams {
    pub enabled: bool,
    pub kind: NoiseKind,
    /// Base sampling frequency across the map.
    pub frequency: f32,
    /// Horizontal feature scale; larger values stretch features out.
    pub scale: f32,
    /// Vertical amplitude in world units.
    pub height_scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
}

impl Default for NoiseLayerParams {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: NoiseKind::Fbm,
            frequency: 10.0,
            scale: 2.0,
            height_scale: 45.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseLayerParams {
    fn fbm_params(&self) -> FbmParams {
        FbmParams {
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            ridged: self.kind == NoiseKind::Ridged,
        }
    }

    pub fn validate(&self) -> Result<(), crate::error::ParamError> {
        self.fbm_params().validate()
    }
}

/// Top-level configuration for a generation pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TerrainParams {
    pub seed: u32,
    /// Side length of the square world in world units.
    pub world_size: f32,
    /// Fraction of the half-world that stays a plateau before the radial
    /// falloff starts; `>= 1` disables the falloff.
    pub land_falloff: f32,
    pub noise: NoiseLayerParams,
    pub cells: CellParams,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            world_size: 2000.0,
            land_falloff: 1.0,
            noise: NoiseLayerParams::default(),
            cells: CellParams::default(),
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), crate::error::ParamError> {
        self.noise.validate()?;
        self.cells.validate()
    }
}

/// Owns every seeded field and composes them into heightmaps and colors.
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: ValueNoise,
    color_noise: ValueNoise,
    accent_noise: ValueNoise,
    cells: CellField,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Self {
        let params = sanitize(params);
        Self {
            noise: ValueNoise::new(params.seed),
            color_noise: ValueNoise::new(params.seed.wrapping_add(COLOR_SEED_OFFSET)),
            accent_noise: ValueNoise::new(params.seed.wrapping_add(ACCENT_SEED_OFFSET)),
            cells: CellField::new(params.seed, params.cells),
            params,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Clear every lattice cache and re-draw the cellular sites.
    pub fn reseed(&mut self, seed: u32) {
        self.params.seed = seed;
        self.noise.reseed(seed);
        self.color_noise.reseed(seed.wrapping_add(COLOR_SEED_OFFSET));
        self.accent_noise.reseed(seed.wrapping_add(ACCENT_SEED_OFFSET));
        self.cells.reseed(seed);
    }

    /// Swap in new noise-layer parameters.
    pub fn configure_noise(&mut self, noise: NoiseLayerParams) {
        self.params.noise = sanitize_noise(noise);
    }

    /// Swap in new cellular parameters. Site positions persist unless the
    /// cell count changed.
    pub fn configure_cells(&mut self, cells: CellParams) {
        self.params.cells = cells;
        self.cells.set_params(cells);
    }

    /// Generate a `width × height` heightmap from the configured layers.
    ///
    /// Two calls with identical seed and parameters produce bit-identical
    /// arrays. Degenerate sizes (either dimension <= 1) return a flat map
    /// instead of dividing by zero in the coordinate normalization.
    pub fn generate_height_map(&mut self, width: usize, height: usize) -> HeightMap {
        let mut map = HeightMap::flat(width, height);
        if HeightMap::validate_dimensions(width, height).is_err() {
            warn!("degenerate heightmap size {width}x{height}, returning flat map");
            return map;
        }

        let inv_w = 1.0 / (width - 1) as f32;
        let inv_h = 1.0 / (height - 1) as f32;
        for y in 0..height {
            for x in 0..width {
                let u = x as f32 * inv_w;
                let v = y as f32 * inv_h;
                let h = self.height_at(u, v);
                map.data[y * width + x] = h;
            }
        }
        map
    }

    /// Height at normalized map coordinates `(u, v)` in `[0, 1]²`.
    ///
    /// Noise coordinates are centered on the origin and scaled by
    /// `frequency / scale`, so resolution changes alter sampling density but
    /// never the shape of the terrain.
    fn height_at(&mut self, u: f32, v: f32) -> f32 {
        let nx = u - 0.5;
        let ny = v - 0.5;
        let mut height = 0.0;

        let layer = self.params.noise;
        if layer.enabled {
            let freq = layer.frequency / layer.scale.max(1e-3);
            let (sx, sy) = (nx * freq, ny * freq);
            let value = match layer.kind {
                NoiseKind::Value => self.noise.get_signed(sx, sy),
                NoiseKind::Fbm | NoiseKind::Ridged => {
                    fbm(&mut self.noise, sx, sy, &layer.fbm_params())
                }
            };
            height += value * layer.height_scale;
        }

        height += self.cells.height_at(u, v);
        height - self.falloff_at(nx, ny)
    }

    /// Radial island falloff: the amount to pull a point down once it lies
    /// outside the plateau radius.
    fn falloff_at(&self, nx: f32, ny: f32) -> f32 {
        let fraction = self.params.land_falloff;
        if fraction >= 1.0 {
            return 0.0;
        }
        let half = self.params.world_size * 0.5;
        let plateau = half * fraction.max(0.0);
        let dist = (nx * nx + ny * ny).sqrt() * self.params.world_size;
        if dist <= plateau || half <= plateau {
            return 0.0;
        }
        let progress = ((dist - plateau) / (half - plateau)).min(1.0);
        smootherstep(progress) * self.params.noise.height_scale * FALLOFF_DEPTH
    }

    /// Map a heightmap to per-vertex colors with `palette`.
    ///
    /// Heights are normalized against the observed range into the palette's
    /// covered stop range, perturbed by the color-jitter stream, mapped
    /// through the gradient, then blended toward an accent color wherever
    /// the cellular bump factor is present.
    pub fn colorize(&mut self, map: &HeightMap, palette: &Palette) -> Vec<Rgb> {
        let mut colors = Vec::with_capacity(map.data.len());
        if map.width == 0 || map.height == 0 {
            return colors;
        }

        let (min, max) = map.min_max();
        let range = max - min;
        let range = if range > 0.0 { range } else { 1.0 };
        let (lo, hi) = palette.range();
        let span = hi - lo;

        let inv_w = 1.0 / (map.width.max(2) - 1) as f32;
        let inv_h = 1.0 / (map.height.max(2) - 1) as f32;

        for y in 0..map.height {
            for x in 0..map.width {
                let u = x as f32 * inv_w;
                let v = y as f32 * inv_h;

                let mut t = (map.get(x, y) - min) / range;
                t += self
                    .color_noise
                    .get_signed(u * COLOR_NOISE_FREQ, v * COLOR_NOISE_FREQ)
                    * 0.1;
                let value = lo + t.clamp(0.0, 1.0) * span;
                let mut color = palette.color_at(value);

                let factor = self.cells.accent_at(u, v);
                if factor > ACCENT_THRESHOLD {
                    let pick = self
                        .accent_noise
                        .get(u * ACCENT_NOISE_FREQ, v * ACCENT_NOISE_FREQ);
                    if let Some(accent) = palette.accent_for(pick) {
                        color = color.lerp(accent, (factor * ACCENT_BOOST).min(1.0));
                    }
                }
                colors.push(color);
            }
        }
        colors
    }
}

/// Clamp obviously broken top-level parameters, logging each fix.
fn sanitize(mut params: TerrainParams) -> TerrainParams {
    if params.world_size <= 0.0 {
        warn!("world_size {} clamped to 1", params.world_size);
        params.world_size = 1.0;
    }
    params.noise = sanitize_noise(params.noise);
    params
}

/// Clamp noise-layer parameters into generable ranges, logging each fix.
fn sanitize_noise(mut noise: NoiseLayerParams) -> NoiseLayerParams {
    if noise.octaves == 0 {
        warn!("octaves 0 clamped to 1");
        noise.octaves = 1;
    }
    if noise.persistence < 0.0 {
        warn!("persistence {} clamped to 0", noise.persistence);
        noise.persistence = 0.0;
    }
    if noise.scale <= 0.0 {
        warn!("scale {} clamped to 0.001", noise.scale);
        noise.scale = 1e-3;
    }
    noise
}
