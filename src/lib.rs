//! Terragen - seedable terrain synthesis core.
//!
//! Builds heightmapped terrain from layered procedural fields and maps
//! heights to vertex colors:
//!
//! - memoized 2D value noise over an integer lattice
//! - fractal (fBm / ridged) composition for multi-scale detail
//! - Voronoi cellular fields for rounded bumps, mesas, and cell-edge ridges
//! - a height composer with radial island falloff
//! - gradient palettes with noise-driven accent (rock) blending
//!
//! Everything is deterministic per seed: two calls with identical seed and
//! parameters produce bit-identical arrays. Rendering, cameras, meshes, and
//! UI live outside this crate; collaborators hand in plain numbers and get
//! back owned arrays.
//!
//! ```
//! use terragen::{palette, TerrainGenerator, TerrainParams};
//!
//! let mut gen = TerrainGenerator::new(TerrainParams {
//!     seed: 42,
//!     ..TerrainParams::default()
//! });
//! let map = gen.generate_height_map(128, 128);
//! let colors = gen.colorize(&map, &palette::alpine_meadow());
//! assert_eq!(colors.len(), map.data.len());
//! ```

pub mod cellular;
pub mod error;
pub mod heightmap;
pub mod noise;
pub mod palette;
pub mod rng;
pub mod terrain;

pub use cellular::{CellField, CellParams, CellShape, CellSite};
pub use error::ParamError;
pub use heightmap::HeightMap;
pub use noise::{fbm, FbmParams, NoiseKind, ValueNoise};
pub use palette::{Palette, PaletteStop, Rgb};
pub use rng::Mulberry32;
pub use terrain::{NoiseLayerParams, TerrainGenerator, TerrainParams};
