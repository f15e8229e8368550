//! Elevation palettes and gradient color mapping.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::error::ParamError;
use crate::noise::smoothstep;

/// Linear RGB color, channels in `[0, 1]`.
///
/// `Pod` so callers can cast color arrays straight into vertex buffers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }
}

/// One gradient anchor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteStop {
    pub stop: f32,
    pub color: Rgb,
}

/// Ordered gradient stops plus an optional unordered accent ("rock") set.
///
/// Stops must be non-decreasing; the first stop's color is returned for any
/// value at or below it and the last stop's for any value at or above it.
/// Accent colors carry no stops; they are selected by a separate
/// noise-driven index, not by height.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub stops: Vec<PaletteStop>,
    pub accents: SmallVec<[Rgb; 4]>,
}

impl Palette {
    pub fn new(name: impl Into<String>, stops: Vec<PaletteStop>) -> Self {
        Self {
            name: name.into(),
            stops,
            accents: SmallVec::new(),
        }
    }

    pub fn with_accents(mut self, accents: impl IntoIterator<Item = Rgb>) -> Self {
        self.accents = accents.into_iter().collect();
        self
    }

    /// Check stop presence and ordering.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.stops.is_empty() {
            return Err(ParamError::EmptyPalette);
        }
        for pair in self.stops.windows(2) {
            if pair[1].stop < pair[0].stop {
                return Err(ParamError::UnsortedPalette);
            }
        }
        Ok(())
    }

    /// Range covered by the stops, `(first, last)`.
    pub fn range(&self) -> (f32, f32) {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first.stop, last.stop),
            _ => (0.0, 1.0),
        }
    }

    /// Interpolated color for `value`, clamped to the covered stop range.
    ///
    /// Transitions between stops use smoothstep-eased `t`. The return value
    /// is always an independent copy; mutating it never touches the palette.
    pub fn color_at(&self, value: f32) -> Rgb {
        let Some(first) = self.stops.first() else {
            return Rgb::default();
        };
        let last = self.stops[self.stops.len() - 1];
        if value <= first.stop {
            return first.color;
        }
        if value >= last.stop {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            if value <= curr.stop {
                let span = curr.stop - prev.stop;
                if span <= f32::EPSILON {
                    return prev.color;
                }
                let t = smoothstep((value - prev.stop) / span);
                return prev.color.lerp(curr.color, t);
            }
        }
        last.color
    }

    /// Accent color selected by a `[0, 1)` noise value.
    pub fn accent_for(&self, noise01: f32) -> Option<Rgb> {
        if self.accents.is_empty() {
            return None;
        }
        let idx = (noise01.clamp(0.0, 1.0) * self.accents.len() as f32) as usize;
        Some(self.accents[idx % self.accents.len()])
    }
}

/// The palettes shipped with the visualizer.
pub fn builtin_palettes() -> Vec<Palette> {
    vec![alpine_meadow(), desert_oasis(), volcanic_ash()]
}

pub fn alpine_meadow() -> Palette {
    Palette {
        name: "Alpine Meadow".into(),
        stops: hex_stops(&[
            (0.0, 0x1A3D2E),
            (0.15, 0x2D5A3D),
            (0.35, 0x4A7C59),
            (0.5, 0x6B9B5F),
            (0.65, 0x8FB573),
            (0.75, 0x9D9D9D),
            (0.85, 0xB8B8B8),
            (0.95, 0xD4D4D4),
            (1.0, 0xF0F0F0),
        ]),
        accents: smallvec![
            Rgb::from_hex(0x4A5D4A),
            Rgb::from_hex(0x6B6B6B),
            Rgb::from_hex(0x808080),
            Rgb::from_hex(0x5A5A5A),
        ],
    }
}

pub fn desert_oasis() -> Palette {
    Palette {
        name: "Desert Oasis".into(),
        stops: hex_stops(&[
            (0.0, 0x8B6914),
            (0.2, 0xCD853F),
            (0.35, 0xDAA520),
            (0.5, 0xF4A460),
            (0.65, 0xE6B87D),
            (0.75, 0xD2691E),
            (0.85, 0xA0522D),
            (0.95, 0x8B4513),
            (1.0, 0x654321),
        ]),
        accents: smallvec![
            Rgb::from_hex(0x8B7355),
            Rgb::from_hex(0xA0522D),
            Rgb::from_hex(0xCD853F),
            Rgb::from_hex(0x654321),
        ],
    }
}

pub fn volcanic_ash() -> Palette {
    Palette {
        name: "Volcanic Ash".into(),
        stops: hex_stops(&[
            (0.0, 0x0A0A0A),
            (0.15, 0x1A1A1A),
            (0.3, 0x2F2F2F),
            (0.45, 0x4A4A4A),
            (0.6, 0x8B0000),
            (0.7, 0xDC143C),
            (0.8, 0xFF4500),
            (0.9, 0xFF6347),
            (1.0, 0xFFA500),
        ]),
        accents: smallvec![
            Rgb::from_hex(0x0F0F0F),
            Rgb::from_hex(0x2F2F2F),
            Rgb::from_hex(0x4A4A4A),
            Rgb::from_hex(0x1A1A1A),
        ],
    }
}

fn hex_stops(stops: &[(f32, u32)]) -> Vec<PaletteStop> {
    stops
        .iter()
        .map(|&(stop, hex)| PaletteStop {
            stop,
            color: Rgb::from_hex(hex),
        })
        .collect()
}
