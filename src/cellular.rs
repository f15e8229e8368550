//! Voronoi cellular height field.
//!
//! Scattered sites partition normalized `[0,1)²` space; each query point gets
//! a zero-centered height contribution from its nearest cell (a rounded mound
//! or a flat-topped mesa) plus a signed ridge/valley contribution along cell
//! boundaries. The layer is a detail layer: with edge influence disabled its
//! mean contribution over the domain stays near zero.

use glam::Vec2;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::noise::ValueNoise;

/// Reference cell radius used to normalize site distances.
const REF_RADIUS: f32 = 0.5;
/// Guard for near-zero accent denominators.
const MIN_ACCENT_DENOM: f32 = 1e-4;
/// Sites draw from a different stream than the lattice noise.
const SITE_SEED_OFFSET: u32 = 2;
/// The cluster mask draws from its own stream as well.
const CLUSTER_SEED_OFFSET: u32 = 3;

/// Profile of the per-cell height bump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellShape {
    /// Rounded gaussian-like mound, steepness controlled by `smoothness`.
    Smooth,
    /// Flat-topped mesa: full height inside the `flatness` fraction of the
    /// cell radius, then a power-curve rim.
    Angular,
}

/// Tunables for the cellular layer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CellParams {
    pub enabled: bool,
    /// Number of scattered sites; 0 disables the layer.
    pub cells: usize,
    /// Overall amplitude, applied symmetrically around zero.
    pub height_multiplier: f32,
    /// Steepness of the smooth center mound (>= 0).
    pub smoothness: f32,
    /// Signed prominence of features along cell boundaries: positive raises
    /// ridges, negative cuts valleys.
    pub edge_influence: f32,
    /// Exponent shaping edge features and the `Angular` rim.
    pub edge_sharpness: f32,
    /// Fraction of the cell radius that stays flat for `Angular` cells.
    pub flatness: f32,
    /// Per-site feature height range, low end.
    pub min_height: f32,
    /// Per-site feature height range, high end.
    pub max_height: f32,
    pub shape: CellShape,
    /// Turn peaks into troughs and vice versa.
    pub invert: bool,
    /// Gate site placement on a cluster-mask noise field instead of
    /// scattering uniformly.
    pub clustering: bool,
    /// Feature scale of the cluster mask; larger values make broader
    /// clusters.
    pub cluster_scale: f32,
    /// Mask values must exceed this in `[0, 1]` for a candidate site to be
    /// kept.
    pub cluster_threshold: f32,
}

impl Default for CellParams {
    fn default() -> Self {
        Self {
            enabled: true,
            cells: 200,
            height_multiplier: 50.0,
            smoothness: 2.0,
            edge_influence: -1.0,
            edge_sharpness: 0.1,
            flatness: 0.6,
            min_height: 0.5,
            max_height: 1.5,
            shape: CellShape::Smooth,
            invert: false,
            clustering: false,
            cluster_scale: 0.25,
            cluster_threshold: 0.5,
        }
    }
}

impl CellParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.min_height > self.max_height {
            return Err(ParamError::InvertedHeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        Ok(())
    }
}

/// One scattered feature point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSite {
    /// Position in normalized `[0,1)²` space.
    pub position: Vec2,
    /// Feature height drawn from `[min_height, max_height]`.
    pub height_weight: f32,
}

/// Seeded site collection plus the height field defined over it.
pub struct CellField {
    seed: u32,
    params: CellParams,
    sites: Vec<CellSite>,
}

impl CellField {
    pub fn new(seed: u32, params: CellParams) -> Self {
        let mut field = Self {
            seed,
            params,
            sites: Vec::new(),
        };
        field.scatter();
        field
    }

    pub fn sites(&self) -> &[CellSite] {
        &self.sites
    }

    pub fn params(&self) -> &CellParams {
        &self.params
    }

    /// Re-draw every site from scratch. Only the seed and the
    /// placement-defining parameters trigger this, so interactive tuning of
    /// amplitudes and shapes never jitters existing cells.
    fn scatter(&mut self) {
        let mut rng = StdRng::seed_from_u64(u64::from(self.seed.wrapping_add(SITE_SEED_OFFSET)));
        let lo = self.params.min_height.min(self.params.max_height);
        let hi = self.params.min_height.max(self.params.max_height);
        let weight = |rng: &mut StdRng| if hi > lo { rng.gen_range(lo..hi) } else { lo };

        if self.params.clustering {
            // Walk a candidate grid fine enough to offer a few candidates
            // per requested site and keep the ones the cluster mask covers.
            let mut mask = ValueNoise::new(self.seed.wrapping_add(CLUSTER_SEED_OFFSET));
            let scale = self.params.cluster_scale.max(1e-3);
            let side = ((self.params.cells.max(1) * 4) as f32).sqrt().ceil() as usize;
            let step = 1.0 / side as f32;
            let mut sites = Vec::new();
            for j in 0..side {
                for i in 0..side {
                    let cx = (i as f32 + 0.5) * step;
                    let cy = (j as f32 + 0.5) * step;
                    if mask.get(cx / scale, cy / scale) > self.params.cluster_threshold {
                        sites.push(CellSite {
                            position: Vec2::new(
                                (cx + (rng.gen::<f32>() - 0.5) * step).clamp(0.0, 1.0),
                                (cy + (rng.gen::<f32>() - 0.5) * step).clamp(0.0, 1.0),
                            ),
                            height_weight: weight(&mut rng),
                        });
                    }
                }
            }
            self.sites = sites;
        } else {
            self.sites = (0..self.params.cells)
                .map(|_| CellSite {
                    position: Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()),
                    height_weight: weight(&mut rng),
                })
                .collect();
        }
        debug!(
            "scattered {} voronoi sites (seed {}, clustering {})",
            self.sites.len(),
            self.seed,
            self.params.clustering
        );
    }

    /// Re-scatter all sites under a new seed.
    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
        self.scatter();
    }

    /// Apply new parameters. Sites are rebuilt only when a parameter that
    /// defines their placement changes (count, clustering mode, cluster
    /// mask); every other tweak keeps positions stable.
    pub fn set_params(&mut self, params: CellParams) {
        let rebuild = params.cells != self.params.cells
            || params.clustering != self.params.clustering
            || params.cluster_scale != self.params.cluster_scale
            || params.cluster_threshold != self.params.cluster_threshold;
        self.params = params;
        if rebuild {
            self.scatter();
        }
    }

    /// Distances to the nearest and second-nearest site, plus the nearest
    /// site's index. Second distance is infinite when only one site exists.
    fn nearest_two(&self, p: Vec2) -> Option<(f32, f32, usize)> {
        let mut best = f32::INFINITY;
        let mut second = f32::INFINITY;
        let mut best_idx = 0usize;
        for (i, site) in self.sites.iter().enumerate() {
            let d2 = site.position.distance_squared(p);
            if d2 < best {
                second = best;
                best = d2;
                best_idx = i;
            } else if d2 < second {
                second = d2;
            }
        }
        if best.is_finite() {
            Some((best.sqrt(), second.sqrt(), best_idx))
        } else {
            None
        }
    }

    /// Unit-height bump profile at a normalized distance in `[0, 1]`.
    fn base_shape(&self, d_scaled: f32) -> f32 {
        match self.params.shape {
            CellShape::Smooth => {
                let k = self.params.smoothness.max(0.0) * 10.0;
                (-k * d_scaled * d_scaled).exp()
            }
            CellShape::Angular => {
                let flat = self.params.flatness.clamp(0.0, 0.999);
                if d_scaled < flat {
                    1.0
                } else {
                    let rim = (1.0 - flat).max(1e-3);
                    let progress = ((d_scaled - flat) / rim).clamp(0.0, 1.0);
                    1.0 - progress.powf(self.params.edge_sharpness.max(0.0))
                }
            }
        }
    }

    /// Height contribution at a normalized query point, zero-centered.
    ///
    /// Returns 0 when the layer is disabled or holds no sites. A query point
    /// coincident with a site is fine: distance 0 is the mound peak.
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        if !self.params.enabled || self.sites.is_empty() {
            return 0.0;
        }
        let Some((d1, d2, _)) = self.nearest_two(Vec2::new(x, y)) else {
            return 0.0;
        };

        let d1_scaled = (d1 / REF_RADIUS).min(1.0);
        let centered = self.base_shape(d1_scaled) - 0.5;

        let mut edge = 0.0;
        if d2.is_finite() && self.params.edge_influence != 0.0 {
            let diff = ((d2 - d1) / REF_RADIUS).clamp(0.0, 1.0);
            let edge_shape = (1.0 - diff).powf(self.params.edge_sharpness.max(0.0));
            edge = (edge_shape - 0.5) * self.params.edge_influence;
        }

        let mut height = (centered + edge) * self.params.height_multiplier;
        if self.params.invert {
            height = -height;
        }
        height
    }

    /// Normalized bump magnitude in `[0, 1]`, used to drive accent/rock
    /// color blending. The denominator is clamped so extreme parameter
    /// combinations can never produce NaN or a runaway factor.
    pub fn accent_at(&self, x: f32, y: f32) -> f32 {
        if !self.params.enabled || self.sites.is_empty() {
            return 0.0;
        }
        let Some((d1, _, idx)) = self.nearest_two(Vec2::new(x, y)) else {
            return 0.0;
        };
        let d1_scaled = (d1 / REF_RADIUS).min(1.0);
        let bump = self.base_shape(d1_scaled).max(0.0) * self.sites[idx].height_weight;
        let denom = self.params.max_height.abs().max(MIN_ACCENT_DENOM);
        (bump / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sites_is_a_flat_layer() {
        let field = CellField::new(
            1,
            CellParams {
                cells: 0,
                ..CellParams::default()
            },
        );
        for i in 0..8 {
            for j in 0..8 {
                assert_eq!(field.height_at(i as f32 / 7.0, j as f32 / 7.0), 0.0);
            }
        }
    }

    #[test]
    fn sites_are_stable_under_amplitude_tweaks() {
        let mut field = CellField::new(5, CellParams::default());
        let before: Vec<Vec2> = field.sites().iter().map(|s| s.position).collect();

        let mut params = *field.params();
        params.height_multiplier = 80.0;
        params.smoothness = 4.5;
        field.set_params(params);
        let after: Vec<Vec2> = field.sites().iter().map(|s| s.position).collect();
        assert_eq!(before, after);

        params.cells += 1;
        field.set_params(params);
        assert_eq!(field.sites().len(), before.len() + 1);
    }

    #[test]
    fn same_seed_scatters_identically() {
        let a = CellField::new(77, CellParams::default());
        let b = CellField::new(77, CellParams::default());
        assert_eq!(a.sites(), b.sites());
    }

    #[test]
    fn coincident_query_point_is_finite() {
        let field = CellField::new(3, CellParams::default());
        let site = field.sites()[0].position;
        let h = field.height_at(site.x, site.y);
        assert!(h.is_finite());
        let f = field.accent_at(site.x, site.y);
        assert!(f.is_finite());
        assert!((0.0..=1.0).contains(&f));
    }

    #[test]
    fn single_site_skips_edge_contribution() {
        let field = CellField::new(
            9,
            CellParams {
                cells: 1,
                edge_influence: 1.0,
                ..CellParams::default()
            },
        );
        assert!(field.height_at(0.5, 0.5).is_finite());
    }

    #[test]
    fn center_contribution_is_zero_mean_without_edges() {
        // 64 sites with k = 50 puts the average mound value near 0.5, so the
        // centered contribution should average out close to zero.
        let field = CellField::new(
            13,
            CellParams {
                cells: 64,
                smoothness: 5.0,
                edge_influence: 0.0,
                height_multiplier: 1.0,
                ..CellParams::default()
            },
        );
        let n = 96;
        let mut sum = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                sum += field.height_at(i as f32 / (n - 1) as f32, j as f32 / (n - 1) as f32) as f64;
            }
        }
        let mean = sum / (n * n) as f64;
        assert!(mean.abs() < 0.15, "mean center contribution {mean}");
    }

    #[test]
    fn invert_flips_the_field() {
        let mut params = CellParams {
            edge_influence: 0.4,
            ..CellParams::default()
        };
        let a = CellField::new(21, params);
        params.invert = true;
        let b = CellField::new(21, params);
        assert_eq!(a.height_at(0.3, 0.6), -b.height_at(0.3, 0.6));
    }

    #[test]
    fn angular_shape_has_a_flat_top() {
        let field = CellField::new(
            4,
            CellParams {
                cells: 1,
                shape: CellShape::Angular,
                flatness: 0.5,
                edge_influence: 0.0,
                height_multiplier: 1.0,
                ..CellParams::default()
            },
        );
        let site = field.sites()[0].position;
        // Inside the flat fraction the mesa contributes its full height.
        let peak = field.height_at(site.x, site.y);
        let near = field.height_at(site.x + 0.05, site.y);
        assert_eq!(peak, 0.5);
        assert_eq!(near, peak);
    }

    #[test]
    fn clustered_scatter_is_deterministic_and_stays_in_domain() {
        let params = CellParams {
            clustering: true,
            ..CellParams::default()
        };
        let a = CellField::new(31, params);
        let b = CellField::new(31, params);
        assert_eq!(a.sites(), b.sites());
        assert!(!a.sites().is_empty());
        for site in a.sites() {
            assert!((0.0..=1.0).contains(&site.position.x));
            assert!((0.0..=1.0).contains(&site.position.y));
        }
    }

    #[test]
    fn cluster_mask_threshold_gates_placement() {
        // The mask never reaches 1.0, so a threshold there keeps nothing.
        let field = CellField::new(
            31,
            CellParams {
                clustering: true,
                cluster_threshold: 1.0,
                ..CellParams::default()
            },
        );
        assert!(field.sites().is_empty());
        assert_eq!(field.height_at(0.5, 0.5), 0.0);

        // Dropping the threshold below the mask floor keeps every candidate.
        let open = CellField::new(
            31,
            CellParams {
                clustering: true,
                cluster_threshold: -0.1,
                ..CellParams::default()
            },
        );
        let gated = CellField::new(
            31,
            CellParams {
                clustering: true,
                cluster_threshold: 0.7,
                ..CellParams::default()
            },
        );
        assert!(gated.sites().len() < open.sites().len());
    }

    #[test]
    fn clustered_sites_survive_amplitude_tweaks_but_not_mask_changes() {
        let mut field = CellField::new(
            17,
            CellParams {
                clustering: true,
                ..CellParams::default()
            },
        );
        let before: Vec<Vec2> = field.sites().iter().map(|s| s.position).collect();

        let mut params = *field.params();
        params.height_multiplier = 12.0;
        params.edge_influence = 0.8;
        field.set_params(params);
        let after: Vec<Vec2> = field.sites().iter().map(|s| s.position).collect();
        assert_eq!(before, after);

        params.cluster_threshold = 0.9;
        field.set_params(params);
        assert_ne!(
            field.sites().len(),
            before.len(),
            "tightened mask should keep fewer sites"
        );
    }

    #[test]
    fn inverted_height_range_is_rejected_by_validate() {
        let params = CellParams {
            min_height: 2.0,
            max_height: 1.0,
            ..CellParams::default()
        };
        assert!(params.validate().is_err());
        // Generation still clamps instead of panicking.
        let field = CellField::new(6, params);
        assert!(field
            .sites()
            .iter()
            .all(|s| (1.0..=2.0).contains(&s.height_weight)));
    }
}
