//! Layer Aggregation and the Working Profile
//!
//! GAEZ rates a profile over six fixed layers: 0-20, 20-40, 40-60, 60-80,
//! 80-100 and 100-120 cm (`sl1` … `sl6`). This module collapses 1 cm arrays into
//! those layers and holds the working profile the SQ scorers read.

use crate::profile::{Chemistry, Horizon, ReferenceProfile, SiteProperties, MAX_RATING_DEPTH};
use crate::utils::depth_weights::MAX_LAYERS;
use crate::utils::texture::{classify_texture_from_sand_clay, Pscl, TextureClass};
use serde::Serialize;

/// Thickness of one GAEZ layer (cm)
pub const LAYER_THICKNESS: usize = 20;

/// Number of 1 cm slices in the rated depth range
pub const SLICE_COUNT: usize = MAX_RATING_DEPTH as usize;

/// Aggregated value of one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerMean {
    /// Mean of the defined slices, rounded to two decimals; None if all unknown
    pub mean: Option<f64>,
    /// Layer bottom depth (cm)
    pub bottom: usize,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Collapse a 1 cm array into 20 cm layers down to `bottom` cm.
///
/// The last layer may be shorter than 20 cm; a bottom on a layer boundary
/// never produces an empty trailing layer.
pub fn aggregate_layers(slices: &[Option<f64>], bottom: usize) -> Vec<LayerMean> {
    let bottom = bottom.min(slices.len()).min(SLICE_COUNT);

    (0..bottom)
        .step_by(LAYER_THICKNESS)
        .map(|top| {
            let layer_bottom = (top + LAYER_THICKNESS).min(bottom);
            let defined: Vec<f64> = slices[top..layer_bottom].iter().flatten().copied().collect();
            let mean = if defined.is_empty() {
                None
            } else {
                Some(round2(defined.iter().sum::<f64>() / defined.len() as f64))
            };
            LayerMean {
                mean,
                bottom: layer_bottom,
            }
        })
        .collect()
}

/// Texture class and PSCL re-derived from aggregated sand and clay
pub fn derive_texture(sand: Option<f64>, clay: Option<f64>) -> Option<TextureClass> {
    match (sand, clay) {
        (Some(sand), Some(clay)) => classify_texture_from_sand_clay(sand, clay),
        _ => None,
    }
}

/// One layer of the working profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkingLayer {
    pub top: f64,
    pub bottom: f64,
    pub texture: Option<TextureClass>,
    pub pscl: Option<Pscl>,
    pub coarse_fragments: Option<f64>,
    pub chemistry: Chemistry,
}

impl WorkingLayer {
    pub fn from_horizon(horizon: &Horizon) -> Self {
        WorkingLayer {
            top: horizon.top,
            bottom: horizon.bottom,
            texture: horizon.texture,
            pscl: horizon.pscl(),
            coarse_fragments: horizon.coarse_fragments,
            chemistry: horizon.chemistry.clone(),
        }
    }
}

/// Depth-indexed profile the SQ scorers evaluate. Layer 0 is the topsoil.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkingProfile {
    pub soil_unit_name: String,
    pub site: SiteProperties,
    pub layers: Vec<WorkingLayer>,
}

impl WorkingProfile {
    /// Reference horizons starting above `depth_limit`, at most six
    pub fn from_reference(reference: &ReferenceProfile, depth_limit: f64) -> Self {
        let layers = reference
            .horizons
            .iter()
            .filter(|h| h.top < depth_limit)
            .take(MAX_LAYERS)
            .map(WorkingLayer::from_horizon)
            .collect();

        WorkingProfile {
            soil_unit_name: reference.soil_unit_name.clone(),
            site: reference.site.clone(),
            layers,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn topsoil(&self) -> Option<&WorkingLayer> {
        self.layers.first()
    }
}
