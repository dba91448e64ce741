//! Depth Weights
//!
//! Per-layer multipliers applied before averaging layer scores into an SQ.
//! Each row sums to its layer count, so the weighted mean of equal layer
//! scores is that score.

use crate::config::DepthWeightType;
use crate::error::{RatingError, RatingResult};

/// Maximum number of GAEZ layers (0-120 cm in 20 cm steps)
pub const MAX_LAYERS: usize = 6;

static STANDARD: [&[f64]; MAX_LAYERS] = [
    &[1.0],
    &[1.25, 0.75],
    &[1.5, 1.0, 0.5],
    &[1.75, 1.25, 0.75, 0.25],
    &[1.75, 1.5, 1.0, 0.5, 0.25],
    &[2.0, 1.5, 1.0, 0.75, 0.5, 0.25],
];

static TOPSOIL_SKEWED: [&[f64]; MAX_LAYERS] = [
    &[1.0],
    &[1.6, 0.4],
    &[2.4, 0.4, 0.2],
    &[3.2, 0.4, 0.2, 0.2],
    &[4.0, 0.4, 0.2, 0.2, 0.2],
    &[4.8, 0.4, 0.2, 0.2, 0.2, 0.2],
];

/// Weight row for a working profile with `layers` layers
pub fn depth_weights(kind: DepthWeightType, layers: usize) -> RatingResult<&'static [f64]> {
    if layers == 0 || layers > MAX_LAYERS {
        return Err(RatingError::LayerCountMismatch { layers });
    }
    let table = match kind {
        DepthWeightType::Standard => &STANDARD,
        DepthWeightType::TopsoilSkewed => &TOPSOIL_SKEWED,
    };
    Ok(table[layers - 1])
}

/// Depth-weighted mean: mean over layers of `score * weight`
pub fn weighted_mean(layer_scores: &[f64], kind: DepthWeightType) -> RatingResult<f64> {
    let weights = depth_weights(kind, layer_scores.len())?;
    let total: f64 = layer_scores
        .iter()
        .zip(weights.iter())
        .map(|(score, weight)| score * weight)
        .sum();
    Ok(total / layer_scores.len() as f64)
}
