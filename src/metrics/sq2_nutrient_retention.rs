//! SQ2: NUTRIENT RETENTION CAPACITY
//!
//! Scores how well the soil holds applied nutrients. Rated at every input
//! level; texture joins the factor set only at high input level.
//!
//! **Per-layer factor set** (minimum law with mitigation):
//!   - topsoil: base saturation, CEC of the soil, [texture]
//!   - subsoil: base saturation, CEC of the clay fraction, pH, [texture]

use crate::config::DepthWeightType;
use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::metrics::{score_layers, LayerScores};
use crate::requirements::{ProfileProperty, RequirementSet};
use crate::utils::depth_weights::weighted_mean;
use crate::utils::threshold::{aggregate_mitigated, clamp_score};
use smallvec::SmallVec;

const SQI: u8 = 2;

/// Result of SQ2 calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Sq2Result {
    /// Depth-weighted score (0-100)
    pub score: f64,
    pub layer_scores: LayerScores,
}

/// Calculate SQ2: Nutrient Retention Capacity
///
/// `include_texture` is set at high input level.
pub fn calculate_sq2(
    profile: &WorkingProfile,
    requirements: &RequirementSet,
    depth_weight: DepthWeightType,
    include_texture: bool,
) -> RatingResult<Sq2Result> {
    let bs = requirements.threshold_table(SQI, ProfileProperty::Bs);
    let cecs = requirements.threshold_table(SQI, ProfileProperty::Cecs);
    let cecc = requirements.threshold_table(SQI, ProfileProperty::Cecc);
    let ph = requirements.threshold_table(SQI, ProfileProperty::Ph);

    let layer_scores = score_layers(&profile.layers, |index, layer| {
        let chemistry = &layer.chemistry;
        let mut factors: SmallVec<[f64; 4]> = SmallVec::new();
        factors.push(bs.score(chemistry.bsat));
        if index == 0 {
            factors.push(cecs.score(chemistry.cecs));
        } else {
            factors.push(cecc.score(chemistry.cecc));
            factors.push(ph.score(chemistry.phaq));
        }
        if include_texture {
            factors.push(requirements.texture_score(SQI, layer.texture));
        }
        aggregate_mitigated(&factors)
    });

    let score = clamp_score(weighted_mean(&layer_scores, depth_weight)?);
    Ok(Sq2Result { score, layer_scores })
}
