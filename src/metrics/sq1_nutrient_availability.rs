//! SQ1: NUTRIENT AVAILABILITY
//!
//! Scores the supply of plant nutrients layer by layer and depth-weights the
//! result. Not rated at high input level, where fertiliser is assumed.
//!
//! **Per-layer factor set** (minimum law with mitigation):
//!   - topsoil: organic carbon, pH, total exchangeable bases, texture
//!   - subsoil: organic carbon, pH, texture
//!
//! OC, pH and TEB walk their SQI 1 threshold tables; texture is a categorical
//! lookup on the SQI 1 texture rows.

use crate::config::DepthWeightType;
use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::metrics::{score_layers, LayerScores};
use crate::requirements::{ProfileProperty, RequirementSet};
use crate::utils::depth_weights::weighted_mean;
use crate::utils::threshold::{aggregate_mitigated, clamp_score};
use smallvec::SmallVec;

const SQI: u8 = 1;

/// Result of SQ1 calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Sq1Result {
    /// Depth-weighted score (0-100)
    pub score: f64,
    pub layer_scores: LayerScores,
}

/// Calculate SQ1: Nutrient Availability
pub fn calculate_sq1(
    profile: &WorkingProfile,
    requirements: &RequirementSet,
    depth_weight: DepthWeightType,
) -> RatingResult<Sq1Result> {
    let oc = requirements.threshold_table(SQI, ProfileProperty::Oc);
    let ph = requirements.threshold_table(SQI, ProfileProperty::Ph);
    let teb = requirements.threshold_table(SQI, ProfileProperty::Teb);

    let layer_scores = score_layers(&profile.layers, |index, layer| {
        let chemistry = &layer.chemistry;
        let mut factors: SmallVec<[f64; 4]> = SmallVec::new();
        factors.push(oc.score(chemistry.orgc));
        factors.push(ph.score(chemistry.phaq));
        if index == 0 {
            factors.push(teb.score(chemistry.teb));
        }
        factors.push(requirements.texture_score(SQI, layer.texture));
        aggregate_mitigated(&factors)
    });

    let score = clamp_score(weighted_mean(&layer_scores, depth_weight)?);
    Ok(Sq1Result { score, layer_scores })
}
