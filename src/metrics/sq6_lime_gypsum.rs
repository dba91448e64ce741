//! SQ6: LIME AND GYPSUM
//!
//! Same shape as SQ5 with calcium carbonate (`ca`) and gypsum (`gy`):
//! layer score = `gypsum_score · CaCO3_score / 100`, capped by the soil phases.

use crate::config::DepthWeightType;
use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::metrics::{score_layers, LayerScores};
use crate::requirements::{PhaseProperty, ProfileProperty, RequirementSet};
use crate::utils::depth_weights::weighted_mean;
use crate::utils::threshold::clamp_score;

const SQI: u8 = 6;

/// Result of SQ6 calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Sq6Result {
    /// Depth-weighted score (0-100)
    pub score: f64,
    pub layer_scores: LayerScores,
}

/// Calculate SQ6: Lime and Gypsum Toxicity
pub fn calculate_sq6(
    profile: &WorkingProfile,
    requirements: &RequirementSet,
    depth_weight: DepthWeightType,
) -> RatingResult<Sq6Result> {
    let lime = requirements.threshold_table(SQI, ProfileProperty::Ca);
    let gypsum = requirements.threshold_table(SQI, ProfileProperty::Gy);
    let phase1 = requirements.phase_score(SQI, PhaseProperty::Phase, profile.site.phase1);
    let phase2 = requirements.phase_score(SQI, PhaseProperty::Phase, profile.site.phase2);

    let layer_scores = score_layers(&profile.layers, |_, layer| {
        let combined = gypsum.score(layer.chemistry.gyps) * lime.score(layer.chemistry.tceq) / 100.0;
        combined.min(phase1).min(phase2)
    });

    let score = clamp_score(weighted_mean(&layer_scores, depth_weight)?);
    Ok(Sq6Result { score, layer_scores })
}
