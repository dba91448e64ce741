//! SQ5: EXCESS SALTS (SALINITY / SODICITY)
//!
//! Layer score = `EC_score · ESP_score / 100`, capped by the two soil phase
//! scores; the layers are depth-weighted. Both EC and ESP walk ascending
//! tables (upper bounds).

use crate::config::DepthWeightType;
use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::metrics::{score_layers, LayerScores};
use crate::requirements::{PhaseProperty, ProfileProperty, RequirementSet};
use crate::utils::depth_weights::weighted_mean;
use crate::utils::threshold::clamp_score;

const SQI: u8 = 5;

/// Result of SQ5 calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Sq5Result {
    /// Depth-weighted score (0-100)
    pub score: f64,
    pub layer_scores: LayerScores,
}

/// Calculate SQ5: Salinity and Sodicity
pub fn calculate_sq5(
    profile: &WorkingProfile,
    requirements: &RequirementSet,
    depth_weight: DepthWeightType,
) -> RatingResult<Sq5Result> {
    let esp = requirements.threshold_table(SQI, ProfileProperty::Esp);
    let ec = requirements.threshold_table(SQI, ProfileProperty::Ec);
    let phase1 = requirements.phase_score(SQI, PhaseProperty::Phase, profile.site.phase1);
    let phase2 = requirements.phase_score(SQI, PhaseProperty::Phase, profile.site.phase2);

    let layer_scores = score_layers(&profile.layers, |_, layer| {
        let combined = ec.score(layer.chemistry.elco) * esp.score(layer.chemistry.esp) / 100.0;
        combined.min(phase1).min(phase2)
    });

    let score = clamp_score(weighted_mean(&layer_scores, depth_weight)?);
    Ok(Sq5Result { score, layer_scores })
}
