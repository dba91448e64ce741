//! SQ7: WORKABILITY
//!
//! Ease of tillage. Reuses the SQ3 rooting factors but aggregates each layer
//! with the minimum law with mitigation, so a single limitation does not
//! fully dominate.
//!
//! **Per-layer factor set** (ten scores):
//!   - rooting depth, texture (SQI 3), coarse fragments (SQI 7)
//!   - compactness (T_DC topsoil / S_DC subsoil), vertic, gelic
//!   - phase 1, phase 2, obstacles to roots, impermeable layer

use crate::config::DepthWeightType;
use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::metrics::sq3_rooting_conditions::{RootingFactors, ROOTING_SQI};
use crate::metrics::{score_layers, LayerScores};
use crate::requirements::{ProfileProperty, RequirementSet};
use crate::utils::depth_weights::weighted_mean;
use crate::utils::threshold::{aggregate_mitigated, clamp_score};
use smallvec::SmallVec;

const SQI: u8 = 7;

/// Result of SQ7 calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Sq7Result {
    /// Depth-weighted score (0-100)
    pub score: f64,
    pub layer_scores: LayerScores,
}

/// Calculate SQ7: Workability
///
/// `factors` are the profile-level rooting factors already evaluated for SQ3.
pub fn calculate_sq7(
    profile: &WorkingProfile,
    requirements: &RequirementSet,
    factors: &RootingFactors,
    depth_weight: DepthWeightType,
) -> RatingResult<Sq7Result> {
    let coarse = requirements.threshold_table(SQI, ProfileProperty::Cf);

    let layer_scores = score_layers(&profile.layers, |index, layer| {
        let mut set: SmallVec<[f64; 10]> = SmallVec::new();
        set.push(factors.rooting_depth);
        set.push(requirements.texture_score(ROOTING_SQI, layer.texture));
        set.push(coarse.score(layer.coarse_fragments));
        set.extend_from_slice(&factors.layer_constraints(index));
        aggregate_mitigated(&set)
    });

    let score = clamp_score(weighted_mean(&layer_scores, depth_weight)?);
    Ok(Sq7Result { score, layer_scores })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_fixtures::{loam_profile, rooting_requirements};
    use approx::assert_relative_eq;

    fn rate(profile: &WorkingProfile) -> Sq7Result {
        let requirements = rooting_requirements();
        let factors = RootingFactors::evaluate(profile, &requirements).unwrap();
        calculate_sq7(profile, &requirements, &factors, DepthWeightType::Standard).unwrap()
    }

    #[test]
    fn test_single_limitation_is_mitigated() {
        // coarse fragments 90, nine other factors at 100
        let result = rate(&loam_profile(6));
        assert!(result.layer_scores.iter().all(|&s| (s - 95.0).abs() < 1e-9));
        assert_relative_eq!(result.score, 95.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shallow_profile() {
        let mut profile = loam_profile(2);
        profile.site.ref_depth = 40.0;
        let result = rate(&profile);
        // min 40, rest (90 + 8 × 100) / 9
        assert_relative_eq!(result.score, (40.0 + 890.0 / 9.0) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vertic_profile() {
        let mut profile = loam_profile(6);
        profile.site.add_prop = 3;
        let result = rate(&profile);
        assert_relative_eq!(result.score, (60.0 + 890.0 / 9.0) / 2.0, epsilon = 1e-9);
    }
}
