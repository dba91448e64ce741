//! SQ3: ROOTING CONDITIONS
//!
//! Scores the room a root system has to develop. Every layer takes the plain
//! minimum of its limiting factors as a fraction, the fractions are
//! depth-weighted, and the result is scaled by the rooting-depth score.
//!
//! **Profile-level factors** (`RootingFactors`, shared with SQ7):
//!   - reference rooting depth (`rd`, descending walk)
//!   - degree of compactness, topsoil `T_DC` and subsoil `S_DC` (`db`, ascending)
//!   - vertic and gelic properties (`ver`/`gel`, fixed scores when `ADD_PROP` flags them)
//!   - soil phases 1 and 2 (optional rows)
//!   - obstacles to roots and impermeable layer (mandatory rows)
//!
//! **Per-layer factors**: texture, coarse fragments.

use crate::config::DepthWeightType;
use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::metrics::{score_layers, LayerScores};
use crate::requirements::{PhaseProperty, ProfileProperty, RequirementSet};
use crate::utils::depth_weights::weighted_mean;
use crate::utils::threshold::{clamp_score, min_score, NO_CONSTRAINT};
use smallvec::SmallVec;

/// SQI code of the rooting tables, also consulted by SQ7
pub const ROOTING_SQI: u8 = 3;

/// Profile-level rooting factors, computed once per working profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootingFactors {
    pub rooting_depth: f64,
    pub topsoil_compactness: f64,
    pub subsoil_compactness: f64,
    pub vertic: f64,
    pub gelic: f64,
    pub phase1: f64,
    pub phase2: f64,
    pub roots: f64,
    pub impermeable_layer: f64,
}

impl RootingFactors {
    /// Score the profile-level factors from the SQI 3 tables.
    ///
    /// Fails when the ROOTS or IL row for the profile's id is missing.
    pub fn evaluate(profile: &WorkingProfile, requirements: &RequirementSet) -> RatingResult<Self> {
        let site = &profile.site;
        let compactness = requirements.threshold_table(ROOTING_SQI, ProfileProperty::Db);

        let vertic = if site.is_vertic() {
            requirements.flag_score(ROOTING_SQI, ProfileProperty::Ver)
        } else {
            NO_CONSTRAINT
        };
        let gelic = if site.is_gelic() {
            requirements.flag_score(ROOTING_SQI, ProfileProperty::Gel)
        } else {
            NO_CONSTRAINT
        };

        Ok(RootingFactors {
            rooting_depth: requirements
                .threshold_table(ROOTING_SQI, ProfileProperty::Rd)
                .score(Some(site.ref_depth)),
            topsoil_compactness: compactness.score(site.t_dc),
            subsoil_compactness: compactness.score(site.s_dc),
            vertic,
            gelic,
            phase1: requirements.phase_score(ROOTING_SQI, PhaseProperty::Phase, site.phase1),
            phase2: requirements.phase_score(ROOTING_SQI, PhaseProperty::Phase, site.phase2),
            roots: requirements.required_phase_score(ROOTING_SQI, PhaseProperty::Roots, site.roots)?,
            impermeable_layer: requirements.required_phase_score(ROOTING_SQI, PhaseProperty::Il, site.il)?,
        })
    }

    /// Compactness score for a layer index (0 = topsoil)
    pub fn compactness(&self, index: usize) -> f64 {
        if index == 0 {
            self.topsoil_compactness
        } else {
            self.subsoil_compactness
        }
    }

    /// Profile-level factors other than rooting depth, for a layer index
    pub fn layer_constraints(&self, index: usize) -> [f64; 7] {
        [
            self.compactness(index),
            self.vertic,
            self.gelic,
            self.phase1,
            self.phase2,
            self.roots,
            self.impermeable_layer,
        ]
    }
}

/// Result of SQ3 calculation
#[derive(Debug, Clone, PartialEq)]
pub struct Sq3Result {
    /// Rooting-depth score times the depth-weighted layer fraction (0-100)
    pub score: f64,
    /// Per-layer minimum as a fraction (0-1)
    pub layer_scores: LayerScores,
    pub factors: RootingFactors,
}

/// Plain minimum over texture, coarse fragments and the profile-level constraints
fn layer_minimum(texture: f64, coarse: f64, constraints: &[f64; 7]) -> f64 {
    let mut all: SmallVec<[f64; 9]> = SmallVec::new();
    all.push(texture);
    all.push(coarse);
    all.extend_from_slice(constraints);
    min_score(&all)
}

/// Calculate SQ3: Rooting Conditions
pub fn calculate_sq3(
    profile: &WorkingProfile,
    requirements: &RequirementSet,
    depth_weight: DepthWeightType,
) -> RatingResult<Sq3Result> {
    let factors = RootingFactors::evaluate(profile, requirements)?;

    let coarse = requirements.threshold_table(ROOTING_SQI, ProfileProperty::Cf);

    let layer_scores = score_layers(&profile.layers, |index, layer| {
        let minimum = layer_minimum(
            requirements.texture_score(ROOTING_SQI, layer.texture),
            coarse.score(layer.coarse_fragments),
            &factors.layer_constraints(index),
        );
        minimum / 100.0
    });

    let fraction = weighted_mean(&layer_scores, depth_weight)?;
    let score = clamp_score(factors.rooting_depth * fraction);
    Ok(Sq3Result {
        score,
        layer_scores,
        factors,
    })
}
