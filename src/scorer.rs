//! Soil Rater - Main coordinator for rating soils
//!
//! Reconciles the working profile, runs the seven SQ scorers and composes the
//! soil rating. `rate_profile` is the pure core; `SoilRater` adds the soil
//! store lookup and a parallel (Rayon) batch mode.

use crate::config::{DepthWeightType, InputLevel};
use crate::data::SoilDatabase;
use crate::error::RatingResult;
use crate::metrics::*;
use crate::profile::{ReferenceProfile, UserObservation};
use crate::rating::{compose_rating, LayerBreakdown, SoilQualities, SoilRating};
use crate::reconcile::reconcile;
use crate::requirements::RequirementSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rate one reference profile for one crop.
///
/// The reference profile and requirement set are only read; calling twice
/// with the same inputs gives the same result.
pub fn rate_profile(
    reference: &ReferenceProfile,
    requirements: &RequirementSet,
    observation: Option<&UserObservation>,
    level: InputLevel,
    depth_weight: DepthWeightType,
) -> RatingResult<SoilRating> {
    let profile = reconcile(reference, observation)?;
    debug!(
        component_id = %reference.component_id,
        layers = profile.layer_count(),
        ref_depth = profile.site.ref_depth,
        "Working profile ready"
    );

    // SQ1 is not rated at high input
    let sq1 = match level {
        InputLevel::High => None,
        InputLevel::Low | InputLevel::Intermediate => Some(calculate_sq1(&profile, requirements, depth_weight)?),
    };
    let sq2 = calculate_sq2(&profile, requirements, depth_weight, level == InputLevel::High)?;
    let sq3 = calculate_sq3(&profile, requirements, depth_weight)?;
    let sq4 = calculate_sq4(&profile, requirements)?;
    let sq5 = calculate_sq5(&profile, requirements, depth_weight)?;
    let sq6 = calculate_sq6(&profile, requirements, depth_weight)?;
    let sq7 = calculate_sq7(&profile, requirements, &sq3.factors, depth_weight)?;

    let qualities = SoilQualities {
        sq1: sq1.as_ref().map(|r| r.score),
        sq2: sq2.score,
        sq3: sq3.score,
        sq4: sq4.score,
        sq5: sq5.score,
        sq6: sq6.score,
        sq7: sq7.score,
    };
    let sr = compose_rating(level, &qualities);
    debug!(?qualities, sr, level = %level, "Soil rating composed");

    Ok(SoilRating {
        soil_unit_name: profile.soil_unit_name.clone(),
        input_level: level,
        qualities,
        sr,
        layer_count: profile.layer_count(),
        layer_scores: LayerBreakdown {
            sq1: sq1.map(|r| r.layer_scores.to_vec()).unwrap_or_default(),
            sq2: sq2.layer_scores.to_vec(),
            sq3: sq3.layer_scores.to_vec(),
            sq5: sq5.layer_scores.to_vec(),
            sq6: sq6.layer_scores.to_vec(),
            sq7: sq7.layer_scores.to_vec(),
        },
    })
}

/// One rating request against the soil store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRequest {
    pub component_id: String,
    pub crop_id: String,
    pub input_level: InputLevel,
    #[serde(default)]
    pub depth_weight: DepthWeightType,
    #[serde(default)]
    pub observation: Option<UserObservation>,
}

/// Store-backed rater
pub struct SoilRater {
    database: SoilDatabase,
}

impl SoilRater {
    pub fn new(database: SoilDatabase) -> Self {
        SoilRater { database }
    }

    pub fn database(&self) -> &SoilDatabase {
        &self.database
    }

    /// Rate one request
    pub fn rate(&self, request: &RatingRequest) -> RatingResult<SoilRating> {
        let reference = self.database.profile(&request.component_id)?;
        let requirements = self.database.requirements(&request.crop_id, request.input_level);
        rate_profile(
            reference,
            &requirements,
            request.observation.as_ref(),
            request.input_level,
            request.depth_weight,
        )
    }

    /// Rate independent requests IN PARALLEL
    ///
    /// Results keep the order of `requests`; one failing request does not
    /// affect the others.
    pub fn rate_batch(&self, requests: &[RatingRequest]) -> Vec<RatingResult<SoilRating>> {
        requests.par_iter().map(|request| self.rate(request)).collect()
    }
}
