//! SQ4: OXYGEN AVAILABILITY TO ROOTS
//!
//! Profile-level only: the plain minimum of the soil water regime, the
//! impermeable layer, drainage for the topsoil particle-size group, and the
//! two soil phases.

use crate::error::RatingResult;
use crate::layers::WorkingProfile;
use crate::requirements::{PhaseProperty, RequirementSet};
use crate::utils::threshold::{clamp_score, min_score};

const SQI: u8 = 4;

/// Result of SQ4 calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sq4Result {
    pub score: f64,
    pub soil_water_regime: f64,
    pub impermeable_layer: f64,
    pub drainage: f64,
    pub phase1: f64,
    pub phase2: f64,
}

/// Calculate SQ4: Oxygen Availability
///
/// The IL row is mandatory; drainage is keyed by the topsoil PSCL.
pub fn calculate_sq4(profile: &WorkingProfile, requirements: &RequirementSet) -> RatingResult<Sq4Result> {
    let site = &profile.site;
    let topsoil_pscl = profile.topsoil().and_then(|layer| layer.pscl);

    let soil_water_regime = requirements.categorical_score(SQI, PhaseProperty::Swr, site.swr);
    let impermeable_layer = requirements.required_phase_score(SQI, PhaseProperty::Il, site.il)?;
    let drainage = requirements.drainage_score(SQI, topsoil_pscl, site.drain_num);
    let phase1 = requirements.phase_score(SQI, PhaseProperty::Phase, site.phase1);
    let phase2 = requirements.phase_score(SQI, PhaseProperty::Phase, site.phase2);

    let score = clamp_score(min_score(&[
        soil_water_regime,
        impermeable_layer,
        drainage,
        phase1,
        phase2,
    ]));

    Ok(Sq4Result {
        score,
        soil_water_regime,
        impermeable_layer,
        drainage,
        phase1,
        phase2,
    })
}
