//! Soil quality scorers
//!
//! Each soil quality (SQ1-SQ7) is implemented in its own module. Scorers read
//! the working profile and a requirement set and never mutate either.

pub mod sq1_nutrient_availability;
pub mod sq2_nutrient_retention;
pub mod sq3_rooting_conditions;
pub mod sq4_oxygen_availability;
pub mod sq5_salinity_sodicity;
pub mod sq6_lime_gypsum;
pub mod sq7_workability;

// Re-export scorer functions
pub use sq1_nutrient_availability::{calculate_sq1, Sq1Result};
pub use sq2_nutrient_retention::{calculate_sq2, Sq2Result};
pub use sq3_rooting_conditions::{calculate_sq3, RootingFactors, Sq3Result};
pub use sq4_oxygen_availability::{calculate_sq4, Sq4Result};
pub use sq5_salinity_sodicity::{calculate_sq5, Sq5Result};
pub use sq6_lime_gypsum::{calculate_sq6, Sq6Result};
pub use sq7_workability::{calculate_sq7, Sq7Result};

use crate::layers::WorkingLayer;
use crate::utils::depth_weights::MAX_LAYERS;
use smallvec::SmallVec;

/// Per-layer scores, topsoil first
pub type LayerScores = SmallVec<[f64; MAX_LAYERS]>;

/// Score every layer with `score`, which receives the layer index (0 = topsoil)
pub(crate) fn score_layers<F>(layers: &[WorkingLayer], mut score: F) -> LayerScores
where
    F: FnMut(usize, &WorkingLayer) -> f64,
{
    layers
        .iter()
        .enumerate()
        .map(|(index, layer)| score(index, layer))
        .collect()
}

/// Shared requirement-table fixture for the scorer unit tests
#[cfg(test)]
pub(crate) mod test_fixtures {
    use crate::layers::{WorkingLayer, WorkingProfile};
    use crate::profile::{Chemistry, SiteProperties};
    use crate::requirements::{
        DrainageRequirement, PhaseProperty, PhaseRequirement, ProfileProperty,
        ProfileRequirement, RequirementSet, TextureRequirement,
    };
    use crate::utils::texture::{Pscl, TextureClass};

    pub fn profile_rows(sqi: u8, property: ProfileProperty, pairs: &[(f64, f64)]) -> Vec<ProfileRequirement> {
        pairs
            .iter()
            .map(|&(threshold, score)| ProfileRequirement { sqi, property, threshold, score })
            .collect()
    }

    pub fn phase_row(sqi: u8, property: PhaseProperty, phase_id: i32, score: f64) -> PhaseRequirement {
        PhaseRequirement { sqi, property, phase_id, score }
    }

    /// Loam layer with mid-range chemistry, topsoil values
    pub fn loam_layer(index: usize) -> WorkingLayer {
        WorkingLayer {
            top: index as f64 * 20.0,
            bottom: (index + 1) as f64 * 20.0,
            texture: Some(TextureClass::Loam),
            pscl: Some(Pscl::Medium),
            coarse_fragments: Some(5.0),
            chemistry: Chemistry {
                orgc: Some(2.0),
                phaq: Some(6.5),
                teb: Some(20.0),
                cecs: Some(30.0),
                cecc: Some(25.0),
                bsat: Some(85.0),
                esp: Some(2.0),
                elco: Some(0.2),
                tceq: Some(1.0),
                gyps: Some(0.0),
                ..Default::default()
            },
        }
    }

    pub fn loam_profile(layers: usize) -> WorkingProfile {
        WorkingProfile {
            soil_unit_name: "Haplic Luvisols".to_string(),
            site: SiteProperties {
                drain_num: 5,
                t_dc: Some(1.0),
                s_dc: Some(1.0),
                ref_depth: 120.0,
                ..Default::default()
            },
            layers: (0..layers).map(loam_layer).collect(),
        }
    }

    /// Rooting-related requirement rows shared by SQ3 and SQ7
    pub fn rooting_requirements() -> RequirementSet {
        let mut profile = Vec::new();
        profile.extend(profile_rows(
            3,
            ProfileProperty::Rd,
            &[(100.0, 100.0), (75.0, 90.0), (50.0, 70.0), (25.0, 40.0), (0.0, 20.0)],
        ));
        profile.extend(profile_rows(
            3,
            ProfileProperty::Db,
            &[(1.0, 100.0), (2.0, 90.0), (3.0, 70.0), (5.0, 40.0)],
        ));
        profile.extend(profile_rows(
            3,
            ProfileProperty::Cf,
            &[(55.0, 20.0), (35.0, 50.0), (15.0, 80.0), (3.0, 95.0), (0.0, 100.0)],
        ));
        profile.extend(profile_rows(
            7,
            ProfileProperty::Cf,
            &[(55.0, 10.0), (35.0, 40.0), (15.0, 60.0), (3.0, 90.0), (0.0, 100.0)],
        ));
        profile.extend(profile_rows(3, ProfileProperty::Ver, &[(0.0, 60.0)]));
        profile.extend(profile_rows(3, ProfileProperty::Gel, &[(0.0, 30.0)]));

        RequirementSet::from_rows(
            profile,
            vec![
                TextureRequirement { sqi: 3, texture_id: TextureClass::LoamySand.id(), score: 85.0 },
                TextureRequirement { sqi: 3, texture_id: TextureClass::SandyLoam.id(), score: 95.0 },
            ],
            vec![
                phase_row(3, PhaseProperty::Roots, 0, 100.0),
                phase_row(3, PhaseProperty::Il, 0, 100.0),
                phase_row(3, PhaseProperty::Phase, 12, 50.0),
            ],
            Vec::<DrainageRequirement>::new(),
        )
    }
}
