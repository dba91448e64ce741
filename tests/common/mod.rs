//! Shared fixture: a loam reference profile and a maize-like requirement store.
//!
//! Requirement rows use input-level code 3 for SQ1 (Low and Intermediate),
//! code 5 for the SQ2 texture row (High only) and code 4 for everything else.

#![allow(dead_code)]

use gaez_soil_rating::profile::{Chemistry, Horizon, ReferenceProfile, SiteProperties};
use gaez_soil_rating::requirements::{
    DrainageRequirement, PhaseProperty, PhaseRequirement, ProfileProperty, ProfileRequirement,
    RequirementStore, StoredRow, TextureRequirement,
};
use gaez_soil_rating::utils::texture::{Pscl, TextureClass};
use gaez_soil_rating::SoilDatabase;

pub const CROP: &str = "maiz";
pub const COMPONENT: &str = "LV-001";
pub const SOIL_UNIT: &str = "Haplic Luvisols";

pub const ORGANIC_CARBON: [f64; 6] = [2.0, 1.5, 1.0, 0.7, 0.5, 0.3];

/// Six 20 cm loam horizons down to 120 cm
pub fn reference_profile() -> ReferenceProfile {
    let horizons = ORGANIC_CARBON
        .iter()
        .enumerate()
        .map(|(i, &orgc)| Horizon {
            top: i as f64 * 20.0,
            bottom: (i + 1) as f64 * 20.0,
            texture: Some(TextureClass::Loam),
            coarse_fragments: Some(5.0),
            sand: Some(40.0),
            silt: Some(40.0),
            clay: Some(20.0),
            chemistry: Chemistry {
                orgc: Some(orgc),
                phaq: Some(6.5),
                teb: Some(if i == 0 { 20.0 } else { 15.0 }),
                cecs: Some(30.0),
                cecc: Some(25.0),
                bsat: Some(85.0),
                esp: Some(2.0),
                elco: Some(0.2),
                tceq: Some(1.0),
                gyps: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        })
        .collect();

    ReferenceProfile {
        component_id: COMPONENT.to_string(),
        soil_unit_name: SOIL_UNIT.to_string(),
        site: SiteProperties {
            phase1: Some(0),
            phase2: Some(0),
            roots: 0,
            il: 0,
            swr: 0,
            add_prop: 0,
            drain_num: 5,
            t_dc: Some(1.0),
            s_dc: Some(1.0),
            ref_depth: 120.0,
        },
        horizons,
    }
}

fn stored<T>(code: u8, row: T) -> StoredRow<T> {
    StoredRow {
        crop_id: CROP.to_string(),
        input_code: code,
        row,
    }
}

fn thresholds(
    rows: &mut Vec<StoredRow<ProfileRequirement>>,
    code: u8,
    sqi: u8,
    property: ProfileProperty,
    pairs: &[(f64, f64)],
) {
    rows.extend(pairs.iter().map(|&(threshold, score)| {
        stored(code, ProfileRequirement { sqi, property, threshold, score })
    }));
}

const PH: &[(f64, f64)] = &[(8.5, 40.0), (7.5, 80.0), (5.5, 100.0), (5.0, 80.0), (4.5, 50.0), (0.0, 30.0)];

pub fn requirement_store() -> RequirementStore {
    let mut profile = Vec::new();

    // SQ1
    thresholds(&mut profile, 3, 1, ProfileProperty::Oc, &[(1.2, 100.0), (0.6, 90.0), (0.2, 75.0), (0.0, 50.0)]);
    thresholds(&mut profile, 3, 1, ProfileProperty::Ph, PH);
    thresholds(&mut profile, 3, 1, ProfileProperty::Teb, &[(10.0, 100.0), (5.0, 85.0), (2.0, 60.0), (0.0, 40.0)]);

    // SQ2
    thresholds(&mut profile, 4, 2, ProfileProperty::Bs, &[(90.0, 100.0), (80.0, 95.0), (50.0, 80.0), (0.0, 50.0)]);
    thresholds(
        &mut profile,
        4,
        2,
        ProfileProperty::Cecs,
        &[(40.0, 100.0), (24.0, 90.0), (16.0, 80.0), (8.0, 60.0), (0.0, 40.0)],
    );
    thresholds(&mut profile, 4, 2, ProfileProperty::Cecc, &[(40.0, 100.0), (24.0, 90.0), (16.0, 75.0), (0.0, 50.0)]);
    thresholds(&mut profile, 4, 2, ProfileProperty::Ph, PH);

    // SQ3 and SQ7
    thresholds(
        &mut profile,
        4,
        3,
        ProfileProperty::Rd,
        &[(100.0, 100.0), (75.0, 90.0), (50.0, 70.0), (25.0, 40.0), (0.0, 20.0)],
    );
    thresholds(&mut profile, 4, 3, ProfileProperty::Db, &[(1.0, 100.0), (2.0, 90.0), (3.0, 70.0), (5.0, 40.0)]);
    thresholds(
        &mut profile,
        4,
        3,
        ProfileProperty::Cf,
        &[(55.0, 20.0), (35.0, 50.0), (15.0, 80.0), (3.0, 95.0), (0.0, 100.0)],
    );
    thresholds(&mut profile, 4, 3, ProfileProperty::Ver, &[(0.0, 60.0)]);
    thresholds(&mut profile, 4, 3, ProfileProperty::Gel, &[(0.0, 30.0)]);
    thresholds(
        &mut profile,
        4,
        7,
        ProfileProperty::Cf,
        &[(55.0, 10.0), (35.0, 40.0), (15.0, 60.0), (3.0, 90.0), (0.0, 100.0)],
    );

    // SQ5 and SQ6
    thresholds(
        &mut profile,
        4,
        5,
        ProfileProperty::Esp,
        &[(6.0, 100.0), (15.0, 80.0), (25.0, 50.0), (40.0, 20.0), (100.0, 0.0)],
    );
    thresholds(
        &mut profile,
        4,
        5,
        ProfileProperty::Ec,
        &[(1.0, 100.0), (4.0, 80.0), (8.0, 50.0), (16.0, 20.0), (100.0, 0.0)],
    );
    thresholds(&mut profile, 4, 6, ProfileProperty::Ca, &[(3.0, 100.0), (15.0, 90.0), (25.0, 70.0), (100.0, 30.0)]);
    thresholds(&mut profile, 4, 6, ProfileProperty::Gy, &[(1.0, 100.0), (5.0, 90.0), (15.0, 60.0), (100.0, 20.0)]);

    let texture = vec![
        stored(3, TextureRequirement { sqi: 1, texture_id: TextureClass::Loam.id(), score: 90.0 }),
        stored(3, TextureRequirement { sqi: 1, texture_id: TextureClass::SandyLoam.id(), score: 80.0 }),
        stored(3, TextureRequirement { sqi: 1, texture_id: TextureClass::LoamySand.id(), score: 70.0 }),
        stored(5, TextureRequirement { sqi: 2, texture_id: TextureClass::Loam.id(), score: 85.0 }),
        stored(4, TextureRequirement { sqi: 3, texture_id: TextureClass::LoamySand.id(), score: 85.0 }),
        stored(4, TextureRequirement { sqi: 3, texture_id: TextureClass::SandyLoam.id(), score: 95.0 }),
    ];

    let phase = vec![
        stored(4, PhaseRequirement { sqi: 3, property: PhaseProperty::Roots, phase_id: 0, score: 100.0 }),
        stored(4, PhaseRequirement { sqi: 3, property: PhaseProperty::Il, phase_id: 0, score: 100.0 }),
        stored(4, PhaseRequirement { sqi: 4, property: PhaseProperty::Swr, phase_id: 0, score: 100.0 }),
        stored(4, PhaseRequirement { sqi: 4, property: PhaseProperty::Il, phase_id: 0, score: 100.0 }),
    ];

    let drainage = vec![stored(
        4,
        DrainageRequirement { sqi: 4, pscl: Pscl::Medium, drain_num: 5, score: 100.0 },
    )];

    RequirementStore { profile, texture, phase, drainage }
}

pub fn database() -> SoilDatabase {
    SoilDatabase::new(vec![reference_profile()], requirement_store())
}
