// End-to-end rating scenarios on a loam profile with a maize-like crop
//
// Run with: cargo test --test scenarios

mod common;

use approx::assert_relative_eq;
use common::{database, reference_profile, requirement_store, COMPONENT, CROP, SOIL_UNIT};
use gaez_soil_rating::{
    rate_profile, DepthWeightType, InputLevel, RatingError, RatingRequest, ReferenceProfile,
    SoilRater, SoilRating, UserHorizon, UserObservation,
};

const EPS: f64 = 1e-6;

fn rate(
    reference: &ReferenceProfile,
    observation: Option<&UserObservation>,
    level: InputLevel,
) -> SoilRating {
    let requirements = requirement_store().lookup(CROP, level);
    rate_profile(reference, &requirements, observation, level, DepthWeightType::Standard).unwrap()
}

fn bedrock(depth: f64) -> UserObservation {
    UserObservation {
        horizons: Vec::new(),
        bedrock: Some(depth),
    }
}

// ============================================================================
// Pristine loam, intermediate input
// ============================================================================

#[test]
fn pristine_loam_intermediate_input() {
    let rating = rate(&reference_profile(), None, InputLevel::Intermediate);
    let q = &rating.qualities;

    assert_eq!(rating.soil_unit_name, SOIL_UNIT);
    assert_eq!(rating.layer_count, 6);
    assert_eq!(rating.layer_scores.sq1, vec![95.0, 95.0, 92.5, 92.5, 85.0, 85.0]);

    assert_relative_eq!(q.sq1.unwrap(), 558.125 / 6.0, epsilon = EPS);
    assert_relative_eq!(q.sq2, 560.0 / 6.0, epsilon = EPS);
    assert_relative_eq!(q.sq3, 95.0, epsilon = EPS);
    assert_relative_eq!(q.sq4, 100.0, epsilon = EPS);
    assert_relative_eq!(q.sq5, 100.0, epsilon = EPS);
    assert_relative_eq!(q.sq6, 100.0, epsilon = EPS);
    assert_relative_eq!(q.sq7, 95.0, epsilon = EPS);

    let expected_sr = 0.5 * (558.125 / 6.0 + 560.0 / 6.0) * 0.95 * 0.95;
    assert_relative_eq!(rating.sr, expected_sr, epsilon = EPS);
    assert!(rating.sr >= 80.0);
}

// ============================================================================
// Shallow bedrock
// ============================================================================

#[test]
fn shallow_bedrock_limits_rooting() {
    let reference = reference_profile();
    let pristine = rate(&reference, None, InputLevel::Intermediate);
    let rating = rate(&reference, Some(&bedrock(40.0)), InputLevel::Intermediate);
    let q = &rating.qualities;

    assert_eq!(rating.layer_count, 2);
    assert_relative_eq!(q.sq1.unwrap(), 95.0, epsilon = EPS);
    assert_relative_eq!(q.sq2, 92.96875, epsilon = EPS);
    // rooting depth 40 cm scores 40
    assert_relative_eq!(q.sq3, 38.0, epsilon = EPS);
    assert_relative_eq!(q.sq7, (40.0 + 890.0 / 9.0) / 2.0, epsilon = EPS);

    let expected_sr = 0.5 * (95.0 + 92.96875) * 0.38 * (q.sq7 / 100.0);
    assert_relative_eq!(rating.sr, expected_sr, epsilon = EPS);
    assert!(rating.sr < pristine.sr);
}

// ============================================================================
// Saline subsoil
// ============================================================================

#[test]
fn saline_subsoil_lowers_sq5() {
    let pristine_reference = reference_profile();
    let mut reference = reference_profile();
    for horizon in reference.horizons.iter_mut().skip(2) {
        horizon.chemistry.elco = Some(8.0);
    }

    let pristine = rate(&pristine_reference, None, InputLevel::Low);
    let rating = rate(&reference, None, InputLevel::Low);
    let (p, q) = (&pristine.qualities, &rating.qualities);

    assert_relative_eq!(q.sq5, 475.0 / 6.0, epsilon = EPS);
    assert!(q.sq5 < p.sq5);
    assert_eq!(q.sq1, p.sq1);
    assert_eq!(q.sq2, p.sq2);
    assert_eq!(q.sq3, p.sq3);
    assert_eq!(q.sq4, p.sq4);
    assert_eq!(q.sq6, p.sq6);
    assert_eq!(q.sq7, p.sq7);

    // SQ5 is now the limiting factor of min(SQ4..SQ7)
    let expected_sr = q.sq1.unwrap() * (q.sq3 / 100.0) * (q.sq5 / 100.0);
    assert_relative_eq!(rating.sr, expected_sr, epsilon = EPS);
    assert_relative_eq!(rating.sr / pristine.sr, q.sq5 / p.sq7, epsilon = EPS);
}

// ============================================================================
// User overrides the surface
// ============================================================================

fn loamy_sand_surface() -> UserObservation {
    UserObservation {
        horizons: vec![UserHorizon {
            texture: Some("loamy sand".to_string()),
            rock_fragments: Some("15-35%".to_string()),
            bottom: Some(30.0),
        }],
        bedrock: None,
    }
}

#[test]
fn user_surface_override() {
    let reference = reference_profile();
    let observation = loamy_sand_surface();

    let pristine = rate(&reference, None, InputLevel::Intermediate);
    let rating = rate(&reference, Some(&observation), InputLevel::Intermediate);
    let q = &rating.qualities;

    assert_eq!(rating.layer_count, 6);
    // loamy sand 70 in sl1, sandy loam 80 in sl2
    assert_eq!(rating.layer_scores.sq1, vec![85.0, 90.0, 92.5, 92.5, 85.0, 85.0]);
    assert_relative_eq!(q.sq1.unwrap(), 530.625 / 6.0, epsilon = EPS);
    assert!(q.sq1 != pristine.qualities.sq1);

    // coarse fragments 25 % and 15 % score 80 in the rooting table
    assert_relative_eq!(q.sq3, 86.25, epsilon = EPS);
    assert!(q.sq7 < pristine.qualities.sq7);
    assert!(rating.sr < pristine.sr);

    let high_pristine = rate(&reference, None, InputLevel::High);
    let high = rate(&reference, Some(&observation), InputLevel::High);
    assert!(high.qualities.sq2 != high_pristine.qualities.sq2);
}

// ============================================================================
// Vertic properties
// ============================================================================

#[test]
fn vertic_flag_caps_rooting() {
    let pristine = rate(&reference_profile(), None, InputLevel::Intermediate);
    let mut reference = reference_profile();
    reference.site.add_prop = 3;
    let rating = rate(&reference, None, InputLevel::Intermediate);
    let (p, q) = (&pristine.qualities, &rating.qualities);

    assert_relative_eq!(q.sq3, 60.0, epsilon = EPS);
    assert_relative_eq!(q.sq7, (60.0 + 890.0 / 9.0) / 2.0, epsilon = EPS);
    assert_eq!(q.sq1, p.sq1);
    assert_eq!(q.sq2, p.sq2);
    assert_eq!(q.sq4, p.sq4);
    assert_eq!(q.sq5, p.sq5);
    assert_eq!(q.sq6, p.sq6);
    assert!(rating.sr < pristine.sr);
}

// ============================================================================
// High input level
// ============================================================================

#[test]
fn high_input_reports_sq1_na() {
    let rating = rate(&reference_profile(), None, InputLevel::High);
    let q = &rating.qualities;

    assert_eq!(q.sq1, None);
    assert!(rating.layer_scores.sq1.is_empty());
    // texture (loam 85) joins SQ2 at high input
    assert_eq!(rating.layer_scores.sq2[0], 88.75);
    assert_relative_eq!(q.sq2, 537.5 / 6.0, epsilon = EPS);
    assert_relative_eq!(rating.sr, (537.5 / 6.0) * 0.95 * 0.95, epsilon = EPS);

    let json = serde_json::to_value(&rating).unwrap();
    assert_eq!(json["sq1"], "NA");
}

#[test]
fn high_input_ignores_salinity_and_lime() {
    let mut reference = reference_profile();
    for horizon in reference.horizons.iter_mut() {
        horizon.chemistry.elco = Some(20.0);
    }
    let pristine = rate(&reference_profile(), None, InputLevel::High);
    let saline = rate(&reference, None, InputLevel::High);
    assert!(saline.qualities.sq5 < pristine.qualities.sq5);
    assert_eq!(saline.sr, pristine.sr);
}

// ============================================================================
// Rating properties
// ============================================================================

#[test]
fn every_score_is_in_range() {
    let reference = reference_profile();
    let observations = [None, Some(bedrock(40.0)), Some(loamy_sand_surface())];
    for level in [InputLevel::Low, InputLevel::Intermediate, InputLevel::High] {
        for observation in observations.iter() {
            let rating = rate(&reference, observation.as_ref(), level);
            let q = &rating.qualities;
            let scores = [q.sq1.unwrap_or(0.0), q.sq2, q.sq3, q.sq4, q.sq5, q.sq6, q.sq7, rating.sr];
            assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)), "{}", rating);
        }
    }
}

#[test]
fn empty_observation_passes_reference_through() {
    let reference = reference_profile();
    let empty = UserObservation {
        horizons: vec![UserHorizon {
            bottom: Some(20.0),
            ..Default::default()
        }],
        bedrock: None,
    };
    let without = rate(&reference, None, InputLevel::Intermediate);
    let with_empty = rate(&reference, Some(&empty), InputLevel::Intermediate);
    assert_eq!(without, with_empty);
}

#[test]
fn bedrock_at_60_cm_uses_three_layers() {
    let rating = rate(&reference_profile(), Some(&bedrock(60.0)), InputLevel::Intermediate);
    assert_eq!(rating.layer_count, 3);
    assert_eq!(rating.layer_scores.sq2.len(), 3);
    // rooting depth 60 cm scores 70
    assert_relative_eq!(rating.qualities.sq3, 70.0 * 0.95, epsilon = EPS);
}

#[test]
fn topsoil_skewed_weights_change_rating() {
    let reference = reference_profile();
    let requirements = requirement_store().lookup(CROP, InputLevel::Intermediate);
    let standard = rate_profile(&reference, &requirements, None, InputLevel::Intermediate, DepthWeightType::Standard).unwrap();
    let skewed =
        rate_profile(&reference, &requirements, None, InputLevel::Intermediate, DepthWeightType::TopsoilSkewed).unwrap();

    // topsoil SQ1 layer (95) beats the deepest (85), so more topsoil weight raises SQ1
    assert_eq!(standard.layer_scores.sq1, skewed.layer_scores.sq1);
    assert!(skewed.qualities.sq1.unwrap() > standard.qualities.sq1.unwrap());
}

#[test]
fn rating_is_deterministic() {
    let reference = reference_profile();
    let observation = loamy_sand_surface();
    let first = rate(&reference, Some(&observation), InputLevel::Intermediate);
    let second = rate(&reference, Some(&observation), InputLevel::Intermediate);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(reference, reference_profile());
}

// ============================================================================
// Store-backed rater
// ============================================================================

fn request(component_id: &str, level: InputLevel) -> RatingRequest {
    RatingRequest {
        component_id: component_id.to_string(),
        crop_id: CROP.to_string(),
        input_level: level,
        depth_weight: DepthWeightType::Standard,
        observation: None,
    }
}

#[test]
fn rater_matches_pure_driver() {
    let rater = SoilRater::new(database());
    let rating = rater.rate(&request(COMPONENT, InputLevel::Intermediate)).unwrap();
    assert_eq!(rating, rate(&reference_profile(), None, InputLevel::Intermediate));
}

#[test]
fn batch_keeps_order_and_isolates_failures() {
    let rater = SoilRater::new(database());
    let requests = vec![
        request(COMPONENT, InputLevel::Low),
        request("missing", InputLevel::Intermediate),
        request(COMPONENT, InputLevel::High),
    ];
    let results = rater.rate_batch(&requests);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().input_level, InputLevel::Low);
    assert_eq!(
        results[1].as_ref().unwrap_err(),
        &RatingError::UnknownComponent("missing".to_string())
    );
    assert_eq!(results[2].as_ref().unwrap().qualities.sq1, None);
}

#[test]
fn structural_user_errors_surface() {
    let rater = SoilRater::new(database());
    let mut req = request(COMPONENT, InputLevel::Intermediate);
    req.observation = Some(UserObservation {
        horizons: vec![UserHorizon {
            texture: Some("moon dust".to_string()),
            rock_fragments: None,
            bottom: Some(20.0),
        }],
        bedrock: None,
    });
    assert_eq!(
        rater.rate(&req),
        Err(RatingError::UnknownTextureClass("moon dust".to_string()))
    );
}
