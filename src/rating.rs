//! Rating Composer
//!
//! Combines the seven soil qualities into the soil rating (SR) with the
//! formula of the requested input level, and defines the result record
//! returned to callers.

use crate::config::InputLevel;
use crate::utils::threshold::{clamp_score, min_score, NO_CONSTRAINT};
use serde::{Serialize, Serializer};
use std::fmt;

/// Scores of the seven soil qualities (0-100). SQ1 is undefined at high input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SoilQualities {
    #[serde(serialize_with = "serialize_optional_score")]
    pub sq1: Option<f64>,
    pub sq2: f64,
    pub sq3: f64,
    pub sq4: f64,
    pub sq5: f64,
    pub sq6: f64,
    pub sq7: f64,
}

/// Undefined scores are written as the string "NA"
fn serialize_optional_score<S: Serializer>(score: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match score {
        Some(value) => serializer.serialize_f64(*value),
        None => serializer.serialize_str("NA"),
    }
}

/// Compose the soil rating for an input level:
///
/// | Level | SR |
/// | ----- | -- |
/// | L | SQ1 · SQ3/100 · min(SQ4, SQ5, SQ6, SQ7)/100 |
/// | I | (SQ1 + SQ2)/2 · SQ3/100 · min(SQ4, SQ5, SQ6, SQ7)/100 |
/// | H | SQ2 · SQ3/100 · min(SQ4, SQ7)/100 |
///
/// An undefined SQ1 imposes no constraint at L and I.
pub fn compose_rating(level: InputLevel, qualities: &SoilQualities) -> f64 {
    let q = qualities;
    let sq1 = q.sq1.unwrap_or(NO_CONSTRAINT);

    let sr = match level {
        InputLevel::Low => sq1 * (q.sq3 / 100.0) * (min_score(&[q.sq4, q.sq5, q.sq6, q.sq7]) / 100.0),
        InputLevel::Intermediate => {
            0.5 * (sq1 + q.sq2) * (q.sq3 / 100.0) * (min_score(&[q.sq4, q.sq5, q.sq6, q.sq7]) / 100.0)
        }
        InputLevel::High => q.sq2 * (q.sq3 / 100.0) * (min_score(&[q.sq4, q.sq7]) / 100.0),
    };
    clamp_score(sr)
}

/// Per-layer detail behind the layered soil qualities, topsoil first.
///
/// SQ3 layer values are fractions (0-1); the others are scores (0-100).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerBreakdown {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sq1: Vec<f64>,
    pub sq2: Vec<f64>,
    pub sq3: Vec<f64>,
    pub sq5: Vec<f64>,
    pub sq6: Vec<f64>,
    pub sq7: Vec<f64>,
}

/// Result of one rating run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilRating {
    pub soil_unit_name: String,
    pub input_level: InputLevel,
    #[serde(flatten)]
    pub qualities: SoilQualities,
    /// Composite soil rating (0-100)
    pub sr: f64,
    /// Layers in the working profile
    pub layer_count: usize,
    pub layer_scores: LayerBreakdown,
}

impl SoilRating {
    pub fn sq1(&self) -> Option<f64> {
        self.qualities.sq1
    }
}

impl fmt::Display for SoilRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = &self.qualities;
        write!(f, "{} [{}]: SQ1 ", self.soil_unit_name, self.input_level)?;
        match q.sq1 {
            Some(sq1) => write!(f, "{:.1}", sq1)?,
            None => f.write_str("NA")?,
        }
        write!(
            f,
            "  SQ2 {:.1}  SQ3 {:.1}  SQ4 {:.1}  SQ5 {:.1}  SQ6 {:.1}  SQ7 {:.1}  SR {:.1}",
            q.sq2, q.sq3, q.sq4, q.sq5, q.sq6, q.sq7, self.sr
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn qualities(sq1: Option<f64>, sq2: f64) -> SoilQualities {
        SoilQualities {
            sq1,
            sq2,
            sq3: 100.0,
            sq4: 100.0,
            sq5: 100.0,
            sq6: 100.0,
            sq7: 100.0,
        }
    }

    #[test]
    fn test_intermediate_averages_sq1_and_sq2() {
        let q = qualities(Some(80.0), 80.0);
        assert_relative_eq!(compose_rating(InputLevel::Intermediate, &q), 80.0);

        let q = qualities(Some(90.0), 70.0);
        assert_relative_eq!(compose_rating(InputLevel::Intermediate, &q), 80.0);
    }

    #[test]
    fn test_low_ignores_sq2() {
        let mut q = qualities(Some(90.0), 10.0);
        q.sq3 = 50.0;
        q.sq5 = 80.0;
        assert_relative_eq!(compose_rating(InputLevel::Low, &q), 90.0 * 0.5 * 0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_high_uses_sq4_and_sq7_only() {
        let mut q = qualities(None, 90.0);
        q.sq5 = 10.0;
        q.sq6 = 10.0;
        q.sq7 = 50.0;
        assert_relative_eq!(compose_rating(InputLevel::High, &q), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rating_is_clamped() {
        let q = qualities(Some(140.0), 130.0);
        assert_eq!(compose_rating(InputLevel::Intermediate, &q), 100.0);
    }

    #[test]
    fn test_serialize_na() {
        let rating = SoilRating {
            soil_unit_name: "Haplic Luvisols".to_string(),
            input_level: InputLevel::High,
            qualities: qualities(None, 90.0),
            sr: 90.0,
            layer_count: 6,
            layer_scores: LayerBreakdown::default(),
        };
        let json = serde_json::to_value(&rating).unwrap();
        assert_eq!(json["sq1"], "NA");
        assert_eq!(json["sq2"], 90.0);
        assert_eq!(json["input_level"], "H");
        assert!(json["layer_scores"].get("sq1").is_none());

        let line = rating.to_string();
        assert!(line.starts_with("Haplic Luvisols [H]: SQ1 NA"));
        assert!(line.ends_with("SR 90.0"));
    }
}
