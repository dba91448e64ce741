//! USDA Soil Texture Classification
//!
//! Fixed conversion tables used when rebuilding a profile from user horizons:
//! - texture class → GAEZ class id (1-12)
//! - texture class → class-mean sand/clay percent
//! - texture class → particle-size-class group (PSCL)
//! - rock-fragment class label → coarse-fragment percent
//!
//! Classification of a (sand, silt, clay) triple follows the USDA textural
//! triangle as a decision cascade, checked top to bottom.

use crate::error::{RatingError, RatingResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance (percent) on sand + silt + clay summing to 100
const SUM_TOLERANCE: f64 = 1.0;

/// One of the twelve USDA texture classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureClass {
    Clay,
    SiltyClay,
    SiltyClayLoam,
    ClayLoam,
    Silt,
    SiltLoam,
    SandyClay,
    Loam,
    SandyClayLoam,
    SandyLoam,
    LoamySand,
    Sand,
}

/// Particle-size-class group used by the drainage tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pscl {
    Coarse,
    Medium,
    Fine,
}

/// All texture classes in GAEZ id order (1 = clay … 12 = sand)
pub static TEXTURE_CLASSES: [TextureClass; 12] = [
    TextureClass::Clay,
    TextureClass::SiltyClay,
    TextureClass::SiltyClayLoam,
    TextureClass::ClayLoam,
    TextureClass::Silt,
    TextureClass::SiltLoam,
    TextureClass::SandyClay,
    TextureClass::Loam,
    TextureClass::SandyClayLoam,
    TextureClass::SandyLoam,
    TextureClass::LoamySand,
    TextureClass::Sand,
];

impl TextureClass {
    /// GAEZ texture class id (1-12)
    pub fn id(&self) -> u8 {
        match self {
            TextureClass::Clay => 1,
            TextureClass::SiltyClay => 2,
            TextureClass::SiltyClayLoam => 3,
            TextureClass::ClayLoam => 4,
            TextureClass::Silt => 5,
            TextureClass::SiltLoam => 6,
            TextureClass::SandyClay => 7,
            TextureClass::Loam => 8,
            TextureClass::SandyClayLoam => 9,
            TextureClass::SandyLoam => 10,
            TextureClass::LoamySand => 11,
            TextureClass::Sand => 12,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        TEXTURE_CLASSES.iter().copied().find(|class| class.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextureClass::Clay => "Clay",
            TextureClass::SiltyClay => "Silty Clay",
            TextureClass::SiltyClayLoam => "Silty Clay Loam",
            TextureClass::ClayLoam => "Clay Loam",
            TextureClass::Silt => "Silt",
            TextureClass::SiltLoam => "Silt Loam",
            TextureClass::SandyClay => "Sandy Clay",
            TextureClass::Loam => "Loam",
            TextureClass::SandyClayLoam => "Sandy Clay Loam",
            TextureClass::SandyLoam => "Sandy Loam",
            TextureClass::LoamySand => "Loamy Sand",
            TextureClass::Sand => "Sand",
        }
    }

    /// Class-mean (sand %, clay %) used for user-declared horizons
    pub fn mean_sand_clay(&self) -> (f64, f64) {
        match self {
            TextureClass::Sand => (92.0, 5.0),
            TextureClass::LoamySand => (80.0, 7.5),
            TextureClass::SandyLoam => (61.5, 10.0),
            TextureClass::SandyClayLoam => (62.5, 27.5),
            TextureClass::Loam => (37.5, 17.0),
            TextureClass::Silt => (10.0, 6.0),
            TextureClass::SiltLoam => (25.0, 13.5),
            TextureClass::SiltyClayLoam => (10.0, 33.5),
            TextureClass::ClayLoam => (32.5, 33.5),
            TextureClass::SandyClay => (55.0, 45.0),
            TextureClass::SiltyClay => (10.0, 50.0),
            TextureClass::Clay => (22.5, 70.0),
        }
    }

    pub fn pscl(&self) -> Pscl {
        match self {
            TextureClass::Sand | TextureClass::LoamySand | TextureClass::SandyLoam => Pscl::Coarse,
            TextureClass::SandyClay | TextureClass::SiltyClay | TextureClass::Clay => Pscl::Fine,
            _ => Pscl::Medium,
        }
    }
}

impl fmt::Display for TextureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureClass {
    type Err = RatingError;

    /// Case-insensitive; spaces, underscores and hyphens are interchangeable
    fn from_str(s: &str) -> RatingResult<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        TEXTURE_CLASSES
            .iter()
            .copied()
            .find(|class| class.name().replace(' ', "").to_ascii_lowercase() == key)
            .ok_or_else(|| RatingError::UnknownTextureClass(s.to_string()))
    }
}

impl Pscl {
    pub fn code(&self) -> &'static str {
        match self {
            Pscl::Coarse => "C",
            Pscl::Medium => "M",
            Pscl::Fine => "F",
        }
    }
}

impl FromStr for Pscl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim() {
            "C" | "c" => Ok(Pscl::Coarse),
            "M" | "m" => Ok(Pscl::Medium),
            "F" | "f" => Ok(Pscl::Fine),
            other => Err(format!("Unknown PSCL group '{}'", other)),
        }
    }
}

// ============================================================================
// Rock Fragments
// ============================================================================

/// Coarse-fragment percent for a user rock-fragment class label
pub fn rock_fragment_percent(label: &str) -> RatingResult<f64> {
    let key: String = label.chars().filter(|c| !c.is_whitespace()).collect();
    match key.as_str() {
        "0-1%" => Ok(0.0),
        "1-15%" => Ok(8.0),
        "15-35%" => Ok(25.0),
        "35-60%" => Ok(48.0),
        ">60%" => Ok(80.0),
        _ => Err(RatingError::UnknownRockFragmentClass(label.to_string())),
    }
}

// ============================================================================
// Classification Cascade
// ============================================================================

/// Classify soil texture from sand, silt and clay percentages.
///
/// Returns None if the triple does not sum to ~100% or fits no class.
pub fn classify_texture(sand: f64, silt: f64, clay: f64) -> Option<TextureClass> {
    if (sand + silt + clay - 100.0).abs() > SUM_TOLERANCE {
        return None;
    }
    if sand < -SUM_TOLERANCE || silt < -SUM_TOLERANCE || clay < -SUM_TOLERANCE {
        return None;
    }

    let class = if silt + 1.5 * clay < 15.0 {
        TextureClass::Sand
    } else if silt + 2.0 * clay < 30.0 {
        TextureClass::LoamySand
    } else if (clay >= 7.0 && clay < 20.0 && sand > 52.0)
        || (clay < 7.0 && silt < 50.0)
    {
        TextureClass::SandyLoam
    } else if clay >= 7.0 && clay < 27.0 && silt >= 28.0 && silt < 50.0 && sand <= 52.0 {
        TextureClass::Loam
    } else if (silt >= 50.0 && clay >= 12.0 && clay < 27.0)
        || (silt >= 50.0 && silt < 80.0 && clay < 12.0)
    {
        TextureClass::SiltLoam
    } else if silt >= 80.0 && clay < 12.0 {
        TextureClass::Silt
    } else if clay >= 20.0 && clay < 35.0 && silt < 28.0 && sand > 45.0 {
        TextureClass::SandyClayLoam
    } else if clay >= 27.0 && clay < 40.0 && sand > 20.0 && sand <= 45.0 {
        TextureClass::ClayLoam
    } else if clay >= 27.0 && clay < 40.0 && sand <= 20.0 {
        TextureClass::SiltyClayLoam
    } else if clay >= 35.0 && sand > 45.0 {
        TextureClass::SandyClay
    } else if clay >= 40.0 && silt >= 40.0 {
        TextureClass::SiltyClay
    } else if clay >= 40.0 && sand <= 45.0 && silt < 40.0 {
        TextureClass::Clay
    } else {
        return None;
    };

    Some(class)
}

/// Classify texture from sand and clay only (silt = 100 - sand - clay).
pub fn classify_texture_from_sand_clay(sand: f64, clay: f64) -> Option<TextureClass> {
    classify_texture(sand, 100.0 - sand - clay, clay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_means_classify_to_their_own_class() {
        for class in TEXTURE_CLASSES.iter() {
            let (sand, clay) = class.mean_sand_clay();
            assert_eq!(
                classify_texture_from_sand_clay(sand, clay),
                Some(*class),
                "mean of {} misclassified",
                class
            );
        }
    }

    #[test]
    fn test_ids_round_trip() {
        assert_eq!(TextureClass::Loam.id(), 8);
        assert_eq!(TextureClass::LoamySand.id(), 11);
        assert_eq!(TextureClass::from_id(1), Some(TextureClass::Clay));
        assert_eq!(TextureClass::from_id(13), None);
    }

    #[test]
    fn test_pscl_map() {
        assert_eq!(TextureClass::SandyLoam.pscl(), Pscl::Coarse);
        assert_eq!(TextureClass::Loam.pscl(), Pscl::Medium);
        assert_eq!(TextureClass::SiltyClayLoam.pscl(), Pscl::Medium);
        assert_eq!(TextureClass::SiltyClay.pscl(), Pscl::Fine);
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!("loamy sand".parse::<TextureClass>().unwrap(), TextureClass::LoamySand);
        assert_eq!("Silty_Clay_Loam".parse::<TextureClass>().unwrap(), TextureClass::SiltyClayLoam);
        assert!("peat".parse::<TextureClass>().is_err());
    }

    #[test]
    fn test_mixed_layer_is_sandy_loam() {
        // 10 cm loamy sand over 10 cm loam
        assert_eq!(classify_texture_from_sand_clay(60.0, 13.75), Some(TextureClass::SandyLoam));
    }

    #[test]
    fn test_invalid_sum() {
        assert_eq!(classify_texture(30.0, 30.0, 30.0), None);
        assert_eq!(classify_texture_from_sand_clay(70.0, 40.0), None);
    }

    #[test]
    fn test_rock_fragment_classes() {
        assert_eq!(rock_fragment_percent("0-1%").unwrap(), 0.0);
        assert_eq!(rock_fragment_percent("15 - 35%").unwrap(), 25.0);
        assert_eq!(rock_fragment_percent(">60%").unwrap(), 80.0);
        assert!(rock_fragment_percent("lots").is_err());
    }
}
