//! Run Configuration
//!
//! Input level, depth-weight profile and the location of the requirement store.
//! The configuration file is plain JSON; every field has a default so a file
//! only needs to name what differs.

use crate::error::{RatingError, RatingResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Management input level of the GAEZ model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputLevel {
    /// Subsistence farming
    #[serde(rename = "L", alias = "l", alias = "low")]
    Low,
    #[serde(rename = "I", alias = "i", alias = "intermediate")]
    Intermediate,
    /// Fully mechanised, market oriented
    #[serde(rename = "H", alias = "h", alias = "high")]
    High,
}

impl InputLevel {
    /// Requirement-table codes consulted for this level.
    ///
    /// Codes 3 and 4 hold limits shared between levels; 1, 2 and 5 are
    /// level-specific.
    pub fn expanded_codes(&self) -> &'static [u8] {
        match self {
            InputLevel::Low => &[1, 3, 4],
            InputLevel::Intermediate => &[2, 3, 4],
            InputLevel::High => &[4, 5],
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InputLevel::Low => "L",
            InputLevel::Intermediate => "I",
            InputLevel::High => "H",
        }
    }
}

impl fmt::Display for InputLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for InputLevel {
    type Err = RatingError;

    fn from_str(s: &str) -> RatingResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(InputLevel::Low),
            "i" | "intermediate" => Ok(InputLevel::Intermediate),
            "h" | "high" => Ok(InputLevel::High),
            _ => Err(RatingError::InvalidInputLevel(s.to_string())),
        }
    }
}

/// Which depth-weight row set is applied to per-layer scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DepthWeightType {
    #[default]
    Standard,
    /// Heavily topsoil-skewed weights
    TopsoilSkewed,
}

impl TryFrom<u8> for DepthWeightType {
    type Error = RatingError;

    fn try_from(value: u8) -> RatingResult<Self> {
        match value {
            1 => Ok(DepthWeightType::Standard),
            2 => Ok(DepthWeightType::TopsoilSkewed),
            other => Err(RatingError::InvalidDepthWeightType(other.to_string())),
        }
    }
}

impl From<DepthWeightType> for u8 {
    fn from(value: DepthWeightType) -> u8 {
        match value {
            DepthWeightType::Standard => 1,
            DepthWeightType::TopsoilSkewed => 2,
        }
    }
}

impl FromStr for DepthWeightType {
    type Err = RatingError;

    fn from_str(s: &str) -> RatingResult<Self> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| RatingError::InvalidDepthWeightType(s.to_string()))
            .and_then(DepthWeightType::try_from)
    }
}

/// File names of the five store tables inside `data_dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub reference_profiles: String,
    pub profile_requirements: String,
    pub texture_requirements: String,
    pub phase_requirements: String,
    pub drainage_requirements: String,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            reference_profiles: "reference_profiles.csv".to_string(),
            profile_requirements: "profile_requirements.csv".to_string(),
            texture_requirements: "texture_requirements.csv".to_string(),
            phase_requirements: "phase_requirements.csv".to_string(),
            drainage_requirements: "drainage_requirements.csv".to_string(),
        }
    }
}

/// Rating run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Directory holding the requirement store tables
    pub data_dir: PathBuf,
    pub input_level: InputLevel,
    pub depth_weight_type: DepthWeightType,
    pub tables: TableFiles,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            input_level: InputLevel::Intermediate,
            depth_weight_type: DepthWeightType::Standard,
            tables: TableFiles::default(),
        }
    }
}

impl RatingConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rating config: {:?}", path))?;

        let config: RatingConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse rating config JSON: {:?}", path))?;

        Ok(config)
    }

    /// Full path of a table file inside the data directory
    pub fn table_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}
