//! Crop Requirement Tables
//!
//! Four flat tables describe how a crop responds to soil conditions:
//! - profile:  (SQI, property, threshold, score)
//! - texture:  (SQI, texture class id, score)
//! - phase:    (SQI, PHASE | ROOTS | IL | SWR, phase id, score)
//! - drainage: (SQI, PSCL, drainage class, score)
//!
//! The store keeps rows for every crop and input-level code; `RequirementStore::lookup`
//! cuts out the `RequirementSet` one rating run consults.

use crate::config::InputLevel;
use crate::error::{RatingError, RatingResult};
use crate::utils::texture::{Pscl, TextureClass};
use crate::utils::threshold::{ThresholdRow, ThresholdTable, WalkDirection, NO_CONSTRAINT};
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// Property codes of the profile requirement table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileProperty {
    /// Organic carbon
    Oc,
    Ph,
    /// Total exchangeable bases
    Teb,
    /// Base saturation
    Bs,
    Cecs,
    Cecc,
    /// Reference rooting depth
    Rd,
    /// Degree of compactness (topsoil and subsoil classes)
    Db,
    /// Coarse fragments
    Cf,
    Esp,
    Ec,
    /// Calcium carbonate
    Ca,
    /// Gypsum
    Gy,
    /// Vertic properties flag
    Ver,
    /// Gelic properties flag
    Gel,
}

impl ProfileProperty {
    pub fn code(&self) -> &'static str {
        match self {
            ProfileProperty::Oc => "oc",
            ProfileProperty::Ph => "ph",
            ProfileProperty::Teb => "teb",
            ProfileProperty::Bs => "bs",
            ProfileProperty::Cecs => "cecs",
            ProfileProperty::Cecc => "cecc",
            ProfileProperty::Rd => "rd",
            ProfileProperty::Db => "db",
            ProfileProperty::Cf => "cf",
            ProfileProperty::Esp => "esp",
            ProfileProperty::Ec => "ec",
            ProfileProperty::Ca => "ca",
            ProfileProperty::Gy => "gy",
            ProfileProperty::Ver => "ver",
            ProfileProperty::Gel => "gel",
        }
    }

    /// Walk direction of this property's threshold tables
    pub fn direction(&self) -> WalkDirection {
        match self {
            ProfileProperty::Db
            | ProfileProperty::Esp
            | ProfileProperty::Ec
            | ProfileProperty::Ca
            | ProfileProperty::Gy => WalkDirection::Ascending,
            _ => WalkDirection::Descending,
        }
    }
}

impl FromStr for ProfileProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let property = match s.trim().to_ascii_lowercase().as_str() {
            "oc" => ProfileProperty::Oc,
            "ph" => ProfileProperty::Ph,
            "teb" => ProfileProperty::Teb,
            "bs" => ProfileProperty::Bs,
            "cecs" => ProfileProperty::Cecs,
            "cecc" => ProfileProperty::Cecc,
            "rd" => ProfileProperty::Rd,
            "db" => ProfileProperty::Db,
            "cf" => ProfileProperty::Cf,
            "esp" => ProfileProperty::Esp,
            "ec" => ProfileProperty::Ec,
            "ca" => ProfileProperty::Ca,
            "gy" => ProfileProperty::Gy,
            "ver" => ProfileProperty::Ver,
            "gel" => ProfileProperty::Gel,
            other => return Err(format!("Unknown profile property '{}'", other)),
        };
        Ok(property)
    }
}

/// Property codes of the phase requirement table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseProperty {
    Phase,
    Roots,
    Il,
    Swr,
}

impl fmt::Display for PhaseProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            PhaseProperty::Phase => "PHASE",
            PhaseProperty::Roots => "ROOTS",
            PhaseProperty::Il => "IL",
            PhaseProperty::Swr => "SWR",
        };
        f.write_str(code)
    }
}

impl FromStr for PhaseProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PHASE" => Ok(PhaseProperty::Phase),
            "ROOTS" => Ok(PhaseProperty::Roots),
            "IL" => Ok(PhaseProperty::Il),
            "SWR" => Ok(PhaseProperty::Swr),
            other => Err(format!("Unknown phase property '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRequirement {
    pub sqi: u8,
    pub property: ProfileProperty,
    pub threshold: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRequirement {
    pub sqi: u8,
    pub texture_id: u8,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseRequirement {
    pub sqi: u8,
    pub property: PhaseProperty,
    pub phase_id: i32,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrainageRequirement {
    pub sqi: u8,
    pub pscl: Pscl,
    pub drain_num: i32,
    pub score: f64,
}

/// A requirement row as held by the store, tagged with crop and input-level code
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow<T> {
    pub crop_id: String,
    pub input_code: u8,
    pub row: T,
}

/// Requirement rows of one crop at one input level
#[derive(Debug, Clone, Default)]
pub struct RequirementSet {
    profile: Vec<ProfileRequirement>,
    texture: FxHashMap<(u8, u8), f64>,
    phase: FxHashMap<(u8, PhaseProperty, i32), f64>,
    drainage: FxHashMap<(u8, Pscl, i32), f64>,
}

impl RequirementSet {
    /// Build a set from rows in priority order.
    ///
    /// Where categorical rows repeat a key the first one is kept.
    pub fn from_rows(
        profile: Vec<ProfileRequirement>,
        texture: impl IntoIterator<Item = TextureRequirement>,
        phase: impl IntoIterator<Item = PhaseRequirement>,
        drainage: impl IntoIterator<Item = DrainageRequirement>,
    ) -> Self {
        let mut set = RequirementSet {
            profile,
            ..Default::default()
        };
        for row in texture {
            set.texture.entry((row.sqi, row.texture_id)).or_insert(row.score);
        }
        for row in phase {
            set.phase
                .entry((row.sqi, row.property, row.phase_id))
                .or_insert(row.score);
        }
        for row in drainage {
            set.drainage
                .entry((row.sqi, row.pscl, row.drain_num))
                .or_insert(row.score);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
            && self.texture.is_empty()
            && self.phase.is_empty()
            && self.drainage.is_empty()
    }

    /// Threshold table for one (SQI, property) pair, in walk order
    pub fn threshold_table(&self, sqi: u8, property: ProfileProperty) -> ThresholdTable {
        let rows = self
            .profile
            .iter()
            .filter(|r| r.sqi == sqi && r.property == property)
            .map(|r| ThresholdRow {
                threshold: r.threshold,
                score: r.score,
            })
            .collect();
        ThresholdTable::new(property.direction(), rows)
    }

    /// Fixed score of a flag property (`ver`, `gel`); no rows means no constraint
    pub fn flag_score(&self, sqi: u8, property: ProfileProperty) -> f64 {
        self.profile
            .iter()
            .filter(|r| r.sqi == sqi && r.property == property)
            .map(|r| r.score)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.min(s))))
            .unwrap_or(NO_CONSTRAINT)
    }

    /// Texture score; unknown texture or missing row is no constraint
    pub fn texture_score(&self, sqi: u8, texture: Option<TextureClass>) -> f64 {
        texture
            .and_then(|t| self.texture.get(&(sqi, t.id())).copied())
            .unwrap_or(NO_CONSTRAINT)
    }

    /// Optional phase score: id 0, unknown id or missing row is no constraint
    pub fn phase_score(&self, sqi: u8, property: PhaseProperty, phase_id: Option<i32>) -> f64 {
        match phase_id {
            None | Some(0) => NO_CONSTRAINT,
            Some(id) => self
                .phase
                .get(&(sqi, property, id))
                .copied()
                .unwrap_or(NO_CONSTRAINT),
        }
    }

    /// Categorical phase-table score (SWR): every id is looked up, a missing row is no constraint
    pub fn categorical_score(&self, sqi: u8, property: PhaseProperty, id: i32) -> f64 {
        self.phase
            .get(&(sqi, property, id))
            .copied()
            .unwrap_or(NO_CONSTRAINT)
    }

    /// Mandatory phase score (ROOTS, IL): a missing row is a data error
    pub fn required_phase_score(
        &self,
        sqi: u8,
        property: PhaseProperty,
        phase_id: i32,
    ) -> RatingResult<f64> {
        self.phase
            .get(&(sqi, property, phase_id))
            .copied()
            .ok_or_else(|| RatingError::MissingPhaseRequirement {
                sqi,
                property: property.to_string(),
                phase_id,
            })
    }

    /// Drainage score keyed by topsoil PSCL; missing row is no constraint
    pub fn drainage_score(&self, sqi: u8, pscl: Option<Pscl>, drain_num: i32) -> f64 {
        pscl.and_then(|p| self.drainage.get(&(sqi, p, drain_num)).copied())
            .unwrap_or(NO_CONSTRAINT)
    }
}

/// All requirement rows of the store
#[derive(Debug, Clone, Default)]
pub struct RequirementStore {
    pub profile: Vec<StoredRow<ProfileRequirement>>,
    pub texture: Vec<StoredRow<TextureRequirement>>,
    pub phase: Vec<StoredRow<PhaseRequirement>>,
    pub drainage: Vec<StoredRow<DrainageRequirement>>,
}

/// Rows of one crop whose code is in `codes`, lowest code first
fn select_rows<T: Copy>(rows: &[StoredRow<T>], crop_id: &str, codes: &[u8]) -> Vec<T> {
    let mut matching: Vec<&StoredRow<T>> = rows
        .iter()
        .filter(|r| r.crop_id == crop_id && codes.contains(&r.input_code))
        .collect();
    matching.sort_by_key(|r| r.input_code);
    matching.into_iter().map(|r| r.row).collect()
}

impl RequirementStore {
    /// Requirement rows for a crop and an explicit set of input-level codes
    pub fn select(&self, crop_id: &str, codes: &[u8]) -> RequirementSet {
        RequirementSet::from_rows(
            select_rows(&self.profile, crop_id, codes),
            select_rows(&self.texture, crop_id, codes),
            select_rows(&self.phase, crop_id, codes),
            select_rows(&self.drainage, crop_id, codes),
        )
    }

    /// Requirement rows for a crop at an input level
    pub fn lookup(&self, crop_id: &str, level: InputLevel) -> RequirementSet {
        self.select(crop_id, level.expanded_codes())
    }
}
