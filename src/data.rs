//! Soil Store Loading
//!
//! Loads reference profiles and the four crop requirement tables with Polars.
//! Each table may be CSV or Parquet; the file extension decides.
//!
//! **Reference profile columns** (one row per horizon):
//!   component_id, soil_unit_name, top, bottom, texture_id, cf, sand, silt,
//!   clay, bulk, awc, tot_n, ecec, orgc, phaq, teb, cecs, cecc, bsat, alsa,
//!   esp, elco, tceq, gyps, phase1, phase2, roots, il, swr, add_prop,
//!   drain_num, t_dc, s_dc, ref_depth
//!
//! Site columns (phase1 onward) repeat on every horizon row; the first row of
//! a component is used.
//!
//! **Requirement columns**:
//!   - profile:  crop_id, input_level, sqi, property, threshold, score
//!   - texture:  crop_id, input_level, sqi, texture_id, score
//!   - phase:    crop_id, input_level, sqi, property, phase_id, score
//!   - drainage: crop_id, input_level, sqi, pscl, drain_num, score

use crate::config::{InputLevel, RatingConfig};
use crate::error::{RatingError, RatingResult};
use crate::profile::{Chemistry, Horizon, ReferenceProfile, SiteProperties, MAX_RATING_DEPTH};
use crate::requirements::{
    DrainageRequirement, PhaseProperty, PhaseRequirement, ProfileProperty, ProfileRequirement,
    RequirementSet, RequirementStore, StoredRow, TextureRequirement,
};
use crate::utils::texture::{Pscl, TextureClass};
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reference profiles and requirement rows held in memory
#[derive(Debug, Clone, Default)]
pub struct SoilDatabase {
    profiles: FxHashMap<String, ReferenceProfile>,
    requirements: RequirementStore,
}

impl SoilDatabase {
    /// Build a database from already-parsed records
    pub fn new(profiles: impl IntoIterator<Item = ReferenceProfile>, requirements: RequirementStore) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.component_id.clone(), p))
            .collect();
        SoilDatabase { profiles, requirements }
    }

    /// Load all five tables from the configured data directory
    pub fn load(config: &RatingConfig) -> Result<Self> {
        info!(data_dir = ?config.data_dir, "Loading soil store");
        let tables = &config.tables;

        let profiles = load_reference_profiles(&config.table_path(&tables.reference_profiles))?;
        let requirements = RequirementStore {
            profile: load_profile_requirements(&config.table_path(&tables.profile_requirements))?,
            texture: load_texture_requirements(&config.table_path(&tables.texture_requirements))?,
            phase: load_phase_requirements(&config.table_path(&tables.phase_requirements))?,
            drainage: load_drainage_requirements(&config.table_path(&tables.drainage_requirements))?,
        };

        info!(
            components = profiles.len(),
            profile_rows = requirements.profile.len(),
            texture_rows = requirements.texture.len(),
            phase_rows = requirements.phase.len(),
            drainage_rows = requirements.drainage.len(),
            "Soil store loaded"
        );

        Ok(Self::new(profiles, requirements))
    }

    /// Reference profile of a soil component
    pub fn profile(&self, component_id: &str) -> RatingResult<&ReferenceProfile> {
        self.profiles
            .get(component_id)
            .ok_or_else(|| RatingError::UnknownComponent(component_id.to_string()))
    }

    /// Requirement rows of a crop at an input level
    pub fn requirements(&self, crop_id: &str, level: InputLevel) -> RequirementSet {
        debug!(crop_id, level = %level, codes = ?level.expanded_codes(), "Selecting requirement rows");
        let set = self.requirements.lookup(crop_id, level);
        if set.is_empty() {
            warn!(crop_id, level = %level, "No requirement rows for crop");
        }
        set
    }

    pub fn requirement_store(&self) -> &RequirementStore {
        &self.requirements
    }

    /// Component ids, sorted
    pub fn component_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ============================================================================
// Table Readers
// ============================================================================

/// Read a CSV or Parquet table into a DataFrame
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {:?}", path))?
            .collect()
            .with_context(|| format!("Failed to load parquet: {:?}", path))
    } else {
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load CSV: {:?}", path))
    }
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;
    Ok(column.f64()?.clone())
}

/// Numeric column that the store may omit entirely
fn optional_f64_column(df: &DataFrame, name: &str) -> Result<Option<Float64Chunked>> {
    if df.column(name).is_err() {
        return Ok(None);
    }
    f64_column(df, name).map(Some)
}

fn str_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' is not string type", name))?;
    Ok(column.str()?.clone())
}

fn value(column: &Option<Float64Chunked>, row: usize) -> Option<f64> {
    column.as_ref().and_then(|c| c.get(row))
}

fn required_value(column: &Float64Chunked, name: &str, row: usize) -> Result<f64> {
    column
        .get(row)
        .with_context(|| format!("Row {}: column '{}' is empty", row, name))
}

/// Small non-negative integer code (SQI, input level, texture id)
fn required_code(column: &Float64Chunked, name: &str, row: usize) -> Result<u8> {
    let value = required_value(column, name, row)?;
    if !value.is_finite() {
        anyhow::bail!("Row {}: column '{}' is not a finite number", row, name);
    }
    u8::try_from(value.round() as i64)
        .with_context(|| format!("Row {}: column '{}' value {} is out of range 0-255", row, name, value))
}

fn required_str<'a>(column: &'a StringChunked, name: &str, row: usize) -> Result<&'a str> {
    column
        .get(row)
        .with_context(|| format!("Row {}: column '{}' is empty", row, name))
}

// ============================================================================
// Reference Profiles
// ============================================================================

/// Columns of the reference profile table, as typed arrays
struct ProfileColumns {
    component_id: StringChunked,
    soil_unit_name: Option<StringChunked>,
    top: Float64Chunked,
    bottom: Float64Chunked,
    numeric: FxHashMap<&'static str, Option<Float64Chunked>>,
}

const OPTIONAL_PROFILE_COLUMNS: &[&str] = &[
    "texture_id", "cf", "sand", "silt", "clay", "bulk", "awc", "tot_n", "ecec", "orgc", "phaq",
    "teb", "cecs", "cecc", "bsat", "alsa", "esp", "elco", "tceq", "gyps", "phase1", "phase2",
    "roots", "il", "swr", "add_prop", "drain_num", "t_dc", "s_dc", "ref_depth",
];

impl ProfileColumns {
    fn read(df: &DataFrame) -> Result<Self> {
        let soil_unit_name = if df.column("soil_unit_name").is_ok() {
            Some(str_column(df, "soil_unit_name")?)
        } else {
            None
        };

        let mut numeric = FxHashMap::default();
        for &name in OPTIONAL_PROFILE_COLUMNS {
            numeric.insert(name, optional_f64_column(df, name)?);
        }

        Ok(ProfileColumns {
            component_id: str_column(df, "component_id")?,
            soil_unit_name,
            top: f64_column(df, "top")?,
            bottom: f64_column(df, "bottom")?,
            numeric,
        })
    }

    fn get(&self, name: &str, row: usize) -> Option<f64> {
        self.numeric.get(name).and_then(|column| value(column, row))
    }

    fn get_id(&self, name: &str, row: usize) -> Option<i32> {
        self.get(name, row).map(|v| v.round() as i32)
    }

    fn horizon(&self, row: usize) -> Result<Horizon> {
        let texture = self
            .get_id("texture_id", row)
            .and_then(|id| u8::try_from(id).ok())
            .and_then(TextureClass::from_id);

        Ok(Horizon {
            top: required_value(&self.top, "top", row)?,
            bottom: required_value(&self.bottom, "bottom", row)?,
            texture,
            coarse_fragments: self.get("cf", row),
            sand: self.get("sand", row),
            silt: self.get("silt", row),
            clay: self.get("clay", row),
            bulk_density_class: self.get("bulk", row),
            awc: self.get("awc", row),
            total_nitrogen: self.get("tot_n", row),
            ecec: self.get("ecec", row),
            chemistry: Chemistry {
                orgc: self.get("orgc", row),
                phaq: self.get("phaq", row),
                teb: self.get("teb", row),
                cecs: self.get("cecs", row),
                cecc: self.get("cecc", row),
                bsat: self.get("bsat", row),
                alsa: self.get("alsa", row),
                esp: self.get("esp", row),
                elco: self.get("elco", row),
                tceq: self.get("tceq", row),
                gyps: self.get("gyps", row),
            },
        })
    }

    fn site(&self, row: usize) -> SiteProperties {
        SiteProperties {
            phase1: self.get_id("phase1", row),
            phase2: self.get_id("phase2", row),
            roots: self.get_id("roots", row).unwrap_or(0),
            il: self.get_id("il", row).unwrap_or(0),
            swr: self.get_id("swr", row).unwrap_or(0),
            add_prop: self.get_id("add_prop", row).unwrap_or(0),
            drain_num: self.get_id("drain_num", row).unwrap_or(0),
            t_dc: self.get("t_dc", row),
            s_dc: self.get("s_dc", row),
            ref_depth: self.get("ref_depth", row).unwrap_or(MAX_RATING_DEPTH),
        }
    }
}

/// Load horizon rows and group them into one profile per component
pub fn load_reference_profiles(path: &Path) -> Result<Vec<ReferenceProfile>> {
    let df = read_table(path)?;
    let columns = ProfileColumns::read(&df).with_context(|| format!("Reading {:?}", path))?;

    let mut profiles: FxHashMap<String, ReferenceProfile> = FxHashMap::default();
    for row in 0..df.height() {
        let component_id = required_str(&columns.component_id, "component_id", row)?;
        let horizon = columns
            .horizon(row)
            .with_context(|| format!("Reading {:?}", path))?;

        let profile = profiles
            .entry(component_id.to_string())
            .or_insert_with(|| ReferenceProfile {
                component_id: component_id.to_string(),
                soil_unit_name: columns
                    .soil_unit_name
                    .as_ref()
                    .and_then(|c| c.get(row))
                    .unwrap_or_default()
                    .to_string(),
                site: columns.site(row),
                horizons: Vec::new(),
            });
        profile.horizons.push(horizon);
    }

    let mut profiles: Vec<ReferenceProfile> = profiles.into_values().collect();
    for profile in profiles.iter_mut() {
        profile
            .horizons
            .sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(Ordering::Equal));
    }
    profiles.sort_by(|a, b| a.component_id.cmp(&b.component_id));

    debug!(path = ?path, components = profiles.len(), rows = df.height(), "Loaded reference profiles");
    Ok(profiles)
}

// ============================================================================
// Requirement Tables
// ============================================================================

/// Crop id, input-level code and SQI columns shared by every requirement table
struct KeyColumns {
    crop_id: StringChunked,
    input_level: Float64Chunked,
    sqi: Float64Chunked,
}

impl KeyColumns {
    fn read(df: &DataFrame) -> Result<Self> {
        Ok(KeyColumns {
            crop_id: str_column(df, "crop_id")?,
            input_level: f64_column(df, "input_level")?,
            sqi: f64_column(df, "sqi")?,
        })
    }

    fn stored<T>(&self, row: usize, make: impl FnOnce(u8) -> T) -> Result<StoredRow<T>> {
        let crop_id = required_str(&self.crop_id, "crop_id", row)?;
        let input_code = required_code(&self.input_level, "input_level", row)?;
        let sqi = required_code(&self.sqi, "sqi", row)?;
        Ok(StoredRow {
            crop_id: crop_id.to_string(),
            input_code,
            row: make(sqi),
        })
    }
}

pub fn load_profile_requirements(path: &Path) -> Result<Vec<StoredRow<ProfileRequirement>>> {
    let df = read_table(path)?;
    let keys = KeyColumns::read(&df)?;
    let property = str_column(&df, "property")?;
    let threshold = f64_column(&df, "threshold")?;
    let score = f64_column(&df, "score")?;

    let rows = (0..df.height())
        .map(|row| {
            let property: ProfileProperty = required_str(&property, "property", row)?
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Row {} of {:?}", row, path))?;
            let threshold = required_value(&threshold, "threshold", row)?;
            let score = required_value(&score, "score", row)?;
            keys.stored(row, |sqi| ProfileRequirement {
                sqi,
                property,
                threshold,
                score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(path = ?path, rows = rows.len(), "Loaded profile requirements");
    Ok(rows)
}

pub fn load_texture_requirements(path: &Path) -> Result<Vec<StoredRow<TextureRequirement>>> {
    let df = read_table(path)?;
    let keys = KeyColumns::read(&df)?;
    let texture_id = f64_column(&df, "texture_id")?;
    let score = f64_column(&df, "score")?;

    let rows = (0..df.height())
        .map(|row| {
            let texture_id = required_code(&texture_id, "texture_id", row)?;
            let score = required_value(&score, "score", row)?;
            keys.stored(row, |sqi| TextureRequirement {
                sqi,
                texture_id,
                score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(path = ?path, rows = rows.len(), "Loaded texture requirements");
    Ok(rows)
}

pub fn load_phase_requirements(path: &Path) -> Result<Vec<StoredRow<PhaseRequirement>>> {
    let df = read_table(path)?;
    let keys = KeyColumns::read(&df)?;
    let property = str_column(&df, "property")?;
    let phase_id = f64_column(&df, "phase_id")?;
    let score = f64_column(&df, "score")?;

    let rows = (0..df.height())
        .map(|row| {
            let property: PhaseProperty = required_str(&property, "property", row)?
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Row {} of {:?}", row, path))?;
            let phase_id = required_value(&phase_id, "phase_id", row)?.round() as i32;
            let score = required_value(&score, "score", row)?;
            keys.stored(row, |sqi| PhaseRequirement {
                sqi,
                property,
                phase_id,
                score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(path = ?path, rows = rows.len(), "Loaded phase requirements");
    Ok(rows)
}

pub fn load_drainage_requirements(path: &Path) -> Result<Vec<StoredRow<DrainageRequirement>>> {
    let df = read_table(path)?;
    let keys = KeyColumns::read(&df)?;
    let pscl = str_column(&df, "pscl")?;
    let drain_num = f64_column(&df, "drain_num")?;
    let score = f64_column(&df, "score")?;

    let rows = (0..df.height())
        .map(|row| {
            let pscl: Pscl = required_str(&pscl, "pscl", row)?
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Row {} of {:?}", row, path))?;
            let drain_num = required_value(&drain_num, "drain_num", row)?.round() as i32;
            let score = required_value(&score, "score", row)?;
            keys.stored(row, |sqi| DrainageRequirement {
                sqi,
                pscl,
                drain_num,
                score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(path = ?path, rows = rows.len(), "Loaded drainage requirements");
    Ok(rows)
}
