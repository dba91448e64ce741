//! Rate one soil component for one crop
//!
//! Loads the soil store, optionally merges a user field observation, and
//! prints the seven soil qualities and the soil rating.
//!
//! Run with:
//! ```bash
//! cargo run --release --bin rate_soil -- \
//!   --data-dir data --component 1234 --crop maiz --input-level I \
//!   --user-profile observation.json --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use gaez_soil_rating::{
    DepthWeightType, InputLevel, RatingConfig, RatingRequest, SoilDatabase, SoilRater,
    UserObservation,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// GAEZ agro-edaphic soil rating
#[derive(Parser, Debug)]
#[command(name = "rate_soil")]
#[command(about = "Rate a soil component for a crop (GAEZ v4 SQ1-SQ7 and SR)")]
struct Args {
    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the soil store tables
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Soil component id
    #[arg(long)]
    component: String,

    /// Crop id
    #[arg(long)]
    crop: String,

    /// Input level: L, I or H
    #[arg(long)]
    input_level: Option<InputLevel>,

    /// Depth-weight type: 1 (standard) or 2 (topsoil-skewed)
    #[arg(long)]
    depth_weight: Option<DepthWeightType>,

    /// JSON file with user-observed horizons and bedrock depth
    #[arg(long)]
    user_profile: Option<PathBuf>,

    /// Print the rating as JSON
    #[arg(long)]
    json: bool,
}

fn load_observation(path: &Path) -> Result<UserObservation> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read user profile: {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse user profile JSON: {:?}", path))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RatingConfig::load(path)?,
        None => RatingConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = args.input_level {
        config.input_level = level;
    }
    if let Some(depth_weight) = args.depth_weight {
        config.depth_weight_type = depth_weight;
    }

    let observation = args
        .user_profile
        .as_deref()
        .map(load_observation)
        .transpose()?;

    let rater = SoilRater::new(SoilDatabase::load(&config)?);
    let request = RatingRequest {
        component_id: args.component,
        crop_id: args.crop,
        input_level: config.input_level,
        depth_weight: config.depth_weight_type,
        observation,
    };
    info!(
        component_id = %request.component_id,
        crop_id = %request.crop_id,
        level = %request.input_level,
        "Rating soil"
    );

    let rating = rater.rate(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rating)?);
    } else {
        println!("{}", rating);
    }
    Ok(())
}
