//! GAEZ Soil Rating
//!
//! Agro-edaphic soil rating following the FAO GAEZ v4 model: seven soil
//! qualities (SQ1-SQ7) scored from a reference soil profile and a crop's
//! requirement tables, combined into a soil rating (SR) per input level.
//!
//! Module layout:
//! - `utils/`: texture classification, threshold walks, depth weights
//! - `profile`, `requirements`: input records
//! - `reconcile`, `layers`: user-profile reconciliation and the working profile
//! - `metrics/`: individual soil quality scorers (SQ1-SQ7)
//! - `rating`, `scorer`: rating composer and driver
//! - `data`: soil store loading with Polars

pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod profile;
pub mod rating;
pub mod reconcile;
pub mod requirements;
pub mod scorer;
pub mod utils;

// Re-export commonly used types
pub use config::{DepthWeightType, InputLevel, RatingConfig};
pub use data::SoilDatabase;
pub use error::{RatingError, RatingResult};
pub use layers::{WorkingLayer, WorkingProfile};
pub use profile::{Chemistry, Horizon, ReferenceProfile, SiteProperties, UserHorizon, UserObservation};
pub use rating::{compose_rating, SoilQualities, SoilRating};
pub use reconcile::reconcile;
pub use requirements::{RequirementSet, RequirementStore};
pub use scorer::{rate_profile, RatingRequest, SoilRater};
