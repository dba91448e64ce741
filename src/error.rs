//! Error types for soil rating
//!
//! Configuration and data errors surfaced by the rating core. Loading from the
//! requirement store uses `anyhow` with file/column context instead; these
//! variants pass through it unchanged.

use thiserror::Error;

/// Errors raised while reconciling a profile or scoring it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    #[error("Invalid input level '{0}' (expected L, I or H)")]
    InvalidInputLevel(String),

    #[error("Invalid depth-weight type '{0}' (expected 1 or 2)")]
    InvalidDepthWeightType(String),

    #[error("No depth-weight row for a working profile with {layers} layers (expected 1-6)")]
    LayerCountMismatch { layers: usize },

    #[error("Missing mandatory phase requirement: SQ{sqi} {property} id {phase_id}")]
    MissingPhaseRequirement {
        sqi: u8,
        property: String,
        phase_id: i32,
    },

    #[error("User horizons are not monotonic: repeated or non-positive bottom depth {depth} cm")]
    NonMonotonicDepth { depth: f64 },

    #[error("User horizon {row} has texture or rock-fragment data but no bottom depth")]
    MissingDepth { row: usize },

    #[error("Unknown texture class '{0}'")]
    UnknownTextureClass(String),

    #[error("Unknown rock-fragment class '{0}'")]
    UnknownRockFragmentClass(String),

    #[error("Invalid bedrock depth {0} cm")]
    InvalidBedrock(f64),

    #[error("Reference horizon {index} starts at {top} cm but the previous horizon ends at {previous_bottom} cm")]
    HorizonGap {
        index: usize,
        top: f64,
        previous_bottom: f64,
    },

    #[error("Reference horizon {index} has top {top} cm not above bottom {bottom} cm")]
    InvalidHorizon { index: usize, top: f64, bottom: f64 },

    #[error("Unknown soil component '{0}'")]
    UnknownComponent(String),
}

/// Convenience type for `Result<T, RatingError>`.
pub type RatingResult<T> = Result<T, RatingError>;
