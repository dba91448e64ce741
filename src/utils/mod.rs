//! Utility modules for soil rating
//!
//! Shared functionality used across the SQ scorers:
//! - Texture: USDA texture classes, PSCL groups, rock-fragment classes
//! - Threshold: requirement-table walks and minimum-law aggregation
//! - Depth weights: per-layer weight rows and the depth-weighted mean

pub mod depth_weights;
pub mod texture;
pub mod threshold;

// Re-export commonly used types
pub use depth_weights::{depth_weights, weighted_mean, MAX_LAYERS};
pub use texture::{classify_texture, rock_fragment_percent, Pscl, TextureClass};
pub use threshold::{aggregate_mitigated, min_score, ThresholdTable, WalkDirection, NO_CONSTRAINT};
