//! Soil Profile Records
//!
//! The reference profile of a soil component as held by the soil store, and
//! the optional surface horizons a user observed in the field.

use crate::error::{RatingError, RatingResult};
use crate::utils::texture::{Pscl, TextureClass};
use serde::{Deserialize, Serialize};

/// Deepest depth (cm) considered for rating
pub const MAX_RATING_DEPTH: f64 = 120.0;

/// Soil chemistry of one horizon or working layer.
///
/// Any value may be missing in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chemistry {
    /// Organic carbon (% weight)
    pub orgc: Option<f64>,
    /// pH in water
    pub phaq: Option<f64>,
    /// Total exchangeable bases (cmol/kg)
    pub teb: Option<f64>,
    /// CEC of the soil (cmol/kg)
    pub cecs: Option<f64>,
    /// CEC of the clay fraction (cmol/kg)
    pub cecc: Option<f64>,
    /// Base saturation (%)
    pub bsat: Option<f64>,
    /// Aluminium saturation (%)
    pub alsa: Option<f64>,
    /// Exchangeable sodium percentage
    pub esp: Option<f64>,
    /// Electrical conductivity (dS/m)
    pub elco: Option<f64>,
    /// Calcium carbonate (%)
    pub tceq: Option<f64>,
    /// Gypsum (%)
    pub gyps: Option<f64>,
}

/// One horizon of a reference profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    /// Top depth (cm)
    pub top: f64,
    /// Bottom depth (cm)
    pub bottom: f64,
    pub texture: Option<TextureClass>,
    /// Coarse fragments (% volume)
    pub coarse_fragments: Option<f64>,
    pub sand: Option<f64>,
    pub silt: Option<f64>,
    pub clay: Option<f64>,
    pub bulk_density_class: Option<f64>,
    /// Available water holding capacity (mm/m)
    pub awc: Option<f64>,
    pub total_nitrogen: Option<f64>,
    /// Effective CEC (cmol/kg)
    pub ecec: Option<f64>,
    pub chemistry: Chemistry,
}

impl Horizon {
    /// PSCL group, derived from the texture class
    pub fn pscl(&self) -> Option<Pscl> {
        self.texture.map(|t| t.pscl())
    }

    /// Whether a depth (cm) falls inside [top, bottom)
    pub fn contains_depth(&self, depth: f64) -> bool {
        self.top <= depth && depth < self.bottom
    }
}

/// Component-level attributes, repeated on every horizon row in the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteProperties {
    pub phase1: Option<i32>,
    pub phase2: Option<i32>,
    /// Obstacles-to-roots id
    pub roots: i32,
    /// Impermeable layer id
    pub il: i32,
    /// Soil water regime id
    pub swr: i32,
    /// Additional properties (2 = gelic, 3 = vertic)
    pub add_prop: i32,
    /// Drainage class id
    pub drain_num: i32,
    /// Topsoil degree of compactness class
    pub t_dc: Option<f64>,
    /// Subsoil degree of compactness class
    pub s_dc: Option<f64>,
    /// Reference rooting depth (cm)
    pub ref_depth: f64,
}

impl SiteProperties {
    pub fn is_vertic(&self) -> bool {
        self.add_prop == 3
    }

    pub fn is_gelic(&self) -> bool {
        self.add_prop == 2
    }
}

/// Reference profile of a soil component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub component_id: String,
    pub soil_unit_name: String,
    pub site: SiteProperties,
    /// Horizons from the surface downward
    pub horizons: Vec<Horizon>,
}

impl ReferenceProfile {
    /// Check that horizons are well formed and contiguous
    pub fn validate(&self) -> RatingResult<()> {
        let mut previous_bottom: Option<f64> = None;
        for (index, horizon) in self.horizons.iter().enumerate() {
            if horizon.top >= horizon.bottom {
                return Err(RatingError::InvalidHorizon {
                    index,
                    top: horizon.top,
                    bottom: horizon.bottom,
                });
            }
            if let Some(prev) = previous_bottom {
                if (horizon.top - prev).abs() > 1e-6 {
                    return Err(RatingError::HorizonGap {
                        index,
                        top: horizon.top,
                        previous_bottom: prev,
                    });
                }
            }
            previous_bottom = Some(horizon.bottom);
        }
        Ok(())
    }

    /// Horizon covering a depth (cm), if any
    pub fn horizon_at(&self, depth: f64) -> Option<&Horizon> {
        self.horizons.iter().find(|h| h.contains_depth(depth))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One user-observed surface horizon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserHorizon {
    /// Texture class name, e.g. "loamy sand"
    #[serde(default)]
    pub texture: Option<String>,
    /// Rock-fragment class label, e.g. "15-35%"
    #[serde(default)]
    pub rock_fragments: Option<String>,
    /// Bottom of the depth interval (cm)
    #[serde(default)]
    pub bottom: Option<f64>,
}

impl UserHorizon {
    /// Texture name, ignoring blank entries
    pub fn texture_name(&self) -> Option<&str> {
        non_blank(self.texture.as_deref())
    }

    /// Rock-fragment label, ignoring blank entries
    pub fn rock_fragment_label(&self) -> Option<&str> {
        non_blank(self.rock_fragments.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.texture_name().is_none() && self.rock_fragment_label().is_none()
    }
}

/// User field observation: surface horizons plus bedrock depth
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserObservation {
    #[serde(default)]
    pub horizons: Vec<UserHorizon>,
    /// Depth to bedrock (cm); absent means 120
    #[serde(default)]
    pub bedrock: Option<f64>,
}

impl UserObservation {
    /// True when the observation carries nothing that changes the profile
    pub fn is_empty(&self) -> bool {
        self.bedrock.is_none() && self.horizons.iter().all(UserHorizon::is_empty)
    }
}
