//! Soil profile types
//!
//! The four coarse soil categories used to key the crop knowledge base, plus
//! the normalized soil descriptor returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse soil category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    #[default]
    Loam,
    Sandy,
    Clay,
    Silty,
}

impl SoilType {
    /// All soil types in declaration order
    pub const ALL: [SoilType; 4] = [SoilType::Loam, SoilType::Sandy, SoilType::Clay, SoilType::Silty];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Loam => "loam",
            SoilType::Sandy => "sandy",
            SoilType::Clay => "clay",
            SoilType::Silty => "silty",
        }
    }

    /// Strict lookup of a trimmed, lower-cased name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "loam" => Some(SoilType::Loam),
            "sandy" => Some(SoilType::Sandy),
            "clay" => Some(SoilType::Clay),
            "silty" => Some(SoilType::Silty),
            _ => None,
        }
    }

    /// Total mapping from free text to a soil type.
    ///
    /// Anything unrecognized falls back to loam so callers always receive a
    /// usable profile.
    pub fn parse_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!("Unrecognized soil type '{}', falling back to loam", name);
            SoilType::Loam
        })
    }

    /// Texture assumed when the caller leaves it unset
    pub fn default_texture(&self) -> &'static str {
        match self {
            SoilType::Loam => "balanced",
            SoilType::Sandy => "coarse",
            SoilType::Clay | SoilType::Silty => "fine",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized soil descriptor.
///
/// Built once per request and never mutated. `ph` is absent when the profile
/// was inferred from an image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub soil_type: SoilType,
    pub texture: String,
    pub moisture_pct: f64,
    #[serde(rename = "pH", default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
}
