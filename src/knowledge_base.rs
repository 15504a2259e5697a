//! Crop Knowledge Base
//!
//! Read-only mapping from soil type to the crops that suit it. Built once at
//! start-up (either the hand-authored table or a JSON file with the same
//! shape) and shared behind an `Arc` by every request.

use crate::error::{PlannerError, PlannerResult};
use crate::soil::SoilType;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A single crop and its per-acre requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    pub crop: String,
    pub water_l_per_day_per_acre: f64,
    pub cost_per_acre_usd: f64,
}

impl CropRecord {
    pub fn new(crop: &str, water_l_per_day_per_acre: f64, cost_per_acre_usd: f64) -> Self {
        Self {
            crop: crop.to_string(),
            water_l_per_day_per_acre,
            cost_per_acre_usd,
        }
    }

    fn validate(&self) -> PlannerResult<()> {
        let invalid = |reason: &str| PlannerError::InvalidCropRecord {
            crop: self.crop.clone(),
            reason: reason.to_string(),
        };

        if self.crop.trim().is_empty() {
            return Err(invalid("crop name is empty"));
        }
        if !self.water_l_per_day_per_acre.is_finite() || self.water_l_per_day_per_acre < 0.0 {
            return Err(invalid("water demand must be a non-negative number"));
        }
        if !self.cost_per_acre_usd.is_finite() || self.cost_per_acre_usd < 0.0 {
            return Err(invalid("cost per acre must be a non-negative number"));
        }
        Ok(())
    }
}

/// Immutable soil type -> crop list table
#[derive(Debug, Clone, Default)]
pub struct CropKnowledgeBase {
    crops: FxHashMap<SoilType, Vec<CropRecord>>,
}

impl CropKnowledgeBase {
    /// Build from explicit entries. Later entries for the same soil type
    /// replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = (SoilType, Vec<CropRecord>)>) -> Self {
        Self {
            crops: entries.into_iter().collect(),
        }
    }

    /// The hand-authored default table
    pub fn builtin() -> Self {
        Self::new([
            (
                SoilType::Loam,
                vec![
                    CropRecord::new("Millet", 150.0, 80.0),
                    CropRecord::new("Sorghum", 200.0, 100.0),
                    CropRecord::new("Maize", 400.0, 150.0),
                ],
            ),
            (
                SoilType::Sandy,
                vec![
                    CropRecord::new("Groundnut", 120.0, 90.0),
                    CropRecord::new("Sorghum", 200.0, 100.0),
                ],
            ),
            (
                SoilType::Clay,
                vec![
                    CropRecord::new("Rice", 1200.0, 300.0),
                    CropRecord::new("Sugarcane", 900.0, 250.0),
                ],
            ),
            (
                SoilType::Silty,
                vec![
                    CropRecord::new("Wheat", 220.0, 110.0),
                    CropRecord::new("Barley", 180.0, 95.0),
                ],
            ),
        ])
    }

    /// Parse a JSON object keyed by soil type name
    pub fn from_json_str(json: &str) -> PlannerResult<Self> {
        let raw: BTreeMap<String, Vec<CropRecord>> = serde_json::from_str(json)?;

        let mut crops = FxHashMap::default();
        for (name, records) in raw {
            let soil_type =
                SoilType::from_name(&name).ok_or_else(|| PlannerError::UnknownSoilType(name.clone()))?;
            for record in &records {
                record.validate()?;
            }
            crops.insert(soil_type, records);
        }

        Ok(Self { crops })
    }

    /// Load a knowledge base file
    pub fn from_json_file(path: &Path) -> PlannerResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| PlannerError::KnowledgeBaseIo {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&contents)?;
        tracing::info!("Loaded crop knowledge base from {:?} ({} crops)", path, kb.len());
        Ok(kb)
    }

    /// Crops registered for a soil type, in declaration order
    pub fn crops_for(&self, soil_type: SoilType) -> &[CropRecord] {
        self.crops.get(&soil_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Soil types that have an entry, in canonical order
    pub fn soil_types(&self) -> Vec<SoilType> {
        SoilType::ALL
            .into_iter()
            .filter(|t| self.crops.contains_key(t))
            .collect()
    }

    /// Total number of crop records across all soil types
    pub fn len(&self) -> usize {
        self.crops.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
