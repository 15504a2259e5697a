//! Cost Estimator

use crate::knowledge_base::CropRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub area_acres: f64,
    pub estimated_total_cost_usd: f64,
}

/// Scale a per-acre cost by area. The area is passed through unchecked.
pub fn estimate(cost_per_acre_usd: f64, area_acres: f64) -> CostEstimate {
    CostEstimate {
        area_acres,
        estimated_total_cost_usd: cost_per_acre_usd * area_acres,
    }
}

pub fn estimate_cost(crop: &CropRecord, area_acres: f64) -> CostEstimate {
    estimate(crop.cost_per_acre_usd, area_acres)
}
