//! Irrigation Planner
//!
//! Assigns an irrigation method from a crop's daily water demand and checks
//! the demand against an optional daily water budget.

use crate::knowledge_base::CropRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest demand (L/day/acre) still served by drip irrigation
pub const DRIP_MAX_L_PER_DAY: f64 = 250.0;

/// Highest demand (L/day/acre) still served by sprinklers
pub const SPRINKLER_MAX_L_PER_DAY: f64 = 600.0;

pub const IRRIGATION_NOTES: &str =
    "Drip irrigation recommended for low water usage crops. Adjust frequency by season.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrrigationMethod {
    Drip,
    Sprinkler,
    Flood,
}

impl IrrigationMethod {
    /// Method for a given demand. Boundary values map to the lower-intensity method.
    pub fn for_demand(water_l_per_day: f64) -> Self {
        if water_l_per_day <= DRIP_MAX_L_PER_DAY {
            IrrigationMethod::Drip
        } else if water_l_per_day <= SPRINKLER_MAX_L_PER_DAY {
            IrrigationMethod::Sprinkler
        } else {
            IrrigationMethod::Flood
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "drip",
            IrrigationMethod::Sprinkler => "sprinkler",
            IrrigationMethod::Flood => "flood",
        }
    }
}

impl fmt::Display for IrrigationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationPlan {
    pub method: IrrigationMethod,
    pub recommended_daily_water_l: f64,
    pub meets_budget: bool,
    pub notes: String,
}

/// Plan irrigation for a raw water demand.
///
/// `meets_budget` is true when no budget is given or the demand does not
/// exceed it.
pub fn plan(water_l_per_day: f64, water_budget_l_per_day: Option<f64>) -> IrrigationPlan {
    let meets_budget = water_budget_l_per_day.map_or(true, |budget| water_l_per_day <= budget);

    IrrigationPlan {
        method: IrrigationMethod::for_demand(water_l_per_day),
        recommended_daily_water_l: water_l_per_day,
        meets_budget,
        notes: IRRIGATION_NOTES.to_string(),
    }
}

/// Plan irrigation for a crop from the knowledge base
pub fn plan_irrigation(crop: &CropRecord, water_budget_l_per_day: Option<f64>) -> IrrigationPlan {
    plan(crop.water_l_per_day_per_acre, water_budget_l_per_day)
}
