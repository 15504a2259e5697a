//! Crop Selector
//!
//! Picks the lowest-water-demand crops for a soil type so that tight water
//! budgets are served first.

use crate::knowledge_base::{CropKnowledgeBase, CropRecord};
use crate::soil::SoilType;

/// Number of candidates returned when the caller does not ask for a specific count
pub const DEFAULT_TOP_N: usize = 5;

/// Return up to `top_n` crops for `soil_type`, ascending by water demand.
///
/// The sort is stable, so crops with equal demand keep their knowledge-base
/// order. Fewer than `top_n` crops are returned when the table is shorter.
pub fn select_crops(kb: &CropKnowledgeBase, soil_type: SoilType, top_n: usize) -> Vec<&CropRecord> {
    let mut candidates: Vec<&CropRecord> = kb.crops_for(soil_type).iter().collect();
    candidates.sort_by(|a, b| a.water_l_per_day_per_acre.total_cmp(&b.water_l_per_day_per_acre));
    candidates.truncate(top_n);

    tracing::debug!(
        "Selected {} crop(s) for {} soil (top_n = {})",
        candidates.len(),
        soil_type,
        top_n
    );
    candidates
}
