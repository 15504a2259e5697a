//! Plain-text Report
//!
//! Human-readable rendering of a [`RecommendationResult`] for terminal output.
//! JSON output goes straight through serde and does not live here.

use crate::recommender::RecommendationResult;

pub fn render_text(result: &RecommendationResult) -> String {
    let mut out = String::new();
    let soil = &result.soil_analysis;

    out.push_str("Soil analysis\n");
    out.push_str(&format!("  Type:     {}\n", soil.soil_type));
    out.push_str(&format!("  Texture:  {}\n", soil.texture));
    out.push_str(&format!("  Moisture: {:.1}%\n", soil.moisture_pct));
    if let Some(ph) = soil.ph {
        out.push_str(&format!("  pH:       {:.1}\n", ph));
    }

    out.push_str(&format!("\nPlot: {} acre(s)", result.area_acres));
    match result.water_budget_l_per_day {
        Some(budget) => out.push_str(&format!(", water budget {} L/day\n\n", budget)),
        None => out.push_str(", no water budget\n\n"),
    }

    if result.suggestions.is_empty() {
        out.push_str(&format!("No suggestions available for {} soil.\n", soil.soil_type));
        return out;
    }

    out.push_str("Suggestions\n");
    for (i, s) in result.suggestions.iter().enumerate() {
        let budget = if s.irrigation.meets_budget { "within budget" } else { "exceeds budget" };
        out.push_str(&format!("  {}. {}\n", i + 1, s.crop));
        out.push_str(&format!(
            "     Irrigation: {} ({} L/day, {})\n",
            s.irrigation.method, s.irrigation.recommended_daily_water_l, budget
        ));
        out.push_str(&format!(
            "     Cost:       ${:.2} for {} acre(s)\n",
            s.cost.estimated_total_cost_usd, s.cost.area_acres
        ));
    }

    if let Some(first) = result.suggestions.first() {
        out.push_str(&format!("\nNote: {}\n", first.irrigation.notes));
    }

    out
}
