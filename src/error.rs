//! Planner error types
//!
//! Typed failures surfaced by the recommendation core. Soil-type coercion and
//! empty crop tables are not errors and never appear here.

use std::path::PathBuf;
use thiserror::Error;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// A caller supplied a value for a numeric field that does not parse as a number.
    #[error("invalid value for {field}: '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("failed to read crop knowledge base {path:?}")]
    KnowledgeBaseIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse crop knowledge base")]
    KnowledgeBaseParse(#[from] serde_json::Error),

    /// The knowledge base names a soil type outside loam/sandy/clay/silty.
    #[error("unknown soil type '{0}' in crop knowledge base")]
    UnknownSoilType(String),

    #[error("invalid crop record '{crop}': {reason}")]
    InvalidCropRecord { crop: String, reason: String },
}

/// Parse an explicitly supplied numeric field.
///
/// Surrounding whitespace is ignored. Non-finite results (`inf`, `NaN`) are
/// rejected along with anything that is not a number at all.
pub fn parse_number(field: &'static str, raw: &str) -> PlannerResult<f64> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PlannerError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Parse an optional numeric field where blank input means "not supplied".
pub fn parse_optional_number(field: &'static str, raw: Option<&str>) -> PlannerResult<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_number(field, s).map(Some),
    }
}
