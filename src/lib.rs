//! Smart Agriculture Planner
//!
//! Recommends crops, irrigation methods and cost estimates for a plot of land
//! from its soil characteristics.
//!
//! Pipeline, leaf to root:
//! - `soil/`: Soil profile types and the normalizer (manual parameters or
//!   image-filename heuristic)
//! - `knowledge_base`: Read-only soil type -> crop table
//! - `selector`: Lowest-water-demand crop candidates
//! - `irrigation`: Irrigation method and budget compliance
//! - `cost`: Per-acre cost scaling
//! - `recommender`: Composes the above into one RecommendationResult
//!
//! Front-ends live in `report` (plain text), `api_server` (axum, behind the
//! `api` feature) and the `planner` CLI binary.

pub mod error;
pub mod config;
pub mod soil;
pub mod knowledge_base;
pub mod selector;
pub mod irrigation;
pub mod cost;
pub mod recommender;
pub mod report;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::{PlannerError, PlannerResult};
pub use config::PlannerConfig;
pub use soil::{normalize_soil, SoilInput, SoilParams, SoilProfile, SoilType};
pub use knowledge_base::{CropKnowledgeBase, CropRecord};
pub use selector::select_crops;
pub use irrigation::{plan_irrigation, IrrigationMethod, IrrigationPlan};
pub use cost::{estimate_cost, CostEstimate};
pub use recommender::{recommend, RecommendationRequest, RecommendationResult, Recommender, Suggestion};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
