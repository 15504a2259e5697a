//! Recommendation Orchestrator
//!
//! Composes the pipeline: soil normalization -> crop selection -> per-crop
//! irrigation plan and cost estimate -> aggregated result.
//!
//! Includes both sequential and parallel (Rayon) implementations. Each call is
//! independent; the only shared state is the read-only knowledge base.

use crate::cost::{estimate_cost, CostEstimate};
use crate::irrigation::{plan_irrigation, IrrigationPlan};
use crate::knowledge_base::CropKnowledgeBase;
use crate::selector::{select_crops, DEFAULT_TOP_N};
use crate::soil::{normalize_soil, SoilInput, SoilParams, SoilProfile, SoilType};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_AREA_ACRES: f64 = 1.0;

/// Inputs for one recommendation
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub soil: SoilInput,
    pub area_acres: f64,
    pub water_budget_l_per_day: Option<f64>,
    pub top_n: usize,
}

impl RecommendationRequest {
    pub fn new(soil: SoilInput) -> Self {
        Self {
            soil,
            area_acres: DEFAULT_AREA_ACRES,
            water_budget_l_per_day: None,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn from_params(params: SoilParams) -> Self {
        Self::new(SoilInput::Params(params))
    }

    pub fn from_image(image_ref: impl Into<String>) -> Self {
        Self::new(SoilInput::Image(image_ref.into()))
    }

    pub fn with_area(mut self, area_acres: f64) -> Self {
        self.area_acres = area_acres;
        self
    }

    pub fn with_water_budget(mut self, water_budget_l_per_day: Option<f64>) -> Self {
        self.water_budget_l_per_day = water_budget_l_per_day;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// One crop recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub crop: String,
    pub soil_match: SoilType,
    pub irrigation: IrrigationPlan,
    pub cost: CostEstimate,
}

/// Full response for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub soil_analysis: SoilProfile,
    pub area_acres: f64,
    pub water_budget_l_per_day: Option<f64>,
    pub suggestions: Vec<Suggestion>,
}

impl RecommendationResult {
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// Run the full pipeline for one request
pub fn recommend<R: Rng + ?Sized>(
    kb: &CropKnowledgeBase,
    request: &RecommendationRequest,
    rng: &mut R,
) -> RecommendationResult {
    let soil = normalize_soil(&request.soil, rng);

    let suggestions: Vec<Suggestion> = select_crops(kb, soil.soil_type, request.top_n)
        .into_iter()
        .map(|crop| Suggestion {
            crop: crop.crop.clone(),
            soil_match: soil.soil_type,
            irrigation: plan_irrigation(crop, request.water_budget_l_per_day),
            cost: estimate_cost(crop, request.area_acres),
        })
        .collect();

    if suggestions.is_empty() {
        tracing::warn!("No crops registered for {} soil", soil.soil_type);
    }

    RecommendationResult {
        soil_analysis: soil,
        area_acres: request.area_acres,
        water_budget_l_per_day: request.water_budget_l_per_day,
        suggestions,
    }
}

/// Recommendation service bound to one knowledge base
#[derive(Debug, Clone)]
pub struct Recommender {
    kb: Arc<CropKnowledgeBase>,
}

impl Recommender {
    pub fn new(kb: Arc<CropKnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Recommender over the hand-authored crop table
    pub fn builtin() -> Self {
        Self::new(Arc::new(CropKnowledgeBase::builtin()))
    }

    pub fn knowledge_base(&self) -> &CropKnowledgeBase {
        &self.kb
    }

    /// Recommend with an explicit random source
    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> RecommendationResult {
        recommend(&self.kb, request, rng)
    }

    /// Recommend using the thread-local random source
    pub fn recommend(&self, request: &RecommendationRequest) -> RecommendationResult {
        self.recommend_with_rng(request, &mut rand::thread_rng())
    }

    /// Recommend for many requests in parallel (Rayon).
    ///
    /// Output order matches input order. Every worker draws from its own
    /// thread-local random source.
    pub fn recommend_batch(&self, requests: &[RecommendationRequest]) -> Vec<RecommendationResult> {
        requests
            .par_iter()
            .map(|request| self.recommend(request))
            .collect()
    }
}
