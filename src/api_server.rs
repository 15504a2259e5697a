// Axum API Server Module
//
// Purpose: HTTP front-end for the recommendation pipeline. Accepts the same
// form fields as the web UI (multipart, optional image upload) plus a JSON
// batch endpoint.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::PlannerConfig;
use crate::error::{parse_number, parse_optional_number, PlannerError};
use crate::recommender::{RecommendationRequest, RecommendationResult, Recommender, DEFAULT_AREA_ACRES};
use crate::soil::{SoilInput, SoilParams, SoilType};

/// Upper bound on requests accepted by the batch endpoint
pub const MAX_BATCH_SIZE: usize = 100;

/// Textures offered by the web form
const FORM_TEXTURES: [&str; 3] = ["fine", "balanced", "coarse"];

/// Water budget pre-filled by the web form (L/day)
const FORM_DEFAULT_WATER_BUDGET: f64 = 250.0;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    pub fn new(config: PlannerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading crop knowledge base...");
        let kb = config.load_knowledge_base()?;
        tracing::info!("Knowledge base ready ({} crops)", kb.len());

        Ok(Self::from_parts(Recommender::new(Arc::new(kb)), config))
    }

    pub fn from_parts(recommender: Recommender, config: PlannerConfig) -> Self {
        Self {
            recommender,
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Router Configuration
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Form metadata
        .route("/api/soil_types", get(get_soil_types))

        // Recommendation endpoints
        // IMPORTANT: batch route is JSON, single analyze is multipart
        .route("/api/analyze", post(analyze))
        .route("/api/analyze/batch", post(analyze_batch))

        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive()) // Allow all origins (adjust for production)
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Every soil type the normalizer accepts, whether or not the loaded table lists crops for it
async fn get_soil_types() -> impl IntoResponse {
    let soil_types: Vec<&str> = SoilType::ALL.iter().map(|t| t.as_str()).collect();

    Json(serde_json::json!({
        "soil_types": soil_types,
        "textures": FORM_TEXTURES,
        "default_area": DEFAULT_AREA_ACRES,
        "default_water_budget": FORM_DEFAULT_WATER_BUDGET,
    }))
}

/// Single analysis from a multipart form.
///
/// Fields: `mode` ("params" | "image"), `image`, `area`, `water_budget`,
/// `soil_type`, `texture`, `moisture`, `pH`, `top_n`.
async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let form = AnalyzeForm::read(&mut multipart).await?;

    let area = match form.text("area") {
        Some(raw) => parse_number("area", raw)?,
        None => DEFAULT_AREA_ACRES,
    };
    let water_budget = parse_optional_number("water_budget", form.text("water_budget"))?;
    let top_n = parse_top_n(form.text("top_n"), state.config.default_top_n)?;

    let result = match form.text("mode").unwrap_or("params") {
        "image" => {
            let upload = form
                .image
                .as_ref()
                .ok_or_else(|| AppError::BadRequest("No image provided".to_string()))?;
            if upload.filename.trim().is_empty() {
                return Err(AppError::BadRequest("No file selected".to_string()));
            }

            // Staged file is removed when `staged` drops, on every path out of this block
            let staged = StagedUpload::stage(&state.config.upload_dir, upload).await?;
            let request = RecommendationRequest::new(SoilInput::Image(staged.image_ref()))
                .with_area(area)
                .with_water_budget(water_budget)
                .with_top_n(top_n);
            state.recommender.recommend(&request)
        }
        "params" => {
            let params = SoilParams::from_raw(
                form.text("soil_type").unwrap_or("loam"),
                form.text("texture"),
                form.text("moisture"),
                form.text("pH"),
            )?;
            let request = RecommendationRequest::from_params(params)
                .with_area(area)
                .with_water_budget(water_budget)
                .with_top_n(top_n);
            state.recommender.recommend(&request)
        }
        other => {
            return Err(AppError::BadRequest(format!("Unknown mode '{}'", other)));
        }
    };

    tracing::debug!(
        "Analyzed {} soil: {} suggestion(s)",
        result.soil_analysis.soil_type,
        result.suggestions.len()
    );

    Ok(Json(success_body(&result)?))
}

/// Batch analysis from a JSON array (params mode or image filename)
async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<Vec<BatchAnalyzeItem>>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(items) = payload?;
    if items.len() > MAX_BATCH_SIZE {
        return Err(AppError::BadRequest(format!(
            "Batch of {} exceeds the limit of {}",
            items.len(),
            MAX_BATCH_SIZE
        )));
    }

    let default_top_n = state.config.default_top_n;
    let requests = items
        .into_iter()
        .map(|item| item.into_request(default_top_n))
        .collect::<Result<Vec<_>, _>>()?;

    let start = std::time::Instant::now();
    let recommender = state.recommender.clone();
    let count = requests.len();
    let results = tokio::task::spawn_blocking(move || recommender.recommend_batch(&requests))
        .await
        .map_err(|e| AppError::Internal(format!("Batch worker failed: {}", e)))?;
    tracing::debug!("Batch of {} analyzed in {:?}", count, start.elapsed());

    Ok(Json(serde_json::json!({
        "success": true,
        "rows": results.len(),
        "results": results,
    })))
}

// ============================================================================
// Request Types
// ============================================================================

struct UploadedImage {
    filename: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct AnalyzeForm {
    fields: HashMap<String, String>,
    image: Option<UploadedImage>,
}

impl AnalyzeForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = AnalyzeForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
                form.image = Some(UploadedImage {
                    filename,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed, non-blank text field
    fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Deserialize, Debug)]
struct BatchAnalyzeItem {
    #[serde(default = "default_mode")]
    mode: String,
    soil_type: Option<String>,
    texture: Option<String>,
    moisture: Option<f64>,
    #[serde(rename = "pH")]
    ph: Option<f64>,
    /// Image filename for image mode
    image: Option<String>,
    area: Option<f64>,
    water_budget: Option<f64>,
    top_n: Option<usize>,
}

fn default_mode() -> String {
    "params".to_string()
}

impl BatchAnalyzeItem {
    fn into_request(self, default_top_n: usize) -> Result<RecommendationRequest, AppError> {
        let soil = match self.mode.as_str() {
            "image" => match self.image.filter(|name| !name.trim().is_empty()) {
                Some(name) => SoilInput::Image(name),
                None => return Err(AppError::BadRequest("No image provided".to_string())),
            },
            "params" => SoilInput::Params(SoilParams {
                soil_type: self.soil_type.unwrap_or_else(|| "loam".to_string()),
                texture: self.texture.filter(|t| !t.trim().is_empty()),
                moisture_pct: self.moisture,
                ph: self.ph,
            }),
            other => return Err(AppError::BadRequest(format!("Unknown mode '{}'", other))),
        };

        Ok(RecommendationRequest::new(soil)
            .with_area(self.area.unwrap_or(DEFAULT_AREA_ACRES))
            .with_water_budget(self.water_budget)
            .with_top_n(self.top_n.unwrap_or(default_top_n)))
    }
}

// ============================================================================
// Upload Staging
// ============================================================================

/// Uploaded image written to a private temporary directory.
///
/// The file keeps the client's base filename so the soil heuristic sees the
/// same name the user uploaded. Dropping the value deletes the directory.
struct StagedUpload {
    _dir: TempDir,
    path: PathBuf,
}

impl StagedUpload {
    async fn stage(upload_dir: &Path, upload: &UploadedImage) -> Result<Self, AppError> {
        let dir = tempfile::Builder::new()
            .prefix("planner_upload_")
            .tempdir_in(upload_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

        let path = dir.path().join(sanitize_filename(&upload.filename));
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to stage upload: {}", e)))?;
        tracing::debug!("Staged upload at {:?} ({} bytes)", path, upload.bytes.len());

        Ok(Self { _dir: dir, path })
    }

    fn image_ref(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Base filename restricted to a safe character set
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload.jpg".to_string()
    } else {
        cleaned.to_string()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_top_n(raw: Option<&str>, default_top_n: usize) -> Result<usize, AppError> {
    match raw {
        Some(n) => n
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid value for top_n: '{}'", n))),
        None => Ok(default_top_n),
    }
}

fn success_body(result: &RecommendationResult) -> Result<serde_json::Value, AppError> {
    let mut body = serde_json::to_value(result)
        .map_err(|e| AppError::Internal(format!("JSON serialization error: {}", e)))?;
    body["success"] = serde_json::Value::Bool(true);
    Ok(body)
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::InvalidNumber { .. } => AppError::BadRequest(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
            "success": false
        }));

        (status, body).into_response()
    }
}
