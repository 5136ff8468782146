use crate::cache_key::request_digest;
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::features;
use crate::models::{ClientProfile, ModelInfoResponse, PredictionResponse};
use crate::recommendation::Tier;
use crate::scoring::ScoringModel;
use axum::{extract::State, http::StatusCode, Json};
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The scoring pipeline, loaded once at startup. `None` when the
    /// artifact was missing or unreadable; scoring stays disabled for the
    /// process lifetime in that case.
    pub model: Option<Arc<ScoringModel>>,
    /// Short-TTL score cache keyed by record digest, so identical form
    /// submissions are served without re-scoring.
    pub score_cache: Cache<String, PredictionResponse>,
}

impl AppState {
    /// The loaded model, or the model-unavailable error when scoring is
    /// disabled.
    fn model(&self) -> Result<&Arc<ScoringModel>, AppError> {
        self.model
            .as_ref()
            .ok_or_else(|| AppError::ModelNotFound(self.config.model_path.clone()))
    }
}

/// Health check endpoint.
///
/// Returns the service status, version, and whether scoring is available.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "deposit-scoring-api",
            "version": "0.1.0",
            "model_loaded": state.model.is_some(),
        })),
    )
}

/// POST /api/v1/predict
///
/// Scores one client profile: validates the raw fields, derives the
/// engineered features, runs the pipeline, and maps the probability to a
/// priority tier. A failed prediction leaves nothing behind; the caller
/// retries with adjusted inputs.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<ClientProfile>,
) -> Result<Json<PredictionResponse>, AppError> {
    tracing::info!("POST /api/v1/predict");

    let model = state.model()?;
    profile.validate()?;

    let record = features::build(profile);
    let digest = request_digest(&record).context("computing score cache key")?;

    if let Some(mut hit) = state.score_cache.get(&digest).await {
        tracing::debug!("Score cache hit for digest {}", &digest[..16]);
        hit.request_id = Uuid::new_v4();
        hit.cached = true;
        return Ok(Json(hit));
    }

    let prediction = model.predict(&record)?;
    let tier = Tier::for_probability(prediction.probability);

    let verdict = if prediction.label == 1 {
        "LIKELY TO SUBSCRIBE"
    } else {
        "UNLIKELY TO SUBSCRIBE"
    };

    let response = PredictionResponse {
        request_id: Uuid::new_v4(),
        label: prediction.label,
        verdict: verdict.to_string(),
        probability: prediction.probability,
        tier,
        recommendation: tier.action_lines(),
        model_version: model.version().to_string(),
        cached: false,
        timestamp: chrono::Utc::now(),
    };

    state.score_cache.insert(digest, response.clone()).await;

    tracing::info!(
        "Scored request {}: label={} probability={:.4} tier={:?}",
        response.request_id,
        response.label,
        response.probability,
        response.tier
    );

    Ok(Json(response))
}

/// GET /api/v1/model
///
/// Metadata about the loaded artifact. Returns the model-unavailable error
/// when the artifact could not be loaded at startup, so clients can disable
/// their predict control.
pub async fn model_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelInfoResponse>, AppError> {
    tracing::info!("GET /api/v1/model");

    let model = state.model()?;
    Ok(Json(model.info()))
}
