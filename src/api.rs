//! HTTP surface for the analysis engine.
//!
//! Mirrors the wire contract of the inference service the engine can also
//! consume: `POST /predict`, `POST /explain`, `POST /counterfactual`, plus
//! `GET /health` and a combined `POST /analyze`. Empty text is rejected
//! with 400 before any engine stage runs; every other failure degrades to
//! the local lexicon path inside the engine, so handlers stay infallible
//! past validation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::engine::AnalysisEngine;
use crate::error::EngineError;
use crate::remote::{ErrorDetail, ExplanationPayload, RemoteExplanation, RemotePrediction};
use crate::result::{AnalysisOutcome, CounterfactualResult};

#[derive(Clone)]
pub struct AppState {
    engine: Arc<AnalysisEngine>,
}

impl AppState {
    pub fn new(engine: Arc<AnalysisEngine>) -> Self {
        Self { engine }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/predict", post(predict))
        .route("/explain", post(explain))
        .route("/counterfactual", post(counterfactual))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct TextReq {
    text: String,
}

#[derive(serde::Deserialize)]
struct SentenceReq {
    sentence: String,
}

/// Engine errors mapped onto the service's error contract:
/// `{ "detail": ... }` with a non-2xx status.
struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            EngineError::InvalidInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorDetail {
            detail: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

async fn predict(
    State(state): State<AppState>,
    Json(body): Json<TextReq>,
) -> Result<Json<RemotePrediction>, ApiError> {
    let result = state.engine.predict(&body.text).await?;
    Ok(Json(RemotePrediction {
        sentiment: result.sentiment.as_str().to_string(),
        confidence: result.top_confidence(),
        text: Some(result.text),
    }))
}

async fn explain(
    State(state): State<AppState>,
    Json(body): Json<TextReq>,
) -> Result<Json<RemoteExplanation>, ApiError> {
    let prediction = state.engine.predict(&body.text).await?;
    let key_features = state.engine.explain(&body.text).await?;
    Ok(Json(RemoteExplanation {
        text: body.text,
        explanation: ExplanationPayload {
            key_features,
            top_class: prediction.sentiment.as_str().to_string(),
        },
    }))
}

async fn counterfactual(
    State(state): State<AppState>,
    Json(body): Json<SentenceReq>,
) -> Result<Json<CounterfactualResult>, ApiError> {
    let result = state.engine.counterfactual(&body.sentence).await?;
    Ok(Json(result))
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<TextReq>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let outcome = state.engine.analyze(&body.text).await?;
    Ok(Json(outcome))
}
