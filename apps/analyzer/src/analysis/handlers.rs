//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::pipeline::run_analysis;
use crate::analysis::tracker::RunStatus;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /analyze
///
/// Runs the full agent pipeline for the stored resume. Responds once the run has
/// finished; the SWOT content itself is served by GET /feedback.
pub async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let position = request
        .position
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Position required".to_string()))?;

    run_analysis(&state, position).await?;

    Ok(Json(MessageResponse {
        message: "Analysis started successfully".to_string(),
    }))
}

/// GET /analyze/status
///
/// Stage and timing of the most recent run.
pub async fn handle_analysis_status(State(state): State<AppState>) -> Json<RunStatus> {
    Json(state.runs.snapshot().await)
}
