//! Axum route handlers for resume upload and feedback retrieval.

use std::path::Path;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::agents::report::DashboardMetrics;
use crate::analysis::handlers::MessageResponse;
use crate::errors::AppError;
use crate::resume::extract::extract_text_blocking;
use crate::resume::ResumeKind;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

struct Upload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// POST /upload
///
/// Stores the `resume` multipart field as the active resume, replacing any
/// previous one, and checks that text can be extracted from it.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
        upload = Some(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    if upload.file_name.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    // The declared content type gates the upload; the filename picks the stored extension.
    let declared = ResumeKind::from_mime(&upload.content_type).ok_or_else(|| {
        AppError::Validation("Invalid file type. Please upload .pdf, .txt, or .docx".to_string())
    })?;
    let kind = ResumeKind::from_path(Path::new(&upload.file_name)).unwrap_or(declared);

    let stored = state.store.save(kind, upload.bytes).await?;

    let text = extract_text_blocking(stored.path.clone())
        .await
        .map_err(|e| AppError::Extraction(format!("Error reading resume: {e}")))?;
    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "Resume content is empty or unreadable".to_string(),
        ));
    }

    info!(
        "Received and replaced resume: {} ({:?}, from '{}')",
        stored.path.display(),
        stored.kind,
        upload.file_name
    );
    Ok(Json(MessageResponse {
        message: "Resume uploaded successfully".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackQuery {
    /// Sent by the web client; feedback is not keyed by position.
    pub position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub swot: Option<Value>,
    pub metrics: DashboardMetrics,
}

/// Feedback failures keep the response shape: `swot: null` and zeroed metrics.
#[derive(Debug)]
pub struct FeedbackError(AppError);

impl From<AppError> for FeedbackError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Feedback retrieval failed: {:#}", self.0);
        }
        let body = FeedbackResponse {
            error: Some(self.0.to_string()),
            swot: None,
            metrics: DashboardMetrics::ZERO,
        };
        (status, Json(body)).into_response()
    }
}

/// GET /feedback
///
/// Returns the persisted SWOT report verbatim together with dashboard metrics.
pub async fn handle_feedback(
    State(state): State<AppState>,
    Query(query): Query<FeedbackQuery>,
) -> Result<Json<FeedbackResponse>, FeedbackError> {
    debug!("Feedback requested (position: {:?})", query.position);

    let resume = state
        .store
        .locate()
        .await
        .ok_or_else(|| AppError::NotFound("No resume file found".to_string()))?;

    let swot = state
        .store
        .load_report()
        .await
        .map_err(|e| AppError::Internal(e.context("Error fetching feedback")))?
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    let resume_text = extract_text_blocking(resume.path.clone())
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Error fetching feedback: {e}")))?;
    let metrics = DashboardMetrics::for_resume_text(&resume_text);

    info!(
        "Retrieved feedback for resume {}, metrics: {:?}",
        resume.path.display(),
        metrics
    );
    Ok(Json(FeedbackResponse {
        error: None,
        swot: Some(swot),
        metrics,
    }))
}
