use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{info, warn};

use super::{JobSearchOutcome, JobSearchParams, StructuredResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /jobs/
///
/// Proxies the search to JSearch and returns at most `MAX_RESULTS` listings.
pub async fn handle_jobs(
    State(state): State<AppState>,
    params: Result<Query<JobSearchParams>, QueryRejection>,
) -> Result<Json<StructuredResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    params.validate()?;

    let outcome = match state.client.search(&params).await {
        Ok(jobs) => JobSearchOutcome::Listings(jobs),
        Err(e) => {
            warn!("Job search for '{}' failed: {e}", params.query);
            JobSearchOutcome::UpstreamFailure(e.to_string())
        }
    };

    let response = StructuredResponse::from(outcome);
    info!(
        "Job search '{}' ({}, {}) -> {} listings",
        params.query, params.country, params.date_posted, response.count
    );
    Ok(Json(response))
}
