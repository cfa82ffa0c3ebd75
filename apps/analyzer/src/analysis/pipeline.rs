//! Resume analysis pipeline.
//!
//! Flow: locate resume → extract text → build agents + tasks → run crew
//! (research → SWOT → dashboard) → make sure the report names the candidate.
//!
//! Runs inline with the request. The SWOT report is persisted by the crew
//! runner as part of executing the SWOT task.

use anyhow::anyhow;
use serde_json::Value;
use tracing::{info, warn};

use crate::agents::build_agents;
use crate::agents::crew::{Crew, CrewError, CrewOutput};
use crate::agents::report::SwotReport;
use crate::agents::tasks::{build_tasks, SWOT_TASK};
use crate::errors::AppError;
use crate::resume::candidate::resolve_candidate_name;
use crate::resume::extract::extract_text_blocking;
use crate::state::AppState;

const FAILURE_CONTEXT: &str = "Error analyzing resume";

/// Runs the three-agent analysis for the stored resume against `position`.
///
/// Fails with `NotFound` before any agent call when no resume is stored.
pub async fn run_analysis(state: &AppState, position: &str) -> Result<CrewOutput, AppError> {
    let Some(resume) = state.store.locate().await else {
        warn!("Analysis for '{position}' requested but no resume is stored");
        return Err(AppError::NotFound("No resume file found".to_string()));
    };

    let resume_text = extract_text_blocking(resume.path.clone())
        .await
        .map_err(|e| AppError::Internal(anyhow!("{FAILURE_CONTEXT}: {e}")))?;
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Resume content is empty or unreadable".to_string(),
        ));
    }

    let run_id = state.runs.begin(position).await;
    let crew = Crew::new(
        build_agents(),
        state.backend.clone(),
        state.search.clone(),
        state.store.clone(),
    );
    let tasks = build_tasks(position, &resume_text, &state.store.report_path());

    let output = match crew.kickoff(&tasks, &state.runs.observer(run_id)).await {
        Ok(output) => output,
        Err(e) => {
            state.runs.fail(run_id, e.to_string()).await;
            let message = format!("{FAILURE_CONTEXT}: {e}");
            return Err(match e {
                CrewError::Agent { .. } => AppError::Llm(message),
                _ => AppError::Internal(anyhow!(message)),
            });
        }
    };

    if let Some(report) = output.get(SWOT_TASK).and_then(|t| t.json.as_ref()) {
        if let Err(e) = ensure_candidate(state, report, &resume_text).await {
            state.runs.fail(run_id, format!("{e:#}")).await;
            return Err(AppError::Internal(e.context(FAILURE_CONTEXT)));
        }
    }

    state.runs.finish(run_id).await;
    info!(
        "Analyzed resume {} for position '{}'",
        resume.path.display(),
        position
    );
    Ok(output)
}

/// Fills in the candidate name when the agent left it out. The report on disk
/// is only patched while it is still this run's output.
async fn ensure_candidate(
    state: &AppState,
    report: &Value,
    resume_text: &str,
) -> anyhow::Result<()> {
    match SwotReport::from_value(report) {
        Ok(view) => info!(
            "SWOT report: {} strengths, {} weaknesses, {} opportunities, {} threats, match {:?}%",
            view.strengths.len(),
            view.weaknesses.len(),
            view.opportunities.len(),
            view.threats.len(),
            view.resume_match_percentage
        ),
        Err(e) => warn!("SWOT report has an unexpected shape: {e}"),
    }

    if SwotReport::names_candidate(report) || !report.is_object() {
        return Ok(());
    }

    let name = resolve_candidate_name(resume_text, state.backend.as_ref()).await;
    let patched = state
        .store
        .patch_report(report, |fields| {
            fields.insert("candidate".to_string(), Value::String(name.clone()));
        })
        .await?;
    if patched {
        info!("Filled missing candidate name in report: {name}");
    } else {
        warn!("Report was replaced by a newer analysis; candidate not filled");
    }
    Ok(())
}
