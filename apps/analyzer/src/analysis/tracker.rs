//! Run-state tracking for analysis runs.
//!
//! Stages of one run:
//!   no_resume → resume_loaded → research_done → swot_written → metrics_computed
//! with `failed` reachable from any stage after `resume_loaded`.
//! Only the most recent run is kept. `no_resume` is the stage before any run
//! has started; a request without a resume leaves the last run in place.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::agents::crew::{CrewObserver, TaskOutput};
use crate::agents::report::DashboardMetrics;
use crate::agents::tasks::{DASHBOARD_TASK, RESEARCH_TASK, SWOT_TASK};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    #[default]
    NoResume,
    ResumeLoaded,
    ResearchDone,
    SwotWritten,
    MetricsComputed,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatus {
    pub stage: RunStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The dashboard agent's own scores. Informational; /feedback does not use them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_metrics: Option<DashboardMetrics>,
}

#[derive(Debug, Clone, Default)]
pub struct RunTracker {
    inner: Arc<RwLock<RunStatus>>,
}

impl RunTracker {
    pub async fn snapshot(&self) -> RunStatus {
        self.inner.read().await.clone()
    }

    /// Starts a new run, discarding the previous one.
    pub async fn begin(&self, position: &str) -> Uuid {
        let run_id = Uuid::new_v4();
        *self.inner.write().await = RunStatus {
            stage: RunStage::ResumeLoaded,
            run_id: Some(run_id),
            position: Some(position.to_string()),
            started_at: Some(Utc::now()),
            ..RunStatus::default()
        };
        info!("Analysis run {run_id} started for position '{position}'");
        run_id
    }

    pub async fn advance(&self, run_id: Uuid, stage: RunStage) {
        let mut status = self.inner.write().await;
        if status.run_id == Some(run_id) {
            status.stage = stage;
        }
    }

    async fn record_metrics(&self, run_id: Uuid, metrics: Option<DashboardMetrics>) {
        let mut status = self.inner.write().await;
        if status.run_id == Some(run_id) {
            status.stage = RunStage::MetricsComputed;
            status.reported_metrics = metrics;
        }
    }

    pub async fn finish(&self, run_id: Uuid) {
        let mut status = self.inner.write().await;
        if status.run_id == Some(run_id) {
            status.finished_at = Some(Utc::now());
        }
    }

    pub async fn fail(&self, run_id: Uuid, error: String) {
        let mut status = self.inner.write().await;
        if status.run_id == Some(run_id) {
            status.stage = RunStage::Failed;
            status.error = Some(error);
            status.finished_at = Some(Utc::now());
        }
    }

    pub fn observer(&self, run_id: Uuid) -> RunObserver {
        RunObserver {
            tracker: self.clone(),
            run_id,
        }
    }
}

/// Moves one run through its stages as the crew finishes tasks.
pub struct RunObserver {
    tracker: RunTracker,
    run_id: Uuid,
}

#[async_trait]
impl CrewObserver for RunObserver {
    async fn task_completed(&self, _index: usize, output: &TaskOutput) {
        match output.name.as_str() {
            RESEARCH_TASK => self.tracker.advance(self.run_id, RunStage::ResearchDone).await,
            SWOT_TASK => self.tracker.advance(self.run_id, RunStage::SwotWritten).await,
            DASHBOARD_TASK => {
                let metrics = DashboardMetrics::from_agent_answer(&output.raw);
                self.tracker.record_metrics(self.run_id, metrics).await;
            }
            _ => {}
        }
    }
}
