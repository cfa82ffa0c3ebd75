use std::sync::Arc;

use crate::agents::crew::AgentBackend;
use crate::agents::search::SearchTool;
use crate::analysis::tracker::RunTracker;
use crate::config::Config;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: ResumeStore,
    /// Model backend for every agent. `LlmClient` outside of tests.
    pub backend: Arc<dyn AgentBackend>,
    /// `None` when no search API key is configured.
    pub search: Option<Arc<dyn SearchTool>>,
    pub runs: RunTracker,
}
