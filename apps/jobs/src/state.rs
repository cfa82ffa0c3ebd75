use std::sync::Arc;

use crate::jobs::client::JobSearchClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<JobSearchClient>,
}
