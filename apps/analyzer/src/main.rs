mod agents;
mod analysis;
mod config;
mod errors;
mod llm_client;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agents::search::{SearchTool, SerperSearch};
use crate::analysis::tracker::RunTracker;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::store::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));

    let store = ResumeStore::open(&config.upload_dir, &config.report_dir).await?;

    let mut llm = LlmClient::new(config.anthropic_api_key.clone());
    if let Some(url) = &config.anthropic_api_url {
        llm = llm.with_api_url(url.clone());
    }
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let search: Option<Arc<dyn SearchTool>> = match &config.serper_api_key {
        Some(key) => {
            let mut tool = SerperSearch::new(key.clone());
            if let Some(url) = &config.serper_api_url {
                tool = tool.with_api_url(url.clone());
            }
            info!("Web search tool enabled");
            Some(Arc::new(tool))
        }
        None => {
            warn!("SERPER_API_KEY not set; agents will run without web search");
            None
        }
    };

    let cors = build_cors(&config.cors_origins)?;

    let state = AppState {
        config: config.clone(),
        store,
        backend: Arc::new(llm),
        search,
        runs: RunTracker::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the configured browser origins. Methods and headers are mirrored
/// from the preflight so credentials can be allowed.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
