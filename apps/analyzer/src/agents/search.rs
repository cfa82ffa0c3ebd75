//! Web search tool for research-capable agents (Serper Google Search API).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SERPER_API_URL: &str = "https://google.serper.dev/search";
const RESULTS_PER_QUERY: u32 = 8;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// A tool agents can call to look things up on the web.
#[async_trait]
pub trait SearchTool: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct SerperSearch {
    client: Client,
    api_key: String,
    api_url: String,
}

impl SerperSearch {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            api_url: SERPER_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl SearchTool for SerperSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest {
                q: query,
                num: RESULTS_PER_QUERY,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SerperResponse = response.json().await?;
        debug!("Search '{}' returned {} hits", query, body.organic.len());
        Ok(body.organic)
    }
}

/// Renders hits as a numbered list for inclusion in a prompt.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "(no results)".to_string();
    }
    hits.iter()
        .enumerate()
        .map(|(i, h)| format!("{}. {} ({})\n   {}", i + 1, h.title, h.link, h.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/search")
    }

    #[tokio::test]
    async fn test_search_reads_organic_results() {
        let router = Router::new().route(
            "/search",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-api-key"], "serper-key");
                assert_eq!(body["q"], "rust jobs");
                Json(json!({
                    "searchParameters": {"q": "rust jobs"},
                    "organic": [
                        {"title": "Rust Engineer", "link": "https://example.com/1", "snippet": "Tokio, axum"},
                        {"title": "Systems Dev", "link": "https://example.com/2"}
                    ]
                }))
            }),
        );
        let url = spawn_stub(router).await;
        let tool = SerperSearch::new("serper-key".into()).with_api_url(url);

        let hits = tool.search("rust jobs").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust Engineer");
        assert_eq!(hits[1].snippet, "");
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let router = Router::new().route(
            "/search",
            post(|| async { (StatusCode::FORBIDDEN, "bad key") }),
        );
        let url = spawn_stub(router).await;
        let tool = SerperSearch::new("wrong".into()).with_api_url(url);

        match tool.search("anything").await {
            Err(SearchError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_format_hits_numbers_results() {
        let hits = vec![SearchHit {
            title: "Rust Engineer".into(),
            link: "https://example.com".into(),
            snippet: "async".into(),
        }];
        let text = format_hits(&hits);
        assert!(text.starts_with("1. Rust Engineer (https://example.com)"));
        assert!(text.contains("async"));
        assert_eq!(format_hits(&[]), "(no results)");
    }
}
