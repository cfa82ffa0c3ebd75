//! JSearch (RapidAPI) client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::{JobSearchParams, RawJob};

#[derive(Debug, Error)]
pub enum JobSearchError {
    #[error("job search API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("job search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("job search response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    data: Vec<RawJob>,
}

pub struct JobSearchClient {
    client: Client,
    url: String,
    host: String,
    api_key: String,
}

impl JobSearchClient {
    pub fn new(url: String, host: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            url,
            host,
            api_key,
        }
    }

    pub async fn search(&self, params: &JobSearchParams) -> Result<Vec<RawJob>, JobSearchError> {
        let response = self
            .client
            .get(&self.url)
            .header("x-rapidapi-host", &self.host)
            .header("x-rapidapi-key", &self.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JobSearchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let payload: SearchPayload = serde_json::from_slice(&bytes)?;
        debug!(
            "Job search '{}' (page {}) returned {} jobs",
            params.query,
            params.page,
            payload.data.len()
        );
        Ok(payload.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::HeaderMap, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/search")
    }

    fn client(url: String) -> JobSearchClient {
        JobSearchClient::new(url, "jsearch.test".into(), "secret".into())
    }

    #[tokio::test]
    async fn test_search_sends_params_and_headers() {
        let router = Router::new().route(
            "/search",
            get(
                |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    let host = headers["x-rapidapi-host"].to_str().unwrap().to_string();
                    let key = headers["x-rapidapi-key"].to_str().unwrap().to_string();
                    Json(json!({
                        "status": "OK",
                        "data": [{ "job_title": format!("{}|{}|{}|{}|{}|{}|{}",
                            host, key, q["query"], q["page"], q["num_pages"],
                            q["country"], q["date_posted"]) }]
                    }))
                },
            ),
        );
        let url = spawn_stub(router).await;

        let params = JobSearchParams {
            query: "rust developer".into(),
            page: 2,
            ..JobSearchParams::default()
        };
        let jobs = client(url).search(&params).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(
            jobs[0]["job_title"],
            json!("jsearch.test|secret|rust developer|2|10|IND|3days")
        );
    }

    #[tokio::test]
    async fn test_missing_data_is_empty() {
        let router = Router::new().route("/search", get(|| async { Json(json!({ "status": "OK" })) }));
        let url = spawn_stub(router).await;
        let jobs = client(url).search(&JobSearchParams::default()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let router = Router::new().route(
            "/search",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let url = spawn_stub(router).await;
        let err = client(url)
            .search(&JobSearchParams::default())
            .await
            .unwrap_err();
        match err {
            JobSearchError::Status { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let router = Router::new().route("/search", get(|| async { "<html>oops</html>" }));
        let url = spawn_stub(router).await;
        let err = client(url)
            .search(&JobSearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JobSearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = client(format!("http://{addr}/search"))
            .search(&JobSearchParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, JobSearchError::Http(_)));
    }

    #[test]
    fn test_payload_ignores_other_fields() {
        let payload: SearchPayload =
            serde_json::from_value(json!({ "status": "OK", "request_id": "x", "data": [{}] }))
                .unwrap();
        assert_eq!(payload.data.len(), 1);
        assert!(payload.data[0].is_empty());
    }
}
