pub mod health;

use axum::{routing::get, Router};

use crate::jobs::handlers::handle_jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/jobs/", get(handle_jobs))
        .route("/jobs", get(handle_jobs))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Json,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::jobs::client::JobSearchClient;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/search")
    }

    fn app(upstream_url: String) -> Router {
        let client = JobSearchClient::new(upstream_url, "jsearch.test".into(), "secret".into());
        build_router(AppState {
            client: Arc::new(client),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app("http://127.0.0.1:9/search".into()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "job-search");
    }

    #[tokio::test]
    async fn test_jobs_caps_at_21_in_upstream_order() {
        let upstream = Router::new().route(
            "/search",
            axum::routing::get(|| async {
                let data: Vec<Value> = (0..25)
                    .map(|i| json!({ "job_title": format!("Job {i}"), "employer_name": "Acme" }))
                    .collect();
                Json(json!({ "data": data }))
            }),
        );
        let url = spawn_upstream(upstream).await;

        let (status, body) = get_json(app(url), "/jobs/?query=rust&page=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 21);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 21);
        assert_eq!(results[0]["title"], "Job 0");
        assert_eq!(results[20]["title"], "Job 20");
        assert_eq!(results[0]["location"], "");
        assert_eq!(results[0]["salary"], Value::Null);
        assert!(body.get("upstream_error").is_none());
    }

    #[tokio::test]
    async fn test_route_without_trailing_slash() {
        let upstream = Router::new().route(
            "/search",
            axum::routing::get(|| async { Json(json!({ "data": [{}] })) }),
        );
        let url = spawn_upstream(upstream).await;

        let (status, body) = get_json(app(url), "/jobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["title"], "Not Available");
        assert_eq!(body["results"][0]["company"], "Not Available");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported_not_raised() {
        let upstream = Router::new().route(
            "/search",
            axum::routing::get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let url = spawn_upstream(upstream).await;

        let (status, body) = get_json(app(url), "/jobs/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
        assert_eq!(body["results"], json!([]));
        assert!(body["upstream_error"]
            .as_str()
            .unwrap()
            .contains("status 500"));
    }

    #[tokio::test]
    async fn test_page_below_one_is_rejected() {
        let (status, body) = get_json(app("http://127.0.0.1:9/search".into()), "/jobs/?page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "page must be at least 1");
    }

    #[tokio::test]
    async fn test_non_numeric_page_is_rejected() {
        let (status, body) =
            get_json(app("http://127.0.0.1:9/search".into()), "/jobs/?num_pages=many").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
