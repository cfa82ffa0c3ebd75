pub mod client;
pub mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Listings returned per request, regardless of how many the upstream sends.
pub const MAX_RESULTS: usize = 21;

const NOT_AVAILABLE: &str = "Not Available";

/// One job object as the upstream returns it.
pub type RawJob = Map<String, Value>;

/// Query string of `GET /jobs/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSearchParams {
    pub query: String,
    pub page: u32,
    pub num_pages: u32,
    pub country: String,
    pub date_posted: String,
}

impl Default for JobSearchParams {
    fn default() -> Self {
        Self {
            query: "software development".to_string(),
            page: 1,
            num_pages: 10,
            country: "IND".to_string(),
            date_posted: "3days".to_string(),
        }
    }
}

impl JobSearchParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if self.num_pages < 1 {
            return Err(AppError::Validation(
                "num_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: Option<String>,
    pub posted: Option<String>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
}

impl JobListing {
    pub fn from_raw(raw: &RawJob) -> Self {
        let location = format!("{} {}", text(raw, "job_city"), text(raw, "job_country"))
            .trim()
            .to_string();

        let salary = format!(
            "{} - {} {}",
            text(raw, "job_min_salary"),
            text(raw, "job_max_salary"),
            text(raw, "job_salary_currency")
        );
        let salary = salary.trim_matches(|c| c == ' ' || c == '-');

        Self {
            title: field(raw, "job_title").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            company: field(raw, "employer_name").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            location,
            job_type: field(raw, "job_employment_type"),
            posted: field(raw, "job_posted_at_datetime_utc"),
            salary: (!salary.is_empty()).then(|| salary.to_string()),
            job_url: field(raw, "job_apply_link"),
        }
    }
}

/// Scalar field rendered as text; strings unquoted, numbers and booleans as
/// written. Null and missing are `None`.
fn field(raw: &RawJob, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn text(raw: &RawJob, key: &str) -> String {
    field(raw, key).unwrap_or_default()
}

/// Body of `GET /jobs/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<JobListing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

/// What one upstream call produced.
#[derive(Debug)]
pub enum JobSearchOutcome {
    Listings(Vec<RawJob>),
    UpstreamFailure(String),
}

impl From<JobSearchOutcome> for StructuredResponse {
    fn from(outcome: JobSearchOutcome) -> Self {
        match outcome {
            JobSearchOutcome::Listings(raw) => {
                let results: Vec<JobListing> =
                    raw.iter().take(MAX_RESULTS).map(JobListing::from_raw).collect();
                Self {
                    success: true,
                    count: results.len(),
                    results,
                    upstream_error: None,
                }
            }
            // Clients only check `success`, so an upstream outage reads as "no jobs".
            JobSearchOutcome::UpstreamFailure(message) => Self {
                success: true,
                count: 0,
                results: Vec::new(),
                upstream_error: Some(message),
            },
        }
    }
}
