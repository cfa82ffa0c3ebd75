//! Candidate name detection for the SWOT report's `candidate` field.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::agents::crew::AgentBackend;
use crate::agents::prompts::{NAME_EXTRACTION_PROMPT, NAME_EXTRACTION_SYSTEM};

/// Used when no name can be found.
pub const DEFAULT_CANDIDATE: &str = "User";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:Name|Resume\s*of)\s*:?\s*([A-Z][a-z]+\s*[A-Z][a-z]+)")
            .expect("candidate name pattern is valid")
    })
}

/// Finds a "Name John Doe" / "Resume of Jane Smith" style label in the text.
pub fn name_from_text(resume_text: &str) -> Option<String> {
    name_pattern()
        .captures(resume_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Resolves the candidate name: label match first, then the model, then `"User"`.
pub async fn resolve_candidate_name(resume_text: &str, backend: &dyn AgentBackend) -> String {
    if resume_text.trim().is_empty() {
        return DEFAULT_CANDIDATE.to_string();
    }
    if let Some(name) = name_from_text(resume_text) {
        return name;
    }

    let prompt = NAME_EXTRACTION_PROMPT.replace("{resume_text}", resume_text);
    match backend.complete(NAME_EXTRACTION_SYSTEM, &prompt).await {
        Ok(answer) => {
            let name = answer.trim().trim_matches('"').trim();
            if name.is_empty() || name.eq_ignore_ascii_case(DEFAULT_CANDIDATE) {
                DEFAULT_CANDIDATE.to_string()
            } else {
                name.to_string()
            }
        }
        Err(e) => {
            warn!("Candidate name lookup via LLM failed: {e}");
            DEFAULT_CANDIDATE.to_string()
        }
    }
}
