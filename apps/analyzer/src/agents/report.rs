//! Typed views over the agents' answers: the SWOT report and dashboard metrics.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::agents::crew::parse_json_answer;

/// Persisted SWOT analysis. The file on disk stays exactly what the agent wrote;
/// this view is used to inspect it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwotReport {
    #[serde(default, deserialize_with = "string_or_list")]
    pub candidate: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
    #[serde(default, deserialize_with = "lenient_percent")]
    pub resume_match_percentage: Option<u8>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl SwotReport {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Whether the raw report already names a candidate. Decided on the JSON
    /// itself so an otherwise odd-shaped report keeps its name.
    pub fn names_candidate(report: &Value) -> bool {
        match report.get("candidate") {
            Some(Value::String(name)) => !name.trim().is_empty(),
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(Value::as_str)
                .any(|part| !part.trim().is_empty()),
            _ => false,
        }
    }
}

/// Dashboard scores, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    #[serde(deserialize_with = "required_percent")]
    pub grammar_score: u8,
    #[serde(deserialize_with = "required_percent")]
    pub hiring_probability: u8,
    #[serde(deserialize_with = "required_percent")]
    pub skill_coverage: u8,
    #[serde(deserialize_with = "required_percent")]
    pub ats_compatibility: u8,
}

impl DashboardMetrics {
    pub const ZERO: Self = Self {
        grammar_score: 0,
        hiring_probability: 0,
        skill_coverage: 0,
        ats_compatibility: 0,
    };

    /// Fixed block served by /feedback. Not derived from the resume or the
    /// SWOT report.
    pub const PLACEHOLDER: Self = Self {
        grammar_score: 75,
        hiring_probability: 50,
        skill_coverage: 60,
        ats_compatibility: 70,
    };

    /// PLACEHOLDER for a readable resume, ZERO otherwise.
    pub fn for_resume_text(resume_text: &str) -> Self {
        if resume_text.trim().is_empty() {
            Self::ZERO
        } else {
            Self::PLACEHOLDER
        }
    }

    /// Reads the dashboard agent's own answer, if it is usable.
    pub fn from_agent_answer(raw: &str) -> Option<Self> {
        let value = parse_json_answer(raw).ok()?;
        Self::deserialize(&value).ok()
    }
}

fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    })
}

/// Accepts 72, 72.4, "72" or "72%", clamped to 0–100.
fn percent_from_value(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(number.round().clamp(0.0, 100.0) as u8)
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(percent_from_value(&Value::deserialize(deserializer)?))
}

fn required_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    percent_from_value(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("not a percentage: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_metrics_for_readable_resume() {
        assert_eq!(
            DashboardMetrics::for_resume_text("Name John Doe"),
            DashboardMetrics::PLACEHOLDER
        );
        assert_eq!(
            DashboardMetrics::for_resume_text("  \n"),
            DashboardMetrics::ZERO
        );
    }

    #[test]
    fn test_placeholder_serializes_with_wire_names() {
        let value = serde_json::to_value(DashboardMetrics::PLACEHOLDER).unwrap();
        assert_eq!(
            value,
            json!({
                "grammar_score": 75,
                "hiring_probability": 50,
                "skill_coverage": 60,
                "ats_compatibility": 70
            })
        );
    }

    #[test]
    fn test_agent_answer_with_percent_strings() {
        let raw = r#"Here you go: {"grammar_score": "82%", "hiring_probability": 40, "skill_coverage": "65", "ats_compatibility": 130}"#;
        let metrics = DashboardMetrics::from_agent_answer(raw).unwrap();
        assert_eq!(metrics.grammar_score, 82);
        assert_eq!(metrics.hiring_probability, 40);
        assert_eq!(metrics.skill_coverage, 65);
        assert_eq!(metrics.ats_compatibility, 100);
    }

    #[test]
    fn test_unusable_agent_answer_is_none() {
        assert!(DashboardMetrics::from_agent_answer("grammar is fine").is_none());
        assert!(DashboardMetrics::from_agent_answer(r#"{"grammar_score": 80}"#).is_none());
    }

    #[test]
    fn test_swot_report_lenient_fields() {
        let value = json!({
            "candidate": ["John", "Doe"],
            "strengths": ["Python"],
            "resume_match_percentage": "64%"
        });
        let report = SwotReport::from_value(&value).unwrap();
        assert_eq!(report.candidate, "John Doe");
        assert_eq!(report.resume_match_percentage, Some(64));
        assert!(report.weaknesses.is_empty());
        assert!(SwotReport::names_candidate(&value));
    }

    #[test]
    fn test_swot_report_without_candidate() {
        let value = json!({"strengths": [], "candidate": "  "});
        let report = SwotReport::from_value(&value).unwrap();
        assert!(!SwotReport::names_candidate(&value));
        assert!(!SwotReport::names_candidate(&json!({"strengths": []})));
        assert_eq!(report.resume_match_percentage, None);
    }

    #[test]
    fn test_candidate_detected_when_typed_view_fails() {
        let value = json!({
            "candidate": "Jane Roe",
            "strengths": [{"point": "Python"}]
        });
        assert!(SwotReport::from_value(&value).is_err());
        assert!(SwotReport::names_candidate(&value));
    }
}
