//! Task construction for one analysis run.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::agents::prompts::{
    DASHBOARD_DESCRIPTION, DASHBOARD_EXPECTED_OUTPUT, DASHBOARD_SEARCH_QUERY,
    RESEARCH_DESCRIPTION, RESEARCH_EXPECTED_OUTPUT, RESEARCH_SEARCH_QUERY, SWOT_DESCRIPTION,
    SWOT_EXPECTED_OUTPUT,
};
use crate::agents::AgentRole;

pub const RESEARCH_TASK: &str = "research";
pub const SWOT_TASK: &str = "swot";
pub const DASHBOARD_TASK: &str = "dashboard";

/// One unit of agent work.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSpec {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    pub agent: AgentRole,
    /// Names of earlier tasks whose output is handed to this one.
    pub context: Vec<String>,
    /// Queries run through the web-search tool if the agent has it.
    pub search_queries: Vec<String>,
    /// Where the runner persists this task's answer.
    pub output_file: Option<PathBuf>,
    /// The answer must parse as JSON.
    pub output_json: bool,
}

/// Builds the three dependent tasks: research → SWOT (written to `report_path`) → dashboard.
///
/// The dashboard task gets the job title and resume text again and does not see
/// the SWOT result.
pub fn build_tasks(position: &str, resume_text: &str, report_path: &Path) -> Vec<TaskSpec> {
    vec![
        TaskSpec {
            name: RESEARCH_TASK.to_string(),
            description: RESEARCH_DESCRIPTION.replace("{position}", position),
            expected_output: RESEARCH_EXPECTED_OUTPUT.to_string(),
            agent: AgentRole::Researcher,
            context: vec![],
            search_queries: vec![RESEARCH_SEARCH_QUERY.replace("{position}", position)],
            output_file: None,
            output_json: false,
        },
        TaskSpec {
            name: SWOT_TASK.to_string(),
            description: SWOT_DESCRIPTION.replace("{resume_text}", resume_text),
            expected_output: SWOT_EXPECTED_OUTPUT.to_string(),
            agent: AgentRole::SwotAnalyst,
            context: vec![RESEARCH_TASK.to_string()],
            search_queries: vec![],
            output_file: Some(report_path.to_path_buf()),
            output_json: true,
        },
        TaskSpec {
            name: DASHBOARD_TASK.to_string(),
            description: DASHBOARD_DESCRIPTION
                .replace("{position}", position)
                .replace("{resume_text}", resume_text),
            expected_output: DASHBOARD_EXPECTED_OUTPUT.to_string(),
            agent: AgentRole::DashboardEvaluator,
            context: vec![],
            search_queries: vec![DASHBOARD_SEARCH_QUERY.replace("{position}", position)],
            output_file: None,
            output_json: false,
        },
    ]
}
