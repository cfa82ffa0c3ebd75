// Resume analysis agents.
// Declarative agent/task descriptions plus the sequential runner that executes them.
// All model calls go through the AgentBackend trait (implemented by llm_client).

pub mod crew;
pub mod prompts;
pub mod report;
pub mod search;
pub mod tasks;

use serde::Serialize;

/// Tools an agent may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    WebSearch,
}

/// Which of the three analysis agents a task is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Researcher,
    SwotAnalyst,
    DashboardEvaluator,
}

/// Declarative description of an LLM actor.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSpec {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<ToolKind>,
    /// Upper bound on tool rounds per task.
    pub max_iter: u32,
    /// Delegating agents are told which coworkers already contributed.
    pub allow_delegation: bool,
}

impl AgentSpec {
    pub fn has_tool(&self, tool: ToolKind) -> bool {
        self.tools.contains(&tool)
    }
}

/// The three agents of one analysis run. Built fresh per request.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisAgents {
    pub researcher: AgentSpec,
    pub swot_analyst: AgentSpec,
    pub dashboard_evaluator: AgentSpec,
}

impl AnalysisAgents {
    pub fn get(&self, role: AgentRole) -> &AgentSpec {
        match role {
            AgentRole::Researcher => &self.researcher,
            AgentRole::SwotAnalyst => &self.swot_analyst,
            AgentRole::DashboardEvaluator => &self.dashboard_evaluator,
        }
    }
}

pub fn build_agents() -> AnalysisAgents {
    AnalysisAgents {
        researcher: AgentSpec {
            role: "Market Research Analyst".to_string(),
            goal: "Provide a concise report on current job requirements, skills, and notable \
                   projects for a specified role."
                .to_string(),
            backstory: "An expert analyst with a keen eye for market trends and job market \
                        demands."
                .to_string(),
            tools: vec![ToolKind::WebSearch],
            max_iter: 1,
            allow_delegation: false,
        },
        swot_analyst: AgentSpec {
            role: "Resume SWOT Specialist".to_string(),
            goal: "Perform a detailed SWOT analysis (minimum 5 points per category) on a resume \
                   based on job requirements, returning a JSON report with match percentage and \
                   suggestions."
                .to_string(),
            backstory: "A seasoned hiring expert skilled in evaluating a single resume against \
                        industry standards, adept at identifying candidate names and generating \
                        clean JSON."
                .to_string(),
            tools: vec![],
            max_iter: 1,
            allow_delegation: true,
        },
        dashboard_evaluator: AgentSpec {
            role: "Resume Dashboard Evaluator".to_string(),
            goal: "Evaluate a resume for a specified job to generate dashboard metrics: grammar \
                   score, hiring probability, skill coverage, and ATS compatibility, each as a \
                   percentage."
                .to_string(),
            backstory: "An expert in resume analysis and ATS systems, specializing in generating \
                        concise dashboard metrics."
                .to_string(),
            tools: vec![ToolKind::WebSearch],
            max_iter: 1,
            allow_delegation: false,
        },
    }
}
