//! Sequential crew runner.
//!
//! Executes tasks strictly in order. Each task sees the outputs of the tasks named
//! in its `context`, plus web-search results when its agent holds the search tool.
//! The first model failure aborts the run; there are no partial results.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::agents::prompts::{AGENT_SYSTEM_TEMPLATE, COWORKERS_TEMPLATE, TASK_FOOTER_TEMPLATE};
use crate::agents::search::{format_hits, SearchHit, SearchTool};
use crate::agents::tasks::TaskSpec;
use crate::agents::{AgentSpec, AnalysisAgents, ToolKind};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{strip_json_fences, LlmError};
use crate::resume::store::ResumeStore;

/// Completion backend the agents think with. `LlmClient` in production.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Notified after every finished task.
#[async_trait]
pub trait CrewObserver: Send + Sync {
    async fn task_completed(&self, index: usize, output: &TaskOutput);
}

#[async_trait]
impl CrewObserver for () {
    async fn task_completed(&self, _index: usize, _output: &TaskOutput) {}
}

#[derive(Debug, Error)]
pub enum CrewError {
    #[error("task '{task}' failed: {error}")]
    Agent { task: String, error: LlmError },

    #[error("task '{task}' did not return valid JSON: {error}")]
    InvalidJson {
        task: String,
        error: serde_json::Error,
    },

    #[error("task '{task}' needs the output of '{dependency}', which has not run")]
    MissingContext { task: String, dependency: String },

    #[error("failed to persist output of task '{task}': {message}")]
    Output { task: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    pub name: String,
    pub agent_role: String,
    pub raw: String,
    /// Parsed answer for tasks declared `output_json`.
    pub json: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub tasks: Vec<TaskOutput>,
}

impl CrewOutput {
    pub fn get(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

pub struct Crew {
    agents: AnalysisAgents,
    backend: Arc<dyn AgentBackend>,
    search: Option<Arc<dyn SearchTool>>,
    /// Output files are written through the store so they share its lock.
    store: ResumeStore,
}

impl Crew {
    pub fn new(
        agents: AnalysisAgents,
        backend: Arc<dyn AgentBackend>,
        search: Option<Arc<dyn SearchTool>>,
        store: ResumeStore,
    ) -> Self {
        Self {
            agents,
            backend,
            search,
            store,
        }
    }

    /// Runs every task in order and returns all outputs.
    pub async fn kickoff(
        &self,
        tasks: &[TaskSpec],
        observer: &dyn CrewObserver,
    ) -> Result<CrewOutput, CrewError> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(tasks.len());

        for (index, task) in tasks.iter().enumerate() {
            let agent = self.agents.get(task.agent);
            info!(
                "Task {}/{} '{}' starting (agent: {})",
                index + 1,
                tasks.len(),
                task.name,
                agent.role
            );

            let system = self.system_prompt(agent, task, &outputs);
            let prompt = {
                let context = collect_context(task, &outputs)?;
                let search = self.run_search(agent, task).await;
                build_task_prompt(task, &context, &search)
            };

            let raw = self
                .backend
                .complete(&system, &prompt)
                .await
                .map_err(|error| CrewError::Agent {
                    task: task.name.clone(),
                    error,
                })?;

            let json = if task.output_json {
                Some(
                    parse_json_answer(&raw).map_err(|error| CrewError::InvalidJson {
                        task: task.name.clone(),
                        error,
                    })?,
                )
            } else {
                None
            };

            if let Some(path) = &task.output_file {
                let bytes = match &json {
                    Some(value) => serde_json::to_vec_pretty(value).map_err(|e| {
                        CrewError::Output {
                            task: task.name.clone(),
                            message: e.to_string(),
                        }
                    })?,
                    None => raw.clone().into_bytes(),
                };
                self.store
                    .write_output(path, bytes)
                    .await
                    .map_err(|e| CrewError::Output {
                        task: task.name.clone(),
                        message: format!("{e:#}"),
                    })?;
                info!("Task '{}' output written to {}", task.name, path.display());
            }

            let output = TaskOutput {
                name: task.name.clone(),
                agent_role: agent.role.clone(),
                raw,
                json,
            };
            observer.task_completed(index, &output).await;
            outputs.push(output);
        }

        Ok(CrewOutput { tasks: outputs })
    }

    fn system_prompt(&self, agent: &AgentSpec, task: &TaskSpec, done: &[TaskOutput]) -> String {
        let mut system = AGENT_SYSTEM_TEMPLATE
            .replace("{role}", &agent.role)
            .replace("{backstory}", &agent.backstory)
            .replace("{goal}", &agent.goal);

        if agent.allow_delegation && !done.is_empty() {
            let coworkers = done
                .iter()
                .map(|o| o.agent_role.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            system.push('\n');
            system.push_str(&COWORKERS_TEMPLATE.replace("{coworkers}", &coworkers));
        }

        system.push('\n');
        system.push_str(GROUNDING_INSTRUCTION);
        if task.output_json {
            system.push('\n');
            system.push_str(JSON_ONLY_INSTRUCTION);
        }
        system
    }

    /// Up to `max_iter` search rounds. Failures are logged and skipped.
    async fn run_search(&self, agent: &AgentSpec, task: &TaskSpec) -> Vec<(String, Vec<SearchHit>)> {
        if !agent.has_tool(ToolKind::WebSearch) || task.search_queries.is_empty() {
            return Vec::new();
        }
        let Some(tool) = &self.search else {
            warn!(
                "Agent '{}' may search the web but no search tool is configured",
                agent.role
            );
            return Vec::new();
        };

        let mut results = Vec::new();
        for query in task.search_queries.iter().take(agent.max_iter as usize) {
            match tool.search(query).await {
                Ok(hits) => results.push((query.clone(), hits)),
                Err(e) => warn!("Search '{}' for task '{}' failed: {e}", query, task.name),
            }
        }
        results
    }
}

fn collect_context<'a>(
    task: &TaskSpec,
    done: &'a [TaskOutput],
) -> Result<Vec<&'a TaskOutput>, CrewError> {
    task.context
        .iter()
        .map(|dep| {
            done.iter()
                .find(|o| &o.name == dep)
                .ok_or_else(|| CrewError::MissingContext {
                    task: task.name.clone(),
                    dependency: dep.clone(),
                })
        })
        .collect()
}

fn build_task_prompt(
    task: &TaskSpec,
    context: &[&TaskOutput],
    search: &[(String, Vec<SearchHit>)],
) -> String {
    let mut prompt = task.description.clone();

    if !context.is_empty() {
        prompt.push_str("\n\nThis is the context you're working with:");
        for output in context {
            prompt.push_str(&format!(
                "\n\n[{} ({})]\n{}",
                output.name, output.agent_role, output.raw
            ));
        }
    }

    for (query, hits) in search {
        prompt.push_str(&format!(
            "\n\nWeb search results for \"{query}\":\n{}",
            format_hits(hits)
        ));
    }

    prompt.push_str("\n\n");
    prompt.push_str(&TASK_FOOTER_TEMPLATE.replace("{expected_output}", &task.expected_output));
    prompt
}

/// Parses a JSON answer, tolerating code fences and prose around the object.
pub fn parse_json_answer(raw: &str) -> Result<Value, serde_json::Error> {
    let text = strip_json_fences(raw);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&text[start..=end]),
            _ => Err(err),
        },
    }
}
