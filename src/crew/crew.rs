use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;

use crate::agent::Agent;
use crate::config::RunInputs;
use crate::task::Task;

/// One step of a crew run: a task bound to the agent that performs it.
pub struct CrewStep {
    pub agent: Agent,
    pub task: Task,
}

/// A crew runs its tasks sequentially; each task sees the outputs of the
/// tasks before it as context.
pub struct Crew {
    pub name: String,
    steps: Vec<CrewStep>,
}

/// Result of one task within a crew run.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    pub agent_role: String,
    pub description: String,
    pub output: String,
    pub execution_time_ms: u64,
    pub total_tokens: u32,
    pub tools_used: Vec<String>,
}

/// Result of a full crew run.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    /// Output of the last task.
    pub final_output: String,
    pub task_outputs: Vec<TaskOutput>,
    pub total_tokens: u32,
}

#[derive(Serialize)]
struct TrainRecord<'a> {
    iteration: usize,
    timestamp: chrono::DateTime<chrono::Utc>,
    final_output: &'a str,
    task_outputs: &'a [TaskOutput],
}

impl Crew {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn add_step(mut self, agent: Agent, task: Task) -> Self {
        self.steps.push(CrewStep { agent, task });
        self
    }

    pub fn steps(&self) -> &[CrewStep] {
        &self.steps
    }

    /// Run every task in order, interpolating the run inputs into agents and
    /// tasks first. Stops at the first failing task.
    pub async fn kickoff(&self, inputs: &RunInputs) -> anyhow::Result<CrewOutput> {
        if self.steps.is_empty() {
            bail!("crew '{}' has no tasks", self.name);
        }

        let mut context_parts: Vec<String> = Vec::new();
        let mut task_outputs: Vec<TaskOutput> = Vec::new();
        let mut total_tokens = 0u32;

        for step in &self.steps {
            let agent = step.agent.interpolated(inputs);
            let task = step.task.interpolated(inputs);
            let context = context_parts.join("\n\n");

            let response = agent.execute_with_context(&task, &context).await;
            if !response.success {
                bail!(
                    "task '{}' failed for agent '{}': {}",
                    task.description,
                    agent.role,
                    response.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }

            total_tokens += response.total_tokens;
            context_parts.push(format!("## {}\n{}", agent.role, response.content));
            task_outputs.push(TaskOutput {
                agent_role: agent.role.clone(),
                description: task.description.clone(),
                output: response.content,
                execution_time_ms: response.execution_time_ms,
                total_tokens: response.total_tokens,
                tools_used: response.tools_used,
            });
        }

        let final_output = task_outputs
            .last()
            .map(|out| out.output.clone())
            .unwrap_or_default();
        Ok(CrewOutput {
            final_output,
            task_outputs,
            total_tokens,
        })
    }

    /// Run the crew `n_iterations` times and append each run's outputs to
    /// `filename` as one JSON record per line.
    pub async fn train<P: AsRef<Path>>(
        &self,
        n_iterations: usize,
        filename: P,
        inputs: &RunInputs,
    ) -> anyhow::Result<()> {
        let filename = filename.as_ref();
        let mut file = std::fs::File::create(filename)
            .with_context(|| format!("failed to create training file {}", filename.display()))?;

        for iteration in 1..=n_iterations {
            let output = self
                .kickoff(inputs)
                .await
                .context("An error occurred while training the crew")?;
            let record = TrainRecord {
                iteration,
                timestamp: chrono::Utc::now(),
                final_output: &output.final_output,
                task_outputs: &output.task_outputs,
            };
            let line = serde_json::to_string(&record)
                .context("failed to encode training record")?;
            writeln!(file, "{}", line)
                .with_context(|| format!("failed to write training file {}", filename.display()))?;
        }
        Ok(())
    }
}
