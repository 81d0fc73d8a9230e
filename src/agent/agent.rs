use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{interpolate, RunInputs};
use crate::llm::CompletionProvider;
use crate::tools::Tool;

/// Model settings an agent runs its completions with.
#[derive(Debug, Clone)]
pub struct AgentModelConfig {
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl AgentModelConfig {
    pub fn new(model_name: String, temperature: f64, max_tokens: u32) -> Self {
        Self {
            model_name,
            temperature,
            max_tokens,
        }
    }

    /// Model name from `OPENAI_MODEL_NAME`, with the defaults the crew uses.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("OPENAI_MODEL_NAME").unwrap_or_default(),
            0.7,
            4096,
        )
    }
}

/// One crew agent: a role with a goal, a backstory and a set of tools.
#[derive(Clone)]
pub struct Agent {
    pub id: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub llm_config: AgentModelConfig,
    pub tools: Vec<Arc<dyn Tool>>,
    pub verbose: bool,
    pub(crate) provider: Arc<dyn CompletionProvider>,
}

impl Agent {
    pub fn new<S: Into<String>>(
        role: S,
        goal: S,
        backstory: S,
        llm_config: AgentModelConfig,
        tools: Vec<Arc<dyn Tool>>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            llm_config,
            tools,
            verbose: false,
            provider,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// A copy of this agent with `{placeholder}` templates in its role, goal
    /// and backstory filled in from the run inputs.
    pub fn interpolated(&self, inputs: &RunInputs) -> Self {
        let mut agent = self.clone();
        agent.role = interpolate(&self.role, inputs);
        agent.goal = interpolate(&self.goal, inputs);
        agent.backstory = interpolate(&self.backstory, inputs);
        agent
    }
}

/// Record of one tool call made during task execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    /// Arguments as the JSON string the model produced.
    pub arguments: String,
    pub result: String,
    pub execution_time_ms: u64,
}

/// Outcome of one task execution, with the metrics the crew reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub content: String,
    pub success: bool,
    pub execution_time_ms: u64,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub tools_used: Vec<String>,
    pub tool_invocations: Vec<ToolInvocation>,
    pub error: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl AgentResponse {
    pub fn success(
        content: String,
        execution_time_ms: u64,
        prompt_tokens: u32,
        completion_tokens: u32,
        tools_used: Vec<String>,
        tool_invocations: Vec<ToolInvocation>,
    ) -> Self {
        Self {
            content,
            success: true,
            execution_time_ms,
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            tools_used,
            tool_invocations,
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(error: String, execution_time_ms: u64) -> Self {
        Self {
            content: String::new(),
            success: false,
            execution_time_ms,
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            tools_used: Vec::new(),
            tool_invocations: Vec::new(),
            error: Some(error),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;

    #[test]
    fn test_interpolated_fills_all_prompt_fields() {
        let provider = Arc::new(ScriptedProvider::with_messages(Vec::<String>::new()));
        let agent = Agent::new(
            "Analyst for {customer_domain}",
            "Understand {customer_domain}",
            "You studied {customer_domain} for years.",
            AgentModelConfig::new("test-model".to_string(), 0.7, 1024),
            vec![],
            provider,
        );
        let inputs = RunInputs::from_pairs([("customer_domain", "example.com")]);
        let filled = agent.interpolated(&inputs);
        assert_eq!(filled.role, "Analyst for example.com");
        assert_eq!(filled.goal, "Understand example.com");
        assert_eq!(filled.backstory, "You studied example.com for years.");
        // Identity and settings are untouched.
        assert_eq!(filled.id, agent.id);
        assert_eq!(filled.llm_config.model_name, "test-model");
    }
}
