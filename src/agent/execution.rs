use serde_json::Value;

use crate::agent::agent::{Agent, AgentResponse, ToolInvocation};
use crate::llm::{ChatMessage, CompletionKind, CompletionRequest, ToolSpec, Usage};
use crate::task::Task;

/// Upper bound on completion rounds for one task, so a model that keeps
/// requesting tools cannot loop forever.
const MAX_TOOL_ROUNDS: usize = 8;

impl Agent {
    /// Execute a task without prior context.
    pub async fn execute(&self, task: &Task) -> AgentResponse {
        self.execute_with_context(task, "").await
    }

    /// Execute a task, giving the agent the outputs of previous tasks as
    /// context. Failures are reported in the response rather than panicking.
    pub async fn execute_with_context(&self, task: &Task, context: &str) -> AgentResponse {
        let start_time = std::time::Instant::now();
        if self.verbose {
            println!("# Agent: {}\n## Task: {}", self.role, task.description);
        }

        match self.run_completion_loop(task, context).await {
            Ok((content, usage, tools_used, tool_invocations)) => AgentResponse::success(
                content,
                start_time.elapsed().as_millis() as u64,
                usage.prompt_tokens,
                usage.completion_tokens,
                tools_used,
                tool_invocations,
            ),
            Err(error) => {
                AgentResponse::error(error, start_time.elapsed().as_millis() as u64)
            }
        }
    }

    async fn run_completion_loop(
        &self,
        task: &Task,
        context: &str,
    ) -> Result<(String, Usage, Vec<String>, Vec<ToolInvocation>), String> {
        let mut messages = self.build_initial_messages(task, context);
        let specs: Vec<ToolSpec> = self.tools.iter().map(|tool| tool.spec()).collect();
        let mut usage = Usage::default();
        let mut tools_used = Vec::new();
        let mut tool_invocations = Vec::new();

        for _ in 0..MAX_TOOL_ROUNDS {
            let request = CompletionRequest::new(
                messages.clone(),
                self.llm_config.model_name.clone(),
                Some(self.llm_config.temperature),
                Some(self.llm_config.max_tokens),
                specs.clone(),
            );

            let response = self
                .provider
                .completion(request)
                .await
                .map_err(|e| e.to_string())?;
            usage.add(response.usage);

            match response.kind {
                CompletionKind::Message { content } => {
                    return Ok((content, usage, tools_used, tool_invocations));
                }
                CompletionKind::ToolCalls { tool_calls } => {
                    messages.push(ChatMessage::assistant_tool_calls(tool_calls.clone()));
                    for call in tool_calls {
                        let tool_name = call.function.name.clone();
                        let args: Value = serde_json::from_str(&call.function.arguments)
                            .unwrap_or(Value::Object(Default::default()));

                        if self.verbose {
                            println!("## Using tool: {} ({})", tool_name, call.function.arguments);
                        }

                        let tool_start = std::time::Instant::now();
                        let result = match self.tools.iter().find(|t| t.name() == tool_name) {
                            Some(tool) => tool.call(args).await,
                            None => format!("Tool '{}' is not available.", tool_name),
                        };

                        tool_invocations.push(ToolInvocation {
                            tool_name: tool_name.clone(),
                            arguments: call.function.arguments.clone(),
                            result: result.clone(),
                            execution_time_ms: tool_start.elapsed().as_millis() as u64,
                        });
                        tools_used.push(tool_name);
                        messages.push(ChatMessage::tool(result, call.id));
                    }
                }
            }
        }

        Err(format!(
            "the model kept requesting tools for {} rounds without a final answer",
            MAX_TOOL_ROUNDS
        ))
    }
}
