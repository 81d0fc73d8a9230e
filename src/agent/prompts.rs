use crate::agent::agent::Agent;
use crate::llm::ChatMessage;
use crate::task::Task;

impl Agent {
    /// Build the transcript a task execution starts from.
    pub fn build_initial_messages(&self, task: &Task, context: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.build_system_prompt()),
            ChatMessage::user(self.build_task_prompt(task, context)),
        ]
    }

    fn build_system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {}. {}\n\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        );
        if !self.tools.is_empty() {
            let names: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
            prompt.push_str(&format!(
                "\n\nYou can use the following tools when they help: {}. \
                 Use a tool only when you need information you do not have.",
                names.join(", ")
            ));
        }
        prompt.push_str("\n\nGive complete, concrete answers. Do not ask the user questions.");
        prompt
    }

    fn build_task_prompt(&self, task: &Task, context: &str) -> String {
        let mut prompt = format!("Current task: {}", task.description);
        if !task.expected_output.is_empty() {
            prompt.push_str(&format!(
                "\n\nThis is the expected output for your final answer: {}",
                task.expected_output
            ));
        }
        if !context.is_empty() {
            prompt.push_str(&format!(
                "\n\nUse the results of the previous tasks as context:\n{}",
                context
            ));
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::agent::agent::AgentModelConfig;
    use crate::llm::testing::ScriptedProvider;
    use crate::llm::{ChatRole, MessageContent};

    use super::*;

    fn test_agent() -> Agent {
        Agent::new(
            "Lead Market Analyst",
            "Understand the market",
            "You are a seasoned analyst.",
            AgentModelConfig::new("test-model".to_string(), 0.7, 1024),
            vec![],
            Arc::new(ScriptedProvider::with_messages(Vec::<String>::new())),
        )
    }

    fn text_of(msg: &ChatMessage) -> &str {
        match &msg.content {
            Some(MessageContent::Text(text)) => text,
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_messages_shape() {
        let agent = test_agent();
        let task = Task::new("Research the market.", "A market report.");
        let messages = agent.build_initial_messages(&task, "");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].role, ChatRole::User);
        let system = text_of(&messages[0]);
        assert!(system.contains("Lead Market Analyst"));
        assert!(system.contains("Understand the market"));
        let user = text_of(&messages[1]);
        assert!(user.contains("Research the market."));
        assert!(user.contains("A market report."));
        assert!(!user.contains("previous tasks"));
    }

    #[test]
    fn test_task_prompt_includes_context() {
        let agent = test_agent();
        let task = Task::new("Write the strategy.", "A strategy document.");
        let messages = agent.build_initial_messages(&task, "Earlier research findings.");
        assert!(text_of(&messages[1]).contains("Earlier research findings."));
    }
}
