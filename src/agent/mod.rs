pub mod agent;
pub mod execution;
pub mod prompts;

// Re-export main types for easier access
pub use agent::Agent;
pub use agent::AgentModelConfig;
pub use agent::AgentResponse;
pub use agent::ToolInvocation;
