pub mod agent;
pub mod config;
pub mod crew;
pub mod llm;
pub mod task;
pub mod tools;

pub use agent::*;
pub use crew::*;
pub use task::*;
