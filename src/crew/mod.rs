pub mod crew;
pub mod marketing;

// Re-export main types for easier access
pub use crew::{Crew, CrewOutput, CrewStep, TaskOutput};
pub use marketing::MarketingPostsCrew;
