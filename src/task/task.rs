use serde::{Deserialize, Serialize};

use crate::config::{interpolate, RunInputs};

/// One unit of crew work: what to do and what the result should look like.
/// Both fields may contain `{placeholder}` templates filled from the run
/// inputs when the crew kicks off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
}

impl Task {
    pub fn new<S: Into<String>>(description: S, expected_output: S) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }

    /// A copy of this task with its templates filled in.
    pub fn interpolated(&self, inputs: &RunInputs) -> Self {
        Self {
            description: interpolate(&self.description, inputs),
            expected_output: interpolate(&self.expected_output, inputs),
        }
    }
}
