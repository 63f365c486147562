//! Walking through a generated plan one step at a time.
//!
//! Nothing here is stored server-side: the caller hands back the steps and
//! the index it was last given.

use serde::{Deserialize, Serialize};

/// Reported once the index has run past the last step.
pub const TASK_COMPLETED: &str = "Task completed.";

/// A task together with its micro-steps and how far the user has got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPlan {
    pub task: String,
    pub steps: Vec<String>,
    pub current_index: usize,
}

impl StepPlan {
    /// A fresh plan positioned at the first step. `steps` must be non-empty.
    pub fn new(task: impl Into<String>, steps: Vec<String>) -> Self {
        debug_assert!(!steps.is_empty(), "a plan needs at least one step");
        Self {
            task: task.into(),
            steps,
            current_index: 0,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.steps.len()
    }

    /// Return the current step and move the index forward.
    pub fn advance(&mut self) -> StepRecord {
        let record = advance(&self.steps, self.current_index);
        self.current_index = record.next_index;
        record
    }
}

/// Result of one advance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub current_step: String,
    pub next_index: usize,
    pub total_steps: usize,
    /// Set only when the index was past the last step.
    pub completed: bool,
}

impl StepRecord {
    pub fn is_terminal(&self) -> bool {
        self.completed
    }
}

/// Step at `proposed_index`, or the completion marker once past the end.
///
/// Past the end the index is echoed back unchanged, so repeating the call
/// keeps returning the same terminal record.
pub fn advance(steps: &[String], proposed_index: usize) -> StepRecord {
    let total_steps = steps.len();
    match steps.get(proposed_index) {
        Some(step) => StepRecord {
            current_step: step.clone(),
            next_index: proposed_index + 1,
            total_steps,
            completed: false,
        },
        None => StepRecord {
            current_step: TASK_COMPLETED.to_string(),
            next_index: proposed_index,
            total_steps,
            completed: true,
        },
    }
}
