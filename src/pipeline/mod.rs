//! Task pipeline: from a free-text request to validated micro-step plans.
//!
//! ```text
//! raw text ─► input_gate ─► splitter ─► prioritizer ─► top K
//!                                                       │
//!            ┌──────────────────────────────────────────┘
//!            ▼  (per task, sequentially)
//!        patterns ─► generator ─► LLM ─► output_gate ─┐
//!                        ▲                             │ invalid / error
//!                        └──── up to 3 attempts ◄──────┘
//!            │
//!            ▼
//!        StepPlan ─► stepper (driven by the caller)
//! ```
//!
//! A task whose attempts are all used up gets a one-step fallback plan; the
//! rest of the batch is unaffected.

pub mod generator;
pub mod input_gate;
pub mod output_gate;
pub mod patterns;
pub mod prioritizer;
pub mod splitter;
pub mod stepper;

#[cfg(test)]
pub(crate) mod testing;

pub use generator::{Generation, GenerationSettings, StepGenerator, FALLBACK_STEP};
pub use input_gate::Rejection;
pub use patterns::{Category, Pattern};
pub use stepper::{StepPlan, StepRecord, TASK_COMPLETED};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::llm::{GroqClient, LlmClient};

/// How many prioritized tasks get a plan per request.
pub const DEFAULT_MAX_TASKS: usize = 3;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("input rejected: {0}")]
    InputRejected(Rejection),

    #[error("AI service unavailable")]
    ServiceUnavailable,
}

/// A freshly generated plan as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub task: String,
    pub current_step: String,
    pub next_step_index: usize,
    pub total_steps: usize,
    pub all_steps: Vec<String>,
}

impl From<StepPlan> for PlanRecord {
    fn from(mut plan: StepPlan) -> Self {
        let first = plan.advance();
        Self {
            task: plan.task,
            current_step: first.current_step,
            next_step_index: first.next_index,
            total_steps: first.total_steps,
            all_steps: plan.steps,
        }
    }
}

/// One step of an existing plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResponse {
    pub task: String,
    pub current_step: String,
    pub next_step_index: usize,
    pub total_steps: usize,
    /// True once the index has run past the last step.
    #[serde(default)]
    pub completed: bool,
}

/// Everything a plan request needs, built once at startup.
///
/// `generator` is `None` when no LLM is configured; generation then fails
/// fast with [`PlanError::ServiceUnavailable`].
pub struct PlanContext {
    generator: Option<StepGenerator>,
    max_tasks: usize,
}

impl PlanContext {
    pub fn new(generator: Option<StepGenerator>, max_tasks: usize) -> Self {
        Self {
            generator,
            max_tasks,
        }
    }

    /// Build the LLM client from `config`, if an API key is present.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let generator = match config.llm.api_key.clone() {
            Some(api_key) => {
                let client: Arc<dyn LlmClient> = Arc::new(GroqClient::new(
                    api_key,
                    config.llm.api_url.clone(),
                    config.llm.timeout,
                )?);
                tracing::info!(
                    "LLM configured: model={} timeout={:?}",
                    config.llm.model,
                    config.llm.timeout
                );
                Some(StepGenerator::new(
                    client,
                    GenerationSettings {
                        model: config.llm.model.clone(),
                        ..GenerationSettings::default()
                    },
                ))
            }
            None => None,
        };
        Ok(Self::new(generator, config.max_tasks))
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Normalize, order, and truncate the tasks in `raw_text`.
    pub fn select_tasks(&self, raw_text: &str) -> Result<Vec<String>, PlanError> {
        let raw_text = raw_text.trim();
        input_gate::check(raw_text).map_err(|rejection| {
            tracing::info!("Rejected plan input: {}", rejection);
            PlanError::InputRejected(rejection)
        })?;

        let mut tasks = prioritizer::prioritize(splitter::split(raw_text));
        tasks.truncate(self.max_tasks);
        Ok(tasks)
    }

    /// Produce one plan per selected task, in priority order.
    pub async fn generate_plan(&self, raw_text: &str) -> Result<Vec<PlanRecord>, PlanError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(PlanError::ServiceUnavailable)?;
        let tasks = self.select_tasks(raw_text)?;

        let mut records: Vec<PlanRecord> = Vec::with_capacity(tasks.len());
        let mut degraded = 0;
        for task in &tasks {
            let pattern = patterns::lookup(task);
            let generation = generator.generate(task, pattern).await;
            if generation.is_fallback() {
                degraded += 1;
            }
            records.push(generation.into_plan().into());
        }

        tracing::info!(
            "Generated {} plan(s), {} degraded",
            records.len(),
            degraded
        );
        Ok(records)
    }
}

/// Move to `step_index` within a plan the caller kept.
pub fn advance_step(task: &str, steps: &[String], step_index: usize) -> StepResponse {
    let record = stepper::advance(steps, step_index);
    StepResponse {
        task: task.to_string(),
        current_step: record.current_step,
        next_step_index: record.next_index,
        total_steps: record.total_steps,
        completed: record.completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use testing::ScriptedClient;

    fn context(client: Arc<ScriptedClient>) -> PlanContext {
        PlanContext::new(
            Some(StepGenerator::new(client, GenerationSettings::default())),
            DEFAULT_MAX_TASKS,
        )
    }

    #[tokio::test]
    async fn test_generate_plan_orders_tasks() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("1. Clear the desk surface\n2. Wipe it down".to_string()),
            Ok("1. Open notes\n2. Read first heading".to_string()),
        ]));
        let records = context(client.clone())
            .generate_plan("study for exam and clean desk")
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].task, "Clean desk");
        assert_eq!(records[0].current_step, "Clear the desk surface");
        assert_eq!(records[0].next_step_index, 1);
        assert_eq!(records[0].total_steps, 2);
        assert_eq!(records[1].task, "Study for exam");

        let requests = client.requests();
        assert!(requests[0].system.contains("Task type: Cleaning"));
        assert!(requests[1].system.contains("Task type: Studying"));
    }

    #[tokio::test]
    async fn test_generate_plan_caps_task_count() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("1. Go".to_string()),
            Ok("1. Go".to_string()),
            Ok("1. Go".to_string()),
        ]));
        let records = context(client.clone())
            .generate_plan("clean desk, send form, walk dog, buy milk")
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_task_does_not_affect_siblings() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(LlmError::network_error("down".to_string())),
            Err(LlmError::network_error("down".to_string())),
            Err(LlmError::network_error("down".to_string())),
            Ok("1. Open mail app\n2. Reply to one email".to_string()),
        ]));
        let records = context(client)
            .generate_plan("clean desk and reply to email")
            .await
            .unwrap();

        assert_eq!(records[0].task, "Clean desk");
        assert_eq!(records[0].all_steps, vec![FALLBACK_STEP]);
        assert_eq!(records[0].total_steps, 1);
        assert_eq!(records[1].task, "Reply to email");
        assert_eq!(records[1].all_steps, vec!["Open mail app", "Reply to one email"]);
    }

    #[tokio::test]
    async fn test_rejected_input_makes_no_calls() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let err = context(client.clone())
            .generate_plan("why do I feel so lazy")
            .await
            .unwrap_err();

        assert!(matches!(err, PlanError::InputRejected(_)));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_service_fails_fast() {
        let ctx = PlanContext::new(None, DEFAULT_MAX_TASKS);
        assert!(!ctx.is_available());
        let err = ctx.generate_plan("clean desk").await.unwrap_err();
        assert!(matches!(err, PlanError::ServiceUnavailable));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let mut config = Config::default();
        assert!(!PlanContext::from_config(&config).unwrap().is_available());

        config.llm.api_key = Some("gsk_test".to_string());
        assert!(PlanContext::from_config(&config).unwrap().is_available());
    }

    #[tokio::test]
    async fn test_generated_plan_steps_through_once() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            "1. Stand up\n2. Walk to desk\n3. Sit down".to_string(),
        )]));
        let record = context(client)
            .generate_plan("organize desk")
            .await
            .unwrap()
            .remove(0);

        let mut seen = vec![record.current_step.clone()];
        let mut index = record.next_step_index;
        loop {
            let step = advance_step(&record.task, &record.all_steps, index);
            if step.completed {
                assert_eq!(step.next_step_index, index);
                break;
            }
            seen.push(step.current_step);
            index = step.next_step_index;
        }
        assert_eq!(seen, record.all_steps);
    }

    #[test]
    fn test_advance_step_terminal() {
        let steps: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let first = advance_step("Task", &steps, 3);
        let again = advance_step("Task", &steps, 3);
        assert_eq!(first.current_step, TASK_COMPLETED);
        assert_eq!(first.next_step_index, 3);
        assert_eq!(first.total_steps, 3);
        assert!(first.completed);
        assert_eq!(first, again);
    }

    #[test]
    fn test_advance_step_last_step_named_like_marker() {
        let steps = vec!["Wipe desk".to_string(), TASK_COMPLETED.to_string()];
        let last = advance_step("Clean desk", &steps, 1);
        assert_eq!(last.current_step, TASK_COMPLETED);
        assert_eq!(last.next_step_index, 2);
        assert!(!last.completed);
        assert!(advance_step("Clean desk", &steps, 2).completed);
    }
}
