//! Prompt construction and the bounded LLM attempt loop.

use std::future::Future;
use std::sync::Arc;

use crate::llm::{ChatMessage, ChatOptions, LlmClient};

use super::output_gate;
use super::patterns::Pattern;
use super::stepper::StepPlan;

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_TOKENS: u64 = 120;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// The only step of a plan whose generation failed on every attempt.
pub const FALLBACK_STEP: &str = "Unable to generate safe steps. Try again later.";

const PERSONA: &str = "You are an executive-function assistant for neurodivergent users.";

const FORMAT_RULES: &[&str] = &[
    "Output ONLY a numbered list",
    "Maximum 8 steps",
    "One action per line",
    "Each sentence under 12 words",
    "No explanations",
    "No emojis",
    "No extra text",
];

/// The system/user pair sent for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(task: &str, pattern: &Pattern) -> Self {
        Self {
            system: system_instruction(pattern),
            user: task.to_string(),
        }
    }

    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::system(self.system.as_str()),
            ChatMessage::user(self.user.as_str()),
        ]
    }
}

/// Persona, then the category guidance, then the formatting rules.
pub fn system_instruction(pattern: &Pattern) -> String {
    let mut out = format!("{}\n\n{}\n\nRules:", PERSONA, pattern.render());
    for rule in FORMAT_RULES {
        out.push_str("\n- ");
        out.push_str(rule);
    }
    out
}

/// Outcome of a bounded sequence of attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Succeeded { value: T, attempts: usize },
    Exhausted { attempts: usize },
}

/// Call `op` with attempt numbers 1..=max_attempts until it yields `Some`.
pub async fn with_attempts<T, F, Fut>(max_attempts: usize, mut op: F) -> Attempt<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 1..=max_attempts {
        if let Some(value) = op(attempt).await {
            return Attempt::Succeeded {
                value,
                attempts: attempt,
            };
        }
    }
    Attempt::Exhausted {
        attempts: max_attempts,
    }
}

/// Knobs for the completion request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u64,
    pub max_attempts: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// A plan from the model, or the placeholder used when every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Generated(StepPlan),
    Fallback(StepPlan),
}

impl Generation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback(_))
    }

    pub fn into_plan(self) -> StepPlan {
        match self {
            Generation::Generated(plan) | Generation::Fallback(plan) => plan,
        }
    }
}

pub fn fallback_plan(task: &str) -> StepPlan {
    StepPlan::new(task, vec![FALLBACK_STEP.to_string()])
}

pub struct StepGenerator {
    client: Arc<dyn LlmClient>,
    settings: GenerationSettings,
}

impl StepGenerator {
    pub fn new(client: Arc<dyn LlmClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    /// Ask the model for steps, retrying on errors and malformed output.
    ///
    /// Never fails: exhausting the attempts yields [`Generation::Fallback`].
    pub async fn generate(&self, task: &str, pattern: &Pattern) -> Generation {
        let prompt = Prompt::new(task, pattern);
        let prompt = &prompt;

        let outcome = with_attempts(self.settings.max_attempts, move |attempt| {
            self.attempt_once(prompt, attempt)
        })
        .await;

        match outcome {
            Attempt::Succeeded { value, attempts } => {
                tracing::debug!(
                    "Generated {} steps for '{}' in {} attempt(s)",
                    value.len(),
                    task,
                    attempts
                );
                Generation::Generated(StepPlan::new(task, value))
            }
            Attempt::Exhausted { attempts } => {
                tracing::warn!(
                    "No valid steps for '{}' after {} attempts, using fallback",
                    task,
                    attempts
                );
                Generation::Fallback(fallback_plan(task))
            }
        }
    }

    async fn attempt_once(&self, prompt: &Prompt, attempt: usize) -> Option<Vec<String>> {
        let options = ChatOptions {
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
        };

        let response = match self
            .client
            .chat_completion(&self.settings.model, &prompt.messages(), options)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Attempt {} for '{}' failed: {}", attempt, prompt.user, e);
                return None;
            }
        };

        let text = response.content.as_deref().unwrap_or_default();
        if !output_gate::validate(text) {
            tracing::warn!(
                "Attempt {} for '{}' returned malformed output ({}): {:?}",
                attempt,
                prompt.user,
                response.summary(),
                text
            );
            return None;
        }

        let steps = output_gate::parse_steps(text);
        if steps.is_empty() {
            tracing::warn!("Attempt {} for '{}' parsed to no steps", attempt, prompt.user);
            return None;
        }
        Some(steps)
    }
}
