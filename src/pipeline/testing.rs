//! Scripted LLM client for pipeline tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::{ChatMessage, ChatOptions, ChatResponse, LlmClient, LlmError, Role};

/// What the last request carried.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u64>,
}

/// Replays canned results in order, one per call.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self::from_responses(
            script
                .into_iter()
                .map(|r| r.map(|content| text_response(&content)))
                .collect(),
        )
    }

    pub fn from_responses(script: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

fn text_response(content: &str) -> ChatResponse {
    ChatResponse {
        content: Some(content.to_string()),
        finish_reason: Some("stop".to_string()),
        usage: None,
        model: None,
    }
}

fn content_of(messages: &[ChatMessage], role: Role) -> String {
    messages
        .iter()
        .find(|m| m.role == role)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            system: content_of(messages, Role::System),
            user: content_of(messages, Role::User),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network_error("script exhausted".to_string())))
    }
}
