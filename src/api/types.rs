//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to generate plans from a free-text task list.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRequest {
    pub tasks: String,
}

/// Request for the next step of a plan the client is holding.
#[derive(Debug, Clone, Deserialize)]
pub struct ContinueRequest {
    pub task: String,
    pub steps: Vec<String>,
    pub step_index: usize,
}

/// Registration and login body.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Expiry as unix seconds
    pub exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveTaskRequest {
    pub content: String,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_configured: bool,
}
