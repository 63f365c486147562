//! OpenAI-compatible chat-completions client (Groq by default).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::LlmError;
use super::{ChatMessage, ChatOptions, ChatResponse, LlmClient, TokenUsage};

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Chat-completions client with a hard per-request timeout.
pub struct GroqClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl GroqClient {
    /// Create a client against `api_url`, failing each request that takes
    /// longer than `timeout`.
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_url,
        })
    }

    async fn execute_request(&self, request: &CompletionRequest) -> Result<ChatResponse, LlmError> {
        let response = match self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(LlmError::network_error(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(LlmError::network_error(format!("Connection failed: {}", e)));
                } else {
                    return Err(LlmError::network_error(format!("Request failed: {}", e)));
                }
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), body));
        }

        parse_completion(&body, &request.model)
    }
}

fn parse_completion(body: &str, requested_model: &str) -> Result<ChatResponse, LlmError> {
    let parsed: CompletionResponse = serde_json::from_str(body).map_err(|e| {
        LlmError::parse_error(format!("Failed to parse response: {}, body: {}", e, body))
    })?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::parse_error("No choices in response".to_string()))?;

    Ok(ChatResponse {
        content: choice.message.content,
        finish_reason: choice.finish_reason,
        usage: parsed
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        model: parsed.model.or_else(|| Some(requested_model.to_string())),
    })
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        let request = CompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!("Sending chat completion: model={}", model);

        self.execute_request(&request).await
    }
}

/// Chat-completions request format.
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Usage data (OpenAI-compatible).
#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmErrorKind, Role};

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ChatMessage::system("rules"), ChatMessage::user("Clean desk")],
            temperature: Some(0.2),
            max_tokens: Some(120),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Clean desk");
        assert_eq!(json["temperature"], 0.2);
        assert_eq!(json["max_tokens"], 120);
    }

    #[test]
    fn test_request_omits_unset_options() {
        let request = CompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::new(Role::User, "hi")],
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "model": "llama-3.1-8b-instant",
            "choices": [{"message": {"role": "assistant", "content": "1. Open laptop"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 5, "total_tokens": 45}
        }"#;
        let response = parse_completion(body, "fallback").unwrap();
        assert_eq!(response.content.as_deref(), Some("1. Open laptop"));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, 45);
        assert_eq!(response.model.as_deref(), Some("llama-3.1-8b-instant"));
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let err = parse_completion(r#"{"choices": []}"#, "m").unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Parse);
    }

    #[test]
    fn test_parse_completion_garbage() {
        let err = parse_completion("<html>bad gateway</html>", "m").unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Parse);
    }

    fn client_for(addr: std::net::SocketAddr, timeout: Duration) -> GroqClient {
        GroqClient::new(
            "gsk_test".to_string(),
            format!("http://{}/v1/chat/completions", addr),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_stalled_upstream_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer.
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = client_for(addr, Duration::from_millis(100));
        let started = std::time::Instant::now();
        let err = client
            .chat_completion("m", &[ChatMessage::user("Clean desk")], ChatOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, LlmErrorKind::Network);
        assert!(err.message.starts_with("Request timeout"), "{}", err.message);
        assert!(started.elapsed() < Duration::from_secs(1));
        server.abort();
    }

    #[tokio::test]
    async fn test_error_status_is_classified() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // The JSON body is the last thing sent.
            while !request.ends_with(b"}") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket
                .write_all(
                    b"HTTP/1.1 429 Too Many Requests\r\nContent-Length: 4\r\nConnection: close\r\n\r\nslow",
                )
                .await;
        });

        let client = client_for(addr, Duration::from_secs(5));
        let err = client
            .chat_completion("m", &[ChatMessage::user("Clean desk")], ChatOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, LlmErrorKind::RateLimited);
        assert_eq!(err.status, Some(429));
        assert_eq!(err.message, "slow");
        server.await.unwrap();
    }
}
