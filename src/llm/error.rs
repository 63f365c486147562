//! Error types for LLM calls.
//!
//! A failed call is always distinguishable from a call that succeeded but
//! returned unusable text: the former is an `LlmError`, the latter is an
//! `Ok` response the caller has to validate itself.

use std::fmt;
use thiserror::Error;

/// Broad classification of an LLM failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// The provider throttled us (HTTP 429).
    RateLimited,
    /// 5xx from the provider.
    ServerError,
    /// 4xx other than 429 (bad key, bad model, malformed request).
    ClientError,
    /// Connection refused, DNS failure, timeout.
    Network,
    /// The body could not be decoded into a completion.
    Parse,
}

impl fmt::Display for LlmErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LlmErrorKind::RateLimited => "rate_limited",
            LlmErrorKind::ServerError => "server_error",
            LlmErrorKind::ClientError => "client_error",
            LlmErrorKind::Network => "network",
            LlmErrorKind::Parse => "parse",
        };
        f.write_str(s)
    }
}

/// Map an HTTP status code to an error kind.
pub fn classify_http_status(status: u16) -> LlmErrorKind {
    match status {
        429 => LlmErrorKind::RateLimited,
        500..=599 => LlmErrorKind::ServerError,
        _ => LlmErrorKind::ClientError,
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl LlmError {
    pub fn network_error(message: String) -> Self {
        Self {
            kind: LlmErrorKind::Network,
            status: None,
            message,
        }
    }

    pub fn parse_error(message: String) -> Self {
        Self {
            kind: LlmErrorKind::Parse,
            status: None,
            message,
        }
    }

    /// Build an error from a non-success HTTP response.
    pub fn from_status(status: u16, body: String) -> Self {
        Self {
            kind: classify_http_status(status),
            status: Some(status),
            message: body,
        }
    }
}
