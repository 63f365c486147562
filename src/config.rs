//! Configuration management.
//!
//! Configuration is read from environment variables:
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Server port (default: 8000)
//! - `GROQ_API_KEY` - Optional. Plan generation is unavailable without it.
//! - `LLM_API_URL` - Chat-completions endpoint (default: Groq)
//! - `LLM_MODEL` - Model identifier (default: llama-3.1-8b-instant)
//! - `LLM_TIMEOUT_SECS` - Per-request timeout, at least 1 (default: 30)
//! - `MAX_TASKS_PER_PLAN` - Tasks planned per request, at least 1 (default: 3)
//! - `JWT_SECRET` - HMAC secret for login tokens
//! - `JWT_TTL_HOURS` - Token lifetime, 1 to 8760 (default: 24)
//! - `DATABASE_PATH` - SQLite file (default: ./smart_companion.db)

use anyhow::{ensure, Context};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::MAX_TTL_HOURS;
use crate::llm::GROQ_API_URL;
use crate::pipeline::generator::DEFAULT_MODEL;
use crate::pipeline::DEFAULT_MAX_TASKS;

const DEFAULT_JWT_SECRET: &str = "supersecretkey";

/// LLM connection settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Token settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub llm: LlmConfig,
    pub auth: AuthConfig,
    pub max_tasks: usize,
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            llm: LlmConfig {
                api_key: None,
                api_url: GROQ_API_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                timeout: Duration::from_secs(30),
            },
            auth: AuthConfig {
                jwt_secret: DEFAULT_JWT_SECRET.to_string(),
                jwt_ttl_hours: 24,
            },
            max_tasks: DEFAULT_MAX_TASKS,
            database_path: PathBuf::from("smart_companion.db"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using the built-in development secret");
                defaults.auth.jwt_secret
            }
        };

        let api_key = get("GROQ_API_KEY");
        if api_key.is_none() {
            tracing::warn!("GROQ_API_KEY not set, plan generation will be unavailable");
        }

        let timeout_secs: u64 = parse_or(&get, "LLM_TIMEOUT_SECS", 30)?;
        ensure!(timeout_secs > 0, "LLM_TIMEOUT_SECS must be at least 1");

        let jwt_ttl_hours = parse_or(&get, "JWT_TTL_HOURS", defaults.auth.jwt_ttl_hours)?;
        ensure!(
            (1..=MAX_TTL_HOURS).contains(&jwt_ttl_hours),
            "JWT_TTL_HOURS must be between 1 and {}, got {}",
            MAX_TTL_HOURS,
            jwt_ttl_hours
        );

        let max_tasks = parse_or(&get, "MAX_TASKS_PER_PLAN", defaults.max_tasks)?;
        ensure!(max_tasks > 0, "MAX_TASKS_PER_PLAN must be at least 1");

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            llm: LlmConfig {
                api_key,
                api_url: get("LLM_API_URL").unwrap_or(defaults.llm.api_url),
                model: get("LLM_MODEL").unwrap_or(defaults.llm.model),
                timeout: Duration::from_secs(timeout_secs),
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_ttl_hours,
            },
            max_tasks,
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
