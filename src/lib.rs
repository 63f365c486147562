//! # Smart Companion
//!
//! An executive-function assistant that turns a short list of chores into
//! a few small, concrete steps per task.
//!
//! This library provides:
//! - A task pipeline that screens input, splits and orders tasks, and asks
//!   an LLM for numbered micro-steps it then validates
//! - An HTTP API for plans, step-by-step progress, accounts and saved tasks
//!
//! ## Request Flow
//! 1. Screen the request (no questions, feelings, or long text)
//! 2. Split into tasks and put quick physical ones first
//! 3. For the top three, pick a guidance pattern and ask the LLM for steps
//! 4. Reject malformed output and retry, up to three attempts per task
//! 5. Return each plan; the client walks it with `/next-step`
//!
//! ## Modules
//! - `pipeline`: gates, splitting, ordering, patterns, generation, stepping
//! - `llm`: chat-completion client abstraction
//! - `auth`: password hashing and tokens
//! - `store`: SQLite persistence
//! - `api`: axum routes

pub mod api;
pub mod auth;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod store;

pub use config::Config;
pub use pipeline::{PlanContext, PlanRecord, StepPlan};
