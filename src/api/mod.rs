//! HTTP API.
//!
//! ## Endpoints
//! - `GET  /health` - liveness and whether an LLM is configured
//! - `POST /generate-plan` - split, prioritize and plan a task list
//! - `POST /next-step` - advance through a plan the client holds
//! - `POST /register`, `POST /login` - accounts and bearer tokens
//! - `POST /save-task`, `GET /user-tasks` - per-user task text (bearer token)
//!
//! ## Task storage contract
//! These two routes are not wire-compatible with the earlier Python backend,
//! whose frontend sent `email` (and `content`) as query parameters without a
//! token. Here:
//! - both routes require `Authorization: Bearer <jwt>` from `/login` and
//!   answer 401 without a valid one
//! - the account is the token's `sub`; an `email` query parameter is ignored
//! - `/save-task` takes a JSON body `{"content": "..."}`
//!
//! A client written for the old API must log in first and move `content`
//! into the body.
//!
//! `/next-step` responses carry `completed: true` once the index is past the
//! last step, so clients need not compare against the "Task completed." text.

mod auth;
mod routes;
pub mod types;

pub use auth::AuthUser;
pub use routes::{router, serve, AppState};
