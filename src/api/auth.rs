//! Account endpoints and bearer-token middleware.
//!
//! - `/register` stores a PBKDF2 hash of the password
//! - `/login` returns a JWT valid for `JWT_TTL_HOURS`
//! - Task storage routes require `Authorization: Bearer <jwt>`; the token's
//!   subject is the key tasks are stored under

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::routes::{run_blocking, AppState};
use super::types::{LoginResponse, MessageResponse, UserCreate};
use crate::auth::{AuthError, Registration};

/// Identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

fn internal_error(e: AuthError) -> (StatusCode, String) {
    tracing::error!("Auth backend failure: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserCreate>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let credentials = Arc::clone(&state.credentials);
    let outcome =
        run_blocking(move || credentials.register(req.email.trim(), &req.password)).await?;
    match outcome {
        Ok(Registration::Registered) => Ok(Json(MessageResponse::new("User created successfully"))),
        Ok(Registration::AlreadyExists) => Err((
            StatusCode::BAD_REQUEST,
            "User already exists. Please login instead.".to_string(),
        )),
        Err(AuthError::EmptyPassword) => Err((
            StatusCode::BAD_REQUEST,
            "Password is required".to_string(),
        )),
        Err(e) => Err(internal_error(e)),
    }
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserCreate>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let credentials = Arc::clone(&state.credentials);
    let outcome = run_blocking(move || credentials.login(req.email.trim(), &req.password)).await?;
    match outcome {
        Ok(issued) => Ok(Json(LoginResponse {
            access_token: issued.token,
            token_type: "bearer",
            exp: issued.exp,
        })),
        Err(AuthError::InvalidCredentials) => Err((
            StatusCode::BAD_REQUEST,
            "Invalid credentials".to_string(),
        )),
        Err(e) => Err(internal_error(e)),
    }
}

fn bearer_token(req: &Request<Body>) -> &str {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or("")
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = bearer_token(&req);
    if token.is_empty() {
        return (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response();
    }

    match state.credentials.verify(token) {
        Ok(email) => {
            req.extensions_mut().insert(AuthUser { email });
            next.run(req).await
        }
        Err(_) => (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response(),
    }
}
