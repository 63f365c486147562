//! Account registration, login, and bearer tokens.
//!
//! - Passwords are stored as PBKDF2 hashes (see [`password`])
//! - Login returns an HS256 JWT whose `sub` is the account email
//! - Tokens expire after `JWT_TTL_HOURS` (24 by default)

pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::store::{StoreError, UserStore};

/// Longest accepted token lifetime: one year.
pub const MAX_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password is required")]
    EmptyPassword,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Registered,
    AlreadyExists,
}

/// A signed token and its expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Account email
    sub: String,
    /// Issued-at unix seconds
    iat: i64,
    /// Expiration unix seconds
    exp: i64,
}

/// Opaque credential service used by the HTTP layer.
pub trait Credentials: Send + Sync {
    fn register(&self, identity: &str, secret: &str) -> Result<Registration, AuthError>;
    fn login(&self, identity: &str, secret: &str) -> Result<IssuedToken, AuthError>;
    /// Return the identity a valid token was issued for.
    fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Credentials backed by a [`UserStore`] and an HMAC secret.
pub struct JwtCredentials {
    users: Arc<dyn UserStore>,
    secret: String,
    ttl: Duration,
}

impl JwtCredentials {
    /// `ttl_hours` is clamped to `1..=MAX_TTL_HOURS`.
    pub fn new(users: Arc<dyn UserStore>, secret: String, ttl_hours: i64) -> Self {
        Self {
            users,
            secret,
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_TTL_HOURS)),
        }
    }

    fn issue(&self, identity: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(IssuedToken {
            token,
            exp: claims.exp,
        })
    }
}

impl Credentials for JwtCredentials {
    fn register(&self, identity: &str, secret: &str) -> Result<Registration, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let hash = password::hash_password(secret);
        if self.users.insert_user(identity, &hash)? {
            tracing::info!("Registered user {}", identity);
            Ok(Registration::Registered)
        } else {
            tracing::debug!("User {} already exists", identity);
            Ok(Registration::AlreadyExists)
        }
    }

    fn login(&self, identity: &str, secret: &str) -> Result<IssuedToken, AuthError> {
        let valid = match self.users.password_hash(identity)? {
            Some(stored) => password::verify_password(secret, &stored),
            None => false,
        };
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }
        self.issue(identity)
    }

    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims.sub)
    }
}
