//! Credential/profile store: account registration, login sessions, and the
//! user profile record. Backends implement `CredentialStore` and are injected
//! into `AppState` as `Arc<dyn CredentialStore>`.

pub mod extractor;
pub mod handlers;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::{ProfileUpdate, UserProfile};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Credential-provider failures. The message is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password should be at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Credential backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Backend(e.to_string())
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(e: redis::RedisError) -> Self {
        AuthError::Backend(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::Backend(e.to_string())
    }
}

/// An authenticated login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Creates an account and its profile (`has_completed_onboarding = false`).
    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<UserProfile, AuthError>;

    /// Verifies credentials and opens a new session.
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Ends a session. Unknown tokens are ignored.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    async fn resolve_session(&self, token: &str) -> Result<Option<Uuid>, AuthError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AuthError>;

    /// Merges the given fields into the stored profile.
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError>;
}

/// Trims and lowercases an email, rejecting anything without a local part and a dotted domain.
pub(crate) fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(AuthError::InvalidEmail)
    }
}

pub(crate) fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

pub(crate) fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}
