use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The caller's session, resolved from `Authorization: Bearer <token>`.
/// Use as an extractor on any handler that requires login.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let user_id = state
            .credentials
            .resolve_session(token)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Rejected unknown or expired session token");
                AppError::Unauthorized
            })?;

        Ok(SessionUser {
            user_id,
            token: token.to_string(),
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
