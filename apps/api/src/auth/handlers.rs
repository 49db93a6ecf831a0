//! Axum route handlers for accounts, sessions and profiles.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::extractor::SessionUser;
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::user::{ProfileUpdate, UserProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
    pub profile: UserProfile,
}

/// POST /api/v1/auth/register
///
/// Creates the account and profile, then signs the user in.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let display_name = req
        .display_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let profile = state
        .credentials
        .register(&req.email, &req.password, display_name)
        .await?;
    let session = state.credentials.login(&req.email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse { session, profile }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.credentials.login(&req.email, &req.password).await?;
    let profile = state
        .credentials
        .get_profile(session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    info!("User {} logged in", session.user_id);
    Ok(Json(SessionResponse { session, profile }))
}

/// POST /api/v1/auth/logout
///
/// Ends the session and discards its dashboard state.
pub async fn handle_logout(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<StatusCode, AppError> {
    state.credentials.logout(&session.token).await?;
    state.dashboards.remove(&session.token).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .credentials
        .get_profile(session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profile
///
/// Merges fields into the profile; the client uses this to mark onboarding complete.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: SessionUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .credentials
        .update_profile(session.user_id, update)
        .await?;
    Ok(Json(profile))
}
