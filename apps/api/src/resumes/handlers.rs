//! Axum route handlers for stored resumes. Every route is scoped to the
//! session's user; another user's resume reads as not found.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::SessionUser;
use crate::dashboard::export::ResumeDownload;
use crate::errors::AppError;
use crate::generation::validation::validate_resume_input;
use crate::models::resume::{NewResume, ResumeInput, ResumeUpdate, StoredResume};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResumeRequest {
    #[serde(flatten)]
    pub input: ResumeInput,
    pub generated_resume: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResumeResponse {
    pub id: Uuid,
}

/// POST /api/v1/resumes
pub async fn handle_save_resume(
    State(state): State<AppState>,
    session: SessionUser,
    Json(req): Json<SaveResumeRequest>,
) -> Result<(StatusCode, Json<SaveResumeResponse>), AppError> {
    validate_resume_input(&req.input).map_err(AppError::InvalidFields)?;

    let id = state
        .resumes
        .save(NewResume {
            user_id: session.user_id,
            input: req.input,
            generated_resume: req.generated_resume,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SaveResumeResponse { id })))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<Vec<StoredResume>>, AppError> {
    let resumes = state.resumes.list_by_user(session.user_id).await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResume>, AppError> {
    Ok(Json(owned_resume(&state, &session, id).await?))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<Uuid>,
    Json(update): Json<ResumeUpdate>,
) -> Result<Json<StoredResume>, AppError> {
    if let Some(input) = &update.input {
        validate_resume_input(input).map_err(AppError::InvalidFields)?;
    }
    owned_resume(&state, &session, id).await?;

    let updated = state.resumes.update(id, update).await?;
    Ok(Json(updated))
}

/// GET /api/v1/resumes/:id/export
///
/// Downloads the stored generated text as `resume.txt`.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<ResumeDownload, AppError> {
    let resume = owned_resume(&state, &session, id).await?;
    let text = resume
        .generated_resume
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} has no generated text")))?;
    Ok(ResumeDownload(text))
}

async fn owned_resume(
    state: &AppState,
    session: &SessionUser,
    id: Uuid,
) -> Result<StoredResume, AppError> {
    state
        .resumes
        .get(id)
        .await?
        .filter(|r| r.user_id == session.user_id)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}
