//! Axum route handlers for the dashboard. Each handler applies one transition
//! to the session's `Dashboard` and returns the resulting snapshot.
//!
//! The registry lock is only held for the synchronous transition; generation,
//! persistence and uploads run between transitions with the lock released.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::extractor::SessionUser;
use crate::dashboard::export::ResumeDownload;
use crate::dashboard::upload::{classify_upload, read_text_upload};
use crate::dashboard::view::{Dashboard, DashboardView, PreviewContent, TransitionError};
use crate::errors::AppError;
use crate::generation::handlers::AtsScoreResponse;
use crate::generation::validation::validate_resume_input;
use crate::generation::writer::Source;
use crate::models::resume::{NewResume, ResumeInput};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub view: DashboardView,
    pub preview: Option<PreviewContent>,
    pub can_edit: bool,
    pub in_flight: bool,
    /// Prefill for the edit form.
    pub draft: Option<ResumeInput>,
}

impl From<&Dashboard> for DashboardResponse {
    fn from(d: &Dashboard) -> Self {
        Self {
            view: d.view(),
            preview: d.preview().cloned(),
            can_edit: d.can_edit(),
            in_flight: d.in_flight(),
            draft: d.draft().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardGenerateResponse {
    pub resume_id: Uuid,
    pub source: Source,
    pub dashboard: DashboardResponse,
}

/// Applies `transition` and snapshots the dashboard if it succeeds.
async fn transition(
    state: &AppState,
    session: &SessionUser,
    apply: impl FnOnce(&mut Dashboard) -> Result<(), TransitionError>,
) -> Result<DashboardResponse, AppError> {
    let response = state
        .dashboards
        .with(&session.token, |d| {
            apply(d)?;
            Ok::<_, TransitionError>(DashboardResponse::from(&*d))
        })
        .await?;
    Ok(response)
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    session: SessionUser,
) -> Json<DashboardResponse> {
    let dashboard = state.dashboards.snapshot(&session.token).await;
    Json(DashboardResponse::from(&dashboard))
}

/// POST /api/v1/dashboard/create
pub async fn handle_select_create(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<DashboardResponse>, AppError> {
    Ok(Json(transition(&state, &session, Dashboard::select_create).await?))
}

/// POST /api/v1/dashboard/upload-existing
pub async fn handle_select_upload(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<DashboardResponse>, AppError> {
    Ok(Json(transition(&state, &session, Dashboard::select_upload).await?))
}

/// POST /api/v1/dashboard/edit
pub async fn handle_edit(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<DashboardResponse>, AppError> {
    Ok(Json(transition(&state, &session, Dashboard::edit).await?))
}

/// POST /api/v1/dashboard/back
pub async fn handle_back(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let response = transition(&state, &session, |d| {
        d.back();
        Ok(())
    })
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/dashboard/generate
///
/// Validate → mark in flight → generate (never fails) → persist → preview.
/// A storage failure clears the loading flag and leaves the form open. The
/// ticket from `begin_generation` keeps a superseded request from landing.
pub async fn handle_generate(
    State(state): State<AppState>,
    session: SessionUser,
    Json(input): Json<ResumeInput>,
) -> Result<Json<DashboardGenerateResponse>, AppError> {
    validate_resume_input(&input).map_err(AppError::InvalidFields)?;

    let draft = input.clone();
    let ticket = state
        .dashboards
        .with(&session.token, move |d| d.begin_generation(draft))
        .await?;

    let generated = state.writer.generate(&input).await;
    if let Some(reason) = generated.fallback_reason() {
        info!(
            "Dashboard resume for user {} uses the template: {reason}",
            session.user_id
        );
    }
    let source = generated.source();
    let text = generated.into_inner();

    let saved = state
        .resumes
        .save(NewResume {
            user_id: session.user_id,
            input,
            generated_resume: Some(text.clone()),
        })
        .await;

    let resume_id = match saved {
        Ok(id) => id,
        Err(e) => {
            if let Err(stale) = state
                .dashboards
                .with(&session.token, |d| d.generation_failed(ticket))
                .await
            {
                warn!("Dashboard moved on during failed generation: {stale}");
            }
            return Err(e.into());
        }
    };

    let dashboard =
        transition(&state, &session, move |d| d.generation_completed(ticket, text)).await?;

    info!(
        "Generated resume {} ({:?}) for user {}",
        resume_id, source, session.user_id
    );

    Ok(Json(DashboardGenerateResponse {
        resume_id,
        source,
        dashboard,
    }))
}

/// POST /api/v1/dashboard/upload (multipart, field `file`)
///
/// Only `.txt` is read. Requests outside the upload view, PDFs and other types
/// are rejected before the body is read.
pub async fn handle_upload(
    State(state): State<AppState>,
    session: SessionUser,
    mut multipart: Multipart,
) -> Result<Json<DashboardResponse>, AppError> {
    state
        .dashboards
        .with(&session.token, |d| d.check_upload())
        .await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let kind = classify_upload(field.file_name(), field.content_type());
        if let Some(notice) = kind.rejection_notice() {
            info!("Rejected upload {:?} ({:?})", field.file_name(), kind);
            return Err(AppError::UnsupportedFileType(notice.to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        let text = read_text_upload(&bytes);

        let response = transition(&state, &session, move |d| d.upload_completed(text)).await?;
        return Ok(Json(response));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// POST /api/v1/dashboard/ats-scan
///
/// Scores the text currently shown in preview, for either variant.
pub async fn handle_ats_scan(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<AtsScoreResponse>, AppError> {
    let text = preview_text(&state, &session).await?;
    let scored = state.writer.score_ats(&text).await;
    Ok(Json(AtsScoreResponse::from_sourced(scored)))
}

/// GET /api/v1/dashboard/export
pub async fn handle_export(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<ResumeDownload, AppError> {
    Ok(ResumeDownload(preview_text(&state, &session).await?))
}

async fn preview_text(state: &AppState, session: &SessionUser) -> Result<String, AppError> {
    state
        .dashboards
        .with(&session.token, |d| d.preview_text().map(str::to_string))
        .await
        .ok_or_else(|| AppError::NotFound("No resume preview is open".to_string()))
}
