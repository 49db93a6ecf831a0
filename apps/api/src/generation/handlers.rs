//! Axum route handlers for the Generation API. These are stateless: they do
//! not touch the dashboard or persist anything.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::SessionUser;
use crate::errors::AppError;
use crate::generation::ats::{AtsScore, ScoreBand};
use crate::generation::validation::validate_resume_input;
use crate::generation::writer::{Source, Sourced};
use crate::models::resume::ResumeInput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub resume: String,
    pub source: Source,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreResponse {
    #[serde(flatten)]
    pub ats: AtsScore,
    pub band: ScoreBand,
    pub source: Source,
}

/// POST /api/v1/resumes/generate
///
/// Generates resume text from form input. Always succeeds for valid input:
/// endpoint failures degrade to the local template.
pub async fn handle_generate(
    State(state): State<AppState>,
    _session: SessionUser,
    Json(input): Json<ResumeInput>,
) -> Result<Json<GenerateResponse>, AppError> {
    validate_resume_input(&input).map_err(AppError::InvalidFields)?;

    let generated = state.writer.generate(&input).await;
    Ok(Json(GenerateResponse {
        source: generated.source(),
        resume: generated.into_inner(),
    }))
}

/// POST /api/v1/resumes/ats-score
pub async fn handle_ats_score(
    State(state): State<AppState>,
    _session: SessionUser,
    Json(req): Json<AtsScoreRequest>,
) -> Result<Json<AtsScoreResponse>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resumeText cannot be empty".to_string(),
        ));
    }

    let scored = state.writer.score_ats(&req.resume_text).await;
    Ok(Json(AtsScoreResponse::from_sourced(scored)))
}

impl AtsScoreResponse {
    pub fn from_sourced(scored: Sourced<AtsScore>) -> Self {
        let source = scored.source();
        let ats = scored.into_inner();
        Self {
            band: ats.band(),
            ats,
            source,
        }
    }
}
