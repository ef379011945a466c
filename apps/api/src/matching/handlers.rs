//! Axum route handlers for ad-hoc matching.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::get_job;
use crate::matching::analyzer::{analyze_resume, ResumeAnalysis};
use crate::matching::skills::{skill_overlap, SkillOverlap};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchPreviewRequest {
    pub job_id: Uuid,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchPreviewResponse {
    pub analysis: ResumeAnalysis,
    pub skill_overlap: SkillOverlap,
}

/// POST /api/v1/match/preview
///
/// Scores a resume against a job without storing anything.
pub async fn handle_match_preview(
    State(state): State<AppState>,
    Json(request): Json<MatchPreviewRequest>,
) -> Result<Json<MatchPreviewResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let job = get_job(&state.db, request.job_id).await?;
    let analysis = analyze_resume(
        state.generator.as_ref(),
        &request.resume_text,
        &job.description,
        &job.requirements,
    )
    .await?;
    let skill_overlap = skill_overlap(&job.requirements, &analysis.skills);

    Ok(Json(MatchPreviewResponse {
        analysis,
        skill_overlap,
    }))
}
