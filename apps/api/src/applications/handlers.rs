use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::{
    applications_by_employer, applications_by_job, applications_by_user, apply, status_counts,
    update_status, StatusCount, SubmittedApplication,
};
use crate::errors::AppError;
use crate::jobs::get_job;
use crate::models::application::{Application, ApplicationStatus, ApplicationSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct EmployerApplicationsQuery {
    pub job_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationSummary>,
    pub status_counts: Vec<StatusCount>,
}

impl From<Vec<ApplicationSummary>> for ApplicationListResponse {
    fn from(applications: Vec<ApplicationSummary>) -> Self {
        let status_counts = status_counts(applications.iter().map(|a| a.status.as_str()));
        Self {
            applications,
            status_counts,
        }
    }
}

/// POST /api/v1/jobs/:id/applications
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<SubmittedApplication>), AppError> {
    let submitted = apply(
        &state.db,
        state.generator.as_ref(),
        req.user_id,
        job_id,
        &req.resume_text,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(submitted)))
}

/// GET /api/v1/jobs/:id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    get_job(&state.db, job_id).await?;
    let applications = applications_by_job(&state.db, job_id).await?;
    Ok(Json(applications.into()))
}

/// GET /api/v1/employers/:id/applications
pub async fn handle_employer_applications(
    State(state): State<AppState>,
    Path(employer_id): Path<Uuid>,
    Query(params): Query<EmployerApplicationsQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<ApplicationStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let applications =
        applications_by_employer(&state.db, employer_id, params.job_id, status).await?;
    Ok(Json(applications.into()))
}

/// GET /api/v1/users/:id/applications
pub async fn handle_user_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let applications = applications_by_user(&state.db, user_id).await?;
    Ok(Json(applications.into()))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<Application>, AppError> {
    let status = req
        .status
        .parse::<ApplicationStatus>()
        .map_err(AppError::Validation)?;
    Ok(Json(update_status(&state.db, application_id, status).await?))
}
