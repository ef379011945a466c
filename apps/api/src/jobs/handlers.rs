use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::browse::{apply_browse, BrowseQuery};
use crate::jobs::{
    get_job, job_facets, job_stats, jobs_by_employer, list_jobs, post_job, search_jobs, JobFacets,
    JobStats, NewJob,
};
use crate::models::job::Job;
use crate::state::AppState;

#[derive(Serialize)]
pub struct JobDetailResponse {
    pub job: Job,
    pub stats: JobStats,
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub total: usize,
    pub jobs: Vec<Job>,
}

/// POST /api/v1/jobs
pub async fn handle_post_job(
    State(state): State<AppState>,
    Json(req): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let job = post_job(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?q=&location=&job_type=&sort=
pub async fn handle_browse_jobs(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = match query.search_text() {
        Some(text) => search_jobs(&state.db, text).await?,
        None => list_jobs(&state.db).await?,
    };
    let jobs = apply_browse(jobs, &query);
    Ok(Json(JobListResponse {
        total: jobs.len(),
        jobs,
    }))
}

/// GET /api/v1/jobs/facets
pub async fn handle_job_facets(State(state): State<AppState>) -> Result<Json<JobFacets>, AppError> {
    Ok(Json(job_facets(&state.db).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = get_job(&state.db, job_id).await?;
    let stats = job_stats(&state.db, job_id).await?;
    Ok(Json(JobDetailResponse { job, stats }))
}

/// GET /api/v1/employers/:id/jobs
pub async fn handle_employer_jobs(
    State(state): State<AppState>,
    Path(employer_id): Path<Uuid>,
) -> Result<Json<Vec<JobDetailResponse>>, AppError> {
    let jobs = jobs_by_employer(&state.db, employer_id).await?;
    let mut listings = Vec::with_capacity(jobs.len());
    for job in jobs {
        let stats = job_stats(&state.db, job.id).await?;
        listings.push(JobDetailResponse { job, stats });
    }
    Ok(Json(listings))
}
