//! Role-specific dashboard metrics.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::accounts::get_user;
use crate::applications::{applications_by_user, status_counts, StatusCount};
use crate::errors::AppError;
use crate::models::application::ApplicationSummary;
use crate::state::AppState;

const EMPLOYER_RECENT: i64 = 5;
const CANDIDATE_RECENT: usize = 6;

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Employer(EmployerDashboard),
    Candidate(CandidateDashboard),
}

#[derive(Debug, Serialize, FromRow)]
pub struct EmployerMetrics {
    pub job_count: i64,
    pub application_count: i64,
    pub average_score: f64,
}

#[derive(Debug, Serialize)]
pub struct EmployerDashboard {
    #[serde(flatten)]
    pub metrics: EmployerMetrics,
    pub recent_applications: Vec<ApplicationSummary>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CandidateMetrics {
    pub application_count: i64,
    pub unique_jobs: i64,
    pub average_score: f64,
    pub max_score: f64,
}

#[derive(Debug, Serialize)]
pub struct CandidateDashboard {
    #[serde(flatten)]
    pub metrics: CandidateMetrics,
    pub status_counts: Vec<StatusCount>,
    pub recent_applications: Vec<ApplicationSummary>,
}

pub async fn employer_dashboard(
    pool: &PgPool,
    employer_id: Uuid,
) -> Result<EmployerDashboard, AppError> {
    let metrics = sqlx::query_as::<_, EmployerMetrics>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM jobs WHERE posted_by = $1) AS job_count,
            COUNT(a.id) AS application_count,
            COALESCE(AVG(a.match_score), 0) AS average_score
        FROM applications a
        JOIN jobs j ON a.job_id = j.id
        WHERE j.posted_by = $1
        "#,
    )
    .bind(employer_id)
    .fetch_one(pool)
    .await?;

    let recent_applications = sqlx::query_as::<_, ApplicationSummary>(
        r#"
        SELECT a.id, a.job_id, j.title AS job_title, a.user_id, a.candidate_name,
               a.extracted_skills, a.extracted_experience, a.match_score, a.match_feedback,
               a.status, a.applied_at
        FROM applications a
        JOIN jobs j ON a.job_id = j.id
        WHERE j.posted_by = $1
        ORDER BY a.applied_at DESC
        LIMIT $2
        "#,
    )
    .bind(employer_id)
    .bind(EMPLOYER_RECENT)
    .fetch_all(pool)
    .await?;

    Ok(EmployerDashboard {
        metrics,
        recent_applications,
    })
}

pub async fn candidate_dashboard(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<CandidateDashboard, AppError> {
    let metrics = sqlx::query_as::<_, CandidateMetrics>(
        r#"
        SELECT
            COUNT(*) AS application_count,
            COUNT(DISTINCT job_id) AS unique_jobs,
            COALESCE(AVG(match_score), 0) AS average_score,
            COALESCE(MAX(match_score), 0) AS max_score
        FROM applications
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let mut applications = applications_by_user(pool, user_id).await?;
    let status_counts = status_counts(applications.iter().map(|a| a.status.as_str()));
    applications.truncate(CANDIDATE_RECENT);

    Ok(CandidateDashboard {
        metrics,
        status_counts,
        recent_applications: applications,
    })
}

/// GET /api/v1/users/:id/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Dashboard>, AppError> {
    let user = get_user(&state.db, user_id).await?;
    let dashboard = if user.is_employer {
        Dashboard::Employer(employer_dashboard(&state.db, user.id).await?)
    } else {
        Dashboard::Candidate(candidate_dashboard(&state.db, user.id).await?)
    };
    Ok(Json(dashboard))
}
