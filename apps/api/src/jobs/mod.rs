//! Jobs: posting, lookup, search and per-job statistics.

pub mod browse;
pub mod handlers;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::accounts::require_employer;
use crate::errors::AppError;
use crate::models::job::{Job, JOB_TYPES};

#[derive(Debug, Deserialize)]
pub struct NewJob {
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobStats {
    pub application_count: i64,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobFacets {
    pub locations: Vec<String>,
    pub job_types: Vec<String>,
}

pub async fn post_job(pool: &PgPool, job: NewJob) -> Result<Job, AppError> {
    validate_new_job(&job)?;
    require_employer(pool, job.posted_by).await?;

    let created = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs
            (id, posted_by, title, description, requirements, salary_range, location, job_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.posted_by)
    .bind(job.title.trim())
    .bind(job.description.trim())
    .bind(job.requirements.trim())
    .bind(job.salary_range.trim())
    .bind(job.location.trim())
    .bind(job.job_type.trim())
    .fetch_one(pool)
    .await?;

    info!("Job {} '{}' posted by {}", created.id, created.title, created.posted_by);
    Ok(created)
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Job, AppError> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// Loads a job and checks that `employer_id` posted it.
pub async fn get_owned_job(pool: &PgPool, job_id: Uuid, employer_id: Uuid) -> Result<Job, AppError> {
    let job = get_job(pool, job_id).await?;
    if job.posted_by != employer_id {
        return Err(AppError::Forbidden(
            "This job belongs to another employer".to_string(),
        ));
    }
    Ok(job)
}

/// All jobs, newest first.
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<Job>, AppError> {
    Ok(
        sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

/// Case-insensitive substring search over title, description and requirements.
pub async fn search_jobs(pool: &PgPool, query: &str) -> Result<Vec<Job>, AppError> {
    let pattern = format!("%{}%", escape_like(query.trim()));
    Ok(sqlx::query_as::<_, Job>(
        r#"
        SELECT * FROM jobs
        WHERE title ILIKE $1 OR description ILIKE $1 OR requirements ILIKE $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?)
}

pub async fn jobs_by_employer(pool: &PgPool, employer_id: Uuid) -> Result<Vec<Job>, AppError> {
    Ok(sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE posted_by = $1 ORDER BY created_at DESC",
    )
    .bind(employer_id)
    .fetch_all(pool)
    .await?)
}

pub async fn job_facets(pool: &PgPool) -> Result<JobFacets, AppError> {
    let locations = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT location FROM jobs WHERE location <> '' ORDER BY location",
    )
    .fetch_all(pool)
    .await?;
    let job_types = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT job_type FROM jobs WHERE job_type <> '' ORDER BY job_type",
    )
    .fetch_all(pool)
    .await?;
    Ok(JobFacets {
        locations,
        job_types,
    })
}

pub async fn job_stats(pool: &PgPool, job_id: Uuid) -> Result<JobStats, AppError> {
    Ok(sqlx::query_as::<_, JobStats>(
        r#"
        SELECT COUNT(*) AS application_count,
               COALESCE(AVG(match_score), 0) AS average_score
        FROM applications
        WHERE job_id = $1
        "#,
    )
    .bind(job_id)
    .fetch_one(pool)
    .await?)
}

fn validate_new_job(job: &NewJob) -> Result<(), AppError> {
    if job.title.trim().is_empty()
        || job.description.trim().is_empty()
        || job.requirements.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Job title, description and requirements are required fields.".to_string(),
        ));
    }
    let job_type = job.job_type.trim();
    if !job_type.is_empty() && !JOB_TYPES.contains(&job_type) {
        return Err(AppError::Validation(format!(
            "Unknown job type '{job_type}'. Expected one of: {}",
            JOB_TYPES.join(", ")
        )));
    }
    Ok(())
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
