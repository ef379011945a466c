//! Applications: submitting a resume to a job, listing and status changes.

pub mod handlers;

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::accounts::require_candidate;
use crate::errors::AppError;
use crate::jobs::get_job;
use crate::llm_client::TextGenerator;
use crate::matching::analyzer::{analyze_resume, ResumeAnalysis};
use crate::matching::score::ScoreBand;
use crate::matching::skills::{skill_overlap, SkillOverlap};
use crate::models::application::{Application, ApplicationStatus, ApplicationSummary};

const SUMMARY_COLUMNS: &str = "a.id, a.job_id, j.title AS job_title, a.user_id, a.candidate_name, \
     a.extracted_skills, a.extracted_experience, a.match_score, a.match_feedback, \
     a.status, a.applied_at";

/// Row values for a new application, produced by the analysis pipeline.
pub struct NewApplication<'a> {
    pub job_id: Uuid,
    pub user_id: Option<Uuid>,
    pub candidate_name: &'a str,
    pub resume: &'a str,
    pub analysis: &'a ResumeAnalysis,
}

#[derive(Debug, Serialize)]
pub struct SubmittedApplication {
    pub application: Application,
    pub band: ScoreBand,
    pub skill_overlap: SkillOverlap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

/// Candidate applies to a job: analyze the resume, then store the application as Pending.
pub async fn apply(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    user_id: Uuid,
    job_id: Uuid,
    resume_text: &str,
) -> Result<SubmittedApplication, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please paste your resume to apply".to_string(),
        ));
    }
    let candidate = require_candidate(pool, user_id).await?;
    let job = get_job(pool, job_id).await?;

    let analysis = analyze_resume(generator, resume_text, &job.description, &job.requirements).await?;

    let application = insert_application(
        pool,
        NewApplication {
            job_id,
            user_id: Some(candidate.id),
            candidate_name: &candidate.username,
            resume: resume_text,
            analysis: &analysis,
        },
    )
    .await?;

    Ok(SubmittedApplication {
        band: analysis.band,
        skill_overlap: skill_overlap(&job.requirements, &analysis.skills),
        application,
    })
}

pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<Application, AppError> {
    let application = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications
            (id, job_id, user_id, candidate_name, resume, extracted_skills,
             extracted_experience, match_score, match_feedback, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.job_id)
    .bind(new.user_id)
    .bind(new.candidate_name)
    .bind(new.resume)
    .bind(&new.analysis.skills)
    .bind(&new.analysis.experience)
    .bind(new.analysis.match_score)
    .bind(&new.analysis.match_feedback)
    .bind(ApplicationStatus::default().as_str())
    .fetch_one(pool)
    .await?;

    info!(
        "Application {} for job {} saved (score {:.1})",
        application.id, application.job_id, application.match_score
    );
    Ok(application)
}

/// Applications to one job, best match first.
pub async fn applications_by_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<ApplicationSummary>, AppError> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM applications a JOIN jobs j ON a.job_id = j.id \
         WHERE a.job_id = $1 ORDER BY a.match_score DESC"
    );
    Ok(sqlx::query_as::<_, ApplicationSummary>(&sql)
        .bind(job_id)
        .fetch_all(pool)
        .await?)
}

/// Applications across an employer's jobs, best match first, optionally narrowed.
pub async fn applications_by_employer(
    pool: &PgPool,
    employer_id: Uuid,
    job_id: Option<Uuid>,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationSummary>, AppError> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM applications a JOIN jobs j ON a.job_id = j.id \
         WHERE j.posted_by = $1 \
           AND ($2::uuid IS NULL OR a.job_id = $2) \
           AND ($3::text IS NULL OR a.status = $3) \
         ORDER BY a.match_score DESC"
    );
    Ok(sqlx::query_as::<_, ApplicationSummary>(&sql)
        .bind(employer_id)
        .bind(job_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?)
}

/// A candidate's own applications, most recent first.
pub async fn applications_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ApplicationSummary>, AppError> {
    let sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM applications a JOIN jobs j ON a.job_id = j.id \
         WHERE a.user_id = $1 ORDER BY a.applied_at DESC"
    );
    Ok(sqlx::query_as::<_, ApplicationSummary>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?)
}

pub async fn update_status(
    pool: &PgPool,
    application_id: Uuid,
    status: ApplicationStatus,
) -> Result<Application, AppError> {
    let updated = sqlx::query_as::<_, Application>(
        "UPDATE applications SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(application_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {application_id} not found")))?;

    info!("Application {application_id} moved to {status}");
    Ok(updated)
}

/// Counts per status, always listing all four statuses in lifecycle order.
pub fn status_counts<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = ApplicationStatus::ALL
        .into_iter()
        .map(|status| StatusCount { status, count: 0 })
        .collect();

    for raw in statuses {
        if let Ok(status) = raw.parse::<ApplicationStatus>() {
            if let Some(entry) = counts.iter_mut().find(|c| c.status == status) {
                entry.count += 1;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_lists_all_statuses() {
        let counts = status_counts(["Pending", "Pending", "Accepted", "Bogus"]);
        assert_eq!(
            counts,
            vec![
                StatusCount {
                    status: ApplicationStatus::Pending,
                    count: 2
                },
                StatusCount {
                    status: ApplicationStatus::Interview,
                    count: 0
                },
                StatusCount {
                    status: ApplicationStatus::Accepted,
                    count: 1
                },
                StatusCount {
                    status: ApplicationStatus::Rejected,
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn test_status_counts_empty() {
        let counts = status_counts(std::iter::empty());
        assert_eq!(counts.len(), 4);
        assert!(counts.iter().all(|c| c.count == 0));
    }
}
