use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Job types an employer can pick when posting.
pub const JOB_TYPES: [&str; 5] = ["Full-time", "Part-time", "Contract", "Remote", "Internship"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub posted_by: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub location: String,
    pub job_type: String,
    pub created_at: DateTime<Utc>,
}
