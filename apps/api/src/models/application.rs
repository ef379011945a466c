use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an application. Stored in the `status` column as its display string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Interview,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Unknown status '{s}'. Expected one of: Pending, Interview, Accepted, Rejected")
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    /// NULL for candidates saved from a bulk analysis; they have no account.
    pub user_id: Option<Uuid>,
    pub candidate_name: String,
    pub resume: String,
    pub extracted_skills: String,
    pub extracted_experience: String,
    pub match_score: f64,
    pub match_feedback: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

/// An application joined with the title of the job it targets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub user_id: Option<Uuid>,
    pub candidate_name: String,
    pub extracted_skills: String,
    pub extracted_experience: String,
    pub match_score: f64,
    pub match_feedback: String,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}
