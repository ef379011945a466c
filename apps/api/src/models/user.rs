use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    /// Role flag: employers post jobs, everyone else applies to them.
    pub is_employer: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> &'static str {
        if self.is_employer {
            "employer"
        } else {
            "candidate"
        }
    }
}
