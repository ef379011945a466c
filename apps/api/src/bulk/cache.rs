//! Redis-backed store for finished bulk analyses.
//!
//! A batch lives under `bulk:{batch_id}` as JSON until its TTL runs out, long enough
//! for the employer to review the ranking and save candidates as applications.

use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use crate::bulk::BatchReport;
use crate::errors::AppError;

#[derive(Clone)]
pub struct BatchCache {
    client: redis::Client,
    ttl: Duration,
}

impl BatchCache {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    pub async fn store(&self, report: &BatchReport) -> Result<(), AppError> {
        let key = batch_key(report.batch_id);
        let payload = serde_json::to_string(report)
            .map_err(|e| AppError::Cache(format!("Failed to encode batch: {e}")))?;
        let ttl_seconds = self.ttl.as_secs().max(1);

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SETEX")
            .arg(&key)
            .arg(ttl_seconds)
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await?;

        debug!(key = %key, ttl_seconds, "Batch cached");
        Ok(())
    }

    /// Returns `None` when the batch never existed or has expired.
    pub async fn load(&self, batch_id: Uuid) -> Result<Option<BatchReport>, AppError> {
        let key = batch_key(batch_id);
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut conn)
            .await?;

        payload
            .map(|raw| {
                serde_json::from_str(&raw)
                    .map_err(|e| AppError::Cache(format!("Corrupt batch {batch_id}: {e}")))
            })
            .transpose()
    }
}

fn batch_key(batch_id: Uuid) -> String {
    format!("bulk:{batch_id}")
}
