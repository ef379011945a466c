use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::bulk::cache::BatchCache;
use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Finished bulk analyses, kept in Redis until saved or expired.
    pub batches: BatchCache,
    pub s3: S3Client,
    /// Text generator behind every extraction and match query. `LlmClient` in production.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
