mod accounts;
mod applications;
mod bulk;
mod config;
mod dashboard;
mod db;
mod documents;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bulk::cache::BatchCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // crate names use underscores in tracing targets
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR match API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (migrations run on connect)
    let db = create_pool(&config.database_url).await?;

    // Redis holds bulk analysis results until they are saved or expire
    let redis = redis::Client::open(config.redis_url.clone())?;
    let batches = BatchCache::new(redis, config.bulk_result_ttl);
    info!(
        "Redis client initialized (bulk result TTL {}s)",
        config.bulk_result_ttl.as_secs()
    );

    // S3 / MinIO resume archive
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let generator: Arc<dyn TextGenerator> =
        Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        db,
        batches,
        s3,
        generator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the portal frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "hr-match-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
