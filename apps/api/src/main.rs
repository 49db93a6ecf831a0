mod auth;
mod config;
mod dashboard;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::memory::InMemoryCredentialStore;
use crate::auth::postgres::PgCredentialStore;
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::dashboard::DashboardRegistry;
use crate::db::create_pool;
use crate::generation::writer::ResumeWriter;
use crate::llm_client::{CompletionApi, LlmClient};
use crate::resumes::memory::InMemoryResumeStore;
use crate::resumes::postgres::PgResumeStore;
use crate::resumes::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

const DASHBOARD_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume AI API v{}", env!("CARGO_PKG_VERSION"));

    let (credentials, resumes) = build_stores(&config).await?;

    // Initialize generation client (template-only when no usable key)
    let writer = match &config.openai_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.openai_api_url.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            ResumeWriter::new(Some(Arc::new(llm) as Arc<dyn CompletionApi>))
        }
        None => {
            warn!("OPENAI_API_KEY not configured, resumes use the local template");
            ResumeWriter::offline()
        }
    };

    let dashboards = DashboardRegistry::new(Duration::from_secs(config.session_ttl_secs));
    let _sweeper = dashboards.spawn_sweeper(DASHBOARD_SWEEP_INTERVAL);

    let state = AppState {
        credentials,
        resumes,
        writer,
        dashboards,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres + Redis when `DATABASE_URL` is set, in-memory stores otherwise.
async fn build_stores(
    config: &Config,
) -> Result<(Arc<dyn CredentialStore>, Arc<dyn ResumeStore>)> {
    let Some(database_url) = &config.database_url else {
        warn!("DATABASE_URL not set, running in demo mode with in-memory stores");
        return Ok((
            Arc::new(InMemoryCredentialStore::new(config.bcrypt_cost)),
            Arc::new(InMemoryResumeStore::new()),
        ));
    };

    let db = create_pool(database_url).await?;

    let redis_url = config
        .redis_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("REDIS_URL is required with DATABASE_URL"))?;
    let redis = redis::Client::open(redis_url)?;
    info!("Redis client initialized");

    Ok((
        Arc::new(PgCredentialStore::new(
            db.clone(),
            redis,
            config.session_ttl_secs,
            config.bcrypt_cost,
        )),
        Arc::new(PgResumeStore::new(db)),
    ))
}
