mod analysis;
mod config;
mod corpus;
mod errors;
mod intake;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extractors::{RoleSkillCache, RoleSkillExtractor};
use crate::config::Config;
use crate::corpus::JsonlJobCorpus;
use crate::llm_client::LlmGateway;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Navigator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM gateway. Missing keys are a handled state: each step
    // degrades to its deterministic fallback.
    let gateway = LlmGateway::new(
        config.groq_api_key.clone(),
        config.openrouter_api_key.clone(),
    );
    info!(
        "LLM gateway initialized (primary: {}, secondary: {})",
        if config.groq_api_key.is_some() { "groq" } else { "unconfigured" },
        if config.openrouter_api_key.is_some() { "openrouter" } else { "unconfigured" },
    );
    if !gateway.has_any_provider() {
        warn!("No LLM provider configured — all responses will use deterministic fallbacks");
    }

    // Load the job postings corpus
    let corpus = match &config.job_postings_path {
        Some(path) => Arc::new(JsonlJobCorpus::load(path)?),
        None => {
            warn!("JOB_POSTINGS_PATH not set — role extraction will use the static role table");
            Arc::new(JsonlJobCorpus::empty())
        }
    };

    // Role skill extractor with its process-lifetime cache
    let role_skills = RoleSkillExtractor::new(corpus, RoleSkillCache::new());

    // Build app state
    let state = AppState {
        gateway,
        role_skills,
        http: reqwest::Client::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
