mod assistant;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod pagination;
mod preview;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::{LlmAssistant, ResumeAssistant};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pagination::PageGeometry;
use crate::preview::store::{PreviewStore, SessionLimits};
use crate::routes::build_router;
use crate::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    // AI assistant is optional; the preview pipeline works without it.
    let assistant: Option<Arc<dyn ResumeAssistant>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmAssistant(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, AI enhance and PDF import are disabled");
            None
        }
    };

    let geometry = PageGeometry::a4();
    info!(
        "Page geometry: {}px pages, buffer {}px",
        geometry.page_height, geometry.safety_buffer
    );

    let limits = SessionLimits {
        idle_ttl: Duration::from_secs(config.session_idle_ttl_secs),
        max_sessions: config.max_sessions,
    };
    let previews = PreviewStore::new(geometry, limits);
    previews.spawn_sweeper(SESSION_SWEEP_INTERVAL);
    info!(
        "Preview sessions: idle TTL {}s, at most {}",
        config.session_idle_ttl_secs, config.max_sessions
    );

    let state = AppState {
        config: config.clone(),
        previews,
        assistant,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
