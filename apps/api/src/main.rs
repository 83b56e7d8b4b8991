mod config;
mod errors;
mod llm_client;
mod memory;
mod models;
mod routes;
mod settings;
mod skills;
mod state;
mod store;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::skills::graph::SkillGraph;
use crate::state::AppState;
use crate::store::{InMemoryStore, RedisStore, StateStore};

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

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn StateStore> = match &config.redis_url {
        Some(url) => {
            let store = RedisStore::connect(url, &config.redis_prefix).await?;
            info!("Redis state store connected");
            Arc::new(store)
        }
        None => {
            warn!("REDIS_URL not set; state is kept in memory and lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let llm = GeminiClient::new(config.gemini_base_url.clone(), config.gemini_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    let skill_graph = SkillGraph::builtin();
    info!("Skill graph loaded ({} skills)", skill_graph.len());

    let state = AppState::new(store, Arc::new(llm), skill_graph);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the extension id is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
