mod config;
mod conversation;
mod crs;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::conversation::interpreter::LlmSlotInterpreter;
use crate::conversation::orchestrator::Orchestrator;
use crate::conversation::store::ConversationStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CRS API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client and the interpreter built on it
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.llm_request_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let interpreter = Arc::new(LlmSlotInterpreter::new(llm));

    let orchestrator = Arc::new(Orchestrator::new(interpreter, config.interpreter_timeout));
    info!(
        "Orchestrator ready (interpreter timeout: {:?})",
        config.interpreter_timeout
    );

    let state = AppState {
        orchestrator,
        conversations: ConversationStore::new(config.max_conversations),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the chat UI origin once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
