//! Arena Server
//!
//! Thin service shell over the battle simulation engine:
//! ```text
//! arena-server
//!  ├── REST API (battles, rewards, roster reads)
//!  └── WebSocket fan-out of engine events
//! ```
//! All state is in-memory and lives exactly as long as the process.

mod api;
mod models;
mod state;
mod websocket;

use crate::state::AppState;
use crate::websocket::handler::ws_handler;
use arena_engine::EngineConfig;
use axum::{
    routing::{any, get, post},
    Router,
};
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "arena-server")]
#[command(about = "Agent arena - battle simulation service")]
struct Args {
    /// Server port
    #[arg(short, long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Server host
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("arena_server=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(AppState::new(EngineConfig::default()));

    info!("Arena server starting");
    info!("  Agents seeded: {}", state.registry.list().len());
    info!("  Listening on: {}:{}", args.host, args.port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/battle/start", post(api::battles::start_battle))
        .route("/api/battle/action", post(api::battles::battle_action))
        .route("/api/reward/claim", post(api::rewards::claim_reward))
        .route("/api/agents", get(api::agents::list_agents))
        .route("/api/agents/:id/achievements", get(api::agents::agent_achievements))
        .route("/api/leaderboard", get(api::agents::leaderboard))
        .route("/api/status", get(api::status))
        .route("/ws", any(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
