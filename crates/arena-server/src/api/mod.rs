//! API handlers

pub mod agents;
pub mod battles;
pub mod rewards;

use crate::models::StatusResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        agents: state.registry.list().len(),
        active_battles: state.engine.active_count(),
        connections: state.broadcaster.connection_count(),
    })
}
