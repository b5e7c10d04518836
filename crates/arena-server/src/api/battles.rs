//! Battle handlers

use crate::models::{BattleActionRequest, StartBattleRequest};
use crate::state::AppState;
use arena_core::{ArenaError, ArenaEvent, Battle};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::warn;

pub async fn start_battle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartBattleRequest>,
) -> Result<Json<Battle>, (StatusCode, String)> {
    match state
        .engine
        .create_battle(&req.agent_id, &req.vuln_type, req.severity)
    {
        Ok(battle) => {
            state
                .broadcaster
                .broadcast(ArenaEvent::BattleNew(battle.clone()));
            Ok(Json(battle))
        }
        Err(e @ ArenaError::InvalidSeverity(_)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => {
            warn!("battle creation failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Fire-and-forget by design: bad battle ids and non-owner actions are
/// silently dropped by the engine.
pub async fn battle_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BattleActionRequest>,
) -> StatusCode {
    state
        .engine
        .handle_action(req.battle_id, &req.agent_id, req.action);
    StatusCode::ACCEPTED
}
