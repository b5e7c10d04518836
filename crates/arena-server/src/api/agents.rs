//! Agent roster and leaderboard handlers

use crate::state::AppState;
use arena_core::{AchievementDef, Agent, LeaderboardEntry};
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<Vec<Agent>> {
    Json(state.registry.list())
}

pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.registry.leaderboard())
}

/// Unknown agents yield an empty list, consistent with the engine's
/// tolerant lookups.
pub async fn agent_achievements(
    State(state): State<Arc<AppState>>,
    Path(agent_id): Path<String>,
) -> Json<Vec<&'static AchievementDef>> {
    Json(state.rewards.achievements(&agent_id))
}
