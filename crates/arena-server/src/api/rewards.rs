//! Reward claim handler

use crate::models::{ClaimRewardRequest, ClaimRewardResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use uuid::Uuid;

/// Claim a reward payout for an agent.
///
/// There is no chain behind this service; the transaction reference is
/// fabricated so clients get a stable shape to display.
pub async fn claim_reward(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClaimRewardRequest>,
) -> Json<ClaimRewardResponse> {
    let tx_hash = format!("0x{}", Uuid::new_v4().simple());
    state
        .rewards
        .record_reward(&req.agent_id, req.amount, &tx_hash);
    Json(ClaimRewardResponse {
        agent_id: req.agent_id,
        amount: req.amount,
        tx_hash,
    })
}
