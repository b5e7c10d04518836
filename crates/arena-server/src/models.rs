//! API request/response types

use arena_core::{BattleAction, BattleId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StartBattleRequest {
    pub agent_id: String,
    pub vuln_type: String,
    pub severity: f64,
}

#[derive(Debug, Deserialize)]
pub struct BattleActionRequest {
    pub battle_id: BattleId,
    pub agent_id: String,
    pub action: BattleAction,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRewardRequest {
    pub agent_id: String,
    pub amount: u64,
}

#[derive(Debug, Serialize)]
pub struct ClaimRewardResponse {
    pub agent_id: String,
    pub amount: u64,
    pub tx_hash: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub agents: usize,
    pub active_battles: usize,
    pub connections: usize,
}

/// Messages clients send over the WebSocket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "battle:action")]
    BattleAction(BattleActionRequest),
    #[serde(rename = "ping")]
    Ping,
    #[serde(other)]
    Other,
}
