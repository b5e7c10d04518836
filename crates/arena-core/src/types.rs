//! Core types for the arena

use crate::catalog::BATTLE_STEPS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Battle ID
///
/// Generated at battle creation; uuid v4 keeps ids unique across
/// concurrent creations without coordination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub uuid::Uuid);

impl BattleId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BattleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Battle({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Agent role (closed set)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Scanner,
    Monitor,
    Researcher,
    Defender,
    Watcher,
}

/// A roster agent
///
/// Experience and level only ever increase, and only through
/// `AgentRegistry::add_experience`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: AgentRole,
    pub wallet: String,
    pub experience: u64,
    pub accuracy: f64,
    pub sent: u64,
    pub level: u32,
    pub metadata_uri: String,
    pub nft_token_id: Option<String>,
}

/// Leaderboard projection of an agent
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub sent: u64,
    pub nft_token_id: Option<String>,
}

/// Battle status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleStatus {
    Started,
    Completed,
}

/// A timed battle between an agent and a vulnerability
///
/// Owned by the battle engine; `xp`/`sent` and the end stamps are set on
/// completion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Battle {
    pub id: BattleId,
    pub agent_id: String,
    pub vuln_id: String,
    pub vuln_name: String,
    pub severity: f64,
    pub status: BattleStatus,
    pub progress: u8,
    pub current_step: Option<&'static str>,
    pub steps: [&'static str; 4],
    pub difficulty: f64,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_ms: Option<u64>,
    pub xp: Option<u64>,
    pub sent: Option<u64>,
}

impl Battle {
    pub fn new(agent_id: String, vuln_id: String, vuln_name: String, severity: f64, difficulty: f64) -> Self {
        Self {
            id: BattleId::new(),
            agent_id,
            vuln_id,
            vuln_name,
            severity,
            status: BattleStatus::Started,
            progress: 0,
            current_step: None,
            steps: BATTLE_STEPS,
            difficulty,
            started_at: chrono::Utc::now(),
            ended_at: None,
            duration_ms: None,
            xp: None,
            sent: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == BattleStatus::Completed
    }
}

/// An action a client can take on a running battle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleAction {
    Boost,
    Fix,
    /// Unrecognized actions are tolerated and ignored
    Unknown,
}

impl<'de> Deserialize<'de> for BattleAction {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "boost" => BattleAction::Boost,
            "fix" => BattleAction::Fix,
            _ => BattleAction::Unknown,
        })
    }
}

/// Per-agent reward statistics
///
/// Mutated only by `RewardSystem::record_reward`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub criticals: u32,
    pub fixes: u32,
    pub fast_fixes: u32,
    pub first_fix: bool,
}
