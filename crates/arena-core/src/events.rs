//! Event contract between the engine and its consumers
//!
//! Events are fire-and-forget: no acknowledgement, no replay. Consumers
//! must tolerate loss. The engine only sees the narrow [`EventSink`]
//! trait; transports (WebSocket broadcast, in-memory recorder) live
//! outside the engine.

use crate::types::{Agent, Battle, LeaderboardEntry};
use parking_lot::Mutex;
use serde::Serialize;

/// Every event the arena publishes, tagged with its wire name
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ArenaEvent {
    #[serde(rename = "battle:new")]
    BattleNew(Battle),

    #[serde(rename = "battle:update")]
    BattleUpdate(Battle),

    #[serde(rename = "battle:complete")]
    BattleComplete(Battle),

    #[serde(rename = "agent:levelup")]
    AgentLevelUp { agent_id: String, level: u32 },

    #[serde(rename = "achievement:unlock")]
    AchievementUnlock {
        agent_id: String,
        achievement: String,
        badge: String,
    },

    #[serde(rename = "leaderboard:update")]
    LeaderboardUpdate(Vec<LeaderboardEntry>),

    #[serde(rename = "agents:update")]
    AgentsUpdate(Vec<Agent>),
}

impl ArenaEvent {
    /// Wire name of the event, for logging and filtering
    pub fn name(&self) -> &'static str {
        match self {
            ArenaEvent::BattleNew(_) => "battle:new",
            ArenaEvent::BattleUpdate(_) => "battle:update",
            ArenaEvent::BattleComplete(_) => "battle:complete",
            ArenaEvent::AgentLevelUp { .. } => "agent:levelup",
            ArenaEvent::AchievementUnlock { .. } => "achievement:unlock",
            ArenaEvent::LeaderboardUpdate(_) => "leaderboard:update",
            ArenaEvent::AgentsUpdate(_) => "agents:update",
        }
    }
}

/// Publish interface injected into the engine
pub trait EventSink: Send + Sync {
    fn publish(&self, event: ArenaEvent);
}

/// Sink that drops everything
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: ArenaEvent) {}
}

/// Sink that records events in memory, for tests and embedders
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<ArenaEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far
    pub fn events(&self) -> Vec<ArenaEvent> {
        self.events.lock().clone()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<ArenaEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: ArenaEvent) {
        self.events.lock().push(event);
    }
}
