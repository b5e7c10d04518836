//! Reward accounting and achievement unlocking

use crate::registry::AgentRegistry;
use arena_core::catalog::{
    self, CRITICAL_SLAYER, FIRST_FIX, PATCH_MASTER, SPEED_DEMON, VETERAN_AGENT,
};
use arena_core::{AchievementDef, AgentStats, ArenaEvent, EventSink};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Consumes reward events, tracks per-agent statistics, and unlocks
/// achievements when thresholds are crossed.
pub struct RewardSystem {
    registry: Arc<AgentRegistry>,
    sink: Arc<dyn EventSink>,
    stats: RwLock<HashMap<String, AgentStats>>,
    unlocked: RwLock<HashMap<String, Vec<&'static str>>>,
}

impl RewardSystem {
    /// Seeds a statistics record and an empty achievement set for every
    /// agent currently in the registry.
    pub fn new(registry: Arc<AgentRegistry>, sink: Arc<dyn EventSink>) -> Self {
        let mut stats = HashMap::new();
        let mut unlocked = HashMap::new();
        for agent in registry.list() {
            stats.insert(agent.id.clone(), AgentStats::default());
            unlocked.insert(agent.id, Vec::new());
        }
        Self {
            registry,
            sink,
            stats: RwLock::new(stats),
            unlocked: RwLock::new(unlocked),
        }
    }

    /// Record a reward payout for an agent and evaluate achievement rules.
    ///
    /// Unknown agents are a silent no-op. Ends by broadcasting the full
    /// recomputed leaderboard.
    pub fn record_reward(&self, agent_id: &str, amount: u64, tx_ref: &str) {
        let Some(agent) = self.registry.get(agent_id) else {
            debug!(agent = agent_id, "reward for unknown agent ignored");
            return;
        };

        debug!(agent = agent_id, amount, tx = tx_ref, "reward recorded");

        let mut pending = Vec::new();
        {
            let mut stats_map = self.stats.write();
            let stats = stats_map.entry(agent_id.to_string()).or_default();

            if amount >= 50 {
                stats.criticals += 1;
                if stats.criticals >= criteria(CRITICAL_SLAYER) {
                    pending.push(CRITICAL_SLAYER);
                }
            }
            if amount >= 30 {
                stats.fast_fixes += 1;
                if stats.fast_fixes >= criteria(SPEED_DEMON) {
                    pending.push(SPEED_DEMON);
                }
            }
            if !stats.first_fix {
                stats.first_fix = true;
                pending.push(FIRST_FIX);
            }
            stats.fixes += 1;
            if stats.fixes >= criteria(PATCH_MASTER) {
                pending.push(PATCH_MASTER);
            }
            if agent.level >= criteria(VETERAN_AGENT) {
                pending.push(VETERAN_AGENT);
            }
        }

        for achievement_id in pending {
            self.unlock(agent_id, achievement_id);
        }

        self.sink
            .publish(ArenaEvent::LeaderboardUpdate(self.registry.leaderboard()));
    }

    /// Unlock an achievement for an agent. Idempotent: returns false and
    /// publishes nothing when it is already unlocked (or the id is
    /// unknown).
    pub fn unlock(&self, agent_id: &str, achievement_id: &str) -> bool {
        let Some(def) = catalog::achievement(achievement_id) else {
            return false;
        };

        {
            let mut unlocked = self.unlocked.write();
            let list = unlocked.entry(agent_id.to_string()).or_default();
            if list.contains(&def.id) {
                return false;
            }
            list.push(def.id);
        }

        info!(agent = agent_id, achievement = def.name, "achievement unlocked");
        self.sink.publish(ArenaEvent::AchievementUnlock {
            agent_id: agent_id.to_string(),
            achievement: def.name.to_string(),
            badge: def.id.to_string(),
        });
        true
    }

    /// Achievements unlocked so far, in unlock order
    pub fn achievements(&self, agent_id: &str) -> Vec<&'static AchievementDef> {
        self.unlocked
            .read()
            .get(agent_id)
            .map(|ids| ids.iter().filter_map(|id| catalog::achievement(id)).collect())
            .unwrap_or_default()
    }

    /// Current statistics snapshot for an agent
    pub fn stats(&self, agent_id: &str) -> Option<AgentStats> {
        self.stats.read().get(agent_id).copied()
    }
}

fn criteria(achievement_id: &str) -> u32 {
    catalog::achievement(achievement_id)
        .map(|a| a.criteria)
        .unwrap_or(u32::MAX)
}
