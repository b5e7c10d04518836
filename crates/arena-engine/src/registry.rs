//! Agent roster and leveling

use arena_core::{Agent, AgentRole, LeaderboardEntry};
use parking_lot::RwLock;
use tracing::{debug, info};

/// Holds the agent roster and derives the leaderboard.
///
/// The roster is seeded once at construction and never shrinks. All
/// experience/level mutation goes through [`AgentRegistry::add_experience`].
pub struct AgentRegistry {
    agents: RwLock<Vec<Agent>>,
}

impl AgentRegistry {
    /// Registry with the fixed demo roster
    pub fn new() -> Self {
        Self::with_agents(seed_roster())
    }

    /// Registry over a caller-supplied roster
    pub fn with_agents(agents: Vec<Agent>) -> Self {
        Self {
            agents: RwLock::new(agents),
        }
    }

    /// Snapshot of a single agent
    pub fn get(&self, id: &str) -> Option<Agent> {
        self.agents.read().iter().find(|a| a.id == id).cloned()
    }

    /// Snapshot of all agents, insertion order
    pub fn list(&self) -> Vec<Agent> {
        self.agents.read().clone()
    }

    /// Add experience and reward-sent credit to an agent.
    ///
    /// Returns true when the agent levels up: experience strictly above
    /// `level * 100` bumps the level exactly once per call. Unknown ids
    /// are a silent no-op (callers race with battle completion).
    pub fn add_experience(&self, id: &str, xp: u64, sent: u64) -> bool {
        let mut agents = self.agents.write();
        let Some(agent) = agents.iter_mut().find(|a| a.id == id) else {
            debug!(agent = id, "add_experience for unknown agent ignored");
            return false;
        };

        agent.experience += xp;
        agent.sent += sent;

        if agent.experience > u64::from(agent.level) * 100 {
            agent.level += 1;
            info!(agent = id, level = agent.level, "agent leveled up");
            return true;
        }
        false
    }

    /// Agents ranked by reward-sent, ties broken by experience.
    ///
    /// The sort is stable, so equal keys keep roster order and the
    /// ranking is deterministic.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut agents = self.agents.read().clone();
        agents.sort_by(|a, b| b.sent.cmp(&a.sent).then(b.experience.cmp(&a.experience)));
        agents
            .into_iter()
            .map(|a| LeaderboardEntry {
                id: a.id,
                name: a.name,
                level: a.level,
                sent: a.sent,
                nft_token_id: a.nft_token_id,
            })
            .collect()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_roster() -> Vec<Agent> {
    vec![
        Agent {
            id: "1".to_string(),
            name: "StaticGuardian".to_string(),
            role: AgentRole::Scanner,
            wallet: "0x7c1f9a4e2b8d30c55f6a118d4be20f7a93cd6e41".to_string(),
            experience: 120,
            accuracy: 0.99,
            sent: 200,
            level: 3,
            metadata_uri: "ipfs://QmAgentMeta0001".to_string(),
            nft_token_id: None,
        },
        Agent {
            id: "2".to_string(),
            name: "DarkWebScout".to_string(),
            role: AgentRole::Monitor,
            wallet: "0x31e8b2d94a07fc6e51d3c08b9a62ee15470bd2f8".to_string(),
            experience: 90,
            accuracy: 0.96,
            sent: 120,
            level: 2,
            metadata_uri: "ipfs://QmAgentMeta0002".to_string(),
            nft_token_id: None,
        },
        Agent {
            id: "3".to_string(),
            name: "ZeroDayHunter".to_string(),
            role: AgentRole::Researcher,
            wallet: "0x9d54c7a1f0e36b82d45a913c27f8e60b1ac4d5e9".to_string(),
            experience: 210,
            accuracy: 0.92,
            sent: 350,
            level: 4,
            metadata_uri: "ipfs://QmAgentMeta0003".to_string(),
            nft_token_id: Some("12345".to_string()),
        },
        Agent {
            id: "4".to_string(),
            name: "ByteShield".to_string(),
            role: AgentRole::Defender,
            wallet: "0xa2f60d83e91b45c7028de6f3514a97cb80e3d126".to_string(),
            experience: 75,
            accuracy: 0.97,
            sent: 90,
            level: 2,
            metadata_uri: "ipfs://QmAgentMeta0004".to_string(),
            nft_token_id: None,
        },
        Agent {
            id: "5".to_string(),
            name: "CryptoVigil".to_string(),
            role: AgentRole::Watcher,
            wallet: "0x48b3e6c01d7a92f54e08c1b6d39f74a2650cde83".to_string(),
            experience: 180,
            accuracy: 0.94,
            sent: 280,
            level: 3,
            metadata_uri: "ipfs://QmAgentMeta0005".to_string(),
            nft_token_id: Some("67890".to_string()),
        },
    ]
}
