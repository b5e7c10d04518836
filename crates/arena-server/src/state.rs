//! Application state

use crate::websocket::events::EventBroadcaster;
use arena_engine::{AgentRegistry, BattleEngine, EngineConfig, RewardSystem};
use std::sync::Arc;

pub struct AppState {
    pub registry: Arc<AgentRegistry>,
    pub engine: Arc<BattleEngine>,
    pub rewards: Arc<RewardSystem>,
    pub broadcaster: Arc<EventBroadcaster>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        let broadcaster = Arc::new(EventBroadcaster::new(1000));
        let registry = Arc::new(AgentRegistry::new());
        let rewards = Arc::new(RewardSystem::new(registry.clone(), broadcaster.clone()));
        let engine = Arc::new(BattleEngine::new(
            registry.clone(),
            rewards.clone(),
            broadcaster.clone(),
            config,
        ));
        Self {
            registry,
            engine,
            rewards,
            broadcaster,
        }
    }
}
