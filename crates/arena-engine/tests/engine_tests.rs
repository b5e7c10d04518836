//! End-to-end engine tests
//!
//! All timing-sensitive suites run on a paused tokio clock, so step
//! delays and reward durations are exact and the assertions can pin
//! precise payout values.

use arena_core::{ArenaEvent, BattleAction, BattleStatus, MemorySink};
use arena_engine::{AgentRegistry, BattleEngine, EngineConfig, RewardSystem};
use std::sync::Arc;
use std::time::Duration;

fn build_engine(registry: AgentRegistry) -> (Arc<AgentRegistry>, Arc<BattleEngine>, Arc<MemorySink>) {
    let registry = Arc::new(registry);
    let sink = Arc::new(MemorySink::new());
    let rewards = Arc::new(RewardSystem::new(registry.clone(), sink.clone()));
    let engine = Arc::new(BattleEngine::new(
        registry.clone(),
        rewards,
        sink.clone(),
        EngineConfig::default(),
    ));
    (registry, engine, sink)
}

fn update_progress(sink: &MemorySink) -> Vec<u8> {
    sink.events()
        .into_iter()
        .filter_map(|e| match e {
            ArenaEvent::BattleUpdate(b) => Some(b.progress),
            _ => None,
        })
        .collect()
}

fn event_names(sink: &MemorySink) -> Vec<&'static str> {
    sink.events().iter().map(|e| e.name()).collect()
}

// ============================================================================
// BATTLE LIFECYCLE
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn battle_runs_to_completion_with_exact_rewards() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::new());

        // agent "1" is level 3; Reentrancy difficulty 8 x severity 2 = 16,
        // so each step is floor(3/16*1000) = 187ms and the battle
        // completes on the fifth fire, 748ms in: multiplier 9.252
        let battle = engine.create_battle("1", "v1", 2.0).unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;

        let done = engine.get_battle(battle.id).unwrap();
        assert_eq!(done.status, BattleStatus::Completed);
        assert_eq!(done.progress, 4);
        assert_eq!(done.current_step, Some("Verifying"));
        assert_eq!(done.duration_ms, Some(748));
        assert_eq!(done.xp, Some(740));
        assert_eq!(done.sent, Some(296));
        assert!(done.ended_at.is_some());

        // each natural advance moved progress by exactly one
        assert_eq!(update_progress(&sink), vec![1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_applies_experience_and_notifies_rewards() {
        let (registry, engine, sink) = build_engine(AgentRegistry::new());

        engine.create_battle("1", "v1", 2.0).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        // 120 + 740 xp crosses the level-3 threshold of 300
        let agent = registry.get("1").unwrap();
        assert_eq!(agent.experience, 860);
        assert_eq!(agent.level, 4);
        assert_eq!(agent.sent, 200 + 296);

        let names = event_names(&sink);
        assert!(names.contains(&"battle:complete"));
        assert!(names.contains(&"agent:levelup"));
        // payout of 296 is the agent's first recorded reward
        assert!(names.contains(&"achievement:unlock"));
        assert!(names.contains(&"leaderboard:update"));
    }

    #[tokio::test(start_paused = true)]
    async fn levelup_event_carries_new_level() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::new());

        engine.create_battle("1", "v1", 2.0).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let levelups: Vec<_> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ArenaEvent::AgentLevelUp { agent_id, level } => Some((agent_id, level)),
                _ => None,
            })
            .collect();
        assert_eq!(levelups, vec![("1".to_string(), 4)]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_battle_hits_multiplier_floor() {
        let (registry, engine, _sink) = build_engine(AgentRegistry::new());

        // agent "3" is level 4; Access Control difficulty 5 x severity 0.1
        // = 0.5, so each step takes 8s and the battle runs 32s: the
        // multiplier bottoms out at 0.5
        let battle = engine.create_battle("3", "v3", 0.1).unwrap();

        tokio::time::sleep(Duration::from_secs(35)).await;

        let done = engine.get_battle(battle.id).unwrap();
        assert_eq!(done.status, BattleStatus::Completed);
        assert_eq!(done.duration_ms, Some(32_000));
        // xp = floor(0.5 * 5 * 0.5) = 1, sent = floor(0.5 * 2 * 0.5) = 0
        assert_eq!(done.xp, Some(1));
        assert_eq!(done.sent, Some(0));

        let agent = registry.get("3").unwrap();
        assert_eq!(agent.experience, 211);
        assert_eq!(agent.sent, 350);

        // grace runs out 42s in
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(engine.get_battle(battle.id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn completed_battle_readable_during_grace_then_purged() {
        let (_registry, engine, _sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();

        // completed at 748ms; still readable 5s in
        tokio::time::sleep(Duration::from_secs(5)).await;
        let during_grace = engine.get_battle(battle.id).unwrap();
        assert_eq!(during_grace.status, BattleStatus::Completed);

        // grace is 10s from completion
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(engine.get_battle(battle.id).is_none());
        assert_eq!(engine.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_agent_aborts_battle_without_panicking() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::with_agents(vec![]));

        let battle = engine.create_battle("ghost", "v1", 1.0).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(engine.get_battle(battle.id).is_none());
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_battles_progress_independently() {
        let (_registry, engine, _sink) = build_engine(AgentRegistry::new());

        let first = engine.create_battle("1", "v1", 2.0).unwrap();
        let second = engine.create_battle("2", "v2", 1.0).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(engine.active_count(), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(engine.get_battle(first.id).unwrap().status, BattleStatus::Completed);
        assert_eq!(engine.get_battle(second.id).unwrap().status, BattleStatus::Completed);
    }
}

// ============================================================================
// BATTLE ACTIONS
// ============================================================================

mod actions {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn boost_never_double_advances() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();

        // boost before the zero-delay first step has run: the stale timer
        // must be discarded, not stacked on top
        engine.handle_action(battle.id, "1", BattleAction::Boost);
        engine.handle_action(battle.id, "1", BattleAction::Boost);

        tokio::time::sleep(Duration::from_secs(5)).await;

        let done = engine.get_battle(battle.id).unwrap();
        assert_eq!(done.status, BattleStatus::Completed);
        // every progress value was published exactly once, in order
        assert_eq!(update_progress(&sink), vec![1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn boost_after_final_step_is_noop() {
        let (_registry, engine, _sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();
        for _ in 0..10 {
            engine.handle_action(battle.id, "1", BattleAction::Boost);
        }

        let snapshot = engine.get_battle(battle.id).unwrap();
        assert!(snapshot.progress <= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn fix_forces_immediate_completion() {
        let (_registry, engine, _sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;

        // first step already ran; four forced advances finish the battle
        for _ in 0..4 {
            engine.handle_action(battle.id, "1", BattleAction::Fix);
        }

        let done = engine.get_battle(battle.id).unwrap();
        assert_eq!(done.status, BattleStatus::Completed);
        // completed 1ms in: multiplier 9.999
        assert_eq!(done.duration_ms, Some(1));
        assert_eq!(done.xp, Some(799));
        assert_eq!(done.sent, Some(319));
    }

    #[tokio::test(start_paused = true)]
    async fn action_by_non_owner_is_dropped() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();
        engine.handle_action(battle.id, "2", BattleAction::Boost);
        engine.handle_action(battle.id, "2", BattleAction::Fix);

        assert_eq!(engine.get_battle(battle.id).unwrap().progress, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_action_is_dropped() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();
        engine.handle_action(battle.id, "1", BattleAction::Unknown);

        assert_eq!(engine.get_battle(battle.id).unwrap().progress, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn actions_on_completed_battle_are_ignored() {
        let (_registry, engine, sink) = build_engine(AgentRegistry::new());

        let battle = engine.create_battle("1", "v1", 2.0).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.get_battle(battle.id).unwrap().status, BattleStatus::Completed);

        let before = sink.len();
        engine.handle_action(battle.id, "1", BattleAction::Boost);
        engine.handle_action(battle.id, "1", BattleAction::Fix);
        assert_eq!(sink.len(), before);

        // the grace purge must survive the ignored actions
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(engine.get_battle(battle.id).is_none());
    }
}

// ============================================================================
// ACHIEVEMENT FLOW THROUGH BATTLES
// ============================================================================

mod achievements {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn completed_battle_unlocks_first_fix() {
        let registry = Arc::new(AgentRegistry::new());
        let sink = Arc::new(MemorySink::new());
        let rewards = Arc::new(RewardSystem::new(registry.clone(), sink.clone()));
        let engine = Arc::new(BattleEngine::new(
            registry,
            rewards.clone(),
            sink.clone(),
            EngineConfig::default(),
        ));

        engine.create_battle("1", "v1", 2.0).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let names: Vec<_> = rewards.achievements("1").iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["First Fix"]);

        // payout of 296 also counted as a critical and a fast fix
        let stats = rewards.stats("1").unwrap();
        assert_eq!(stats.criticals, 1);
        assert_eq!(stats.fast_fixes, 1);
        assert_eq!(stats.fixes, 1);
    }
}
