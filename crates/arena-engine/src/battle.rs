//! Timed battle state machine
//!
//! Each battle advances through a fixed step sequence on its own delayed
//! task chain: every advance publishes progress and schedules the next
//! one, so a single battle is strictly sequential while many battles run
//! concurrently. Scheduled advances carry a generation token validated
//! under the battle entry lock; `boost`/`fix` bump the generation before
//! mutating, so a cancelled timer that already fired is discarded instead
//! of double-advancing.

use crate::config::EngineConfig;
use crate::registry::AgentRegistry;
use crate::rewards::RewardSystem;
use arena_core::catalog::{resolve_vulnerability, BATTLE_STEPS};
use arena_core::{ArenaError, ArenaEvent, Battle, BattleAction, BattleId, BattleStatus, EventSink, Result};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const MAX_PROGRESS: u8 = BATTLE_STEPS.len() as u8;

struct BattleState {
    battle: Battle,
    /// Monotonic clock start, used for duration so the wall clock can't
    /// skew reward math
    started: Instant,
    /// Current timer generation; a scheduled advance is only valid while
    /// its token matches
    timer_gen: u64,
}

enum Advance {
    Stale,
    Aborted,
    Stepped {
        snapshot: Battle,
        delay: Duration,
        gen: u64,
    },
    Finished {
        snapshot: Battle,
        xp: u64,
        sent: u64,
    },
}

/// Creates and drives battles
pub struct BattleEngine {
    registry: Arc<AgentRegistry>,
    rewards: Arc<RewardSystem>,
    sink: Arc<dyn EventSink>,
    config: EngineConfig,
    battles: DashMap<BattleId, BattleState>,
    timers: DashMap<BattleId, JoinHandle<()>>,
}

impl BattleEngine {
    pub fn new(
        registry: Arc<AgentRegistry>,
        rewards: Arc<RewardSystem>,
        sink: Arc<dyn EventSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            rewards,
            sink,
            config,
            battles: DashMap::new(),
            timers: DashMap::new(),
        }
    }

    /// Start a battle for an agent against a vulnerability type.
    ///
    /// Unknown vulnerability ids fall back to the catalog head. A
    /// non-positive (or NaN) severity is rejected: it would drive the
    /// step-speed divisor to a degenerate value. Returns the progress-0
    /// snapshot; the first advance is already scheduled.
    pub fn create_battle(
        self: &Arc<Self>,
        agent_id: &str,
        vuln_id: &str,
        severity: f64,
    ) -> Result<Battle> {
        if !(severity > 0.0) {
            return Err(ArenaError::InvalidSeverity(severity));
        }

        let vuln = resolve_vulnerability(vuln_id);
        let difficulty = f64::from(vuln.difficulty) * severity;
        let battle = Battle::new(
            agent_id.to_string(),
            vuln.id.to_string(),
            vuln.name.to_string(),
            severity,
            difficulty,
        );
        let id = battle.id;

        match self.battles.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(ArenaError::DuplicateBattle(id));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(BattleState {
                    battle: battle.clone(),
                    started: Instant::now(),
                    timer_gen: 0,
                });
            }
        }

        info!(battle = %id, agent = agent_id, vuln = vuln.name, difficulty, "battle created");
        self.schedule_advance(id, 0, Duration::ZERO);
        Ok(battle)
    }

    /// Snapshot of one battle (active or completed-within-grace)
    pub fn get_battle(&self, id: BattleId) -> Option<Battle> {
        self.battles.get(&id).map(|s| s.battle.clone())
    }

    /// Snapshots of every battle still in the table
    pub fn list_battles(&self) -> Vec<Battle> {
        self.battles.iter().map(|s| s.battle.clone()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.battles.len()
    }

    /// Handle a client action on a running battle.
    ///
    /// Soft authorization: unknown battles and non-owner callers are a
    /// silent no-op (logged at debug). Completed battles ignore actions.
    pub fn handle_action(self: &Arc<Self>, battle_id: BattleId, agent_id: &str, action: BattleAction) {
        enum Act {
            Boosted { snapshot: Battle, delay: Duration, gen: u64 },
            Forced { gen: u64 },
        }

        let outcome = {
            let Some(mut entry) = self.battles.get_mut(&battle_id) else {
                debug!(battle = %battle_id, "action on unknown battle dropped");
                return;
            };
            let state = entry.value_mut();
            if state.battle.agent_id != agent_id {
                debug!(battle = %battle_id, agent = agent_id, "action from non-owner dropped");
                return;
            }
            if state.battle.status == BattleStatus::Completed {
                return;
            }

            match action {
                BattleAction::Boost => {
                    if state.battle.progress >= MAX_PROGRESS {
                        return;
                    }
                    let Some(agent) = self.registry.get(agent_id) else {
                        return;
                    };
                    state.timer_gen += 1;
                    state.battle.progress += 1;
                    state.battle.current_step =
                        Some(BATTLE_STEPS[usize::from(state.battle.progress) - 1]);
                    Act::Boosted {
                        snapshot: state.battle.clone(),
                        delay: step_delay(agent.level, state.battle.difficulty),
                        gen: state.timer_gen,
                    }
                }
                BattleAction::Fix => {
                    state.timer_gen += 1;
                    Act::Forced { gen: state.timer_gen }
                }
                BattleAction::Unknown => return,
            }
        };

        // the pending timer is stale now; reap its task
        if let Some((_, handle)) = self.timers.remove(&battle_id) {
            handle.abort();
        }

        match outcome {
            Act::Boosted { snapshot, delay, gen } => {
                debug!(battle = %battle_id, progress = snapshot.progress, "battle boosted");
                self.sink.publish(ArenaEvent::BattleUpdate(snapshot));
                self.schedule_advance(battle_id, gen, delay);
            }
            Act::Forced { gen } => {
                debug!(battle = %battle_id, "fix forced immediate advance");
                self.advance(battle_id, gen);
            }
        }
    }

    fn schedule_advance(self: &Arc<Self>, id: BattleId, gen: u64, delay: Duration) {
        let engine = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            engine.advance(id, gen);
        });
        if let Some(old) = self.timers.insert(id, handle) {
            old.abort();
        }
    }

    /// One step of the state machine. Runs on the timer stream (or
    /// synchronously for `fix`); the generation check makes stale fires
    /// harmless.
    fn advance(self: &Arc<Self>, id: BattleId, gen: u64) {
        let outcome = {
            let Some(mut entry) = self.battles.get_mut(&id) else {
                return; // purged
            };
            let state = entry.value_mut();
            if state.timer_gen != gen {
                Advance::Stale
            } else {
                state.timer_gen += 1;
                if state.battle.progress < MAX_PROGRESS {
                    match self.registry.get(&state.battle.agent_id) {
                        None => Advance::Aborted,
                        Some(agent) => {
                            state.battle.progress += 1;
                            state.battle.current_step =
                                Some(BATTLE_STEPS[usize::from(state.battle.progress) - 1]);
                            Advance::Stepped {
                                snapshot: state.battle.clone(),
                                delay: step_delay(agent.level, state.battle.difficulty),
                                gen: state.timer_gen,
                            }
                        }
                    }
                } else {
                    let duration = state.started.elapsed();
                    let (xp, sent) = completion_rewards(state.battle.difficulty, duration);
                    state.battle.status = BattleStatus::Completed;
                    state.battle.ended_at = Some(chrono::Utc::now());
                    state.battle.duration_ms = Some(duration.as_millis() as u64);
                    state.battle.xp = Some(xp);
                    state.battle.sent = Some(sent);
                    Advance::Finished {
                        snapshot: state.battle.clone(),
                        xp,
                        sent,
                    }
                }
            }
        };

        match outcome {
            Advance::Stale => {}
            Advance::Aborted => {
                // agent vanished mid-battle: drop the battle rather than
                // stall it forever (policy documented in DESIGN.md)
                warn!(battle = %id, "owning agent missing, aborting battle");
                self.battles.remove(&id);
                if let Some((_, handle)) = self.timers.remove(&id) {
                    handle.abort();
                }
            }
            Advance::Stepped { snapshot, delay, gen } => {
                debug!(
                    battle = %id,
                    progress = snapshot.progress,
                    step = snapshot.current_step.unwrap_or(""),
                    "battle progressed"
                );
                self.sink.publish(ArenaEvent::BattleUpdate(snapshot));
                self.schedule_advance(id, gen, delay);
            }
            Advance::Finished { snapshot, xp, sent } => {
                let agent_id = snapshot.agent_id.clone();
                info!(battle = %id, agent = %agent_id, xp, sent, "battle completed");

                let leveled = self.registry.add_experience(&agent_id, xp, sent);
                self.sink.publish(ArenaEvent::BattleComplete(snapshot));
                if leveled {
                    if let Some(agent) = self.registry.get(&agent_id) {
                        self.sink.publish(ArenaEvent::AgentLevelUp {
                            agent_id: agent.id,
                            level: agent.level,
                        });
                    }
                }
                self.rewards.record_reward(&agent_id, sent, &id.to_string());
                self.schedule_purge(id);
            }
        }
    }

    /// Keep the completed record readable for the grace window, then drop it
    fn schedule_purge(self: &Arc<Self>, id: BattleId) {
        let engine = Arc::clone(self);
        let grace = self.config.cleanup_grace;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            engine.battles.remove(&id);
            engine.timers.remove(&id);
        });
        self.timers.insert(id, handle);
    }
}

impl Drop for BattleEngine {
    fn drop(&mut self) {
        for entry in self.timers.iter() {
            entry.value().abort();
        }
    }
}

/// Delay before the next step: stronger agents clear harder tasks
/// faster, floored at 1ms to avoid zero-delay busy loops.
pub fn step_delay(level: u32, difficulty: f64) -> Duration {
    let ms = (f64::from(level) / difficulty * 1000.0).floor().max(1.0);
    Duration::from_millis(ms as u64)
}

/// Diminishing reward the longer the battle ran, floored at 0.5x
pub fn reward_multiplier(duration: Duration) -> f64 {
    (10.0 - duration.as_secs_f64()).max(0.5)
}

/// XP and sent payout for a completed battle
pub fn completion_rewards(difficulty: f64, duration: Duration) -> (u64, u64) {
    let multiplier = reward_multiplier(duration);
    let xp = (difficulty * 5.0 * multiplier).floor() as u64;
    let sent = (difficulty * 2.0 * multiplier).floor() as u64;
    (xp, sent)
}
