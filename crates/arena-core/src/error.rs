//! Error types for the arena

use crate::types::BattleId;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Arena error types
///
/// Unknown agent, battle, vulnerability and achievement ids are tolerated
/// (no-op or catalog fallback) and never surface here. Only structural
/// invariant violations are reported as errors.
#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("invalid severity {0}: severity must be a positive number")]
    InvalidSeverity(f64),

    #[error("duplicate battle id {0}")]
    DuplicateBattle(BattleId),
}
