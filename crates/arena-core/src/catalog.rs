//! Static catalogs: vulnerability types, battle steps, achievements
//!
//! These tables are fixed for the lifetime of the process. Lookups by
//! unknown id fall back or return None; they never error.

use serde::Serialize;

/// A vulnerability type an agent can battle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Vulnerability {
    pub id: &'static str,
    pub name: &'static str,
    pub difficulty: u32,
}

/// Vulnerability catalog, difficulty-weighted
pub const VULNERABILITIES: &[Vulnerability] = &[
    Vulnerability { id: "v1", name: "Reentrancy", difficulty: 8 },
    Vulnerability { id: "v2", name: "Integer Overflow", difficulty: 6 },
    Vulnerability { id: "v3", name: "Access Control", difficulty: 5 },
    Vulnerability { id: "v4", name: "Oracle Manipulation", difficulty: 9 },
    Vulnerability { id: "v5", name: "Front-Running", difficulty: 7 },
];

/// Resolve a vulnerability by id, falling back to the catalog head for
/// unknown ids. The fallback is deliberate: callers pass through
/// user-supplied ids and expect a battle, not an error.
pub fn resolve_vulnerability(id: &str) -> &'static Vulnerability {
    VULNERABILITIES
        .iter()
        .find(|v| v.id == id)
        .unwrap_or(&VULNERABILITIES[0])
}

/// Ordered step labels every battle walks through
pub const BATTLE_STEPS: [&str; 4] = ["Analyzing", "Exploiting", "Patching", "Verifying"];

/// What statistic an achievement keys on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    Critical,
    Speed,
    First,
    Patches,
    Level,
}

/// A named milestone unlocked once per agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub criteria: u32,
    pub kind: AchievementKind,
}

pub const CRITICAL_SLAYER: &str = "a1";
pub const SPEED_DEMON: &str = "a2";
pub const FIRST_FIX: &str = "a3";
pub const PATCH_MASTER: &str = "a4";
pub const VETERAN_AGENT: &str = "a5";

/// Achievement catalog
///
/// The Speed Demon criteria of 300 is carried over from the product
/// definition as-is; see DESIGN.md before changing it.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef { id: CRITICAL_SLAYER, name: "Critical Slayer", criteria: 5, kind: AchievementKind::Critical },
    AchievementDef { id: SPEED_DEMON, name: "Speed Demon", criteria: 300, kind: AchievementKind::Speed },
    AchievementDef { id: FIRST_FIX, name: "First Fix", criteria: 1, kind: AchievementKind::First },
    AchievementDef { id: PATCH_MASTER, name: "Patch Master", criteria: 10, kind: AchievementKind::Patches },
    AchievementDef { id: VETERAN_AGENT, name: "Veteran Agent", criteria: 5, kind: AchievementKind::Level },
];

/// Look up an achievement definition by id
pub fn achievement(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}
