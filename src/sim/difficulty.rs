//! Difficulty policy
//!
//! Maps cumulative score to spawn cadence and target lifetime through a
//! static, ordered tier table.

use serde::{Deserialize, Serialize};

/// One step of the difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// Minimum score at which this tier becomes active
    pub threshold: u64,
    /// Scales the base spawn interval (smaller = faster spawning)
    pub spawn_multiplier: f32,
    /// Scales each archetype's base lifetime (smaller = shorter-lived targets)
    pub lifetime_multiplier: f32,
    /// HUD label
    pub name: String,
}

impl DifficultyTier {
    pub fn new(threshold: u64, spawn_multiplier: f32, lifetime_multiplier: f32, name: &str) -> Self {
        Self {
            threshold,
            spawn_multiplier,
            lifetime_multiplier,
            name: name.to_string(),
        }
    }
}

/// Result of resolving a score against the tier table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTier {
    pub spawn_multiplier: f32,
    pub lifetime_multiplier: f32,
    pub level_index: usize,
}

impl ResolvedTier {
    /// Used only when the table is empty (rejected by tuning validation)
    const BASELINE: ResolvedTier = ResolvedTier {
        spawn_multiplier: 1.0,
        lifetime_multiplier: 1.0,
        level_index: 0,
    };
}

/// The reference tier table
pub fn default_tiers() -> Vec<DifficultyTier> {
    vec![
        DifficultyTier::new(0, 1.0, 1.0, "EASY"),
        DifficultyTier::new(200, 0.85, 0.95, "WARM UP"),
        DifficultyTier::new(500, 0.7, 0.9, "NORMAL"),
        DifficultyTier::new(1000, 0.55, 0.8, "FAST"),
        DifficultyTier::new(2000, 0.45, 0.7, "INTENSE"),
        DifficultyTier::new(3500, 0.38, 0.6, "INSANE"),
        DifficultyTier::new(5000, 0.3, 0.5, "GODLIKE"),
    ]
}

/// Find the active tier for `score`.
///
/// Walks the table from the highest threshold down; a score sitting exactly
/// on a threshold resolves to that tier.
pub fn resolve_tier(tiers: &[DifficultyTier], score: u64) -> ResolvedTier {
    tiers
        .iter()
        .enumerate()
        .rev()
        .find(|(_, tier)| tier.threshold <= score)
        .map(|(level_index, tier)| ResolvedTier {
            spawn_multiplier: tier.spawn_multiplier,
            lifetime_multiplier: tier.lifetime_multiplier,
            level_index,
        })
        .unwrap_or(ResolvedTier::BASELINE)
}

/// HUD label for a level index
pub fn tier_name(tiers: &[DifficultyTier], level_index: usize) -> String {
    tiers
        .get(level_index)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("LVL {}", level_index))
}
