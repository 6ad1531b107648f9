//! Data-driven game balance
//!
//! Every numeric gameplay policy lives in [`Tuning`]. Defaults are the
//! reference balance; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::difficulty::{DifficultyTier, default_tiers};
use crate::sim::spawner::{TargetArchetype, default_archetypes};

/// Longest accepted duration field (one hour)
pub const MAX_DURATION_MS: u64 = 60 * 60 * 1000;
/// Most points a single target may be worth
pub const MAX_TARGET_POINTS: u64 = 1_000_000;
/// Highest accepted multiplier cap
pub const MAX_MULTIPLIER_CAP: u32 = 1_000;
/// Most sparks in one particle burst
pub const MAX_BURST_PARTICLES: u32 = 64;

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    pub max_lives: u8,

    // === Spawning ===
    /// Spawn interval at difficulty multiplier 1.0
    pub base_spawn_interval_ms: u64,
    /// Delay before the first target of a run
    pub first_spawn_delay_ms: u64,
    /// Keep-out margin from the play-area edges
    pub spawn_padding: f32,
    pub archetypes: Vec<TargetArchetype>,
    pub tiers: Vec<DifficultyTier>,

    // === Scoring ===
    /// Combo lapses after this long without a hit
    pub combo_timeout_ms: u64,
    /// Multiplier cap
    pub max_multiplier: u32,

    // === Feedback ===
    pub popup_ttl_ms: u64,
    pub particle_ttl_ms: u64,
    pub shake_ms: u64,
    pub burst_particles: u32,
    pub burst_min_distance: f32,
    pub burst_distance_jitter: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_lives: 3,

            base_spawn_interval_ms: 1500,
            first_spawn_delay_ms: 500,
            spawn_padding: 100.0,
            archetypes: default_archetypes(),
            tiers: default_tiers(),

            combo_timeout_ms: 1500,
            max_multiplier: 10,

            popup_ttl_ms: 800,
            particle_ttl_ms: 600,
            shake_ms: 150,
            burst_particles: 8,
            burst_min_distance: 30.0,
            burst_distance_jitter: 40.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.max_lives == 0 {
            return Err(TuningError::NotPositive("max_lives"));
        }
        if self.base_spawn_interval_ms == 0 {
            return Err(TuningError::NotPositive("base_spawn_interval_ms"));
        }
        if self.combo_timeout_ms == 0 {
            return Err(TuningError::NotPositive("combo_timeout_ms"));
        }
        if self.max_multiplier == 0 {
            return Err(TuningError::NotPositive("max_multiplier"));
        }
        if self.max_multiplier > MAX_MULTIPLIER_CAP {
            return Err(TuningError::OutOfRange {
                field: "max_multiplier",
                max: u64::from(MAX_MULTIPLIER_CAP),
            });
        }
        if self.burst_particles > MAX_BURST_PARTICLES {
            return Err(TuningError::OutOfRange {
                field: "burst_particles",
                max: u64::from(MAX_BURST_PARTICLES),
            });
        }

        let durations = [
            ("base_spawn_interval_ms", self.base_spawn_interval_ms),
            ("first_spawn_delay_ms", self.first_spawn_delay_ms),
            ("combo_timeout_ms", self.combo_timeout_ms),
            ("popup_ttl_ms", self.popup_ttl_ms),
            ("particle_ttl_ms", self.particle_ttl_ms),
            ("shake_ms", self.shake_ms),
        ];
        if let Some((field, _)) = durations.into_iter().find(|(_, ms)| *ms > MAX_DURATION_MS) {
            return Err(TuningError::OutOfRange {
                field,
                max: MAX_DURATION_MS,
            });
        }

        let distances = [
            ("spawn_padding", self.spawn_padding),
            ("burst_min_distance", self.burst_min_distance),
            ("burst_distance_jitter", self.burst_distance_jitter),
        ];
        if let Some((field, _)) = distances
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(TuningError::NotFinite(field));
        }

        for archetype in &self.archetypes {
            if archetype.points > MAX_TARGET_POINTS {
                return Err(TuningError::OutOfRange {
                    field: "archetypes.points",
                    max: MAX_TARGET_POINTS,
                });
            }
            if archetype.lifetime_ms > MAX_DURATION_MS {
                return Err(TuningError::OutOfRange {
                    field: "archetypes.lifetime_ms",
                    max: MAX_DURATION_MS,
                });
            }
            if !archetype.size.is_finite() || archetype.size <= 0.0 {
                return Err(TuningError::NotFinite("archetypes.size"));
            }
            if !archetype.weight.is_finite() {
                return Err(TuningError::NotFinite("archetypes.weight"));
            }
        }

        let first = self.tiers.first().ok_or(TuningError::NoTiers)?;
        if first.threshold != 0 {
            return Err(TuningError::FirstTierNotZero(first.threshold));
        }
        for (index, pair) in self.tiers.windows(2).enumerate() {
            if pair[1].threshold <= pair[0].threshold {
                return Err(TuningError::TiersNotIncreasing {
                    index: index + 1,
                    threshold: pair[1].threshold,
                });
            }
        }
        if let Some(index) = self
            .tiers
            .iter()
            .position(|t| {
                !(t.spawn_multiplier.is_finite() && t.spawn_multiplier > 0.0)
                    || !(t.lifetime_multiplier.is_finite() && t.lifetime_multiplier > 0.0)
            })
        {
            return Err(TuningError::BadMultiplier(index));
        }

        let total_weight: f32 = self.archetypes.iter().map(|a| a.weight.max(0.0)).sum();
        if total_weight <= 0.0 {
            return Err(TuningError::NoArchetypeWeight);
        }
        Ok(())
    }

    /// Load from a JSON file, falling back to defaults on any problem
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| log::warn!("Cannot read tuning file {}: {}", path.display(), e))
            .ok()
            .and_then(|json| {
                Self::from_json(&json)
                    .map_err(|e| log::warn!("Ignoring tuning file {}: {}", path.display(), e))
                    .ok()
            });

        match loaded {
            Some(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            None => Self::default(),
        }
    }
}
