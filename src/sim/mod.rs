//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time comes in as a millisecond clock value, never read from the platform
//! - Seeded RNG only
//! - Stable iteration order (targets keyed by id)
//! - No rendering, audio, storage or network dependencies

pub mod autoplay;
pub mod difficulty;
pub mod effects;
pub mod hit;
pub mod spawner;
pub mod state;
pub mod sweeper;
pub mod tick;
pub mod timers;
pub mod weighted;

pub use autoplay::AutoPlayer;
pub use difficulty::{DifficultyTier, ResolvedTier, default_tiers, resolve_tier, tier_name};
pub use effects::{Effect, EffectId, EffectKind, EffectsQueue, Spark};
pub use hit::{HitOutcome, combo_multiplier};
pub use spawner::{TargetArchetype, default_archetypes, spawn_position};
pub use state::{
    GameEvent, GamePhase, GameState, PlayArea, Session, Target, TargetColor, TargetId,
};
pub use tick::{Tap, TickInput, tick};
pub use timers::{FiredTask, Scheduler, TaskHandle, TaskKind};
pub use weighted::{pick_by_weight, pick_by_weight_with};
