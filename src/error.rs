//! Error types for the peripheral collaborators
//!
//! Nothing here is fatal: gameplay code only ever logs these and degrades.

use thiserror::Error;

/// Key/value storage failures (LocalStorage, files)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage access failed for key `{key}`: {reason}")]
    Access { key: String, reason: String },
    #[error("stored value for `{key}` is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Leaderboard submit/fetch failures
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name required")]
    NameRequired,
    #[error("score does not qualify for the leaderboard")]
    NotQualified,
    #[error("leaderboard storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Invalid balance data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("difficulty tier table is empty")]
    NoTiers,
    #[error("first difficulty tier must start at score 0 (found {0})")]
    FirstTierNotZero(u64),
    #[error("difficulty tier thresholds must be strictly increasing (tier {index} at {threshold})")]
    TiersNotIncreasing { index: usize, threshold: u64 },
    #[error("difficulty tier {0} has a non-positive multiplier")]
    BadMultiplier(usize),
    #[error("target archetype weights must sum to more than zero")]
    NoArchetypeWeight,
    #[error("`{0}` must be greater than zero")]
    NotPositive(&'static str),
    #[error("`{field}` is out of range (at most {max})")]
    OutOfRange { field: &'static str, max: u64 },
    #[error("`{0}` must be a finite, non-negative number")]
    NotFinite(&'static str),
}
