//! Tap Frenzy - tap the targets before they vanish
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, expiry, hits, combo, difficulty)
//! - `game`: Frame runner that routes simulation events to collaborators
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `leaderboard` / `highscore`: Score persistence
//! - `audio`: Sound cues
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod error;
pub mod game;
pub mod highscore;
pub mod leaderboard;
pub mod names;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{LeaderboardError, StorageError, TuningError};
pub use game::{BoundsProvider, Collaborators, FixedBounds, Game};
pub use highscore::{HighScoreStore, StoredHighScore};
pub use leaderboard::{LeaderboardEntry, LeaderboardService, LocalLeaderboard};
pub use settings::{PlayerNameSource, Settings, SettingsNameSource};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame step used by headless runs (~60 Hz)
    pub const FRAME_MS: u64 = 16;
    /// Leaderboard entries shown after a headless run
    pub const SUMMARY_TOP_N: usize = 10;
    /// Env var naming a tuning JSON file
    pub const TUNING_ENV: &str = "TAP_FRENZY_TUNING";
}
