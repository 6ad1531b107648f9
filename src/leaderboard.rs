//! Leaderboard of best runs
//!
//! The game only ever talks to a [`LeaderboardService`]. [`LocalLeaderboard`]
//! is the bundled implementation: a sorted top-N list persisted as JSON.

use serde::{Deserialize, Serialize};

use crate::error::{LeaderboardError, StorageError};
use crate::platform::KeyValueStore;

/// Longest display name accepted for submission
pub const MAX_PLAYER_NAME_LEN: usize = 20;

/// Number of entries kept by the local board
pub const MAX_ENTRIES: usize = 50;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u64,
    pub player_name: String,
    pub score: u64,
    /// Highest difficulty level index reached during the run
    pub difficulty_reached: usize,
    /// Unix timestamp (ms) when submitted
    pub created_at: f64,
}

/// Trim and shorten a display name; `None` if nothing is left
pub fn sanitize_name(name: &str) -> Option<String> {
    let name: String = name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
    let name = name.trim_end().to_string();
    if name.is_empty() { None } else { Some(name) }
}

/// Remote or local score board
pub trait LeaderboardService {
    /// Record a finished run
    fn submit(
        &mut self,
        score: u64,
        difficulty_reached: usize,
        player_name: &str,
    ) -> Result<LeaderboardEntry, LeaderboardError>;

    /// Best `n` entries, highest score first
    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;

    /// 1-indexed rank a score holds: one more than the number of better scores
    fn rank_for(&self, score: u64) -> Result<usize, LeaderboardError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Board {
    entries: Vec<LeaderboardEntry>,
    next_id: u64,
}

/// Top-N leaderboard kept on this device
pub struct LocalLeaderboard {
    board: Board,
    capacity: usize,
    storage: Option<Box<dyn KeyValueStore>>,
}

impl LocalLeaderboard {
    pub const STORAGE_KEY: &'static str = "tap-frenzy-leaderboard";

    /// Empty, unpersisted board
    pub fn new() -> Self {
        Self {
            board: Board::default(),
            capacity: MAX_ENTRIES,
            storage: None,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self.board.entries.truncate(self.capacity);
        self
    }

    /// Load the board from `storage` and keep saving to it.
    ///
    /// Unreadable or corrupt data starts a fresh board.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let board = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Board>(&json) {
                Ok(board) => {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    board
                }
                Err(e) => {
                    log::warn!("Leaderboard data corrupt, starting fresh: {}", e);
                    Board::default()
                }
            },
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                Board::default()
            }
            Err(e) => {
                log::warn!("Leaderboard storage unavailable: {}", e);
                Board::default()
            }
        };

        let mut leaderboard = Self {
            board,
            capacity: MAX_ENTRIES,
            storage: Some(storage),
        };
        leaderboard.normalize();
        leaderboard
    }

    /// Sorted descending, capped, ids ahead of every stored entry
    fn normalize(&mut self) {
        self.board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.board.entries.truncate(self.capacity);
        let max_id = self.board.entries.iter().map(|e| e.id).max().unwrap_or(0);
        self.board.next_id = self.board.next_id.max(max_id + 1);
    }

    /// Write `board` to storage (if any). The in-memory board is untouched.
    fn save(&mut self, board: &Board) -> Result<(), LeaderboardError> {
        if let Some(storage) = self.storage.as_mut() {
            let json = serde_json::to_string(board).map_err(StorageError::from)?;
            storage.set_item(Self::STORAGE_KEY, &json)?;
            log::info!("Leaderboard saved ({} entries)", board.entries.len());
        }
        Ok(())
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.board.entries.len() < self.capacity {
            return true;
        }
        // Check if score beats the lowest entry
        self.board
            .entries
            .last()
            .map(|e| score > e.score)
            .unwrap_or(true)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.board.entries
    }

    pub fn is_empty(&self) -> bool {
        self.board.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.board.entries.first().map(|e| e.score)
    }

    /// Insert at the timestamp given; returns the new entry
    pub fn submit_at(
        &mut self,
        score: u64,
        difficulty_reached: usize,
        player_name: &str,
        created_at: f64,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        let player_name = sanitize_name(player_name).ok_or(LeaderboardError::NameRequired)?;
        if !self.qualifies(score) {
            return Err(LeaderboardError::NotQualified);
        }

        let mut board = self.board.clone();
        let entry = LeaderboardEntry {
            id: board.next_id,
            player_name,
            score,
            difficulty_reached,
            created_at,
        };
        board.next_id += 1;

        // Find insertion point (sorted descending by score, ties keep submission order)
        let pos = board
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(board.entries.len());
        board.entries.insert(pos, entry.clone());
        board.entries.truncate(self.capacity);

        // Only a board that reached storage becomes the current one
        self.save(&board)?;
        self.board = board;
        Ok(entry)
    }
}

impl Default for LocalLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardService for LocalLeaderboard {
    fn submit(
        &mut self,
        score: u64,
        difficulty_reached: usize,
        player_name: &str,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        self.submit_at(score, difficulty_reached, player_name, crate::platform::now_ms())
    }

    fn fetch_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.board.entries.iter().take(n).cloned().collect())
    }

    fn rank_for(&self, score: u64) -> Result<usize, LeaderboardError> {
        Ok(self.board.entries.iter().filter(|e| e.score > score).count() + 1)
    }
}
