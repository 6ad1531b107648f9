//! Game state and core simulation types
//!
//! `GameState` is the single owner of the session, the live target set, the
//! effects queue and the task scheduler. Everything that mutates them runs on
//! the caller's thread through `tick` or the hit resolver.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{ResolvedTier, resolve_tier, tier_name};
use super::effects::EffectsQueue;
use super::timers::{Scheduler, TaskKind};
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle title screen, no timers running
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Target color class (selects points, size and lifetime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetColor {
    Cyan,
    Magenta,
    Yellow,
}

impl TargetColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetColor::Cyan => "cyan",
            TargetColor::Magenta => "magenta",
            TargetColor::Yellow => "yellow",
        }
    }

    /// CSS color used for particles
    pub fn css_color(&self) -> &'static str {
        match self {
            TargetColor::Cyan => "hsl(180, 100%, 50%)",
            TargetColor::Magenta => "hsl(300, 100%, 60%)",
            TargetColor::Yellow => "hsl(50, 100%, 50%)",
        }
    }

    /// Pitch scalar for the tap cue (rarer targets ring higher)
    pub fn cue_pitch(&self) -> f32 {
        match self {
            TargetColor::Cyan => 1.0,
            TargetColor::Magenta => 1.25,
            TargetColor::Yellow => 1.5,
        }
    }
}

/// Target identifier, never reused within one `GameState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// A tappable, time-limited target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Top-left corner in play-area coordinates
    pub pos: Vec2,
    pub size: f32,
    pub color: TargetColor,
    pub points: u64,
    pub spawned_ms: u64,
    pub lifetime_ms: u64,
}

impl Target {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.spawned_ms)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.age_ms(now_ms) >= self.lifetime_ms
    }

    pub fn time_left_ms(&self, now_ms: u64) -> u64 {
        self.lifetime_ms.saturating_sub(self.age_ms(now_ms))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Whether `point` lies inside the target circle
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center()) <= self.size / 2.0
    }
}

/// Playable surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
        }
    }
}

/// Authoritative per-run scoring state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    pub score: u64,
    /// Best score across sessions
    pub high_score: u64,
    pub lives: u8,
    pub max_lives: u8,
    /// Consecutive hits without a miss or combo timeout
    pub combo: u32,
    /// Consecutive hits without a miss
    pub streak: u32,
    /// Highest difficulty level reached this run
    pub level: usize,
    pub is_new_high_score: bool,
    pub best_combo: u32,
    pub hits: u32,
    pub misses: u32,
}

impl Session {
    pub fn new(max_lives: u8, high_score: u64) -> Self {
        Self {
            phase: GamePhase::Start,
            score: 0,
            high_score,
            lives: max_lives,
            max_lives,
            combo: 0,
            streak: 0,
            level: 0,
            is_new_high_score: false,
            best_combo: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Back to a fresh run, keeping the high score
    fn reset(&mut self) {
        *self = Self::new(self.max_lives, self.high_score);
    }
}

/// Notifications produced by the simulation, drained by the runner
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GameStarted,
    TargetSpawned {
        id: TargetId,
        color: TargetColor,
    },
    TargetHit {
        id: TargetId,
        color: TargetColor,
        points: u64,
        combo: u32,
        multiplier: u32,
    },
    TargetMissed {
        id: TargetId,
        lives: u8,
    },
    /// Combo lapsed after the decay timeout
    ComboReset,
    LevelUp {
        level: usize,
    },
    GameOver {
        score: u64,
        level: usize,
        new_high_score: bool,
    },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// RNG seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub session: Session,
    /// Live targets (ordered by id for deterministic iteration)
    pub targets: BTreeMap<TargetId, Target>,
    /// Cosmetic effects
    pub effects: EffectsQueue,
    /// Last known play-area bounds
    pub play_area: PlayArea,
    /// Clock value of the most recent tick
    pub time_ms: u64,
    pub(crate) timers: Scheduler,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle state in the `Start` phase
    pub fn new(seed: u64, tuning: Tuning, high_score: u64) -> Self {
        let session = Session::new(tuning.max_lives, high_score);
        Self {
            seed,
            tuning,
            session,
            targets: BTreeMap::new(),
            effects: EffectsQueue::new(),
            play_area: PlayArea::default(),
            time_ms: 0,
            timers: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new target id
    pub fn next_target_id(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn is_playing(&self) -> bool {
        self.session.phase == GamePhase::Playing
    }

    /// Read-only view of pending timers
    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tier for the current score
    pub fn current_tier(&self) -> ResolvedTier {
        resolve_tier(&self.tuning.tiers, self.session.score)
    }

    /// HUD label of the highest level reached
    pub fn difficulty_name(&self) -> String {
        tier_name(&self.tuning.tiers, self.session.level)
    }

    /// Begin a new run. Only valid from `Start` or `GameOver`.
    pub fn start_game(&mut self, now_ms: u64) -> bool {
        if self.is_playing() {
            log::debug!("start_game ignored: already playing");
            return false;
        }

        self.session.reset();
        self.session.phase = GamePhase::Playing;
        self.targets.clear();
        self.timers.cancel(TaskKind::SpawnChain);
        self.timers.cancel(TaskKind::ComboDecay);
        self.time_ms = now_ms;

        self.timers
            .schedule(TaskKind::SpawnChain, now_ms.saturating_add(self.tuning.first_spawn_delay_ms));

        log::info!("Game started (high score {})", self.session.high_score);
        self.events.push(GameEvent::GameStarted);
        true
    }

    /// Leave `Playing`: stop gameplay timers and settle the high score
    pub(crate) fn end_game(&mut self) {
        if !self.is_playing() {
            return;
        }

        self.session.phase = GamePhase::GameOver;
        self.timers.cancel(TaskKind::SpawnChain);
        self.timers.cancel(TaskKind::ComboDecay);
        self.targets.clear();

        let score = self.session.score;
        if score > self.session.high_score {
            self.session.high_score = score;
            self.session.is_new_high_score = true;
        }

        log::info!(
            "Game over: score {} level {} ({} hits, {} misses, best combo {}){}",
            score,
            self.session.level,
            self.session.hits,
            self.session.misses,
            self.session.best_combo,
            if self.session.is_new_high_score { " - new high score!" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            score,
            level: self.session.level,
            new_high_score: self.session.is_new_high_score,
        });
    }

    /// Add points and re-evaluate the difficulty level
    pub(crate) fn add_score(&mut self, points: u64) {
        self.session.score = self.session.score.saturating_add(points);

        let level = self.current_tier().level_index;
        if level > self.session.level {
            self.session.level = level;
            log::info!("Level up: {} ({})", level, self.difficulty_name());
            self.events.push(GameEvent::LevelUp { level });
        }
    }
}
