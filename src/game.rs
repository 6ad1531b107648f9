//! Game runner
//!
//! Owns a [`GameState`], advances it once per frame and routes the events it
//! produces to the injected collaborators: cues to the [`CueSink`], final
//! scores to the [`HighScoreStore`] and [`LeaderboardService`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{CueSink, NullCueSink, cues_for_event};
use crate::error::LeaderboardError;
use crate::highscore::{HighScoreStore, StoredHighScore};
use crate::leaderboard::{LeaderboardEntry, LeaderboardService, LocalLeaderboard};
use crate::platform::MemoryStorage;
use crate::settings::{PlayerNameSource, Settings, SettingsNameSource};
use crate::sim::{GameEvent, GameState, PlayArea, Tap, TargetId, TickInput, tick};
use crate::tuning::Tuning;

/// Supplies the current play-area size
pub trait BoundsProvider {
    fn play_area(&self) -> PlayArea;
}

/// Play area that never changes
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBounds(pub PlayArea);

impl BoundsProvider for FixedBounds {
    fn play_area(&self) -> PlayArea {
        self.0
    }
}

/// Everything outside the simulation the runner talks to
pub struct Collaborators {
    pub high_score: Box<dyn HighScoreStore>,
    pub leaderboard: Box<dyn LeaderboardService>,
    pub names: Box<dyn PlayerNameSource>,
    pub cues: Box<dyn CueSink>,
    pub bounds: Box<dyn BoundsProvider>,
}

impl Collaborators {
    /// In-memory collaborators with silent audio
    pub fn in_memory(seed: u64) -> Self {
        let storage = MemoryStorage::new();
        Self {
            high_score: Box::new(StoredHighScore::new(Box::new(storage.clone()))),
            leaderboard: Box::new(LocalLeaderboard::load(Box::new(storage.clone()))),
            names: Box::new(
                SettingsNameSource::new(&Settings::default(), Pcg32::seed_from_u64(seed))
                    .with_storage(Box::new(storage.clone())),
            ),
            cues: Box::new(NullCueSink),
            bounds: Box::new(FixedBounds::default()),
        }
    }
}

/// Frame driver around a [`GameState`]
pub struct Game {
    state: GameState,
    collaborators: Collaborators,
    input: TickInput,
    last_submission: Option<LeaderboardEntry>,
}

impl Game {
    /// Create a runner in the `Start` phase. The stored high score is read
    /// once here; a missing or unreadable value counts as 0.
    pub fn new(seed: u64, tuning: Tuning, collaborators: Collaborators) -> Self {
        let high_score = collaborators.high_score.get().unwrap_or(0);
        let mut state = GameState::new(seed, tuning, high_score);
        state.play_area = collaborators.bounds.play_area();
        log::info!("Game ready (seed {}, high score {})", seed, high_score);
        Self {
            state,
            collaborators,
            input: TickInput::default(),
            last_submission: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.collaborators
    }

    /// Queue a tap for the next update
    pub fn tap(&mut self, target: TargetId, pos: Vec2) {
        self.input.taps.push(Tap { target, pos });
    }

    /// Queue a restart for the next update (ignored while playing)
    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    /// Advance to `now_ms` with the queued input and dispatch the resulting
    /// events. Returns the events for the host UI.
    pub fn update(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let input = std::mem::take(&mut self.input);
        self.update_with(input, now_ms)
    }

    /// Advance to `now_ms` with explicit input, plus anything queued
    pub fn update_with(&mut self, mut input: TickInput, now_ms: u64) -> Vec<GameEvent> {
        let queued = std::mem::take(&mut self.input);
        input.taps.extend(queued.taps);
        input.restart |= queued.restart;
        if input.play_area.is_none() {
            input.play_area = Some(self.collaborators.bounds.play_area());
        }

        tick(&mut self.state, &input, now_ms);

        let events = self.state.drain_events();
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    fn dispatch(&mut self, event: &GameEvent) {
        for cue in cues_for_event(event) {
            self.collaborators.cues.play(cue);
        }

        if let GameEvent::GameOver {
            score,
            level,
            new_high_score,
        } = *event
        {
            self.finish_run(score, level, new_high_score);
        }
    }

    /// Persist the result of a finished run. Failures are logged and dropped.
    fn finish_run(&mut self, score: u64, level: usize, new_high_score: bool) {
        if new_high_score {
            if let Err(e) = self.collaborators.high_score.set(score) {
                log::warn!("Failed to save high score: {}", e);
            }
        }

        let name = self.collaborators.names.player_name();
        self.last_submission = match self.collaborators.leaderboard.submit(score, level, &name) {
            Ok(entry) => {
                log::info!("Submitted {} for {} (level {})", score, entry.player_name, level);
                self.collaborators.names.remember(&entry.player_name);
                Some(entry)
            }
            Err(LeaderboardError::NotQualified) => {
                log::info!("Score {} did not make the leaderboard", score);
                None
            }
            Err(e) => {
                log::warn!("Leaderboard submit failed: {}", e);
                None
            }
        };
    }

    /// Entry recorded for the most recent run, if it made the board
    pub fn last_submission(&self) -> Option<&LeaderboardEntry> {
        self.last_submission.as_ref()
    }

    /// Best `n` leaderboard entries; empty when the board is unavailable
    pub fn leaderboard_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.collaborators
            .leaderboard
            .fetch_top(n)
            .unwrap_or_else(|e| {
                log::warn!("Leaderboard fetch failed: {}", e);
                Vec::new()
            })
    }

    pub fn rank_for(&self, score: u64) -> Option<usize> {
        self.collaborators
            .leaderboard
            .rank_for(score)
            .map_err(|e| log::warn!("Leaderboard rank failed: {}", e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::{Cue, CueKind};
    use crate::consts::FRAME_MS;
    use crate::error::StorageError;
    use crate::sim::GamePhase;

    #[derive(Default)]
    struct Recorded {
        cues: Vec<Cue>,
        high_scores: Vec<u64>,
        submissions: Vec<(u64, usize, String)>,
    }

    type Shared = Rc<RefCell<Recorded>>;

    struct RecordingCues(Shared);
    impl CueSink for RecordingCues {
        fn play(&mut self, cue: Cue) {
            self.0.borrow_mut().cues.push(cue);
        }
    }

    struct RecordingHighScore {
        initial: Option<u64>,
        fail: bool,
        log: Shared,
    }
    impl HighScoreStore for RecordingHighScore {
        fn get(&self) -> Option<u64> {
            self.initial
        }
        fn set(&mut self, score: u64) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::Unavailable);
            }
            self.log.borrow_mut().high_scores.push(score);
            Ok(())
        }
    }

    struct RecordingBoard {
        fail: bool,
        log: Shared,
    }
    impl LeaderboardService for RecordingBoard {
        fn submit(
            &mut self,
            score: u64,
            difficulty_reached: usize,
            player_name: &str,
        ) -> Result<LeaderboardEntry, LeaderboardError> {
            if self.fail {
                return Err(LeaderboardError::Storage(StorageError::Unavailable));
            }
            self.log
                .borrow_mut()
                .submissions
                .push((score, difficulty_reached, player_name.to_string()));
            Ok(LeaderboardEntry {
                id: 1,
                player_name: player_name.to_string(),
                score,
                difficulty_reached,
                created_at: 0.0,
            })
        }
        fn fetch_top(&self, _n: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
            if self.fail {
                return Err(LeaderboardError::Storage(StorageError::Unavailable));
            }
            Ok(Vec::new())
        }
        fn rank_for(&self, _score: u64) -> Result<usize, LeaderboardError> {
            Ok(1)
        }
    }

    struct FixedName;
    impl PlayerNameSource for FixedName {
        fn player_name(&mut self) -> String {
            "Tester".to_string()
        }
    }

    fn game(initial_high: Option<u64>, fail: bool) -> (Game, Shared) {
        let log: Shared = Rc::default();
        let collaborators = Collaborators {
            high_score: Box::new(RecordingHighScore {
                initial: initial_high,
                fail,
                log: log.clone(),
            }),
            leaderboard: Box::new(RecordingBoard {
                fail,
                log: log.clone(),
            }),
            names: Box::new(FixedName),
            cues: Box::new(RecordingCues(log.clone())),
            bounds: Box::new(FixedBounds(PlayArea::new(320.0, 480.0))),
        };
        (Game::new(3, Tuning::default(), collaborators), log)
    }

    /// Step frames until the phase changes away from playing or `limit` passes
    fn run_until_over(game: &mut Game, mut now: u64, limit: u64) -> u64 {
        while game.state().is_playing() && now < limit {
            now += FRAME_MS;
            game.update(now);
        }
        now
    }

    #[test]
    fn test_high_score_read_at_start() {
        let (g, _) = game(Some(777), false);
        assert_eq!(g.state().session.high_score, 777);

        let (g, _) = game(None, false);
        assert_eq!(g.state().session.high_score, 0);
        assert_eq!(g.state().play_area, PlayArea::new(320.0, 480.0));
    }

    #[test]
    fn test_hit_plays_tap_cue() {
        let (mut g, log) = game(None, false);
        g.restart();
        g.update(0);

        let mut now = 0;
        while g.state().targets.is_empty() {
            now += FRAME_MS;
            g.update(now);
        }
        let target = g.state().targets.values().next().cloned().unwrap();
        g.tap(target.id, target.center());
        let events = g.update(now + FRAME_MS);

        assert!(events.iter().any(|e| matches!(e, GameEvent::TargetHit { .. })));
        let log = log.borrow();
        let cues = &log.cues;
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].kind, CueKind::Tap);
        assert_eq!(cues[0].pitch, target.color.cue_pitch());
    }

    #[test]
    fn test_scoreless_game_over_submits_without_high_score() {
        let (mut g, log) = game(None, false);
        g.restart();
        g.update(0);
        run_until_over(&mut g, 0, 60_000);

        assert_eq!(g.state().phase(), GamePhase::GameOver);
        let log = log.borrow();
        assert!(log.high_scores.is_empty());
        assert_eq!(log.submissions, vec![(0, 0, "Tester".to_string())]);
        assert_eq!(
            log.cues.iter().filter(|c| c.kind == CueKind::Miss).count(),
            3
        );
        assert_eq!(log.cues.last().map(|c| c.kind), Some(CueKind::GameOver));
    }

    #[test]
    fn test_new_high_score_is_stored() {
        let (mut g, log) = game(Some(5), false);
        g.restart();
        g.update(0);

        let mut now = 0;
        // Hit the first target, then let the rest expire
        while g.state().session.score == 0 {
            now += FRAME_MS;
            if let Some(t) = g.state().targets.values().next().cloned() {
                g.tap(t.id, t.center());
            }
            g.update(now);
        }
        run_until_over(&mut g, now, 120_000);

        let log = log.borrow();
        let score = g.state().session.score;
        assert!(score > 5);
        assert!(g.state().session.is_new_high_score);
        assert_eq!(log.high_scores, vec![score]);
        assert_eq!(log.submissions.len(), 1);
        assert_eq!(g.last_submission().map(|e| e.score), Some(score));
    }

    #[test]
    fn test_collaborator_failures_do_not_block_play() {
        let (mut g, _) = game(None, true);
        g.restart();
        g.update(0);
        let now = run_until_over(&mut g, 0, 60_000);
        assert_eq!(g.state().phase(), GamePhase::GameOver);
        assert!(g.leaderboard_top(10).is_empty());
        assert!(g.last_submission().is_none());

        g.restart();
        g.update(now + FRAME_MS);
        assert!(g.state().is_playing());
    }

    #[test]
    fn test_runs_share_one_player_name() {
        let log: Shared = Rc::default();
        let collaborators = Collaborators {
            high_score: Box::new(RecordingHighScore {
                initial: None,
                fail: false,
                log: log.clone(),
            }),
            leaderboard: Box::new(RecordingBoard {
                fail: false,
                log: log.clone(),
            }),
            names: Box::new(SettingsNameSource::new(
                &Settings::default(),
                Pcg32::seed_from_u64(21),
            )),
            cues: Box::new(NullCueSink),
            bounds: Box::new(FixedBounds::default()),
        };
        let mut g = Game::new(21, Tuning::default(), collaborators);

        let mut now = 0;
        for _ in 0..2 {
            now += FRAME_MS;
            g.restart();
            g.update(now);
            now = run_until_over(&mut g, now, now + 60_000);
        }

        let log = log.borrow();
        assert_eq!(log.submissions.len(), 2);
        assert!(!log.submissions[0].2.is_empty());
        assert_eq!(log.submissions[0].2, log.submissions[1].2);
    }

    #[test]
    fn test_in_memory_collaborators() {
        let mut g = Game::new(9, Tuning::default(), Collaborators::in_memory(9));
        g.restart();
        g.update(0);
        run_until_over(&mut g, 0, 60_000);
        // A scoreless run never makes the local board
        assert!(g.leaderboard_top(5).is_empty());
        assert_eq!(g.rank_for(100), Some(1));
    }
}
