//! Demo/idle mode player
//!
//! Produces taps the way a person might: notices a target after a reaction
//! delay, taps at most one target per cooldown, and sometimes fumbles.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, TargetId};
use super::tick::{Tap, TickInput};

/// A bot that decides which targets to tap each frame
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// Delay between a target appearing and the bot reacting to it
    pub reaction_ms: u64,
    /// Minimum time between two taps
    pub tap_cooldown_ms: u64,
    /// Probability that a tap attempt lands
    pub accuracy: f32,
    last_tap_ms: Option<u64>,
    /// Targets already attempted (hit or fumbled)
    attempted: HashSet<TargetId>,
}

impl AutoPlayer {
    /// `skill` in `[0, 1]`: 0 is sluggish and clumsy, 1 is near-perfect
    pub fn new(seed: u64, skill: f32) -> Self {
        let skill = skill.clamp(0.0, 1.0);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            reaction_ms: (700.0 - 450.0 * skill).round() as u64,
            tap_cooldown_ms: (450.0 - 330.0 * skill).round() as u64,
            accuracy: 0.6 + 0.38 * skill,
            last_tap_ms: None,
            attempted: HashSet::new(),
        }
    }

    /// Build this frame's input. Restarts automatically after game over when
    /// `auto_restart` is set.
    pub fn plan(&mut self, state: &GameState, now_ms: u64, auto_restart: bool) -> TickInput {
        let mut input = TickInput {
            restart: auto_restart && !state.is_playing(),
            ..Default::default()
        };
        if !state.is_playing() {
            self.attempted.clear();
            return input;
        }

        self.attempted.retain(|id| state.targets.contains_key(id));

        let ready = self
            .last_tap_ms
            .is_none_or(|t| now_ms.saturating_sub(t) >= self.tap_cooldown_ms);
        if !ready {
            return input;
        }

        // Most urgent noticed target first
        let candidate = state
            .targets
            .values()
            .filter(|t| !self.attempted.contains(&t.id))
            .filter(|t| t.age_ms(now_ms) >= self.reaction_ms && !t.is_expired(now_ms))
            .min_by_key(|t| (t.time_left_ms(now_ms), t.id));

        if let Some(target) = candidate {
            self.attempted.insert(target.id);
            self.last_tap_ms = Some(now_ms);
            if self.rng.random::<f32>() < self.accuracy {
                input.taps.push(Tap {
                    target: target.id,
                    pos: target.center(),
                });
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::state::GamePhase;
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;

    fn play_out(seed: u64, skill: f32, limit_ms: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), 0);
        let mut bot = AutoPlayer::new(seed, skill);
        let mut now = 0;
        while now <= limit_ms {
            let input = bot.plan(&state, now, now == 0);
            tick(&mut state, &input, now);
            if state.phase() == GamePhase::GameOver {
                break;
            }
            now += FRAME_MS;
        }
        state
    }

    #[test]
    fn test_skill_scales_parameters() {
        let slow = AutoPlayer::new(1, 0.0);
        let fast = AutoPlayer::new(1, 1.0);
        assert!(slow.reaction_ms > fast.reaction_ms);
        assert!(slow.tap_cooldown_ms > fast.tap_cooldown_ms);
        assert!(slow.accuracy < fast.accuracy);
    }

    #[test]
    fn test_skilled_bot_scores() {
        let state = play_out(2024, 0.9, 60_000);
        assert!(state.session.score > 0);
        assert!(state.session.hits > 0);
    }

    #[test]
    fn test_clumsy_bot_eventually_loses() {
        let state = play_out(7, 0.0, 10 * 60_000);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.session.lives, 0);
    }

    #[test]
    fn test_never_taps_same_target_twice() {
        let mut state = GameState::new(3, Tuning::default(), 0);
        state.start_game(0);
        let id = state.spawn_one(0).unwrap().id;
        let mut bot = AutoPlayer::new(3, 1.0);
        bot.accuracy = 1.0;

        let first = bot.plan(&state, 600, false);
        assert_eq!(first.taps.len(), 1);
        assert_eq!(first.taps[0].target, id);
        let second = bot.plan(&state, 900, false);
        assert!(second.taps.is_empty());
    }
}
