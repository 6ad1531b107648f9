//! Expiry sweep and miss handling

use super::state::{GameEvent, GameState, Target, TargetId};
use super::timers::TaskKind;

impl GameState {
    /// Remove every target whose lifetime has elapsed and report each as a
    /// miss. Returns the number of misses reported.
    ///
    /// Removal from the live set is the ownership check: a target that was
    /// already hit is no longer there and cannot be reported again.
    pub fn sweep_expired(&mut self, now_ms: u64) -> usize {
        if !self.is_playing() {
            return 0;
        }

        let expired: Vec<TargetId> = self
            .targets
            .values()
            .filter(|t| t.is_expired(now_ms))
            .map(|t| t.id)
            .collect();

        let mut missed = 0;
        for id in expired {
            if !self.is_playing() {
                break;
            }
            if let Some(target) = self.targets.remove(&id) {
                self.handle_miss(target);
                missed += 1;
            }
        }
        missed
    }

    /// Apply the miss penalty for a target that has already been removed
    fn handle_miss(&mut self, target: Target) {
        let session = &mut self.session;
        session.lives = session.lives.saturating_sub(1);
        session.combo = 0;
        session.streak = 0;
        session.misses += 1;
        self.timers.cancel(TaskKind::ComboDecay);

        log::debug!(
            "Missed {} target {:?}, {} lives left",
            target.color.as_str(),
            target.id,
            self.session.lives
        );
        self.events.push(GameEvent::TargetMissed {
            id: target.id,
            lives: self.session.lives,
        });

        if self.session.lives == 0 {
            self.end_game();
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::{GamePhase, TargetColor};
    use crate::tuning::Tuning;

    fn place(state: &mut GameState, spawned_ms: u64, lifetime_ms: u64) -> TargetId {
        let id = state.next_target_id();
        state.targets.insert(
            id,
            Target {
                id,
                pos: Vec2::new(150.0, 150.0),
                size: 60.0,
                color: TargetColor::Cyan,
                points: 10,
                spawned_ms,
                lifetime_ms,
            },
        );
        id
    }

    fn playing() -> GameState {
        let mut state = GameState::new(9, Tuning::default(), 0);
        state.start_game(0);
        state.drain_events();
        state
    }

    #[test]
    fn test_expired_target_reported_once() {
        let mut state = playing();
        let id = place(&mut state, 0, 1_000);

        assert_eq!(state.sweep_expired(999), 0);
        assert_eq!(state.session.lives, 3);

        assert_eq!(state.sweep_expired(1_000), 1);
        assert_eq!(state.session.lives, 2);
        assert!(!state.targets.contains_key(&id));

        assert_eq!(state.sweep_expired(5_000), 0);
        assert_eq!(state.session.lives, 2);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::TargetMissed { id, lives: 2 }]
        );
    }

    #[test]
    fn test_miss_resets_combo_and_streak_immediately() {
        let mut state = playing();
        state.session.combo = 4;
        state.session.streak = 9;
        state.timers.schedule(TaskKind::ComboDecay, 2_000);
        place(&mut state, 0, 100);

        state.sweep_expired(100);
        assert_eq!(state.session.combo, 0);
        assert_eq!(state.session.streak, 0);
        assert!(!state.timers().is_pending(TaskKind::ComboDecay));
    }

    #[test]
    fn test_last_life_ends_game_and_stops_sweep() {
        let mut state = playing();
        state.session.lives = 1;
        place(&mut state, 0, 100);
        place(&mut state, 0, 100);

        assert_eq!(state.sweep_expired(200), 1);
        assert_eq!(state.session.lives, 0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        assert!(state.targets.is_empty());
        assert!(!state.timers().is_pending(TaskKind::SpawnChain));
    }

    #[test]
    fn test_sweep_is_inert_outside_playing() {
        let mut state = GameState::new(9, Tuning::default(), 0);
        place(&mut state, 0, 10);
        assert_eq!(state.sweep_expired(1_000), 0);
        assert_eq!(state.session.lives, 3);
    }
}
