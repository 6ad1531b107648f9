//! Target spawner
//!
//! Weighted archetype draw, in-bounds placement, and the self-rescheduling
//! spawn chain paced by the difficulty policy.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState, PlayArea, Target, TargetColor};
use super::timers::TaskKind;
use super::weighted::pick_by_weight_with;

/// Template for a target color class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetArchetype {
    pub color: TargetColor,
    pub points: u64,
    pub size: f32,
    /// Relative spawn probability
    pub weight: f32,
    /// Lifetime before difficulty scaling
    pub lifetime_ms: u64,
}

pub fn default_archetypes() -> Vec<TargetArchetype> {
    vec![
        TargetArchetype {
            color: TargetColor::Cyan,
            points: 10,
            size: 60.0,
            weight: 60.0,
            lifetime_ms: 2000,
        },
        TargetArchetype {
            color: TargetColor::Magenta,
            points: 25,
            size: 50.0,
            weight: 30.0,
            lifetime_ms: 1500,
        },
        TargetArchetype {
            color: TargetColor::Yellow,
            points: 50,
            size: 40.0,
            weight: 10.0,
            lifetime_ms: 1000,
        },
    ]
}

/// Draw one coordinate uniformly from `[padding, extent - size - padding]`.
///
/// When the play area is too small for the padding the target is centred
/// on that axis instead.
fn spawn_coordinate<R: Rng>(rng: &mut R, extent: f32, size: f32, padding: f32) -> f32 {
    let min = padding;
    let max = extent - size - padding;
    if min.is_finite() && max.is_finite() && max > min {
        rng.random_range(min..=max)
    } else {
        ((extent - size) / 2.0).max(0.0)
    }
}

/// Random top-left corner for a target of `size` inside `area`
pub fn spawn_position<R: Rng>(rng: &mut R, area: PlayArea, size: f32, padding: f32) -> Vec2 {
    Vec2::new(
        spawn_coordinate(rng, area.width, size, padding),
        spawn_coordinate(rng, area.height, size, padding),
    )
}

impl GameState {
    /// Spawn one target at `now_ms` using the current score's tier.
    ///
    /// Returns `None` only if the archetype table carries no weight.
    pub fn spawn_one(&mut self, now_ms: u64) -> Option<&Target> {
        let tier = self.current_tier();
        let archetype = pick_by_weight_with(&self.tuning.archetypes, |a| a.weight, &mut self.rng)?.clone();

        let pos = spawn_position(
            &mut self.rng,
            self.play_area,
            archetype.size,
            self.tuning.spawn_padding,
        );
        let lifetime_ms = ((archetype.lifetime_ms as f32 * tier.lifetime_multiplier).round() as u64).max(1);

        let id = self.next_target_id();
        let target = Target {
            id,
            pos,
            size: archetype.size,
            color: archetype.color,
            points: archetype.points,
            spawned_ms: now_ms,
            lifetime_ms,
        };
        log::debug!(
            "Spawned {} target {:?} at ({:.0}, {:.0}), lifetime {}ms",
            target.color.as_str(),
            id,
            pos.x,
            pos.y,
            lifetime_ms
        );

        self.events.push(GameEvent::TargetSpawned {
            id,
            color: target.color,
        });
        self.targets.insert(id, target);
        self.targets.get(&id)
    }

    /// Current delay between spawns, from the latest score
    pub fn spawn_interval_ms(&self) -> u64 {
        let tier = self.current_tier();
        ((self.tuning.base_spawn_interval_ms as f32 * tier.spawn_multiplier).round() as u64).max(1)
    }

    /// Handle a spawn-chain firing: spawn, then schedule the next link
    pub(crate) fn on_spawn_due(&mut self, now_ms: u64) {
        if !self.is_playing() {
            return;
        }
        self.spawn_one(now_ms);
        let next = now_ms.saturating_add(self.spawn_interval_ms());
        self.timers.schedule(TaskKind::SpawnChain, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_position_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let area = PlayArea::new(800.0, 600.0);
        for _ in 0..1_000 {
            let pos = spawn_position(&mut rng, area, 60.0, 100.0);
            assert!(pos.x >= 100.0 && pos.x + 60.0 <= 700.0, "x = {}", pos.x);
            assert!(pos.y >= 100.0 && pos.y + 60.0 <= 500.0, "y = {}", pos.y);
        }
    }

    #[test]
    fn test_spawn_position_tiny_area_is_centred() {
        let mut rng = Pcg32::seed_from_u64(3);
        let pos = spawn_position(&mut rng, PlayArea::new(200.0, 150.0), 40.0, 100.0);
        assert_eq!(pos, Vec2::new(80.0, 55.0));

        let pos = spawn_position(&mut rng, PlayArea::new(10.0, 10.0), 40.0, 100.0);
        assert_eq!(pos, Vec2::ZERO);
    }

    #[test]
    fn test_spawn_one_assigns_unique_ids() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state.start_game(0);
        let a = state.spawn_one(10).unwrap().id;
        let b = state.spawn_one(10).unwrap().id;
        assert_ne!(a, b);
        assert_eq!(state.targets.len(), 2);
    }

    #[test]
    fn test_lifetime_scales_with_difficulty() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state.start_game(0);
        state.session.score = 5_000; // GODLIKE, lifetime x0.5

        for _ in 0..50 {
            let target = state.spawn_one(0).unwrap().clone();
            let base = state
                .tuning
                .archetypes
                .iter()
                .find(|a| a.color == target.color)
                .unwrap()
                .lifetime_ms;
            assert_eq!(target.lifetime_ms, base / 2);
            assert_eq!(target.spawned_ms, 0);
        }
    }

    #[test]
    fn test_spawn_interval_follows_latest_score() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state.start_game(0);
        assert_eq!(state.spawn_interval_ms(), 1_500);
        state.session.score = 1_000;
        assert_eq!(state.spawn_interval_ms(), 825);
        state.session.score = 9_999;
        assert_eq!(state.spawn_interval_ms(), 450);
    }

    #[test]
    fn test_spawn_chain_reschedules_itself() {
        let mut state = GameState::new(5, Tuning::default(), 0);
        state.start_game(0);
        state.on_spawn_due(500);
        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.timers().due_at(TaskKind::SpawnChain), Some(2_000));
    }

    #[test]
    fn test_schedule_saturates_at_end_of_clock() {
        let tuning = Tuning {
            first_spawn_delay_ms: u64::MAX,
            ..Tuning::default()
        };
        let mut state = GameState::new(5, tuning, 0);
        state.start_game(1_000);
        assert_eq!(state.timers().due_at(TaskKind::SpawnChain), Some(u64::MAX));

        state.on_spawn_due(u64::MAX - 1);
        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.timers().due_at(TaskKind::SpawnChain), Some(u64::MAX));
    }

    #[test]
    fn test_spawn_position_ignores_unbounded_area() {
        let mut rng = Pcg32::seed_from_u64(3);
        let area = PlayArea::new(f32::INFINITY, 600.0);
        let pos = spawn_position(&mut rng, area, 40.0, 100.0);
        assert!(pos.y >= 100.0 && pos.y <= 460.0);
    }
}
