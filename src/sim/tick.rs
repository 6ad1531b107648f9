//! Per-frame simulation step
//!
//! One call advances the simulation clock to `now_ms`: restart request,
//! due timers, taps, then the expiry sweep.

use glam::Vec2;

use super::state::{GameState, PlayArea, TargetId};
use super::timers::TaskKind;

/// A tap on a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub target: TargetId,
    pub pos: Vec2,
}

/// Input collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Taps in arrival order
    pub taps: Vec<Tap>,
    /// Restart (space / "Play Again"); ignored while playing
    pub restart: bool,
    /// Current play-area size, if it changed or is known
    pub play_area: Option<PlayArea>,
}

/// Advance the game state to `now_ms`.
///
/// The clock never runs backwards: an older `now_ms` is treated as the last
/// tick time.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    let now_ms = now_ms.max(state.time_ms);
    state.time_ms = now_ms;

    if let Some(area) = input.play_area {
        state.play_area = area;
    }

    if input.restart {
        state.start_game(now_ms);
    }

    run_due_tasks(state, now_ms);

    for tap in &input.taps {
        state.resolve_hit(tap.target, tap.pos, now_ms);
    }

    state.sweep_expired(now_ms);
}

/// Fire every task due at or before `now_ms`, earliest first
fn run_due_tasks(state: &mut GameState, now_ms: u64) {
    while let Some(task) = state.timers.pop_due(now_ms) {
        match task.kind {
            TaskKind::SpawnChain => state.on_spawn_due(now_ms),
            TaskKind::ComboDecay => state.on_combo_decay(),
            TaskKind::ShakeEnd => state.effects.shake = false,
            TaskKind::EffectExpiry(id) => {
                state.effects.remove(id);
            }
        }
    }
}
