//! Hit resolution: scoring, combo/streak bookkeeping and tap feedback

use glam::Vec2;

use super::effects::{EffectKind, burst_sparks};
use super::state::{GameEvent, GameState, TargetId};
use super::timers::TaskKind;

/// What a successful hit awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub points: u64,
    pub combo: u32,
    pub multiplier: u32,
}

/// Score multiplier for a combo count
pub fn combo_multiplier(combo: u32, cap: u32) -> u32 {
    combo.clamp(1, cap.max(1))
}

impl GameState {
    /// Resolve a tap on `id` at `tap_pos`.
    ///
    /// Taps on targets that are no longer live (already hit, already expired)
    /// and taps outside `Playing` are ignored and return `None`.
    pub fn resolve_hit(&mut self, id: TargetId, tap_pos: Vec2, now_ms: u64) -> Option<HitOutcome> {
        if !self.is_playing() {
            return None;
        }
        let target = self.targets.remove(&id)?;

        let combo = self.session.combo + 1;
        let multiplier = combo_multiplier(combo, self.tuning.max_multiplier);
        let points = target.points.saturating_mul(u64::from(multiplier));

        self.session.combo = combo;
        self.session.streak += 1;
        self.session.hits += 1;
        self.session.best_combo = self.session.best_combo.max(combo);

        log::debug!(
            "Hit {} target {:?}: +{} (combo {}, x{})",
            target.color.as_str(),
            id,
            points,
            combo,
            multiplier
        );
        self.events.push(GameEvent::TargetHit {
            id,
            color: target.color,
            points,
            combo,
            multiplier,
        });
        self.add_score(points);

        // Feedback
        let popup = self.effects.push(
            tap_pos,
            EffectKind::ScorePopup { points, combo },
            now_ms,
            self.tuning.popup_ttl_ms,
        );
        self.timers
            .schedule(TaskKind::EffectExpiry(popup), now_ms.saturating_add(self.tuning.popup_ttl_ms));

        let sparks = burst_sparks(
            &mut self.rng,
            self.tuning.burst_particles,
            self.tuning.burst_min_distance,
            self.tuning.burst_distance_jitter,
        );
        let burst = self.effects.push(
            tap_pos,
            EffectKind::ParticleBurst {
                color: target.color,
                sparks,
            },
            now_ms,
            self.tuning.particle_ttl_ms,
        );
        self.timers
            .schedule(TaskKind::EffectExpiry(burst), now_ms.saturating_add(self.tuning.particle_ttl_ms));

        self.effects.shake = true;
        self.timers.schedule(TaskKind::ShakeEnd, now_ms.saturating_add(self.tuning.shake_ms));

        self.timers
            .schedule(TaskKind::ComboDecay, now_ms.saturating_add(self.tuning.combo_timeout_ms));

        Some(HitOutcome {
            points,
            combo,
            multiplier,
        })
    }

    /// Combo decay timer fired: the combo lapses, the streak survives
    pub(crate) fn on_combo_decay(&mut self) {
        if !self.is_playing() || self.session.combo == 0 {
            return;
        }
        log::debug!("Combo of {} lapsed", self.session.combo);
        self.session.combo = 0;
        self.events.push(GameEvent::ComboReset);
    }
}
