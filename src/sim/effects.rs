//! Ephemeral cosmetic effects (score popups, particle bursts, screen shake)
//!
//! Effects never feed back into gameplay. Each one is removed when its TTL
//! task fires, whatever phase the session is in.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::TargetColor;

/// Effect identifier (unique within one `GameState`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u32);

/// One spark of a particle burst, as an offset from the burst origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spark {
    pub offset: Vec2,
}

/// Payload of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// "+points" label with the combo that earned it
    ScorePopup { points: u64, combo: u32 },
    /// Sparks radiating from the tap point
    ParticleBurst { color: TargetColor, sparks: Vec<Spark> },
}

/// A self-expiring cosmetic entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub pos: Vec2,
    pub kind: EffectKind,
    pub created_ms: u64,
    pub ttl_ms: u64,
}

impl Effect {
    /// Remaining life in `[0, 1]` (1 = just created), for fading
    pub fn life(&self, now_ms: u64) -> f32 {
        if self.ttl_ms == 0 {
            return 0.0;
        }
        let age = now_ms.saturating_sub(self.created_ms) as f32;
        (1.0 - age / self.ttl_ms as f32).clamp(0.0, 1.0)
    }
}

/// Burst geometry: `count` sparks evenly spaced around the circle at a
/// distance of `min_distance + U[0, jitter)`
pub fn burst_sparks<R: Rng>(rng: &mut R, count: u32, min_distance: f32, jitter: f32) -> Vec<Spark> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            let distance = min_distance + rng.random::<f32>() * jitter;
            Spark {
                offset: Vec2::new(angle.cos(), angle.sin()) * distance,
            }
        })
        .collect()
}

/// All live cosmetic effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectsQueue {
    pub effects: Vec<Effect>,
    /// Screen shake flag
    pub shake: bool,
    next_id: u32,
}

impl EffectsQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect and return its id; the caller schedules its expiry
    pub fn push(&mut self, pos: Vec2, kind: EffectKind, created_ms: u64, ttl_ms: u64) -> EffectId {
        self.next_id += 1;
        let id = EffectId(self.next_id);
        self.effects.push(Effect {
            id,
            pos,
            kind,
            created_ms,
            ttl_ms,
        });
        id
    }

    /// Remove an effect by id
    pub fn remove(&mut self, id: EffectId) -> Option<Effect> {
        let idx = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(idx))
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn popups(&self) -> impl Iterator<Item = &Effect> {
        self.effects
            .iter()
            .filter(|e| matches!(e.kind, EffectKind::ScorePopup { .. }))
    }

    pub fn bursts(&self) -> impl Iterator<Item = &Effect> {
        self.effects
            .iter()
            .filter(|e| matches!(e.kind, EffectKind::ParticleBurst { .. }))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_sparks_radiate_evenly() {
        let mut rng = Pcg32::seed_from_u64(1);
        let sparks = burst_sparks(&mut rng, 8, 30.0, 40.0);
        assert_eq!(sparks.len(), 8);
        for (i, spark) in sparks.iter().enumerate() {
            let dist = spark.offset.length();
            assert!((30.0..=70.0).contains(&dist), "spark {} at {}", i, dist);
            let expected = i as f32 / 8.0 * std::f32::consts::TAU;
            let dir = spark.offset / dist;
            assert!((dir.x - expected.cos()).abs() < 1e-4);
            assert!((dir.y - expected.sin()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_push_and_remove() {
        let mut q = EffectsQueue::new();
        let a = q.push(
            Vec2::ZERO,
            EffectKind::ScorePopup { points: 10, combo: 1 },
            0,
            800,
        );
        let b = q.push(
            Vec2::ONE,
            EffectKind::ParticleBurst { color: TargetColor::Cyan, sparks: Vec::new() },
            0,
            600,
        );
        assert_ne!(a, b);
        assert_eq!(q.popups().count(), 1);
        assert_eq!(q.bursts().count(), 1);

        assert!(q.remove(a).is_some());
        assert!(q.remove(a).is_none());
        assert_eq!(q.len(), 1);
        assert!(q.get(b).is_some());
    }

    #[test]
    fn test_life_fades_to_zero() {
        let mut q = EffectsQueue::new();
        let id = q.push(Vec2::ZERO, EffectKind::ScorePopup { points: 1, combo: 1 }, 1_000, 800);
        let effect = q.get(id).unwrap();
        assert_eq!(effect.life(1_000), 1.0);
        assert!((effect.life(1_400) - 0.5).abs() < 1e-6);
        assert_eq!(effect.life(2_000), 0.0);
    }
}
