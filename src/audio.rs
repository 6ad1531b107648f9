//! Audio cues
//!
//! The simulation never plays sound itself. The runner turns game events into
//! [`Cue`]s and hands them to a fire-and-forget [`CueSink`]. On the web the
//! sink is a Web Audio synthesizer; natively cues are logged or dropped.

use crate::sim::GameEvent;

/// Sound cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// Target hit
    Tap,
    /// Combo milestone
    Combo,
    /// Target expired
    Miss,
    /// Run ended
    GameOver,
    /// New difficulty tier
    LevelUp,
}

/// A cue with its pitch/intensity scalar (1.0 = neutral)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub kind: CueKind,
    pub pitch: f32,
}

impl Cue {
    pub fn new(kind: CueKind) -> Self {
        Self { kind, pitch: 1.0 }
    }

    pub fn with_pitch(kind: CueKind, pitch: f32) -> Self {
        Self { kind, pitch }
    }
}

/// Combo depth from which the combo arpeggio plays on every hit
pub const COMBO_CUE_THRESHOLD: u32 = 3;

/// Cues for a simulation event
pub fn cues_for_event(event: &GameEvent) -> Vec<Cue> {
    match event {
        GameEvent::TargetHit { color, combo, .. } => {
            let mut cues = vec![Cue::with_pitch(CueKind::Tap, color.cue_pitch())];
            if *combo >= COMBO_CUE_THRESHOLD {
                // Climbs a little with each hit, flattening out at the multiplier cap
                let depth = (*combo).min(10) as f32;
                cues.push(Cue::with_pitch(CueKind::Combo, 1.0 + depth * 0.05));
            }
            cues
        }
        GameEvent::TargetMissed { .. } => vec![Cue::new(CueKind::Miss)],
        GameEvent::LevelUp { .. } => vec![Cue::new(CueKind::LevelUp)],
        GameEvent::GameOver { .. } => vec![Cue::new(CueKind::GameOver)],
        GameEvent::GameStarted
        | GameEvent::TargetSpawned { .. }
        | GameEvent::ComboReset => Vec::new(),
    }
}

/// Fire-and-forget cue consumer
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Drops every cue
#[derive(Debug, Default)]
pub struct NullCueSink;

impl CueSink for NullCueSink {
    fn play(&mut self, _cue: Cue) {}
}

/// Logs cues at debug level (headless runs)
#[derive(Debug, Default)]
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn play(&mut self, cue: Cue) {
        log::debug!("cue {:?} (pitch {:.2})", cue.kind, cue.pitch);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Cue, CueKind, CueSink};

    /// Web Audio cue synthesizer. The context is created lazily on the
    /// first cue, which browsers only allow after a user gesture.
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        failed: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(1.0)
        }
    }

    impl AudioManager {
        pub fn new(volume: f32) -> Self {
            Self {
                ctx: None,
                volume: volume.clamp(0.0, 1.0),
                failed: false,
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn context(&mut self) -> Option<&AudioContext> {
            if self.ctx.is_none() && !self.failed {
                match AudioContext::new() {
                    Ok(ctx) => self.ctx = Some(ctx),
                    Err(_) => {
                        log::warn!("Failed to create AudioContext - audio disabled");
                        self.failed = true;
                    }
                }
            }
            let ctx = self.ctx.as_ref()?;
            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Quick pop that sweeps up then drops
        fn play_tap(ctx: &AudioContext, vol: f32, pitch: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 400.0 * pitch, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();
            osc.frequency().set_value_at_time(400.0 * pitch, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(800.0 * pitch, t + 0.05)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Staggered notes with a short attack
        fn play_notes(
            ctx: &AudioContext,
            notes: &[f32],
            osc_type: OscillatorType,
            spacing: f64,
            level: f32,
            decay: f64,
        ) {
            let t = ctx.current_time();
            for (i, &freq) in notes.iter().enumerate() {
                let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                    continue;
                };
                let start = t + i as f64 * spacing;
                gain.gain().set_value_at_time(0.0, start).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(level, start + 0.02)
                    .ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + decay)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + decay + 0.05).ok();
            }
        }

        /// Low sawtooth thud
        fn play_miss(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.2)
                .ok();
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }

    impl CueSink for AudioManager {
        fn play(&mut self, cue: Cue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };

            match cue.kind {
                CueKind::Tap => Self::play_tap(ctx, vol, cue.pitch),
                CueKind::Combo => {
                    // C5 E5 G5 C6
                    let notes: Vec<f32> = [523.25, 659.25, 783.99, 1046.5]
                        .iter()
                        .map(|f| f * cue.pitch)
                        .collect();
                    Self::play_notes(ctx, &notes, OscillatorType::Sine, 0.05, vol * 0.15, 0.2);
                }
                CueKind::Miss => Self::play_miss(ctx, vol),
                CueKind::GameOver => {
                    // A4 F4 D4 A3
                    Self::play_notes(
                        ctx,
                        &[440.0, 349.23, 293.66, 220.0],
                        OscillatorType::Triangle,
                        0.15,
                        vol * 0.2,
                        0.4,
                    );
                }
                CueKind::LevelUp => {
                    // C5 to E6 fanfare
                    Self::play_notes(
                        ctx,
                        &[523.25, 659.25, 783.99, 1046.5, 1318.51],
                        OscillatorType::Square,
                        0.08,
                        vol * 0.12,
                        0.3,
                    );
                }
            }
        }
    }
}
