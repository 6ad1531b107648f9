//! Tap Frenzy entry point
//!
//! Natively this runs a headless session driven by the autoplayer and prints
//! the result. On the web it exposes a `WebGame` handle that the page drives
//! from its animation frame and pointer events.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use tap_frenzy::audio::AudioManager;
    use tap_frenzy::platform::default_storage;
    use tap_frenzy::sim::{Effect, PlayArea, Session, Target, TargetId};
    use tap_frenzy::{
        Collaborators, FixedBounds, Game, LocalLeaderboard, Settings, SettingsNameSource,
        StoredHighScore, Tuning,
    };

    /// An effect with its fade factor at snapshot time
    #[derive(Serialize)]
    struct EffectView<'a> {
        #[serde(flatten)]
        effect: &'a Effect,
        life: f32,
    }

    /// What the page needs to draw a frame
    #[derive(Serialize)]
    struct Snapshot<'a> {
        session: &'a Session,
        difficulty: String,
        targets: Vec<&'a Target>,
        effects: Vec<EffectView<'a>>,
        shake: bool,
        particles: bool,
    }

    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
        settings: Settings,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: f32, height: f32) -> WebGame {
            let seed = js_sys::Date::now() as u64;
            let settings = Settings::load(&*default_storage());
            let collaborators = Collaborators {
                high_score: Box::new(StoredHighScore::new(default_storage())),
                leaderboard: Box::new(LocalLeaderboard::load(default_storage())),
                names: Box::new(
                    SettingsNameSource::new(
                        &settings,
                        <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(seed),
                    )
                    .with_storage(default_storage()),
                ),
                cues: Box::new(AudioManager::new(settings.effective_volume())),
                bounds: Box::new(FixedBounds(PlayArea::new(width, height))),
            };
            log::info!("Game initialized with seed: {}", seed);
            WebGame {
                game: Game::new(seed, Tuning::default(), collaborators),
                settings,
            }
        }

        pub fn resize(&mut self, width: f32, height: f32) {
            self.game.collaborators_mut().bounds = Box::new(FixedBounds(PlayArea::new(width, height)));
        }

        pub fn tap(&mut self, target: u32, x: f32, y: f32) {
            self.game.tap(TargetId(target), glam::Vec2::new(x, y));
        }

        pub fn restart(&mut self) {
            self.game.restart();
        }

        /// Use `name` for this and future runs; blank goes back to a generated name
        pub fn set_player_name(&mut self, name: String) {
            self.settings.set_player_name(&name);
            self.game.collaborators_mut().names.remember(&name);
        }

        /// Advance to the page clock and return the frame snapshot as JSON
        pub fn update(&mut self, now_ms: f64) -> String {
            self.game.update(now_ms.max(0.0) as u64);
            self.snapshot_json()
        }

        pub fn snapshot_json(&self) -> String {
            let state = self.game.state();
            let snapshot = Snapshot {
                session: &state.session,
                difficulty: state.difficulty_name(),
                targets: state.targets.values().collect(),
                effects: state
                    .effects
                    .effects
                    .iter()
                    .map(|effect| EffectView {
                        effect,
                        life: effect.life(state.time_ms),
                    })
                    .collect(),
                shake: state.effects.shake && self.settings.effective_screen_shake(),
                particles: self.settings.particles,
            };
            serde_json::to_string(&snapshot).unwrap_or_else(|e| {
                log::warn!("Snapshot serialization failed: {}", e);
                String::from("{}")
            })
        }

        pub fn leaderboard_json(&self, n: usize) -> String {
            serde_json::to_string(&self.game.leaderboard_top(n)).unwrap_or_else(|_| "[]".into())
        }
    }

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }
        log::info!("Tap Frenzy starting...");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use tap_frenzy::audio::LogCueSink;
    use tap_frenzy::consts::{FRAME_MS, SUMMARY_TOP_N, TUNING_ENV};
    use tap_frenzy::platform::default_storage;
    use tap_frenzy::sim::AutoPlayer;
    use tap_frenzy::{
        Collaborators, FixedBounds, Game, LocalLeaderboard, Settings, SettingsNameSource,
        StoredHighScore, Tuning,
    };

    /// Upper bound on a headless run (virtual time)
    const MAX_RUN_MS: u64 = 30 * 60 * 1000;

    env_logger::init();
    log::info!("Tap Frenzy (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().map_err(|e| log::warn!("Bad seed {:?}: {}", s, e)).ok())
        .unwrap_or_else(|| tap_frenzy::platform::now_ms() as u64);
    let skill = args
        .next()
        .and_then(|s| s.parse::<f32>().map_err(|e| log::warn!("Bad skill {:?}: {}", s, e)).ok())
        .unwrap_or(0.7);

    let tuning = match std::env::var(TUNING_ENV) {
        Ok(path) => Tuning::load_or_default(std::path::Path::new(&path)),
        Err(_) => Tuning::default(),
    };

    let settings = Settings::load(&*default_storage());
    let collaborators = Collaborators {
        high_score: Box::new(StoredHighScore::new(default_storage())),
        leaderboard: Box::new(LocalLeaderboard::load(default_storage())),
        names: Box::new(
            SettingsNameSource::new(&settings, Pcg32::seed_from_u64(seed)).with_storage(default_storage()),
        ),
        cues: Box::new(LogCueSink),
        bounds: Box::new(FixedBounds::default()),
    };

    let mut game = Game::new(seed, tuning, collaborators);
    let mut bot = AutoPlayer::new(seed ^ 0x5EED, skill);
    log::info!("Autoplay: seed {} skill {:.2}", seed, skill);

    let mut now = 0;
    game.restart();
    game.update(now);
    while game.state().is_playing() && now < MAX_RUN_MS {
        now += FRAME_MS;
        let input = bot.plan(game.state(), now, false);
        game.update_with(input, now);
    }

    let state = game.state();
    let session = &state.session;
    println!("\nTap Frenzy - seed {} skill {:.2}", seed, skill);
    println!(
        "  score {}{}",
        session.score,
        if session.is_new_high_score { " (new high score!)" } else { "" }
    );
    println!("  level {} ({})", session.level, state.difficulty_name());
    println!(
        "  hits {} / misses {} / best combo {}",
        session.hits, session.misses, session.best_combo
    );
    println!("  lasted {:.1}s", now as f64 / 1000.0);
    if state.is_playing() {
        println!("  (stopped after {} minutes)", MAX_RUN_MS / 60_000);
    }

    let top = game.leaderboard_top(SUMMARY_TOP_N);
    if !top.is_empty() {
        println!("\nLeaderboard:");
        for (rank, entry) in top.iter().enumerate() {
            println!(
                "  {:>2}. {:<20} {:>8}  lvl {}",
                rank + 1,
                entry.player_name,
                entry.score,
                entry.difficulty_reached
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
