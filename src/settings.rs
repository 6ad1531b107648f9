//! Player settings and preferences
//!
//! Persisted separately from scores under their own storage key.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::leaderboard::sanitize_name;
use crate::names::generate_name;
use crate::platform::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Saved leaderboard name; `None` means a random name each game
    pub player_name: Option<String>,

    // === Visual Effects ===
    /// Screen shake on hits
    pub screen_shake: bool,
    /// Particle bursts on hits
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: None,

            screen_shake: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "tap-frenzy-settings";

    /// Save a leaderboard name (trimmed, at most 20 characters).
    /// A blank name clears it.
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = sanitize_name(name);
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Volume applied to cues
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Settings corrupt, using defaults: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        storage.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Supplies the display name submitted with a score
pub trait PlayerNameSource {
    fn player_name(&mut self) -> String;

    /// Keep using `name` for future games. A blank name forgets it.
    fn remember(&mut self, _name: &str) {}
}

/// The saved name from [`Settings`], or a random one generated once and
/// kept until a name is remembered
pub struct SettingsNameSource<R: rand::Rng> {
    pub saved: Option<String>,
    generated: Option<String>,
    rng: R,
    storage: Option<Box<dyn KeyValueStore>>,
}

impl<R: rand::Rng> SettingsNameSource<R> {
    pub fn new(settings: &Settings, rng: R) -> Self {
        Self {
            saved: settings.player_name.clone(),
            generated: None,
            rng,
            storage: None,
        }
    }

    /// Persist remembered names into the settings stored in `storage`
    pub fn with_storage(mut self, storage: Box<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }
}

impl<R: rand::Rng> PlayerNameSource for SettingsNameSource<R> {
    fn player_name(&mut self) -> String {
        if let Some(name) = &self.saved {
            return name.clone();
        }
        let rng = &mut self.rng;
        self.generated
            .get_or_insert_with(|| generate_name(rng))
            .clone()
    }

    fn remember(&mut self, name: &str) {
        let name = sanitize_name(name);
        if name == self.saved {
            return;
        }
        self.saved = name;

        if let Some(storage) = self.storage.as_mut() {
            // Reload so preferences changed elsewhere are not overwritten
            let mut settings = Settings::load(&**storage);
            settings.player_name = self.saved.clone();
            if let Err(e) = settings.save(&mut **storage) {
                log::warn!("Failed to save player name: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_round_trip_through_storage() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.set_player_name("  Ziggy Stardust  ");
        settings.muted = true;
        settings.save(&mut storage).unwrap();

        let loaded = Settings::load(&storage);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.player_name.as_deref(), Some("Ziggy Stardust"));
        assert_eq!(loaded.effective_volume(), 0.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{ "reduced_motion": true }"#)
            .unwrap();
        let loaded = Settings::load(&storage);
        assert!(loaded.reduced_motion);
        assert!(!loaded.effective_screen_shake());
        assert_eq!(loaded.master_volume, 0.8);
    }

    #[test]
    fn test_corrupt_settings_default() {
        let mut storage = MemoryStorage::new();
        storage.set_item(Settings::STORAGE_KEY, "[1, 2").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }

    #[test]
    fn test_blank_name_clears() {
        let mut settings = Settings::default();
        settings.set_player_name("Ace");
        settings.set_player_name("   ");
        assert_eq!(settings.player_name, None);
    }

    #[test]
    fn test_generated_name_is_stable() {
        let mut source = SettingsNameSource::new(&Settings::default(), Pcg32::seed_from_u64(4));
        let first = source.player_name();
        assert_eq!(source.player_name(), first);
        assert_eq!(source.player_name(), first);
    }

    #[test]
    fn test_remembered_name_is_persisted() {
        let storage = MemoryStorage::new();
        let mut prefs = Settings::default();
        prefs.muted = true;
        prefs.save(&mut storage.clone()).unwrap();

        let mut source = SettingsNameSource::new(&Settings::default(), Pcg32::seed_from_u64(4))
            .with_storage(Box::new(storage.clone()));
        let name = source.player_name();
        source.remember(&name);

        let loaded = Settings::load(&storage);
        assert_eq!(loaded.player_name.as_deref(), Some(name.as_str()));
        assert!(loaded.muted);

        // A later session starts from the stored name
        let mut next = SettingsNameSource::new(&loaded, Pcg32::seed_from_u64(99));
        assert_eq!(next.player_name(), name);

        source.remember("  ");
        assert_eq!(Settings::load(&storage).player_name, None);
    }

    #[test]
    fn test_name_source() {
        let mut settings = Settings::default();
        let mut source = SettingsNameSource::new(&settings, Pcg32::seed_from_u64(1));
        let random = source.player_name();
        assert!(!random.is_empty() && random.chars().count() <= 20);

        settings.set_player_name("Ace");
        let mut source = SettingsNameSource::new(&settings, Pcg32::seed_from_u64(1));
        assert_eq!(source.player_name(), "Ace");
    }
}
