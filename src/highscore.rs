//! Persistent personal best

use crate::error::StorageError;
use crate::platform::KeyValueStore;

/// Where the best score lives between sessions
pub trait HighScoreStore {
    /// Stored best, `None` when absent or unreadable
    fn get(&self) -> Option<u64>;
    fn set(&mut self, score: u64) -> Result<(), StorageError>;
}

/// High score kept under a single key of a [`KeyValueStore`]
pub struct StoredHighScore {
    storage: Box<dyn KeyValueStore>,
}

impl StoredHighScore {
    pub const STORAGE_KEY: &'static str = "tap-frenzy-high-score";

    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

impl HighScoreStore for StoredHighScore {
    fn get(&self) -> Option<u64> {
        let raw = match self.storage.get_item(Self::STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                return None;
            }
        };
        match raw.trim().parse() {
            Ok(score) => Some(score),
            Err(e) => {
                log::warn!("Ignoring corrupt high score {:?}: {}", raw, e);
                None
            }
        }
    }

    fn set(&mut self, score: u64) -> Result<(), StorageError> {
        self.storage.set_item(Self::STORAGE_KEY, &score.to_string())?;
        log::info!("High score saved ({})", score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }
        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_absent_then_set() {
        let mut store = StoredHighScore::new(Box::new(MemoryStorage::new()));
        assert_eq!(store.get(), None);
        store.set(1234).unwrap();
        assert_eq!(store.get(), Some(1234));
    }

    #[test]
    fn test_corrupt_value_reads_as_absent() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(StoredHighScore::STORAGE_KEY, "not a number")
            .unwrap();
        let store = StoredHighScore::new(Box::new(storage));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_broken_backend_degrades() {
        let mut store = StoredHighScore::new(Box::new(BrokenStorage));
        assert_eq!(store.get(), None);
        assert!(store.set(10).is_err());
    }
}
