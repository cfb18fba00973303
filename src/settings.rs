//! Player preferences
//!
//! Persisted separately from the leaderboard.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last name entered; prefills the name field when a run starts
    pub player_name: String,

    // === Visual Effects ===
    /// Collectibles bob on the water
    pub collectible_bob: bool,
    /// Show the "level up" banner
    pub show_level_banner: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            collectible_bob: true,
            show_level_banner: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "settings";

    /// Load settings, using defaults if nothing usable is stored
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        persistence::load_json(storage, Self::STORAGE_KEY)
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
