//! Cosmetic unlocks earned by score
//!
//! Flags only ever go from locked to unlocked; normal play never clears them.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlock {
    /// Kayak hull, first score threshold
    Kayak,
    /// Speedboat hull, second score threshold
    Speedboat,
}

impl Unlock {
    pub const ALL: [Unlock; 2] = [Unlock::Kayak, Unlock::Speedboat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unlock::Kayak => "Kayak",
            Unlock::Speedboat => "Speedboat",
        }
    }

    /// Score a single run must reach
    pub fn threshold(&self, tuning: &Tuning) -> u32 {
        match self {
            Unlock::Kayak => tuning.unlock_kayak_score,
            Unlock::Speedboat => tuning.unlock_speedboat_score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlockFlags {
    pub kayak: bool,
    pub speedboat: bool,
}

impl UnlockFlags {
    const STORAGE_KEY: &'static str = "unlocks";

    /// Load flags; anything unreadable counts as locked
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        persistence::load_json(storage, Self::STORAGE_KEY)
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)
    }

    pub fn is_unlocked(&self, unlock: Unlock) -> bool {
        match unlock {
            Unlock::Kayak => self.kayak,
            Unlock::Speedboat => self.speedboat,
        }
    }

    fn set(&mut self, unlock: Unlock) {
        match unlock {
            Unlock::Kayak => self.kayak = true,
            Unlock::Speedboat => self.speedboat = true,
        }
    }

    /// Unlock everything `score` qualifies for. Returns the newly unlocked items.
    pub fn evaluate(&mut self, score: u32, tuning: &Tuning) -> Vec<Unlock> {
        let mut newly = Vec::new();
        for unlock in Unlock::ALL {
            if !self.is_unlocked(unlock) && score >= unlock.threshold(tuning) {
                self.set(unlock);
                newly.push(unlock);
            }
        }
        newly
    }
}
