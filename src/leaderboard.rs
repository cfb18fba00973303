//! Leaderboard of completed runs
//!
//! Every finished run is appended; nothing is trimmed. The list is kept
//! sorted by descending score (stable, so equal scores stay in the order they
//! were achieved) and the display reads the top few from it.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};

/// Name recorded when the player leaves the name field blank
pub const DEFAULT_NAME: &str = "Anonymous";

/// A single completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub name: String,
    pub score: u32,
    /// Level reached
    pub level: u32,
    /// Run length in whole seconds
    pub time: u32,
}

impl LeaderboardRecord {
    /// Build a record, substituting [`DEFAULT_NAME`] for a blank name
    pub fn new(name: &str, score: u32, level: u32, time: u32) -> Self {
        Self {
            name: normalize_name(name),
            score,
            level,
            time,
        }
    }
}

/// Trim the entered name, falling back to [`DEFAULT_NAME`]
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// All persisted records, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardRecord>,
}

impl Leaderboard {
    /// Storage key
    const STORAGE_KEY: &'static str = "leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load the full list. Absent or corrupt data reads as an empty board.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        let mut board: Leaderboard = persistence::load_json(storage, Self::STORAGE_KEY);
        board.sort();
        board
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), StorageError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Append one record to the persisted list and return the updated board
    pub fn append<S: Storage + ?Sized>(
        storage: &mut S,
        record: LeaderboardRecord,
    ) -> Result<Self, StorageError> {
        let mut board = Self::load(storage);
        board.push(record);
        board.save(storage)?;
        Ok(board)
    }

    /// Rename the most recently stored copy of `record`. Returns the updated
    /// board; a board without the record is returned unchanged.
    pub fn rename<S: Storage + ?Sized>(
        storage: &mut S,
        record: &LeaderboardRecord,
        name: &str,
    ) -> Result<Self, StorageError> {
        let mut board = Self::load(storage);
        // Newest among equal scores sits last
        let Some(idx) = board.entries.iter().rposition(|e| e == record) else {
            log::warn!("Record for {} not found, nothing renamed", record.name);
            return Ok(board);
        };
        board.entries[idx].name = normalize_name(name);
        board.save(storage)?;
        Ok(board)
    }

    /// Clear every record irreversibly
    pub fn reset<S: Storage + ?Sized>(storage: &mut S) -> Result<(), StorageError> {
        storage.remove(Self::STORAGE_KEY)?;
        log::info!("Leaderboard reset");
        Ok(())
    }

    /// Insert a record, keeping the list sorted. Returns its 1-based rank.
    pub fn push(&mut self, record: LeaderboardRecord) -> usize {
        // After existing entries with an equal score
        let pos = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);
        pos + 1
    }

    /// The best `n` records
    pub fn top(&self, n: usize) -> &[LeaderboardRecord] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn best_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    fn sort(&mut self) {
        // Stable: ties keep stored order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn record(name: &str, score: u32) -> LeaderboardRecord {
        LeaderboardRecord::new(name, score, 1, 10)
    }

    #[test]
    fn test_blank_name_becomes_anonymous() {
        assert_eq!(LeaderboardRecord::new("   ", 5, 1, 1).name, DEFAULT_NAME);
        assert_eq!(LeaderboardRecord::new(" Ada ", 5, 1, 1).name, "Ada");
    }

    #[test]
    fn test_append_then_load_contains_record() {
        let mut storage = MemoryStorage::new();
        let r = LeaderboardRecord::new("Ada", 42, 3, 37);
        Leaderboard::append(&mut storage, r.clone()).unwrap();

        let board = Leaderboard::load(&storage);
        assert!(board.entries.contains(&r));
    }

    #[test]
    fn test_reset_then_load_is_empty() {
        let mut storage = MemoryStorage::new();
        Leaderboard::append(&mut storage, record("a", 1)).unwrap();
        Leaderboard::append(&mut storage, record("b", 2)).unwrap();

        Leaderboard::reset(&mut storage).unwrap();
        assert!(Leaderboard::load(&storage).is_empty());
    }

    #[test]
    fn test_list_is_never_trimmed() {
        let mut storage = MemoryStorage::new();
        for score in 0..12 {
            Leaderboard::append(&mut storage, record("p", score)).unwrap();
        }
        let board = Leaderboard::load(&storage);
        assert_eq!(board.len(), 12);
        assert_eq!(board.top(5).len(), 5);
        assert_eq!(board.best_score(), Some(11));
    }

    #[test]
    fn test_top_is_descending_and_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.push(record("first", 50));
        board.push(record("high", 90));
        board.push(record("second", 50));
        board.push(record("low", 10));

        let names: Vec<_> = board.top(5).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["high", "first", "second", "low"]);
    }

    #[test]
    fn test_push_returns_rank() {
        let mut board = Leaderboard::new();
        assert_eq!(board.push(record("a", 10)), 1);
        assert_eq!(board.push(record("b", 30)), 1);
        assert_eq!(board.push(record("c", 20)), 2);
        assert_eq!(board.push(record("d", 20)), 3);
    }

    #[test]
    fn test_rename_touches_only_the_newest_match() {
        let mut storage = MemoryStorage::new();
        let r = record("Anonymous", 20);
        Leaderboard::append(&mut storage, r.clone()).unwrap();
        Leaderboard::append(&mut storage, r.clone()).unwrap();
        Leaderboard::append(&mut storage, record("Bo", 30)).unwrap();

        let board = Leaderboard::rename(&mut storage, &r, " Zed ").unwrap();
        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bo", "Anonymous", "Zed"]);
        assert_eq!(Leaderboard::load(&storage), board);
    }

    #[test]
    fn test_rename_to_blank_is_anonymous() {
        let mut storage = MemoryStorage::new();
        let r = record("Ada", 5);
        Leaderboard::append(&mut storage, r.clone()).unwrap();
        let board = Leaderboard::rename(&mut storage, &r, "  ").unwrap();
        assert_eq!(board.entries[0].name, DEFAULT_NAME);
    }

    #[test]
    fn test_corrupt_store_reads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.set("leaderboard", "{\"oops\":").unwrap();
        assert!(Leaderboard::load(&storage).is_empty());

        // And appending over it recovers
        Leaderboard::append(&mut storage, record("a", 3)).unwrap();
        assert_eq!(Leaderboard::load(&storage).len(), 1);
    }

    #[test]
    fn test_unsorted_store_is_sorted_on_load() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                "leaderboard",
                r#"[{"name":"a","score":1,"level":1,"time":3},{"name":"b","score":9,"level":2,"time":20}]"#,
            )
            .unwrap();
        let board = Leaderboard::load(&storage);
        assert_eq!(board.best_score(), Some(9));
    }
}
