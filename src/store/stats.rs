//! Cross-game statistics kept in a single JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::store::StoreError;

/// Label returned by [`Statistics::best_player`] when no single player leads.
pub const UNDETERMINED: &str = "undetermined";

/// Aggregate results over all completed games.
///
/// Serialized with the keys `PlayerWins`, `ShortestGame` and `LongestGame`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "PascalCase", default)]
pub struct Statistics {
    /// Wins per player name.
    player_wins: BTreeMap<String, u32>,
    /// Fewest moves in a completed game.
    shortest_game: Option<u32>,
    /// Most moves in a completed game.
    longest_game: Option<u32>,
}

impl Statistics {
    /// Counts a win for `winner` in a game of `move_count` moves.
    #[instrument(skip(self))]
    pub fn record(&mut self, winner: &str, move_count: u32) {
        *self.player_wins.entry(winner.to_string()).or_insert(0) += 1;
        self.shortest_game = Some(self.shortest_game.map_or(move_count, |s| s.min(move_count)));
        self.longest_game = Some(self.longest_game.map_or(move_count, |l| l.max(move_count)));
    }

    /// Returns the player with strictly the most wins.
    ///
    /// Returns [`UNDETERMINED`] when nobody has won yet or when two or more
    /// players share the highest count.
    #[instrument(skip(self))]
    pub fn best_player(&self) -> &str {
        let mut best: Option<(&str, u32)> = None;
        let mut tied = false;
        for (name, &wins) in &self.player_wins {
            match best {
                Some((_, top)) if wins < top => {}
                Some((_, top)) if wins == top => tied = true,
                _ => {
                    best = Some((name.as_str(), wins));
                    tied = false;
                }
            }
        }

        match best {
            Some((name, _)) if !tied => name,
            _ => UNDETERMINED,
        }
    }

    /// Returns how many games `name` has won.
    #[instrument(skip(self))]
    pub fn wins_for(&self, name: &str) -> u32 {
        self.player_wins.get(name).copied().unwrap_or(0)
    }

    /// Returns the number of completed games recorded.
    #[instrument(skip(self))]
    pub fn total_games(&self) -> u32 {
        self.player_wins.values().sum()
    }
}

/// File-backed store for the shared [`Statistics`] record.
#[derive(Debug, Clone)]
pub struct StatisticsStore {
    path: PathBuf,
}

impl StatisticsStore {
    /// Creates a store backed by the file at `path` (created on first win).
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the statistics file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record, falling back to an empty one.
    ///
    /// A missing file is the normal first-run state. An unreadable or
    /// corrupt file is logged and treated as missing.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Statistics {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No statistics file yet");
                return Statistics::default();
            }
            Err(e) => {
                warn!(error = %e, "Cannot read statistics file; starting from zero");
                return Statistics::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Corrupt statistics file; starting from zero");
                Statistics::default()
            }
        }
    }

    /// Counts a completed game and overwrites the file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn record_win(&self, winner: &str, move_count: u32) -> Result<Statistics, StoreError> {
        let mut stats = self.load();
        stats.record(winner, move_count);
        self.write(&stats)?;
        info!(
            winner = %winner,
            wins = stats.wins_for(winner),
            move_count,
            "Win recorded"
        );
        Ok(stats)
    }

    /// Returns the leading player's name or [`UNDETERMINED`].
    #[instrument(skip(self))]
    pub fn best_player(&self) -> String {
        self.load().best_player().to_string()
    }

    /// Returns the fewest moves in any completed game.
    #[instrument(skip(self))]
    pub fn shortest_game(&self) -> Option<u32> {
        *self.load().shortest_game()
    }

    /// Returns the most moves in any completed game.
    #[instrument(skip(self))]
    pub fn longest_game(&self) -> Option<u32> {
        *self.load().longest_game()
    }

    fn write(&self, stats: &Statistics) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::io(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(&self.path, json).map_err(|e| {
            StoreError::io(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_game_sets_both_extremes() {
        let mut stats = Statistics::default();
        stats.record("Ann", 14);
        assert_eq!(*stats.shortest_game(), Some(14));
        assert_eq!(*stats.longest_game(), Some(14));
    }

    #[test]
    fn test_empty_record_has_no_best_player() {
        assert_eq!(Statistics::default().best_player(), UNDETERMINED);
    }

    #[test]
    fn test_lower_count_after_leader_does_not_clear_lead() {
        let mut stats = Statistics::default();
        stats.record("Ann", 10);
        stats.record("Ann", 10);
        stats.record("Zed", 10);
        assert_eq!(stats.best_player(), "Ann");
    }

    #[test]
    fn test_tie_below_leader_keeps_leader() {
        let mut stats = Statistics::default();
        for name in ["Bo", "Cy", "Ann", "Ann"] {
            stats.record(name, 9);
        }
        assert_eq!(stats.best_player(), "Ann");
    }
}
