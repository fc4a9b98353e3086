//! Tests for the shared statistics file.

use std::fs;

use tempfile::TempDir;

use strictly_breakthrough::{StatisticsStore, UNDETERMINED};

#[test]
fn test_fresh_store_has_no_records() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = StatisticsStore::new(dir.path().join("statistics.json"));

    assert_eq!(store.best_player(), UNDETERMINED);
    assert_eq!(store.shortest_game(), None);
    assert_eq!(store.longest_game(), None);
    assert_eq!(store.load().total_games(), 0);
    assert!(!store.path().exists());
}

#[test]
fn test_record_win_writes_documented_keys() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = StatisticsStore::new(dir.path().join("statistics.json"));
    store.record_win("Alice", 23).expect("Record failed");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).expect("Read failed"))
            .expect("Bad JSON");
    assert_eq!(value["PlayerWins"], serde_json::json!({ "Alice": 1 }));
    assert_eq!(value["ShortestGame"], 23);
    assert_eq!(value["LongestGame"], 23);
}

#[test]
fn test_wins_accumulate_and_extremes_track() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = StatisticsStore::new(dir.path().join("statistics.json"));

    store.record_win("Alice", 30).expect("Record failed");
    store.record_win("Bob", 12).expect("Record failed");
    let stats = store.record_win("Alice", 41).expect("Record failed");

    assert_eq!(stats.wins_for("Alice"), 2);
    assert_eq!(stats.wins_for("Bob"), 1);
    assert_eq!(stats.wins_for("Carol"), 0);
    assert_eq!(stats.total_games(), 3);
    assert_eq!(store.shortest_game(), Some(12));
    assert_eq!(store.longest_game(), Some(41));
    assert_eq!(store.best_player(), "Alice");
}

#[test]
fn test_tied_leaders_are_undetermined() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = StatisticsStore::new(dir.path().join("statistics.json"));

    store.record_win("Alice", 20).expect("Record failed");
    store.record_win("Bob", 20).expect("Record failed");
    assert_eq!(store.best_player(), UNDETERMINED);

    store.record_win("Bob", 18).expect("Record failed");
    assert_eq!(store.best_player(), "Bob");
}

#[test]
fn test_corrupt_file_is_treated_as_empty_and_replaced() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("statistics.json");
    fs::write(&path, "{ \"PlayerWins\": [").expect("Write failed");

    let store = StatisticsStore::new(&path);
    assert_eq!(store.best_player(), UNDETERMINED);

    let stats = store.record_win("Dana", 9).expect("Record failed");
    assert_eq!(stats.total_games(), 1);
    assert_eq!(store.load().wins_for("Dana"), 1);
}

#[test]
fn test_partial_file_fills_missing_keys() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("statistics.json");
    fs::write(&path, r#"{ "PlayerWins": { "Eve": 4 } }"#).expect("Write failed");

    let store = StatisticsStore::new(&path);
    assert_eq!(store.best_player(), "Eve");
    assert_eq!(store.shortest_game(), None);

    store.record_win("Eve", 15).expect("Record failed");
    assert_eq!(store.load().wins_for("Eve"), 5);
    assert_eq!(store.shortest_game(), Some(15));
}

#[test]
fn test_record_win_creates_parent_directory() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("data").join("statistics.json");
    let store = StatisticsStore::new(&path);

    store.record_win("Frank", 7).expect("Record failed");
    assert!(path.exists());
}
