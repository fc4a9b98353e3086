//! Tests for a full game session: moves, saves, statistics and cursor flow.

use std::path::Path;

use tempfile::TempDir;

use strictly_breakthrough::{
    Board, Cell, Coord, Direction, FirstMove, Move, Phase, PlayResult, SaveStore, Session,
    SessionError, Side, StatisticsStore, Winner,
};

fn players() -> [String; 2] {
    ["Alice".to_string(), "Bob".to_string()]
}

fn stores(dir: &Path) -> (SaveStore, StatisticsStore) {
    (
        SaveStore::new(dir.join("Saves")),
        StatisticsStore::new(dir.join("statistics.json")),
    )
}

fn new_session(dir: &Path) -> Session {
    let (saves, stats) = stores(dir);
    Session::start(saves, stats, 8, 8, players(), FirstMove::White).expect("Start failed")
}

/// White one step from the far edge, one black piece in a corner.
fn near_win(dir: &Path, names: [String; 2]) -> Session {
    let mut board = Board::new(8, 8);
    board
        .set(Coord::new(1, 4), Cell::WhitePiece)
        .expect("Set failed");
    board
        .set(Coord::new(7, 0), Cell::BlackPiece)
        .expect("Set failed");

    let (mut saves, stats) = stores(dir);
    let game = saves
        .start(board, names, FirstMove::White)
        .expect("Start failed")
        .clone();
    Session::resume(dir.join("Saves"), stats, game)
}

fn save_count(dir: &Path) -> usize {
    SaveStore::list_in(dir.join("Saves")).len()
}

#[test]
fn test_start_saves_initial_position() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let session = new_session(dir.path());

    assert_eq!(*session.game().move_count(), 0);
    assert_eq!(session.side_to_move(), Side::White);
    assert!(!session.is_finished());
    assert_eq!(save_count(dir.path()), 1);
}

#[test]
fn test_black_first_session_starts_with_black() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (saves, stats) = stores(dir.path());
    let session =
        Session::start(saves, stats, 6, 9, players(), FirstMove::Black).expect("Start failed");
    assert_eq!(session.side_to_move(), Side::Black);
    assert_eq!(session.board().width(), 9);
}

#[test]
fn test_legal_move_continues_and_rotates_save() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = new_session(dir.path());

    let result = session
        .play(Move::new(Coord::new(6, 3), Coord::new(5, 3)))
        .expect("Play failed");
    assert_eq!(result, PlayResult::Continue);
    assert_eq!(*session.game().move_count(), 1);
    assert_eq!(session.side_to_move(), Side::Black);

    let listed = SaveStore::list_in(dir.path().join("Saves"));
    assert_eq!(listed.len(), 1);
    assert_eq!(*listed[0].move_count(), 1);
    assert_eq!(listed[0].board().get(Coord::new(5, 3)), Some(Cell::WhitePiece));
}

#[test]
fn test_illegal_move_is_rejected_without_saving() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = new_session(dir.path());
    let code = session.game().unique_code().clone();

    // Black piece while white is to move.
    let result = session
        .play(Move::new(Coord::new(1, 3), Coord::new(2, 3)))
        .expect("Play failed");
    assert_eq!(result, PlayResult::Rejected);

    // Straight into an occupied cell.
    let result = session
        .play(Move::new(Coord::new(7, 3), Coord::new(6, 3)))
        .expect("Play failed");
    assert_eq!(result, PlayResult::Rejected);

    assert_eq!(session.game().unique_code(), &code);
    assert_eq!(*session.game().move_count(), 0);
}

#[test]
fn test_winning_move_records_statistics_and_clears_save() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = near_win(dir.path(), players());
    assert_eq!(save_count(dir.path()), 1);

    let result = session
        .play(Move::new(Coord::new(1, 4), Coord::new(0, 4)))
        .expect("Play failed");
    assert_eq!(
        result,
        PlayResult::Won {
            side: Side::White,
            name: "Alice".to_string(),
            moves: 1,
        }
    );
    assert!(session.is_finished());
    assert_eq!(session.winner(), Winner::White);
    assert_eq!(*session.game().move_count(), 1);
    assert_eq!(save_count(dir.path()), 0);

    let stats = session.statistics();
    assert_eq!(stats.best_player(), "Alice");
    assert_eq!(stats.shortest_game(), Some(1));
    assert_eq!(stats.longest_game(), Some(1));
}

#[test]
fn test_play_after_win_is_game_over() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = near_win(dir.path(), players());
    session
        .play(Move::new(Coord::new(1, 4), Coord::new(0, 4)))
        .expect("Play failed");

    let err = session
        .play(Move::new(Coord::new(7, 0), Coord::new(6, 0)))
        .expect_err("Play after win should fail");
    assert!(matches!(err, SessionError::GameOver));
}

#[test]
fn test_blank_winner_name_is_missing_players() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = near_win(dir.path(), ["   ".to_string(), "Bob".to_string()]);

    let err = session
        .play(Move::new(Coord::new(1, 4), Coord::new(0, 4)))
        .expect_err("Blank name should fail");
    assert!(matches!(err, SessionError::MissingPlayers(Side::White)));
    assert!(!session.is_finished());
    assert_eq!(save_count(dir.path()), 1);
    assert_eq!(session.statistics().load().total_games(), 0);
}

#[test]
fn test_cursor_selects_piece_then_target() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = new_session(dir.path());

    assert_eq!(session.phase(), Phase::ChoosePiece);
    assert_eq!(session.cursor(), Some(Coord::new(6, 0)));

    let result = session.confirm().expect("Confirm failed");
    assert_eq!(result, None);
    assert_eq!(
        session.phase(),
        Phase::ChooseTarget {
            from: Coord::new(6, 0)
        }
    );
    assert_eq!(session.candidates(), vec![Coord::new(5, 0), Coord::new(5, 1)]);

    assert_eq!(session.navigate(Direction::Right), Some(Coord::new(5, 1)));
    let result = session.confirm().expect("Confirm failed");
    assert_eq!(result, Some(PlayResult::Continue));
    assert_eq!(session.board().get(Coord::new(5, 1)), Some(Cell::WhitePiece));
    assert_eq!(session.phase(), Phase::ChoosePiece);
    assert_eq!(session.side_to_move(), Side::Black);
}

#[test]
fn test_blocked_piece_is_not_selected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = new_session(dir.path());

    assert_eq!(session.navigate(Direction::Down), Some(Coord::new(7, 0)));
    let result = session.confirm().expect("Confirm failed");
    assert_eq!(result, None);
    assert_eq!(session.phase(), Phase::ChoosePiece);
    assert_eq!(session.cursor(), Some(Coord::new(7, 0)));
}

#[test]
fn test_cancel_returns_to_piece_selection() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut session = new_session(dir.path());

    session.navigate(Direction::Right);
    session.confirm().expect("Confirm failed");
    assert!(matches!(session.phase(), Phase::ChooseTarget { .. }));

    session.cancel();
    assert_eq!(session.phase(), Phase::ChoosePiece);
    assert_eq!(session.cursor(), Some(Coord::new(6, 0)));
    assert_eq!(*session.game().move_count(), 0);
}
