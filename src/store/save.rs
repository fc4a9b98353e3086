//! Rotating save files for one in-progress game.
//!
//! Every save writes the whole session to a new file named after a
//! timestamp code and only then deletes the file written by the previous
//! save. A crash between the two steps leaves both files on disk; the
//! newest one wins when the directory is listed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::games::breakthrough::{Board, FirstMove, Side, side_to_move};
use crate::store::{StoreError, StoreErrorKind};

/// `strftime` pattern of a unique code: UTC time down to the millisecond,
/// 17 digits wide.
pub const UNIQUE_CODE_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Extension of save files written by [`SaveStore`].
pub const SAVE_EXTENSION: &str = "json";

/// Source of wall-clock time for unique codes.
pub type Clock = fn() -> DateTime<Utc>;

/// A persisted game: players, turn state and board.
///
/// Serialized with the keys `UniqueCode`, `MoveCount`, `Players`,
/// `FirstMove`, `Matrix` and `SaveFilePath`. All but `SaveFilePath` are
/// required when loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "PascalCase")]
pub struct GameSession {
    /// Timestamp code of the latest save, also its file name.
    unique_code: String,
    /// Moves played so far.
    move_count: u32,
    /// White player name, then black player name.
    players: [String; 2],
    /// Which side opened the game.
    first_move: FirstMove,
    /// Current position.
    #[serde(rename = "Matrix")]
    board: Board,
    /// Path the session was last written to.
    #[serde(default)]
    save_file_path: String,
}

impl GameSession {
    /// Creates an unsaved session at move zero.
    #[instrument(skip(board))]
    pub fn new(players: [String; 2], first_move: FirstMove, board: Board) -> Self {
        Self {
            unique_code: String::new(),
            move_count: 0,
            players,
            first_move,
            board,
            save_file_path: String::new(),
        }
    }

    /// Replaces the board with the one reached by the next move.
    pub(crate) fn advance(&mut self, board: Board) {
        self.board = board;
        self.move_count += 1;
    }

    /// Returns the side to move.
    #[instrument(skip(self))]
    pub fn side_to_move(&self) -> Side {
        side_to_move(self.move_count, self.first_move)
    }

    /// Returns the name of the player controlling a side.
    #[instrument(skip(self))]
    pub fn player_name(&self, side: Side) -> &str {
        match side {
            Side::White => &self.players[0],
            Side::Black => &self.players[1],
        }
    }
}

/// Durable storage for exactly one game session.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
    clock: Clock,
    session: Option<GameSession>,
    current_path: Option<PathBuf>,
}

impl SaveStore {
    /// Creates a store writing to `dir` (created on first save).
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_clock(dir, Utc::now)
    }

    /// Creates a store that reads the time from `clock`.
    #[instrument(skip(dir, clock), fields(dir = %dir.as_ref().display()))]
    pub fn with_clock(dir: impl AsRef<Path>, clock: Clock) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            clock,
            session: None,
            current_path: None,
        }
    }

    /// Takes over a session previously written to this store's directory.
    ///
    /// The next save rotates out the session's current file.
    #[instrument(skip(self, session), fields(code = %session.unique_code))]
    pub fn resume(mut self, session: GameSession) -> Self {
        let path = self.path_for(&session.unique_code);
        info!(path = %path.display(), move_count = session.move_count, "Resuming session");
        self.current_path = Some(path);
        self.session = Some(session);
        self
    }

    /// Returns the save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the managed session, if one was started or resumed.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Returns the file holding the latest save.
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Starts a new game at move zero and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the save cannot be written.
    #[instrument(skip(self, board), fields(dir = %self.dir.display()))]
    pub fn start(
        &mut self,
        board: Board,
        players: [String; 2],
        first_move: FirstMove,
    ) -> Result<&GameSession, StoreError> {
        info!(white = %players[0], black = %players[1], ?first_move, "Starting session");
        let session = GameSession::new(players, first_move, board);
        self.persist(session)
    }

    /// Replaces the board after a move, bumps the move count and saves.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreErrorKind::Structural`] error if no session was
    /// started, or [`StoreError`] if the save cannot be written. On error the
    /// in-memory session is left as it was.
    #[instrument(skip(self, board), fields(dir = %self.dir.display()))]
    pub fn record_move(&mut self, board: Board) -> Result<&GameSession, StoreError> {
        let mut next = self
            .session
            .clone()
            .ok_or_else(|| StoreError::structural("No session started; board not initialized"))?;
        next.advance(board);
        debug!(move_count = next.move_count, "Recording move");
        self.persist(next)
    }

    /// Deletes the session's current file and forgets the session.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreErrorKind::Structural`] error if no session was
    /// started, or an I/O error if the file exists but cannot be removed.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn finish(&mut self) -> Result<GameSession, StoreError> {
        let session = self
            .session
            .take()
            .ok_or_else(|| StoreError::structural("No session started; nothing to finish"))?;

        if let Some(path) = self.current_path.take() {
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "Save file removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "Save file already gone");
                }
                Err(e) => {
                    self.current_path = Some(path.clone());
                    self.session = Some(session);
                    return Err(StoreError::io(format!(
                        "Failed to remove '{}': {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        Ok(session)
    }

    /// Loads every readable session in this store's directory, newest first.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list_all(&self) -> Vec<GameSession> {
        Self::list_in(&self.dir)
    }

    /// Loads every readable session in `dir`, newest first.
    ///
    /// Files that cannot be read or parsed are skipped with a warning. A
    /// missing directory yields an empty list.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn list_in(dir: impl AsRef<Path>) -> Vec<GameSession> {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Save directory does not exist yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(dir = %dir.display(), cause = %StoreErrorKind::Io, error = %e, "Cannot read save directory");
                return Vec::new();
            }
        };

        let mut sessions = Vec::new();
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(cause = %StoreErrorKind::Io, error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                debug!(path = %path.display(), "Skipping non-file entry");
                continue;
            }

            match Self::load_file(&path) {
                Ok(session) => {
                    debug!(path = %path.display(), code = %session.unique_code, "Loaded save");
                    sessions.push(session);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        cause = %e.kind,
                        error = %e.message,
                        "Skipping unreadable save file"
                    );
                }
            }
        }

        // Codes are fixed-width timestamps, so string order is time order.
        sessions.sort_by(|a, b| b.unique_code.cmp(&a.unique_code));

        info!(count = sessions.len(), "Saved sessions loaded");
        sessions
    }

    /// Reads and parses one save file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] classified as I/O, parse or structural.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_file(path: impl AsRef<Path>) -> Result<GameSession, StoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| StoreError::io(format!("Failed to read '{}': {}", path.display(), e)))?;
        let session = serde_json::from_str(&content)?;
        Ok(session)
    }

    fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", code, SAVE_EXTENSION))
    }

    /// Writes `next` under a fresh code, then retires the previous file.
    fn persist(&mut self, mut next: GameSession) -> Result<&GameSession, StoreError> {
        let path = self.write_snapshot(&mut next)?;
        self.retire_previous(&path);
        self.current_path = Some(path);
        Ok(&*self.session.insert(next))
    }

    /// Stamps `next` with a new code and writes it to its own file.
    fn write_snapshot(&self, next: &mut GameSession) -> Result<PathBuf, StoreError> {
        let code = (self.clock)().format(UNIQUE_CODE_FORMAT).to_string();
        let path = self.path_for(&code);

        if self.current_path.as_deref() == Some(path.as_path()) {
            warn!(
                code = %code,
                path = %path.display(),
                "Unique code repeats the previous save; overwriting in place"
            );
        } else if path.exists() {
            return Err(StoreError::new(
                StoreErrorKind::Collision,
                format!("'{}' already exists and belongs to another session", path.display()),
            ));
        }

        fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::io(format!("Failed to create '{}': {}", self.dir.display(), e))
        })?;

        next.unique_code = code;
        next.save_file_path = path.display().to_string();
        let json = serde_json::to_string_pretty(next)?;
        fs::write(&path, json)
            .map_err(|e| StoreError::io(format!("Failed to write '{}': {}", path.display(), e)))?;

        info!(path = %path.display(), move_count = next.move_count, "Session saved");
        Ok(path)
    }

    /// Deletes the previous save unless it is the file just written.
    fn retire_previous(&self, written: &Path) {
        let Some(previous) = self.current_path.as_deref() else {
            return;
        };
        if previous == written {
            return;
        }
        match fs::remove_file(previous) {
            Ok(()) => debug!(path = %previous.display(), "Previous save removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %previous.display(), "Previous save already gone");
            }
            Err(e) => warn!(
                path = %previous.display(),
                cause = %StoreErrorKind::Io,
                error = %e,
                "Failed to remove previous save; both files remain"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::breakthrough::{Coord, initial_board};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn first_tick() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn second_tick() -> DateTime<Utc> {
        first_tick() + chrono::Duration::milliseconds(7)
    }

    fn players() -> [String; 2] {
        ["Ann".to_string(), "Bo".to_string()]
    }

    #[test]
    fn test_unique_code_is_fixed_width_timestamp() {
        let dir = TempDir::new().unwrap();
        let mut store = SaveStore::with_clock(dir.path(), first_tick);
        let session = store
            .start(initial_board(6, 6), players(), FirstMove::White)
            .unwrap();
        assert_eq!(session.unique_code(), "20260301120000000");
        assert_eq!(session.unique_code().len(), 17);
    }

    #[test]
    fn test_interrupted_rotation_leaves_both_files() {
        let dir = TempDir::new().unwrap();
        let mut store = SaveStore::with_clock(dir.path(), first_tick);
        store
            .start(initial_board(6, 6), players(), FirstMove::White)
            .unwrap();

        store.clock = second_tick;
        let mut next = store.session().cloned().unwrap();
        next.move_count += 1;
        next.board
            .set(Coord::new(3, 0), crate::games::breakthrough::Cell::WhitePiece)
            .unwrap();
        let written = store.write_snapshot(&mut next).unwrap();

        // The window between writing the new file and deleting the old one.
        let listed = SaveStore::list_in(dir.path());
        assert_eq!(listed.len(), 2);
        assert_eq!(*listed[0].move_count(), 1);
        assert_eq!(*listed[1].move_count(), 0);

        store.retire_previous(&written);
        let listed = SaveStore::list_in(dir.path());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].unique_code(), "20260301120000007");
    }
}
