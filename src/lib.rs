//! Strictly Breakthrough - a Breakthrough rules engine with durable sessions
//!
//! Two sides race their pieces to the opposite edge, capturing diagonally.
//! The game ends when a piece reaches the far edge or one side has no
//! pieces left.
//!
//! # Architecture
//!
//! - **Rules**: pure move generation, move application and win detection
//! - **Navigator**: directional cursor search over a sparse set of cells
//! - **Saves**: one game persisted as rotating timestamp-named JSON files
//! - **Statistics**: wins per player and shortest/longest game in one file
//! - **Session**: ties the above together for a single active game
//!
//! # Example
//!
//! ```no_run
//! use strictly_breakthrough::{
//!     AppConfig, Coord, FirstMove, Move, SaveStore, Session, StatisticsStore,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AppConfig::new("game_data");
//! let mut session = Session::start(
//!     SaveStore::new(config.saves_dir()),
//!     StatisticsStore::new(config.statistics_path()),
//!     8,
//!     8,
//!     ["Ann".to_string(), "Bo".to_string()],
//!     FirstMove::White,
//! )?;
//! session.play(Move::new(Coord::new(6, 3), Coord::new(5, 3)))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod input;
mod session;
mod store;

// Crate-level exports - Configuration
pub use config::{
    AppConfig, ConfigError, FirstMoveOption, MAX_BOARD_SIZE, MIN_BOARD_SIZE, SAVES_DIR_NAME,
    STATISTICS_FILE_NAME, resolve_base_dir,
};

// Crate-level exports - Rules engine and navigator
pub use games::breakthrough::{
    Board, Cell, Coord, Direction, FirstMove, Move, MoveOutcome, RulesError, Side, Winner,
    apply_move, initial_board, is_white_turn, legal_moves, next_index, occupied_coordinates,
    pieces_of, side_to_move,
};

// Crate-level exports - Key bindings
pub use input::{direction_for_key, move_cursor};

// Crate-level exports - Persistence
pub use store::{
    Clock, GameSession, SAVE_EXTENSION, SaveStore, Statistics, StatisticsStore, StoreError,
    StoreErrorKind, UNDETERMINED, UNIQUE_CODE_FORMAT,
};

// Crate-level exports - Session
pub use session::{Phase, PlayResult, Session, SessionError};
