//! Persistence for in-progress games and cross-game statistics.

mod error;
mod save;
mod stats;

pub use error::{StoreError, StoreErrorKind};
pub use save::{Clock, GameSession, SAVE_EXTENSION, SaveStore, UNIQUE_CODE_FORMAT};
pub use stats::{Statistics, StatisticsStore, UNDETERMINED};
