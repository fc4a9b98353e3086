//! Persistence error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Broad cause of a persistence failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// Data is well-formed JSON but not a valid game (missing field, bad
    /// cell code, store used before a game was started).
    #[display("structural")]
    Structural,
    /// The filesystem refused a read, write or delete.
    #[display("io")]
    Io,
    /// The file is not JSON (includes empty files).
    #[display("parse")]
    Parse,
    /// A new unique code names a file belonging to another session.
    #[display("collision")]
    Collision,
}

/// Persistence error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// What went wrong.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`StoreErrorKind::Structural`] error.
    #[track_caller]
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Structural, message)
    }

    /// Shorthand for a [`StoreErrorKind::Io`] error.
    #[track_caller]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Io, message)
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let kind = match err.classify() {
            Category::Io => StoreErrorKind::Io,
            Category::Syntax | Category::Eof => StoreErrorKind::Parse,
            Category::Data => StoreErrorKind::Structural,
        };
        Self::new(kind, format!("JSON error: {}", err))
    }
}
