//! Application configuration: data directory, board size, opening side.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::breakthrough::FirstMove;

/// Smallest board dimension offered to players.
pub const MIN_BOARD_SIZE: usize = 6;

/// Largest board dimension offered to players.
pub const MAX_BOARD_SIZE: usize = 16;

/// Name of the save subdirectory under the base directory.
pub const SAVES_DIR_NAME: &str = "Saves";

/// Name of the statistics file under the base directory.
pub const STATISTICS_FILE_NAME: &str = "statistics.json";

/// Opening-side choice offered before a game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum FirstMoveOption {
    /// White opens.
    #[default]
    White,
    /// Black opens.
    Black,
    /// A coin flip decides.
    Random,
}

impl FirstMoveOption {
    /// Returns the display label for this option.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
            Self::Random => "Random",
        }
    }

    /// Resolves the option to a concrete opening side.
    #[instrument(skip(rng))]
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> FirstMove {
        match self {
            Self::White => FirstMove::White,
            Self::Black => FirstMove::Black,
            Self::Random => {
                if rng.gen_bool(0.5) {
                    FirstMove::White
                } else {
                    FirstMove::Black
                }
            }
        }
    }
}

impl std::str::FromStr for FirstMoveOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            "random" => Ok(Self::Random),
            other => Err(format!("Expected white, black or random, got '{}'", other)),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the `Saves` folder and the statistics file.
    #[serde(default = "AppConfig::default_base_dir")]
    base_dir: PathBuf,

    /// Rows on a new board.
    #[serde(default = "default_board_size")]
    board_height: usize,

    /// Columns on a new board.
    #[serde(default = "default_board_size")]
    board_width: usize,

    /// Who opens a new game.
    #[serde(default)]
    first_move: FirstMoveOption,
}

#[instrument]
fn default_board_size() -> usize {
    8
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(Self::default_base_dir())
    }
}

impl AppConfig {
    /// Creates a configuration with default board settings rooted at `base_dir`.
    #[instrument(skip(base_dir), fields(base_dir = %base_dir.as_ref().display()))]
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            board_height: default_board_size(),
            board_width: default_board_size(),
            first_move: FirstMoveOption::default(),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// board size is out of range.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(base_dir = %config.base_dir.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Overrides the board size.
    #[instrument(skip(self))]
    pub fn with_board_size(mut self, height: usize, width: usize) -> Self {
        self.board_height = height;
        self.board_width = width;
        self
    }

    /// Overrides the opening side.
    #[instrument(skip(self))]
    pub fn with_first_move(mut self, first_move: FirstMoveOption) -> Self {
        self.first_move = first_move;
        self
    }

    /// Checks the board size against the supported range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either dimension is outside
    /// [`MIN_BOARD_SIZE`]..=[`MAX_BOARD_SIZE`].
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("height", self.board_height), ("width", self.board_width)] {
            if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&value) {
                return Err(ConfigError::new(format!(
                    "Board {} {} outside {}..={}",
                    name, value, MIN_BOARD_SIZE, MAX_BOARD_SIZE
                )));
            }
        }
        Ok(())
    }

    /// Directory holding save files.
    #[instrument(skip(self))]
    pub fn saves_dir(&self) -> PathBuf {
        self.base_dir.join(SAVES_DIR_NAME)
    }

    /// Path of the statistics file.
    #[instrument(skip(self))]
    pub fn statistics_path(&self) -> PathBuf {
        self.base_dir.join(STATISTICS_FILE_NAME)
    }

    /// Returns the default base directory.
    ///
    /// Resolution order:
    /// 1. `$STRICTLY_BREAKTHROUGH_HOME`
    /// 2. `$XDG_DATA_HOME/strictly_breakthrough`
    /// 3. `./strictly_breakthrough_data`
    #[instrument]
    pub fn default_base_dir() -> PathBuf {
        resolve_base_dir(
            std::env::var("STRICTLY_BREAKTHROUGH_HOME").ok(),
            std::env::var("XDG_DATA_HOME").ok(),
        )
    }
}

/// Applies the base directory resolution order to already-read variables.
#[instrument]
pub fn resolve_base_dir(home: Option<String>, xdg_data_home: Option<String>) -> PathBuf {
    if let Some(dir) = home {
        debug!(path = %dir, "Using STRICTLY_BREAKTHROUGH_HOME env var");
        return PathBuf::from(dir);
    }

    if let Some(xdg) = xdg_data_home {
        let dir = PathBuf::from(xdg).join("strictly_breakthrough");
        debug!(path = %dir.display(), "Using XDG_DATA_HOME path");
        return dir;
    }

    debug!("Falling back to ./strictly_breakthrough_data");
    PathBuf::from("strictly_breakthrough_data")
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
