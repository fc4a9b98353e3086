//! Command-line interface for strictly_breakthrough.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strictly_breakthrough::{Coord, FirstMoveOption};

/// Strictly Breakthrough - race your pieces to the far edge
#[derive(Parser, Debug)]
#[command(name = "strictly_breakthrough")]
#[command(about = "Breakthrough with durable saves and statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game and save it
    New {
        /// Name of the white player
        #[arg(long)]
        white: String,

        /// Name of the black player
        #[arg(long)]
        black: String,

        /// Who moves first: white, black or random
        #[arg(long)]
        first: Option<FirstMoveOption>,

        /// Board rows
        #[arg(long)]
        height: Option<usize>,

        /// Board columns
        #[arg(long)]
        width: Option<usize>,
    },

    /// List saved games, newest first
    Saves,

    /// Print a saved board
    Show {
        /// Unique code of the save (newest if omitted)
        #[arg(long)]
        code: Option<String>,
    },

    /// Play one move in a saved game
    Play {
        /// Cell to move from, as ROW,COL
        from: Coord,

        /// Cell to move to, as ROW,COL
        to: Coord,

        /// Unique code of the save (newest if omitted)
        #[arg(long)]
        code: Option<String>,
    },

    /// Show win counts and game length records
    Stats,
}
