//! Strictly Breakthrough - Unified CLI
//!
//! Plays Breakthrough one command at a time against the save directory.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use strictly_breakthrough::{
    AppConfig, Coord, FirstMoveOption, GameSession, Move, PlayResult, SaveStore, Session,
    StatisticsStore,
};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    debug!(?config, "Configuration resolved");

    match cli.command {
        Command::New {
            white,
            black,
            first,
            height,
            width,
        } => run_new(config, white, black, first, height, width),
        Command::Saves => run_saves(&config),
        Command::Show { code } => run_show(&config, code),
        Command::Play { from, to, code } => run_play(&config, from, to, code),
        Command::Stats => run_stats(&config),
    }
}

/// Start a new game
#[instrument(skip(config))]
fn run_new(
    config: AppConfig,
    white: String,
    black: String,
    first: Option<FirstMoveOption>,
    height: Option<usize>,
    width: Option<usize>,
) -> Result<()> {
    let height = height.unwrap_or(*config.board_height());
    let width = width.unwrap_or(*config.board_width());
    let first = first.unwrap_or(*config.first_move());
    let config = config.with_board_size(height, width).with_first_move(first);
    config.validate()?;

    let first_move = config.first_move().resolve(&mut rand::thread_rng());
    let session = Session::start(
        SaveStore::new(config.saves_dir()),
        StatisticsStore::new(config.statistics_path()),
        height,
        width,
        [white, black],
        first_move,
    )?;

    info!(
        code = %session.game().unique_code(),
        first = config.first_move().label(),
        "Game created"
    );
    println!("Saved as {}", session.game().unique_code());
    println!("First move: {} ({:?} opens)", config.first_move().label(), first_move);
    print_game(session.game());
    Ok(())
}

/// List saved games
#[instrument(skip(config))]
fn run_saves(config: &AppConfig) -> Result<()> {
    let sessions = SaveStore::list_in(config.saves_dir());
    if sessions.is_empty() {
        println!("No saved games.");
        return Ok(());
    }
    for game in &sessions {
        println!(
            "{}  {} (white) vs {} (black)  move {}  {:?} to move",
            game.unique_code(),
            game.players()[0],
            game.players()[1],
            game.move_count(),
            game.side_to_move(),
        );
    }
    Ok(())
}

/// Print one saved game
#[instrument(skip(config))]
fn run_show(config: &AppConfig, code: Option<String>) -> Result<()> {
    let game = find_game(config, code.as_deref())?;
    print_game(&game);
    Ok(())
}

/// Play a move in a saved game
#[instrument(skip(config))]
fn run_play(config: &AppConfig, from: Coord, to: Coord, code: Option<String>) -> Result<()> {
    let game = find_game(config, code.as_deref())?;
    let mut session = Session::resume(
        config.saves_dir(),
        StatisticsStore::new(config.statistics_path()),
        game,
    );

    match session.play(Move::new(from, to))? {
        PlayResult::Rejected => {
            let options = session.legal_moves(from);
            if options.is_empty() {
                bail!("{:?} has no piece with moves at {}", session.side_to_move(), from);
            }
            let options: Vec<String> = options.iter().map(Coord::to_string).collect();
            bail!("Illegal move; {} can go to: {}", from, options.join("  "));
        }
        PlayResult::Continue => {
            println!("Saved as {}", session.game().unique_code());
            print_game(session.game());
        }
        PlayResult::Won { side, name, moves } => {
            println!("{}", session.board().display());
            println!("{} ({:?}) wins after {} moves!", name, side, moves);
        }
    }
    Ok(())
}

/// Print statistics
#[instrument(skip(config))]
fn run_stats(config: &AppConfig) -> Result<()> {
    let stats = StatisticsStore::new(config.statistics_path()).load();
    if stats.player_wins().is_empty() {
        println!("No completed games yet.");
    }
    for (name, wins) in stats.player_wins() {
        println!("{:<20} {}", name, wins);
    }
    println!("Best player:   {}", stats.best_player());
    println!("Shortest game: {}", format_moves(*stats.shortest_game()));
    println!("Longest game:  {}", format_moves(*stats.longest_game()));
    Ok(())
}

fn find_game(config: &AppConfig, code: Option<&str>) -> Result<GameSession> {
    let mut sessions = SaveStore::list_in(config.saves_dir()).into_iter();
    match code {
        Some(code) => sessions
            .find(|game| game.unique_code() == code)
            .with_context(|| format!("No saved game with code {}", code)),
        None => sessions.next().context("No saved games"),
    }
}

fn print_game(game: &GameSession) {
    println!(
        "{} (white) vs {} (black), move {}, {:?} to move",
        game.players()[0],
        game.players()[1],
        game.move_count(),
        game.side_to_move()
    );
    println!("{}", game.board().display());
}

fn format_moves(moves: Option<u32>) -> String {
    moves.map_or_else(|| "-".to_string(), |m| format!("{} moves", m))
}
