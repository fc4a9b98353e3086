//! Game rules for Breakthrough.
//!
//! Pure functions over a [`Board`]: turn parity, move generation,
//! move application and win detection. Nothing here mutates its input
//! or touches the filesystem; callers own persisting the results.

use tracing::{debug, instrument};

use super::types::{Board, Cell, Coord, FirstMove, Move, RulesError, Side, Winner};

/// Column offsets a piece may step by: diagonal left, straight, diagonal right.
const COLUMN_OFFSETS: [isize; 3] = [-1, 0, 1];

/// Board produced by a move, with the game result it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The board after the move.
    pub board: Board,
    /// Who won, if the move ended the game.
    pub winner: Winner,
}

/// Returns `true` when white is to move.
///
/// White moves iff `move_count + first_move.flag()` is even.
#[instrument]
pub fn is_white_turn(move_count: u32, first_move: FirstMove) -> bool {
    (u64::from(move_count) + u64::from(first_move.flag())) % 2 == 0
}

/// Returns the side to move.
#[instrument]
pub fn side_to_move(move_count: u32, first_move: FirstMove) -> Side {
    if is_white_turn(move_count, first_move) {
        Side::White
    } else {
        Side::Black
    }
}

/// Lists the cells the piece at `from` may move to.
///
/// Returns an empty list when the cell is off the board, empty, or holds
/// a piece of the side not on turn. Straight steps need an empty target;
/// diagonal steps may land on an empty cell or capture an opposing piece.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board, turn: Side, from: Coord) -> Vec<Coord> {
    if board.get(from) != Some(turn.piece()) {
        return Vec::new();
    }

    let Some(row) = from.row.checked_add_signed(turn.forward()) else {
        return Vec::new();
    };

    let opponent = turn.opponent().piece();
    COLUMN_OFFSETS
        .iter()
        .filter_map(|&offset| {
            let col = from.col.checked_add_signed(offset)?;
            let to = Coord::new(row, col);
            let target = board.get(to)?;
            let allowed = if offset == 0 {
                target == Cell::Empty
            } else {
                target == Cell::Empty || target == opponent
            };
            allowed.then_some(to)
        })
        .collect()
}

/// Applies a move to a copy of the board and evaluates the result.
///
/// The piece at `from` replaces whatever stands on `to` and `from` becomes
/// empty. Termination is checked in order: a piece reaching the far edge,
/// then the opponent having no pieces left. Legality is not checked here;
/// use [`legal_moves`] first.
///
/// # Errors
///
/// Returns [`RulesError`] if either coordinate is off the board, the
/// source cell is empty, or the move ends where it starts.
#[instrument(skip(board, mv), fields(mv = %mv))]
pub fn apply_move(board: &Board, mv: Move) -> Result<MoveOutcome, RulesError> {
    let piece = board.get(mv.from).ok_or(RulesError::OutOfBounds {
        row: mv.from.row,
        col: mv.from.col,
    })?;
    let side = piece.side().ok_or(RulesError::EmptySource {
        row: mv.from.row,
        col: mv.from.col,
    })?;
    if mv.from == mv.to {
        return Err(RulesError::StationaryMove {
            row: mv.from.row,
            col: mv.from.col,
        });
    }

    let mut next = board.clone();
    next.set(mv.to, piece)?;
    next.set(mv.from, Cell::Empty)?;

    let winner = if reached_far_edge(&next, side, mv.to) {
        debug!(?side, "Piece reached the far edge");
        Winner::from(side)
    } else if next.count(side.opponent()) == 0 {
        debug!(?side, "Opponent has no pieces left");
        Winner::from(side)
    } else {
        Winner::None
    };

    Ok(MoveOutcome {
        board: next,
        winner,
    })
}

fn reached_far_edge(board: &Board, side: Side, landed: Coord) -> bool {
    match side {
        Side::White => landed.row == 0,
        Side::Black => landed.row + 1 == board.height(),
    }
}

/// Builds the starting position.
///
/// Rows 0 and 1 hold black pieces, the last two rows white pieces. On
/// boards shorter than four rows the ranges overlap and white wins the
/// overlapping rows.
#[instrument]
pub fn initial_board(height: usize, width: usize) -> Board {
    let mut board = Board::new(height, width);
    let white_from = height.saturating_sub(2);
    for row in 0..height {
        let cell = if row >= white_from {
            Cell::WhitePiece
        } else if row < 2 {
            Cell::BlackPiece
        } else {
            continue;
        };
        for col in 0..width {
            // Coordinates come from the board's own dimensions.
            let _ = board.set(Coord::new(row, col), cell);
        }
    }
    board
}

/// Lists every occupied cell in row-major order.
#[instrument(skip(board))]
pub fn occupied_coordinates(board: &Board) -> Vec<Coord> {
    board
        .iter()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(coord, _)| coord)
        .collect()
}

/// Lists the cells holding pieces of one side in row-major order.
#[instrument(skip(board))]
pub fn pieces_of(board: &Board, side: Side) -> Vec<Coord> {
    let piece = side.piece();
    board
        .iter()
        .filter(|&(_, cell)| cell == piece)
        .map(|(coord, _)| coord)
        .collect()
}
