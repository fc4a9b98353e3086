//! Breakthrough: pieces race to the far edge, capturing diagonally.

mod navigator;
mod rules;
mod types;

pub use navigator::{Direction, next_index};
pub use rules::{
    MoveOutcome, apply_move, initial_board, is_white_turn, legal_moves, occupied_coordinates,
    pieces_of, side_to_move,
};
pub use types::{Board, Cell, Coord, FirstMove, Move, RulesError, Side, Winner};
