//! Key bindings for cursor navigation.

use crossterm::event::KeyCode;
use tracing::instrument;

use crate::games::breakthrough::{Coord, Direction, next_index};

/// Maps a key to a cursor direction.
///
/// Arrow keys, `WASD` and `hjkl` are recognised, in either case.
#[instrument]
pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'a' | 'h' => Some(Direction::Left),
            'd' | 'l' => Some(Direction::Right),
            'w' | 'k' => Some(Direction::Up),
            's' | 'j' => Some(Direction::Down),
            _ => None,
        },
        _ => None,
    }
}

/// Moves the cursor over `candidates` according to a key press.
///
/// Keys without a direction leave the cursor where it is.
#[instrument(skip(candidates))]
pub fn move_cursor(candidates: &[Coord], cursor: usize, key: KeyCode) -> usize {
    match direction_for_key(key) {
        Some(direction) => next_index(candidates, cursor, direction),
        None => cursor,
    }
}
