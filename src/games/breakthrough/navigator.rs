//! Directional cursor movement over a sparse set of board cells.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::types::Coord;

/// Direction of a cursor step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Direction {
    /// Toward column 0, staying in the row.
    Left,
    /// Toward the last column, staying in the row.
    Right,
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
}

/// Computes the cursor index reached by stepping in `direction`.
///
/// `candidates` is the list of selectable cells in any order and
/// `current` indexes into it. Left and right stay in the current row and
/// pick the nearest cell strictly past the cursor; up and down pick the
/// first listed cell of the nearest row strictly past the cursor. When
/// nothing lies ahead the cursor goes to the extreme cell in the requested
/// direction: the rightmost cell of the row for `Right`, the leftmost for
/// `Left`, the bottom row for `Down` and the top row for `Up`. Ties go to
/// the earliest candidate.
///
/// Returns `current` unchanged when there is nowhere else to go or when
/// `current` is not a valid index.
#[instrument(skip(candidates), fields(candidates = candidates.len()))]
pub fn next_index(candidates: &[Coord], current: usize, direction: Direction) -> usize {
    let Some(&origin) = candidates.get(current) else {
        debug!(current, "Cursor index outside candidate list");
        return current;
    };
    if candidates.len() < 2 {
        return current;
    }

    let same_row = |c: &Coord| c.row == origin.row;

    let found = match direction {
        Direction::Right => nearest(candidates, |c| {
            (same_row(c) && c.col > origin.col).then(|| c.col - origin.col)
        })
        .or_else(|| nearest(candidates, |c| same_row(c).then(|| usize::MAX - c.col))),
        Direction::Left => nearest(candidates, |c| {
            (same_row(c) && c.col < origin.col).then(|| origin.col - c.col)
        })
        .or_else(|| nearest(candidates, |c| same_row(c).then_some(c.col))),
        Direction::Down => nearest(candidates, |c| {
            (c.row > origin.row).then(|| c.row - origin.row)
        })
        .or_else(|| nearest(candidates, |c| Some(usize::MAX - c.row))),
        Direction::Up => nearest(candidates, |c| {
            (c.row < origin.row).then(|| origin.row - c.row)
        })
        .or_else(|| nearest(candidates, |c| Some(c.row))),
    };

    let next = found.unwrap_or(current);
    debug!(current, next, %direction, "Cursor moved");
    next
}

/// Index of the first candidate with the smallest distance.
///
/// Candidates for which `distance` yields `None` are not eligible.
fn nearest(candidates: &[Coord], distance: impl Fn(&Coord) -> Option<usize>) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(d) = distance(candidate) else {
            continue;
        };
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((index, d));
        }
    }
    best.map(|(index, _)| index)
}
