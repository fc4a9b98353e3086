//! Core domain types for Breakthrough.

use std::str::FromStr;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Side {
    /// White advances toward row 0.
    White,
    /// Black advances toward the last row.
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Returns the cell value holding one of this side's pieces.
    pub fn piece(self) -> Cell {
        match self {
            Side::White => Cell::WhitePiece,
            Side::Black => Cell::BlackPiece,
        }
    }

    /// Row delta of a forward step.
    pub fn forward(self) -> isize {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }
}

/// State of a single board cell.
///
/// Serialized as `0` (empty), `1` (white) or `2` (black).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    /// No piece.
    #[default]
    Empty,
    /// A white piece.
    WhitePiece,
    /// A black piece.
    BlackPiece,
}

impl Cell {
    /// Returns the side owning the piece in this cell, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::WhitePiece => Some(Side::White),
            Cell::BlackPiece => Some(Side::Black),
        }
    }

    /// Checks if the cell holds no piece.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl TryFrom<u8> for Cell {
    type Error = RulesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::WhitePiece),
            2 => Ok(Cell::BlackPiece),
            other => Err(RulesError::UnknownCellCode(other)),
        }
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::WhitePiece => 1,
            Cell::BlackPiece => 2,
        }
    }
}

/// Which side makes the first move of a game.
///
/// Serialized as `0` (white first) or `1` (black first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FirstMove {
    /// White opens.
    #[default]
    White,
    /// Black opens.
    Black,
}

impl FirstMove {
    /// Parity offset added to the move count when deciding whose turn it is.
    pub fn flag(self) -> u32 {
        match self {
            FirstMove::White => 0,
            FirstMove::Black => 1,
        }
    }
}

impl TryFrom<u8> for FirstMove {
    type Error = RulesError;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            0 => Ok(FirstMove::White),
            1 => Ok(FirstMove::Black),
            other => Err(RulesError::UnknownFirstMove(other)),
        }
    }
}

impl From<FirstMove> for u8 {
    fn from(first: FirstMove) -> Self {
        match first {
            FirstMove::White => 0,
            FirstMove::Black => 1,
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_new::new)]
pub struct Coord {
    /// Row index, 0 is the top (black's home row).
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = String;

    /// Parses `"row,col"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected ROW,COL but got '{}'", s))?;
        let row = row
            .trim()
            .parse()
            .map_err(|e| format!("Invalid row '{}': {}", row, e))?;
        let col = col
            .trim()
            .parse()
            .map_err(|e| format!("Invalid column '{}': {}", col, e))?;
        Ok(Self { row, col })
    }
}

/// A move of one piece from one cell to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new)]
pub struct Move {
    /// Cell the piece leaves.
    pub from: Coord,
    /// Cell the piece lands on.
    pub to: Coord,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) -> ({})", self.from, self.to)
    }
}

/// Result of applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    /// The game continues.
    None,
    /// White has won.
    White,
    /// Black has won.
    Black,
}

impl Winner {
    /// Returns the winning side, if the game is over.
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::None => None,
            Winner::White => Some(Side::White),
            Winner::Black => Some(Side::Black),
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Winner::White,
            Side::Black => Winner::Black,
        }
    }
}

/// Errors raised by the rules engine on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RulesError {
    /// A coordinate lies outside the board.
    #[display("Coordinate ({}, {}) is outside the board", row, col)]
    OutOfBounds {
        /// Row of the offending coordinate.
        row: usize,
        /// Column of the offending coordinate.
        col: usize,
    },

    /// A move starts from a cell without a piece.
    #[display("No piece at ({}, {})", row, col)]
    EmptySource {
        /// Row of the empty source cell.
        row: usize,
        /// Column of the empty source cell.
        col: usize,
    },

    /// A move ends on the cell it starts from.
    #[display("Move from ({}, {}) to itself", row, col)]
    StationaryMove {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
    },

    /// A serialized matrix row does not match the board width.
    #[display("Matrix row {} has {} cells, expected {}", row, found, expected)]
    RaggedMatrix {
        /// Index of the offending row.
        row: usize,
        /// Width taken from the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// A serialized cell holds an unknown integer.
    #[display("Unknown cell code {}", _0)]
    UnknownCellCode(#[error(not(source))] u8),

    /// A serialized first-move flag holds an unknown integer.
    #[display("Unknown first move flag {}", _0)]
    UnknownFirstMove(#[error(not(source))] u8),
}

/// Fixed-size Breakthrough board stored as a flat row-major buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board of the given dimensions.
    #[instrument]
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Checks if the coordinate lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row * self.width + coord.col)
    }

    /// Gets the cell at the coordinate, or `None` when out of bounds.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Sets the cell at the coordinate.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> Result<(), RulesError> {
        let i = self.index(coord).ok_or(RulesError::OutOfBounds {
            row: coord.row,
            col: coord.col,
        })?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Counts the pieces belonging to a side.
    pub fn count(&self, side: Side) -> usize {
        let piece = side.piece();
        self.cells.iter().filter(|&&c| c == piece).count()
    }

    /// Iterates over all cells with their coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Coord::new(i / width, i % width), cell))
    }

    /// Returns the board as one vector per row.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        if self.width == 0 {
            return vec![Vec::new(); self.height];
        }
        self.cells.chunks(self.width).map(<[Cell]>::to_vec).collect()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// `W` and `B` mark pieces, `.` an empty cell. Row and column numbers
    /// are printed along the edges.
    pub fn display(&self) -> String {
        let mut result = String::from("   ");
        for col in 0..self.width {
            result.push_str(&format!("{:>3}", col));
        }
        result.push('\n');
        for (row, cells) in self.rows().iter().enumerate() {
            result.push_str(&format!("{:>3}", row));
            for cell in cells {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::WhitePiece => 'W',
                    Cell::BlackPiece => 'B',
                };
                result.push_str(&format!("{:>3}", symbol));
            }
            result.push('\n');
        }
        result
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = RulesError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(height * width);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(RulesError::RaggedMatrix {
                    row,
                    expected: width,
                    found: cells_in_row.len(),
                });
            }
            cells.extend(cells_in_row);
        }
        Ok(Self {
            height,
            width,
            cells,
        })
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}
