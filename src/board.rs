use std::fmt;

use crate::error::InvalidMove;
use crate::rules::{self, GamePhase};

pub const CELLS: usize = 9;

/// An index triple that wins when all three cells hold the same mark.
pub type Line = [usize; 3];

/// Rows, then columns, then the two diagonals.
pub const LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    A,
    B,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::A => Mark::B,
            Mark::B => Mark::A,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mark::A => write!(f, "X"),
            Mark::B => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Filled(Mark),
}

/// Immutable 3x3 snapshot, indices 0-8 in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    /// Builds a board from the indices each mark occupies. Overlapping or
    /// out-of-range indices are ignored.
    pub fn from_marks(a: &[usize], b: &[usize]) -> Self {
        let mut board = Self::new();
        for (indices, mark) in [(a, Mark::A), (b, Mark::B)] {
            for &index in indices {
                if board.get(index) == Some(Cell::Empty) {
                    board.cells[index] = Cell::Filled(mark);
                }
            }
        }
        board
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index) == Some(Cell::Empty)
    }

    pub fn moves_made(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != Cell::Empty).count()
    }

    /// Returns a copy of this board with `mark` written at `index`.
    ///
    /// Search code uses this to explore children without touching the
    /// authoritative [`BoardState`]; callers must pass an empty index.
    pub(crate) fn with(&self, index: usize, mark: Mark) -> Self {
        debug_assert!(self.is_empty_at(index));
        let mut next = *self;
        next.cells[index] = Cell::Filled(mark);
        next
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(3) {
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, ". ")?,
                    Cell::Filled(mark) => write!(f, "{} ", mark)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The authoritative, mutable board of one game.
///
/// `place` is the only way to change it. Once the board is won or full
/// every further placement is rejected until a fresh state is created.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    board: Board,
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
        }
    }

    pub fn place(&mut self, index: usize, mark: Mark) -> Result<Board, InvalidMove> {
        if index >= CELLS {
            return Err(InvalidMove::OutOfRange(index));
        }
        if rules::phase(&self.board) != GamePhase::InProgress {
            return Err(InvalidMove::GameOver);
        }
        if !self.board.is_empty_at(index) {
            return Err(InvalidMove::Occupied(index));
        }

        self.board.cells[index] = Cell::Filled(mark);
        Ok(self.board)
    }

    pub fn snapshot(&self) -> Board {
        self.board
    }

    pub fn phase(&self) -> GamePhase {
        rules::phase(&self.board)
    }
}
