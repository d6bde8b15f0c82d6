//! Pure rule checks over a board snapshot.

use crate::board::{Board, Cell, Line, Mark, LINES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    InProgress,
    Won(Mark),
    Drawn,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::InProgress
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GamePhase::InProgress => None,
            GamePhase::Won(mark) => Some(Outcome::Won(mark)),
            GamePhase::Drawn => Some(Outcome::Drawn),
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won(Mark),
    Drawn,
}

/// A finished board seen from one mark's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalScore {
    Win,
    Loss,
    Draw,
}

/// First completed line in [`LINES`] order, if any.
pub fn winning_line(board: &Board) -> Option<Line> {
    LINES.iter().copied().find(|&[a, b, c]| {
        let first = board.get(a);
        first != Some(Cell::Empty) && first == board.get(b) && first == board.get(c)
    })
}

pub fn winner(board: &Board) -> Option<Mark> {
    match winning_line(board).and_then(|[a, _, _]| board.get(a)) {
        Some(Cell::Filled(mark)) => Some(mark),
        _ => None,
    }
}

pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|&cell| cell != Cell::Empty)
}

pub fn empty_cells(board: &Board) -> Vec<usize> {
    board
        .cells()
        .iter()
        .enumerate()
        .filter_map(|(index, &cell)| (cell == Cell::Empty).then_some(index))
        .collect()
}

/// `None` while the game is still open.
pub fn terminal_score(board: &Board, for_mark: Mark) -> Option<TerminalScore> {
    match winner(board) {
        Some(mark) if mark == for_mark => Some(TerminalScore::Win),
        Some(_) => Some(TerminalScore::Loss),
        None if is_full(board) => Some(TerminalScore::Draw),
        None => None,
    }
}

/// Recomputed from the cells on every call; a win takes precedence over a
/// full board.
pub fn phase(board: &Board) -> GamePhase {
    match winner(board) {
        Some(mark) => GamePhase::Won(mark),
        None if is_full(board) => GamePhase::Drawn,
        None => GamePhase::InProgress,
    }
}

/// Lowest empty index that would complete a line for `mark`.
pub fn immediate_win(board: &Board, mark: Mark) -> Option<usize> {
    empty_cells(board)
        .into_iter()
        .find(|&index| terminal_score(&board.with(index, mark), mark) == Some(TerminalScore::Win))
}
