//! Game core for 3x3 tic-tac-toe with a computer opponent.

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod opponent;
pub mod rules;

pub use board::{Board, BoardState, Cell, Line, Mark, LINES};
pub use config::{GameConfig, Mode};
pub use controller::{ControllerState, GameEvent, MoveResult, ScheduledMove, TurnController};
pub use error::{InvalidMove, UnknownSetting};
pub use game::Game;
pub use opponent::{Difficulty, HeuristicThresholds, Opponent};
pub use rules::{GamePhase, Outcome, TerminalScore};
