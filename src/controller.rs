//! Turn sequencing. `reset` bumps a generation counter so computer moves
//! scheduled for an earlier board are dropped.

use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Board, BoardState, Mark};
use crate::config::{GameConfig, Mode};
use crate::error::InvalidMove;
use crate::opponent::Opponent;
use crate::rules::{GamePhase, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingHumanMove,
    AwaitingOpponentMove,
    Terminal(GamePhase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub accepted: bool,
    pub phase: GamePhase,
    pub board: Board,
    pub rejection: Option<InvalidMove>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted { first: Mark },
    MoveApplied { index: usize, mark: Mark, board: Board },
    TurnChanged { mark: Mark },
    OpponentThinking { mark: Mark },
    GameEnded { outcome: Outcome },
}

/// A pending computer move, valid only for the generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledMove {
    generation: u64,
    due: Instant,
}

impl ScheduledMove {
    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct TurnController<R: Rng = StdRng> {
    config: GameConfig,
    board: BoardState,
    current: Mark,
    state: ControllerState,
    opponent: Opponent<R>,
    generation: u64,
    pending: Option<ScheduledMove>,
    events: Vec<GameEvent>,
}

impl TurnController<StdRng> {
    pub fn new_game(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> TurnController<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let opponent = Opponent::with_rng(rng, config.thresholds);
        let mut controller = Self {
            current: config.first_mark,
            config,
            board: BoardState::new(),
            state: ControllerState::AwaitingHumanMove,
            opponent,
            generation: 0,
            pending: None,
            events: Vec::new(),
        };
        controller.start();
        controller
    }

    /// Throws the current board away and starts over with the same config.
    /// Any scheduled computer move from before the reset becomes stale.
    pub fn reset(&mut self) {
        info!("resetting game (generation {})", self.generation);
        self.start();
    }

    fn start(&mut self) {
        self.generation += 1;
        self.board = BoardState::new();
        self.current = self.config.first_mark;
        self.pending = None;
        info!(
            "new {:?} game, {:?} difficulty, {} moves first",
            self.config.mode, self.config.difficulty, self.current
        );
        self.events.push(GameEvent::GameStarted {
            first: self.current,
        });
        self.await_turn();
    }

    pub fn request_move(&mut self, index: usize) -> MoveResult {
        let outcome = match self.state {
            ControllerState::Terminal(_) => Err(InvalidMove::GameOver),
            ControllerState::AwaitingOpponentMove => Err(InvalidMove::NotYourTurn),
            ControllerState::AwaitingHumanMove => self.apply(index),
        };
        if let Err(err) = outcome {
            debug!("rejected move at {}: {}", index, err);
        }
        self.result(outcome.err())
    }

    /// Plays the scheduled computer move. Returns `None` when the ticket is
    /// stale or already used, or the game no longer awaits the computer.
    pub fn fire(&mut self, ticket: ScheduledMove) -> Option<MoveResult> {
        if ticket.generation != self.generation || self.pending != Some(ticket) {
            debug!(
                "dropping stale opponent move (generation {}, current {})",
                ticket.generation, self.generation
            );
            return None;
        }
        self.pending = None;
        if self.state != ControllerState::AwaitingOpponentMove {
            return None;
        }

        let snapshot = self.board.snapshot();
        let index = self.opponent.choose_move(
            &snapshot,
            self.current,
            self.current.other(),
            self.config.difficulty,
        )?;
        let outcome = self.apply(index);
        if let Err(err) = outcome {
            warn!("opponent chose an illegal move at {}: {}", index, err);
        }
        Some(self.result(outcome.err()))
    }

    /// Fires the pending computer move if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<MoveResult> {
        match self.pending {
            Some(ticket) if now >= ticket.due => self.fire(ticket),
            _ => None,
        }
    }

    fn apply(&mut self, index: usize) -> Result<(), InvalidMove> {
        let mark = self.current;
        let board = self.board.place(index, mark)?;
        debug!("{} played {}\n{}", mark, index, board);
        self.events.push(GameEvent::MoveApplied { index, mark, board });

        let phase = self.board.phase();
        if let Some(outcome) = phase.outcome() {
            info!("game over: {:?}", outcome);
            self.state = ControllerState::Terminal(phase);
            self.pending = None;
            self.events.push(GameEvent::GameEnded { outcome });
        } else {
            self.current = mark.other();
            self.events.push(GameEvent::TurnChanged { mark: self.current });
            self.await_turn();
        }
        Ok(())
    }

    fn await_turn(&mut self) {
        if self.is_computer(self.current) {
            self.state = ControllerState::AwaitingOpponentMove;
            self.pending = Some(ScheduledMove {
                generation: self.generation,
                due: Instant::now() + self.config.think_delay,
            });
            self.events.push(GameEvent::OpponentThinking { mark: self.current });
        } else {
            self.state = ControllerState::AwaitingHumanMove;
        }
    }

    fn is_computer(&self, mark: Mark) -> bool {
        self.config.mode == Mode::Solo && mark == Mark::B
    }

    fn result(&self, rejection: Option<InvalidMove>) -> MoveResult {
        MoveResult {
            accepted: rejection.is_none(),
            phase: self.board.phase(),
            board: self.board.snapshot(),
            rejection,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.board.phase()
    }

    pub fn board(&self) -> Board {
        self.board.snapshot()
    }

    pub fn current_mark(&self) -> Mark {
        self.current
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scheduled(&self) -> Option<ScheduledMove> {
        self.pending
    }

    /// Takes every event emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whose turn it is, phrased for a status line.
    pub fn turn_label(&self) -> String {
        match self.config.mode {
            Mode::Solo if self.is_computer(self.current) => "Computer's".to_owned(),
            Mode::Solo => "Your".to_owned(),
            Mode::TwoHuman => format!("{}'s", self.current),
        }
    }
}
