use std::hash::Hash;

use crate::board::{Board, Mark};
use crate::rules;

/// What a game-tree search needs from a position.
pub trait Game: Copy + std::fmt::Display {
    type Action: std::fmt::Debug + Hash + PartialEq + Eq + Copy;
    type Player: PartialEq + std::fmt::Debug + Copy;

    /// The position after `player` takes `action`; `self` is left untouched.
    fn play(&self, action: Self::Action, player: Self::Player) -> Self;

    fn get_available_moves(&self) -> Vec<Self::Action>;

    fn done(&self) -> bool;

    fn check_winner(&self) -> Option<Self::Player>;
}

impl Game for Board {
    type Action = usize;
    type Player = Mark;

    fn play(&self, action: usize, player: Mark) -> Self {
        self.with(action, player)
    }

    fn get_available_moves(&self) -> Vec<usize> {
        rules::empty_cells(self)
    }

    fn done(&self) -> bool {
        rules::phase(self).is_terminal()
    }

    fn check_winner(&self) -> Option<Mark> {
        rules::winner(self)
    }
}
