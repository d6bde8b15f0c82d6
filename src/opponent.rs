//! The computer player: random, heuristic and minimax tiers.

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::{Board, Mark};
use crate::game::Game;
use crate::rules;

const WIN_SCORE: i32 = 10;
const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];
const EDGES: [usize; 4] = [1, 3, 5, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Random,
    #[default]
    Heuristic,
    Optimal,
}

/// Tuning for the heuristic tier. `block <= soft` keeps blocking ahead of
/// positional preference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicThresholds {
    pub block: f64,
    pub soft: f64,
}

impl HeuristicThresholds {
    /// Clamps both thresholds into `[0, 1]` and lowers `block` to `soft`
    /// when it sits above it.
    pub fn normalized(self) -> Self {
        let clamp = |t: f64| if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let soft = clamp(self.soft);
        let block = clamp(self.block);
        if block > soft {
            warn!("block threshold {} exceeds soft threshold {}, lowering it", block, soft);
        }
        Self {
            block: block.min(soft),
            soft,
        }
    }
}

impl Default for HeuristicThresholds {
    fn default() -> Self {
        Self {
            block: 0.60,
            soft: 0.85,
        }
    }
}

pub struct Opponent<R: Rng = StdRng> {
    rng: R,
    thresholds: HeuristicThresholds,
}

impl Opponent<StdRng> {
    pub fn new(thresholds: HeuristicThresholds) -> Self {
        Self::with_rng(StdRng::from_entropy(), thresholds)
    }
}

impl<R: Rng> Opponent<R> {
    pub fn with_rng(rng: R, thresholds: HeuristicThresholds) -> Self {
        Self {
            rng,
            thresholds: thresholds.normalized(),
        }
    }

    pub fn choose_move(
        &mut self,
        board: &Board,
        mark: Mark,
        opponent_mark: Mark,
        tier: Difficulty,
    ) -> Option<usize> {
        let empties = rules::empty_cells(board);
        if empties.is_empty() {
            return None;
        }

        let choice = match tier {
            Difficulty::Random => empties.choose(&mut self.rng).copied(),
            Difficulty::Heuristic => {
                let r: f64 = self.rng.gen();
                self.heuristic(board, &empties, opponent_mark, r)
            }
            Difficulty::Optimal => best_move(board, mark, opponent_mark),
        };
        debug!("{:?} opponent ({}) chose {:?}", tier, mark, choice);
        choice
    }

    fn heuristic(
        &mut self,
        board: &Board,
        empties: &[usize],
        opponent_mark: Mark,
        r: f64,
    ) -> Option<usize> {
        if r < self.thresholds.block {
            if let Some(block) = rules::immediate_win(board, opponent_mark) {
                return Some(block);
            }
        }
        if r < self.thresholds.soft {
            if let Some(soft) = self.soft_preference(empties) {
                return Some(soft);
            }
        }
        empties.choose(&mut self.rng).copied()
    }

    fn soft_preference(&mut self, empties: &[usize]) -> Option<usize> {
        if empties.contains(&CENTER) {
            return Some(CENTER);
        }
        for group in [CORNERS, EDGES] {
            let open: Vec<usize> = group.into_iter().filter(|i| empties.contains(i)).collect();
            if let Some(&index) = open.choose(&mut self.rng) {
                return Some(index);
            }
        }
        None
    }
}

/// Move with the highest minimax score for `ai`; the lowest action wins ties.
pub fn best_move<G: Game>(state: &G, ai: G::Player, human: G::Player) -> Option<G::Action> {
    let mut best: Option<(i32, G::Action)> = None;
    for action in state.get_available_moves() {
        let score = minimax(&state.play(action, ai), 1, false, ai, human);
        trace!("minimax root {:?} -> {}", action, score);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, action));
        }
    }
    best.map(|(_, action)| action)
}

/// Scores `state` for `ai`: a win is worth `10 - depth`, a loss
/// `depth - 10`, a draw 0. `depth` counts plies below the root.
fn minimax<G: Game>(state: &G, depth: i32, ai_turn: bool, ai: G::Player, human: G::Player) -> i32 {
    match state.check_winner() {
        Some(winner) if winner == ai => return WIN_SCORE - depth,
        Some(_) => return depth - WIN_SCORE,
        None if state.done() => return 0,
        None => {}
    }

    let moves = state.get_available_moves().into_iter();
    if ai_turn {
        moves
            .map(|action| minimax(&state.play(action, ai), depth + 1, false, ai, human))
            .max()
            .unwrap_or(0)
    } else {
        moves
            .map(|action| minimax(&state.play(action, human), depth + 1, true, ai, human))
            .min()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GamePhase;

    fn seeded(seed: u64) -> Opponent<StdRng> {
        Opponent::with_rng(StdRng::seed_from_u64(seed), HeuristicThresholds::default())
    }

    /// Plays out a game from `board`, `to_move` first, each side using its own tier.
    fn play_out(
        opponent: &mut Opponent<StdRng>,
        mut board: Board,
        mut to_move: Mark,
        tier_a: Difficulty,
        tier_b: Difficulty,
    ) -> (Board, usize) {
        let mut placed = 0;
        while !rules::phase(&board).is_terminal() {
            let tier = if to_move == Mark::A { tier_a } else { tier_b };
            let index = opponent
                .choose_move(&board, to_move, to_move.other(), tier)
                .unwrap();
            assert!(board.is_empty_at(index));
            board = board.with(index, to_move);
            to_move = to_move.other();
            placed += 1;
        }
        (board, placed)
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::from_marks(&[0, 1, 5, 6, 8], &[2, 3, 4, 7]);
        let mut opponent = seeded(1);
        for tier in [Difficulty::Random, Difficulty::Heuristic, Difficulty::Optimal] {
            assert_eq!(opponent.choose_move(&board, Mark::B, Mark::A, tier), None);
        }
    }

    #[test]
    fn test_random_picks_empty_cell() {
        let board = Board::from_marks(&[0, 1, 5, 6], &[2, 3, 4]);
        let mut opponent = seeded(7);
        for _ in 0..50 {
            let index = opponent
                .choose_move(&board, Mark::B, Mark::A, Difficulty::Random)
                .unwrap();
            assert!(index == 7 || index == 8);
        }
    }

    #[test]
    fn test_random_vs_random_terminates() {
        for seed in 0..20 {
            let mut opponent = seeded(seed);
            let (board, placed) = play_out(
                &mut opponent,
                Board::new(),
                Mark::A,
                Difficulty::Random,
                Difficulty::Random,
            );
            assert!(placed <= 9);
            assert_eq!(board.moves_made(), placed);
        }
    }

    #[test]
    fn test_heuristic_blocks_below_block_threshold() {
        let board = Board::from_marks(&[0, 1], &[4]);
        let empties = rules::empty_cells(&board);
        let mut opponent = seeded(3);
        assert_eq!(opponent.heuristic(&board, &empties, Mark::A, 0.10), Some(2));
        assert_eq!(opponent.heuristic(&board, &empties, Mark::A, 0.59), Some(2));
    }

    #[test]
    fn test_heuristic_prefers_center_then_corner() {
        let board = Board::from_marks(&[0, 1], &[]);
        let empties = rules::empty_cells(&board);
        let mut opponent = seeded(3);
        // Above the block threshold the open threat at 2 is ignored.
        assert_eq!(opponent.heuristic(&board, &empties, Mark::A, 0.70), Some(CENTER));

        let board = Board::from_marks(&[4], &[]);
        let empties = rules::empty_cells(&board);
        for _ in 0..20 {
            let index = opponent.heuristic(&board, &empties, Mark::A, 0.70).unwrap();
            assert!(CORNERS.contains(&index));
        }

        let board = Board::from_marks(&[0, 4], &[2, 6, 8]);
        let empties = rules::empty_cells(&board);
        let index = opponent.heuristic(&board, &empties, Mark::A, 0.70).unwrap();
        assert!(EDGES.contains(&index));
    }

    #[test]
    fn test_heuristic_falls_through_to_random() {
        let board = Board::from_marks(&[0, 1], &[]);
        let empties = rules::empty_cells(&board);
        let mut opponent = seeded(11);
        for _ in 0..20 {
            let index = opponent.heuristic(&board, &empties, Mark::A, 0.90).unwrap();
            assert!(empties.contains(&index));
        }
    }

    #[test]
    fn test_optimal_blocks_two_in_a_row() {
        let board = Board::from_marks(&[0, 1], &[]);
        let mut opponent = seeded(0);
        assert_eq!(
            opponent.choose_move(&board, Mark::B, Mark::A, Difficulty::Optimal),
            Some(2)
        );
    }

    #[test]
    fn test_optimal_takes_fastest_win() {
        // B can win now at 5, or block at 2; winning immediately scores higher.
        let board = Board::from_marks(&[0, 1, 8], &[3, 4]);
        assert_eq!(best_move(&board, Mark::B, Mark::A), Some(5));
    }

    #[test]
    fn test_optimal_delays_forced_loss() {
        // Every reply loses, but blocking at 6 holds out until the fork at 4.
        let board = Board::from_marks(&[0, 3], &[1]);
        assert_eq!(best_move(&board, Mark::B, Mark::A), Some(6));
    }

    #[test]
    fn test_optimal_ties_go_to_lowest_index() {
        assert_eq!(best_move(&Board::new(), Mark::A, Mark::B), Some(0));
    }

    #[test]
    fn test_with_rng_orders_thresholds() {
        let thresholds = HeuristicThresholds {
            block: 0.9,
            soft: 0.5,
        };
        let mut opponent = Opponent::with_rng(StdRng::seed_from_u64(2), thresholds);
        let board = Board::from_marks(&[0, 1], &[]);
        let empties = rules::empty_cells(&board);
        // Block is lowered to 0.5, so 0.7 skips the threat at 2.
        assert_eq!(opponent.heuristic(&board, &empties, Mark::A, 0.70), Some(CENTER));
        assert_eq!(opponent.heuristic(&board, &empties, Mark::A, 0.40), Some(2));
    }

    #[test]
    fn test_optimal_vs_optimal_draws() {
        let mut opponent = seeded(0);
        let (board, _) = play_out(
            &mut opponent,
            Board::new(),
            Mark::A,
            Difficulty::Optimal,
            Difficulty::Optimal,
        );
        assert_eq!(rules::phase(&board), GamePhase::Drawn);
    }

    /// Tries every reply of the other side and checks `ai` never loses.
    fn assert_never_loses(board: Board, to_move: Mark, ai: Mark) {
        match rules::phase(&board) {
            GamePhase::Won(winner) => assert_eq!(winner, ai, "lost on\n{}", board),
            GamePhase::Drawn => {}
            GamePhase::InProgress if to_move == ai => {
                let index = best_move(&board, ai, ai.other()).unwrap();
                assert_never_loses(board.with(index, ai), ai.other(), ai);
            }
            GamePhase::InProgress => {
                for index in rules::empty_cells(&board) {
                    assert_never_loses(board.with(index, to_move), ai, ai);
                }
            }
        }
    }

    #[test]
    fn test_optimal_second_never_loses() {
        assert_never_loses(Board::new(), Mark::A, Mark::B);
    }

    #[test]
    fn test_optimal_first_never_loses() {
        assert_never_loses(Board::new(), Mark::A, Mark::A);
    }
}
