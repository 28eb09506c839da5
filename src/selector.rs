use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::config::SelectionPolicy;
use crate::types::{LegalMoves, Move};

/// Picks the automated player's move from the current legal set.
pub trait MoveSelector: Send {
    fn select_move<'a>(&mut self, board: &Board, legal: &'a LegalMoves) -> Option<&'a Move>;
}

/// Always the first legal move in row-major order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalMoveSelector;

impl MoveSelector for FirstLegalMoveSelector {
    fn select_move<'a>(&mut self, _board: &Board, legal: &'a LegalMoves) -> Option<&'a Move> {
        legal.first()
    }
}

/// Uniform pick from a seeded generator; the same seed replays the same game.
#[derive(Debug, Clone)]
pub struct RandomMoveSelector {
    rng: ChaCha8Rng,
}

impl RandomMoveSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl MoveSelector for RandomMoveSelector {
    fn select_move<'a>(&mut self, _board: &Board, legal: &'a LegalMoves) -> Option<&'a Move> {
        if legal.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..legal.len());
        legal.as_slice().get(idx)
    }
}

pub fn selector_for(policy: SelectionPolicy) -> Box<dyn MoveSelector> {
    match policy {
        SelectionPolicy::First => Box::new(FirstLegalMoveSelector),
        SelectionPolicy::Random { seed } => Box::new(RandomMoveSelector::new(seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Position};

    #[test]
    fn first_selector_takes_scan_order_head() {
        let board = Board::standard();
        let legal = board.find_legal_moves(Player::Player1);

        let mv = FirstLegalMoveSelector.select_move(&board, &legal).unwrap();

        assert_eq!(mv.position, Position::new(3, 2));
    }

    #[test]
    fn random_selector_only_returns_legal_moves() {
        let board = Board::standard();
        let legal = board.find_legal_moves(Player::Player1);
        let mut selector = RandomMoveSelector::new(42);

        for _ in 0..32 {
            let mv = selector.select_move(&board, &legal).unwrap();
            assert!(legal.get(mv.position).is_some());
        }
    }

    #[test]
    fn random_selector_is_reproducible_per_seed() {
        let board = Board::standard();
        let legal = board.find_legal_moves(Player::Player1);
        let mut a = RandomMoveSelector::new(9);
        let mut b = RandomMoveSelector::new(9);

        for _ in 0..16 {
            assert_eq!(
                a.select_move(&board, &legal).map(|mv| mv.position),
                b.select_move(&board, &legal).map(|mv| mv.position)
            );
        }
    }

    #[test]
    fn selectors_yield_nothing_without_moves() {
        let board = Board::standard();
        let legal = LegalMoves::new(Player::Player2, Vec::new());

        assert!(FirstLegalMoveSelector.select_move(&board, &legal).is_none());
        assert!(RandomMoveSelector::new(1).select_move(&board, &legal).is_none());
    }
}
