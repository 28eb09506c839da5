#![cfg(not(target_arch = "wasm32"))]

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use reversi_engine::{Board, CellState, Player, Position};

/// Plays up to `choices.len()` moves from the opening, each picking
/// `choice % legal.len()`, passing when blocked. Returns the board and the
/// player to move.
fn reachable(choices: &[usize]) -> (Board, Player) {
    let mut board = Board::standard();
    let mut player = Player::Player1;

    for &choice in choices {
        let mut legal = board.find_legal_moves(player);
        if legal.is_empty() {
            player = player.opponent();
            legal = board.find_legal_moves(player);
            if legal.is_empty() {
                break;
            }
        }
        let mv = legal.as_slice()[choice % legal.len()].clone();
        board.apply_move(&mv, player).unwrap();
        player = player.opponent();
    }

    (board, player)
}

fn cell_state() -> impl Strategy<Value = CellState> {
    prop_oneof![
        2 => Just(CellState::Empty),
        1 => Just(CellState::Player1),
        1 => Just(CellState::Player2),
    ]
}

fn side() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::Player1), Just(Player::Player2)]
}

/// Any grid from 1x1 to 10x10 with any mix of cells, most of which no game
/// could reach.
fn arbitrary_board() -> impl Strategy<Value = Board> {
    (1usize..=10)
        .prop_flat_map(|size| (Just(size), prop::collection::vec(cell_state(), size * size)))
        .prop_map(|(size, cells)| {
            let mut board = Board::new(size, Vec::new()).unwrap();
            for (position, state) in board.positions().zip(cells) {
                board.set_cell(position.x, position.y, state).unwrap();
            }
            board
        })
}

fn snapshot(board: &Board) -> Vec<(Position, CellState)> {
    board
        .positions()
        .map(|p| (p, board.get_cell(p.x, p.y).unwrap()))
        .collect()
}

fn check_targets_are_empty(board: &Board) -> Result<(), TestCaseError> {
    for player in [Player::Player1, Player::Player2] {
        for mv in &board.find_legal_moves(player) {
            prop_assert_eq!(board.get_cell(mv.position.x, mv.position.y).unwrap(), CellState::Empty);
        }
    }
    Ok(())
}

fn check_runs_are_bounded(board: &Board, player: Player) -> Result<(), TestCaseError> {
    for mv in &board.find_legal_moves(player) {
        prop_assert!(!mv.runs.is_empty());
        for run in &mv.runs {
            prop_assert!(!run.cells.is_empty());
            let mut expected = mv.position;
            for &cell in &run.cells {
                expected = expected.step(run.direction);
                prop_assert_eq!(cell, expected);
                prop_assert_eq!(board.get_cell(cell.x, cell.y).unwrap(), player.opponent().cell());
            }
            let end = expected.step(run.direction);
            prop_assert_eq!(board.get_cell(end.x, end.y).unwrap(), player.cell());
        }
    }
    Ok(())
}

fn check_apply_changes_exactly_target_and_captures(
    board: &Board,
    player: Player,
    pick: usize,
) -> Result<(), TestCaseError> {
    let legal = board.find_legal_moves(player);
    if legal.is_empty() {
        return Ok(());
    }
    let mv = &legal.as_slice()[pick % legal.len()];

    let mut after = board.clone();
    let flipped = after.apply_move(mv, player).unwrap();

    prop_assert_eq!(flipped.len(), mv.flip_count());
    let captured: Vec<Position> = mv.captured().collect();
    for ((position, before), (_, now)) in snapshot(board).into_iter().zip(snapshot(&after)) {
        if position == mv.position || captured.contains(&position) {
            prop_assert_eq!(now, player.cell());
        } else {
            prop_assert_eq!(now, before);
        }
    }
    prop_assert_eq!(after.count(player), board.count(player) + 1 + mv.flip_count());
    Ok(())
}

fn check_query_is_idempotent(board: &Board, player: Player) -> Result<(), TestCaseError> {
    let first = board.find_legal_moves(player);
    prop_assert_eq!(&first, &board.find_legal_moves(player));
    Ok(())
}

proptest! {
    #[test]
    fn legal_moves_only_target_empty_cells(choices in prop::collection::vec(0usize..64, 0..60)) {
        let (board, _) = reachable(&choices);
        check_targets_are_empty(&board)?;
    }

    #[test]
    fn captured_runs_are_bounded_opponent_lines(choices in prop::collection::vec(0usize..64, 0..60)) {
        let (board, player) = reachable(&choices);
        check_runs_are_bounded(&board, player)?;
    }

    #[test]
    fn applying_a_move_changes_exactly_target_and_captures(
        choices in prop::collection::vec(0usize..64, 0..60),
        pick in 0usize..64,
    ) {
        let (board, player) = reachable(&choices);
        check_apply_changes_exactly_target_and_captures(&board, player, pick)?;
    }

    #[test]
    fn legal_move_query_is_idempotent(choices in prop::collection::vec(0usize..64, 0..60)) {
        let (board, player) = reachable(&choices);
        check_query_is_idempotent(&board, player)?;
    }

    #[test]
    fn any_grid_only_offers_empty_targets(board in arbitrary_board()) {
        check_targets_are_empty(&board)?;
    }

    #[test]
    fn any_grid_yields_bounded_runs(board in arbitrary_board(), player in side()) {
        check_runs_are_bounded(&board, player)?;
    }

    #[test]
    fn any_grid_move_changes_exactly_target_and_captures(
        board in arbitrary_board(),
        player in side(),
        pick in 0usize..100,
    ) {
        check_apply_changes_exactly_target_and_captures(&board, player, pick)?;
    }

    #[test]
    fn any_grid_query_is_idempotent(board in arbitrary_board(), player in side()) {
        check_query_is_idempotent(&board, player)?;
    }
}

#[test]
fn reset_returns_to_canonical_opening() {
    let (mut board, _) = reachable(&[3, 1, 4, 1, 5, 9, 2, 6]);
    board.reset();

    assert_eq!(board, Board::standard());
    assert_eq!(
        board.find_legal_moves(Player::Player1).positions(),
        vec![
            Position::new(3, 2),
            Position::new(2, 3),
            Position::new(5, 4),
            Position::new(4, 5),
        ]
    );
}

#[test]
fn full_opponent_line_to_the_edge_captures_nothing() {
    let mut board = Board::new(4, Vec::new()).unwrap();
    for x in 1..4 {
        board.set_cell(x, 0, CellState::Player2).unwrap();
    }
    board.set_cell(3, 3, CellState::Player1).unwrap();

    assert!(board.find_legal_moves(Player::Player1).is_empty());
}
