use crate::board::Board;
use crate::types::{CapturedRun, CellState, Direction, LegalMoves, Move, Player, Position};

/// All legal moves of `player` on `board`, each with its captured runs.
pub fn find_legal_moves(board: &Board, player: Player) -> LegalMoves {
    let mut moves = Vec::new();

    for position in board.positions() {
        if board.cell(position) != Some(CellState::Empty) {
            continue;
        }
        let runs = captured_runs(board, position, player);
        if !runs.is_empty() {
            moves.push(Move { position, runs });
        }
    }

    LegalMoves::new(player, moves)
}

/// Runs captured by `player` placing at `origin`. Empty when the placement
/// captures nothing. Does not look at `origin` itself.
pub fn captured_runs(board: &Board, origin: Position, player: Player) -> Vec<CapturedRun> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| walk_run(board, origin, direction, player))
        .collect()
}

fn walk_run(
    board: &Board,
    origin: Position,
    direction: Direction,
    player: Player,
) -> Option<CapturedRun> {
    let own = player.cell();
    let opponent = player.opponent().cell();
    let mut cells = Vec::new();
    let mut current = origin.step(direction);

    loop {
        let state = board.cell(current)?;
        if state == opponent {
            cells.push(current);
        } else if state == own && !cells.is_empty() {
            return Some(CapturedRun { direction, cells });
        } else {
            // Empty cell, or own disc right next to the origin.
            return None;
        }
        current = current.step(direction);
    }
}
