use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A board coordinate. `x` is the column, `y` the row.
///
/// Signed so that coordinates derived from pointer picking can land off the
/// grid and be rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one step towards `direction`.
    /// May be off the grid.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// One of the eight compass directions a captured run can extend in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// `(dx, dy)` with `y` growing downwards (row-major).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }
}

/// One of the two sides. `Player1` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Player {
    #[display("player 1")]
    Player1,
    #[display("player 2")]
    Player2,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    pub const fn cell(self) -> CellState {
        match self {
            Player::Player1 => CellState::Player1,
            Player::Player2 => CellState::Player2,
        }
    }
}

/// State of a single grid cell. The grid is fully dense: every cell holds
/// exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Player1,
    Player2,
}

impl CellState {
    pub const fn owner(self) -> Option<Player> {
        match self {
            CellState::Empty => None,
            CellState::Player1 => Some(Player::Player1),
            CellState::Player2 => Some(Player::Player2),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, CellState::Empty)
    }
}

/// Opponent discs lying in one direction from a move, ordered outward from
/// the move and bounded by a disc of the acting player.
///
/// Contract: `cells` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedRun {
    pub direction: Direction,
    pub cells: Vec<Position>,
}

/// A legal placement together with every run it captures.
///
/// Contract: `runs` is non-empty and holds at most one run per direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub position: Position,
    pub runs: Vec<CapturedRun>,
}

impl Move {
    /// Every coordinate flipped by this move, run by run.
    pub fn captured(&self) -> impl Iterator<Item = Position> + '_ {
        self.runs.iter().flat_map(|run| run.cells.iter().copied())
    }

    pub fn flip_count(&self) -> usize {
        self.runs.iter().map(|run| run.cells.len()).sum()
    }
}

/// The legal moves of one player for one board state, in row-major order of
/// their position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalMoves {
    pub player: Player,
    moves: Vec<Move>,
}

impl LegalMoves {
    pub(crate) fn new(player: Player, moves: Vec<Move>) -> Self {
        Self { player, moves }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Exact-match lookup used to validate submitted targets.
    pub fn get(&self, position: Position) -> Option<&Move> {
        self.moves.iter().find(|mv| mv.position == position)
    }

    pub fn first(&self) -> Option<&Move> {
        self.moves.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn positions(&self) -> Vec<Position> {
        self.moves.iter().map(|mv| mv.position).collect()
    }
}

impl<'a> IntoIterator for &'a LegalMoves {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Who chooses a player's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Moves arrive through `submit_target`.
    #[default]
    Human,
    /// Moves are picked by the selector after the autoplay delay.
    Automated,
}

/// Lifecycle of the turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed, `start_game` not yet called.
    #[display("idle")]
    Idle,
    #[display("awaiting input")]
    AwaitingInput,
    #[display("auto playing")]
    AutoPlaying,
    #[display("game over")]
    GameOver,
}

/// One applied move, as kept in the controller's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// 1-based.
    pub number: usize,
    pub player: Player,
    pub position: Position,
    pub flipped: Vec<Position>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// `None` on a draw.
    pub winner: Option<Player>,
    pub player1_count: usize,
    pub player2_count: usize,
}

/// Public game state handed to the JS side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub size: usize,
    /// Row-major; 0 = empty, otherwise the configured player id.
    pub board: Vec<u8>,
    pub current_player: u8,
    pub player1_count: usize,
    pub player2_count: usize,
    pub phase: Phase,
    /// Contract:
    /// - `true` when the turn before this one was skipped.
    /// - `false` after a normal move.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: cells flipped by the last applied move.
    /// - Fresh game: empty.
    pub flipped: Vec<Position>,
    pub legal_moves: Vec<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_alternates() {
        assert_eq!(Player::Player1.opponent(), Player::Player2);
        assert_eq!(Player::Player2.opponent(), Player::Player1);
    }

    #[test]
    fn direction_deltas_are_distinct_unit_steps() {
        let mut seen = Vec::new();
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!((dx, dy) != (0, 0));
            assert!(!seen.contains(&(dx, dy)));
            seen.push((dx, dy));
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn move_captured_flattens_all_runs() {
        let mv = Move {
            position: Position::new(0, 0),
            runs: vec![
                CapturedRun {
                    direction: Direction::East,
                    cells: vec![Position::new(1, 0), Position::new(2, 0)],
                },
                CapturedRun {
                    direction: Direction::South,
                    cells: vec![Position::new(0, 1)],
                },
            ],
        };

        let captured: Vec<_> = mv.captured().collect();
        assert_eq!(
            captured,
            vec![Position::new(1, 0), Position::new(2, 0), Position::new(0, 1)]
        );
        assert_eq!(mv.flip_count(), 3);
    }

    #[test]
    fn position_displays_as_pair() {
        assert_eq!(Position::new(2, 3).to_string(), "(2, 3)");
    }
}
