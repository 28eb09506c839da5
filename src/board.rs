use std::fmt;

use crate::config::{GameConfig, MAX_BOARD_SIZE, OpeningDisc, PlayerIds, validate_opening};
use crate::error::GameError;
use crate::search;
use crate::types::{CellState, LegalMoves, Move, Player, Position};

/// Reversi grid: a dense row-major array of cell states plus the opening
/// layout it returns to on `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<CellState>,
    opening: Vec<OpeningDisc>,
}

impl Board {
    /// Builds a board in its starting configuration.
    pub fn new(size: usize, opening: Vec<OpeningDisc>) -> Result<Self, GameError> {
        if size == 0 {
            return Err(GameError::invalid_config("board size must be positive"));
        }
        if size > MAX_BOARD_SIZE {
            return Err(GameError::invalid_config(format!(
                "board size {size} exceeds the maximum of {MAX_BOARD_SIZE}"
            )));
        }
        validate_opening(size, &opening)?;

        let mut board = Self {
            size,
            cells: vec![CellState::Empty; size * size],
            opening,
        };
        board.reset();
        Ok(board)
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Self::new(config.board_size, config.opening_discs()?)
    }

    /// 8x8 with the canonical four-disc opening.
    pub fn standard() -> Self {
        let opening = vec![
            disc(3, 3, Player::Player2),
            disc(4, 3, Player::Player1),
            disc(3, 4, Player::Player1),
            disc(4, 4, Player::Player2),
        ];
        Self {
            size: 8,
            cells: seeded_cells(8, &opening),
            opening,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Restores the opening layout; every other cell becomes empty.
    pub fn reset(&mut self) {
        self.cells = seeded_cells(self.size, &self.opening);
    }

    /// Raw write with no rule checks.
    pub fn set_cell(&mut self, x: i32, y: i32, state: CellState) -> Result<(), GameError> {
        let idx = self.checked_index(Position::new(x, y))?;
        self.cells[idx] = state;
        Ok(())
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Result<CellState, GameError> {
        let idx = self.checked_index(Position::new(x, y))?;
        Ok(self.cells[idx])
    }

    pub fn find_legal_moves(&self, player: Player) -> LegalMoves {
        search::find_legal_moves(self, player)
    }

    /// Places `player`'s disc at the move's position and flips every captured
    /// cell. Returns the flipped coordinates in run order.
    ///
    /// The move is checked against the grid first; a move that no longer fits
    /// (occupied target, a captured cell not owned by the opponent) is refused
    /// with `StaleMove` and the board is left untouched.
    pub fn apply_move(&mut self, mv: &Move, player: Player) -> Result<Vec<Position>, GameError> {
        let target = self.checked_index(mv.position)?;
        if !self.cells[target].is_empty() || mv.runs.is_empty() {
            return Err(GameError::StaleMove {
                position: mv.position,
            });
        }

        let opponent = player.opponent().cell();
        let mut flips = Vec::with_capacity(mv.flip_count());
        for position in mv.captured() {
            let idx = self.checked_index(position)?;
            if self.cells[idx] != opponent {
                return Err(GameError::StaleMove {
                    position: mv.position,
                });
            }
            flips.push((position, idx));
        }

        self.cells[target] = player.cell();
        for &(_, idx) in &flips {
            self.cells[idx] = player.cell();
        }

        Ok(flips.into_iter().map(|(position, _)| position).collect())
    }

    pub fn count(&self, player: Player) -> usize {
        let cell = player.cell();
        self.cells.iter().filter(|&&state| state == cell).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|state| state.is_empty()).count()
    }

    /// Occupied cells in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Player)> + '_ {
        self.positions()
            .zip(self.cells.iter())
            .filter_map(|(position, state)| state.owner().map(|owner| (position, owner)))
    }

    /// Every coordinate of the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }

    /// Row-major numeric export: 0 = empty, otherwise the player's id.
    pub fn to_array(&self, ids: &PlayerIds) -> Vec<u8> {
        self.cells
            .iter()
            .map(|state| state.owner().map_or(0, |owner| ids.of(owner)))
            .collect()
    }

    /// Lookup that treats off-grid coordinates as absent.
    pub(crate) fn cell(&self, position: Position) -> Option<CellState> {
        self.index(position).map(|idx| self.cells[idx])
    }

    fn index(&self, position: Position) -> Option<usize> {
        let size = self.size as i32;
        if (0..size).contains(&position.x) && (0..size).contains(&position.y) {
            Some(position.y as usize * self.size + position.x as usize)
        } else {
            None
        }
    }

    fn checked_index(&self, position: Position) -> Result<usize, GameError> {
        self.index(position).ok_or(GameError::OutOfBounds {
            position,
            size: self.size,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: String = row
                .iter()
                .map(|state| match state {
                    CellState::Empty => '.',
                    CellState::Player1 => 'X',
                    CellState::Player2 => 'O',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn disc(x: i32, y: i32, owner: Player) -> OpeningDisc {
    OpeningDisc {
        position: Position::new(x, y),
        owner,
    }
}

fn seeded_cells(size: usize, opening: &[OpeningDisc]) -> Vec<CellState> {
    let mut cells = vec![CellState::Empty; size * size];
    for disc in opening {
        // Opening discs are validated on construction.
        let idx = disc.position.y as usize * size + disc.position.x as usize;
        cells[idx] = disc.owner.cell();
    }
    cells
}
