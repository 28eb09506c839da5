use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::{ControlMode, Player, Position};

pub const DEFAULT_BOARD_SIZE: usize = 8;
pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 1500;
/// Largest edge length accepted; cells export as `u8` ids.
pub const MAX_BOARD_SIZE: usize = 255;

/// A disc present at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningDisc {
    pub position: Position,
    pub owner: Player,
}

/// Numeric identities used when the board is exported as an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerIds {
    pub player1: u8,
    pub player2: u8,
}

impl Default for PlayerIds {
    fn default() -> Self {
        Self {
            player1: 1,
            player2: 2,
        }
    }
}

impl PlayerIds {
    pub fn of(&self, player: Player) -> u8 {
        match player {
            Player::Player1 => self.player1,
            Player::Player2 => self.player2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlModes {
    pub player1: ControlMode,
    pub player2: ControlMode,
}

impl Default for ControlModes {
    fn default() -> Self {
        Self {
            player1: ControlMode::Human,
            player2: ControlMode::Automated,
        }
    }
}

impl ControlModes {
    pub fn of(&self, player: Player) -> ControlMode {
        match player {
            Player::Player1 => self.player1,
            Player::Player2 => self.player2,
        }
    }
}

/// How the automated player picks among its legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First legal move in row-major order.
    #[default]
    First,
    /// Uniformly random legal move from a seeded generator.
    Random {
        #[serde(default)]
        seed: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    pub autoplay_delay_ms: u64,
    /// `None` means the canonical four-disc centre layout.
    pub opening: Option<Vec<OpeningDisc>>,
    pub player_ids: PlayerIds,
    pub control: ControlModes,
    pub selection: SelectionPolicy,
    /// Skip a blocked player instead of ending the game; the game ends once
    /// both players are blocked.
    pub pass_when_blocked: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            autoplay_delay_ms: DEFAULT_AUTOPLAY_DELAY_MS,
            opening: None,
            player_ids: PlayerIds::default(),
            control: ControlModes::default(),
            selection: SelectionPolicy::default(),
            pass_when_blocked: true,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, GameError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }

    /// The opening discs, deriving the standard layout when none is set.
    pub fn opening_discs(&self) -> Result<Vec<OpeningDisc>, GameError> {
        match &self.opening {
            Some(discs) => Ok(discs.clone()),
            None => standard_opening(self.board_size),
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.board_size == 0 {
            return Err(GameError::invalid_config("board size must be positive"));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(GameError::invalid_config(format!(
                "board size {} exceeds the maximum of {MAX_BOARD_SIZE}",
                self.board_size
            )));
        }
        if self.player_ids.player1 == self.player_ids.player2 {
            return Err(GameError::invalid_config(
                "player ids must differ from each other",
            ));
        }
        if self.player_ids.player1 == 0 || self.player_ids.player2 == 0 {
            return Err(GameError::invalid_config(
                "player id 0 is reserved for empty cells",
            ));
        }

        validate_opening(self.board_size, &self.opening_discs()?)
    }
}

/// The canonical centre layout: player 2 on the main diagonal, player 1 on
/// the anti-diagonal.
pub fn standard_opening(size: usize) -> Result<Vec<OpeningDisc>, GameError> {
    if size < 2 {
        return Err(GameError::invalid_config(format!(
            "board size {size} has no room for the standard opening"
        )));
    }
    let hi = i32::try_from(size / 2)
        .map_err(|_| GameError::invalid_config(format!("board size {size} is too large")))?;
    let lo = hi - 1;

    Ok(vec![
        OpeningDisc {
            position: Position::new(lo, lo),
            owner: Player::Player2,
        },
        OpeningDisc {
            position: Position::new(hi, lo),
            owner: Player::Player1,
        },
        OpeningDisc {
            position: Position::new(lo, hi),
            owner: Player::Player1,
        },
        OpeningDisc {
            position: Position::new(hi, hi),
            owner: Player::Player2,
        },
    ])
}

pub(crate) fn validate_opening(size: usize, discs: &[OpeningDisc]) -> Result<(), GameError> {
    let limit = i32::try_from(size)
        .map_err(|_| GameError::invalid_config(format!("board size {size} is too large")))?;
    let mut seen = HashSet::with_capacity(discs.len());

    for disc in discs {
        let Position { x, y } = disc.position;
        if !(0..limit).contains(&x) || !(0..limit).contains(&y) {
            return Err(GameError::invalid_config(format!(
                "opening disc at {} is outside the {size}x{size} board",
                disc.position
            )));
        }
        if !seen.insert(disc.position) {
            return Err(GameError::invalid_config(format!(
                "opening places more than one disc at {}",
                disc.position
            )));
        }
    }

    Ok(())
}
