use derive_more::{Display, Error};

use crate::types::{Phase, Player, Position};

/// Every way a core operation can be refused.
///
/// Each variant is reported at the boundary of the call that caused it;
/// a refused call never leaves the board or the turn state half-changed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A coordinate outside the grid reached a board query or mutator.
    #[display("position {position} is outside the {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },

    /// `submit_target` got a coordinate missing from the current legal set.
    #[display("{position} is not a legal move for {player}")]
    NotALegalMove { position: Position, player: Player },

    /// Board size or opening layout failed validation.
    #[display("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Input arrived while the controller was not waiting for a human move.
    #[display("input not expected while {phase}")]
    InputNotExpected { phase: Phase },

    /// A move no longer matches the grid it is applied to.
    #[display("move at {position} does not match the current board")]
    StaleMove { position: Position },

    /// The automated player's selector offered nothing from a non-empty
    /// legal set.
    #[display("no move selected for {player}")]
    NoMoveSelected { player: Player },

    /// The session task that owned the controller has stopped.
    #[display("game session closed")]
    SessionClosed,
}

impl GameError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid_config(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_coordinate() {
        let err = GameError::OutOfBounds {
            position: Position::new(8, -1),
            size: 8,
        };
        assert_eq!(
            err.to_string(),
            "position (8, -1) is outside the 8x8 board"
        );

        let err = GameError::NotALegalMove {
            position: Position::new(0, 0),
            player: Player::Player1,
        };
        assert_eq!(err.to_string(), "(0, 0) is not a legal move for player 1");
    }
}
