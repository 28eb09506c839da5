use serde::Serialize;
use tracing::debug;

use crate::types::{GameResult, Player, Position};

pub trait GameView {
    fn notify_piece_added(&mut self, at: Position, owner: Player);

    fn notify_piece_flipped(&mut self, at: Position, new_owner: Player);

    /// Sent before the opening discs are re-added on start/reset.
    fn notify_pieces_cleared(&mut self);

    fn notify_legal_moves(&mut self, moves: &[Position], player: Player);

    fn notify_legal_moves_cleared(&mut self);

    fn notify_game_over(&mut self, result: &GameResult);

    /// `player` had no legal move and was skipped.
    fn notify_turn_passed(&mut self, _player: Player) {}
}

/// A view notification as data, for collaborators that consume it later or
/// on another thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    PieceAdded { at: Position, owner: Player },
    PieceFlipped { at: Position, new_owner: Player },
    PiecesCleared,
    LegalMoves { moves: Vec<Position>, player: Player },
    LegalMovesCleared,
    TurnPassed { player: Player },
    GameOver { result: GameResult },
}

/// Routes every notification through a single sink. Implementing this is
/// enough to be a [`GameView`].
pub trait EventSink {
    fn emit(&mut self, event: ViewEvent);
}

impl<S: EventSink> GameView for S {
    fn notify_piece_added(&mut self, at: Position, owner: Player) {
        self.emit(ViewEvent::PieceAdded { at, owner });
    }

    fn notify_piece_flipped(&mut self, at: Position, new_owner: Player) {
        self.emit(ViewEvent::PieceFlipped { at, new_owner });
    }

    fn notify_pieces_cleared(&mut self) {
        self.emit(ViewEvent::PiecesCleared);
    }

    fn notify_legal_moves(&mut self, moves: &[Position], player: Player) {
        self.emit(ViewEvent::LegalMoves {
            moves: moves.to_vec(),
            player,
        });
    }

    fn notify_legal_moves_cleared(&mut self) {
        self.emit(ViewEvent::LegalMovesCleared);
    }

    fn notify_game_over(&mut self, result: &GameResult) {
        self.emit(ViewEvent::GameOver { result: *result });
    }

    fn notify_turn_passed(&mut self, player: Player) {
        self.emit(ViewEvent::TurnPassed { player });
    }
}

/// Buffers notifications until the owner drains them.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<ViewEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: ViewEvent) {
        self.events.push(event);
    }
}

/// Logs each notification at debug level and renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingView;

impl EventSink for TracingView {
    fn emit(&mut self, event: ViewEvent) {
        debug!(?event, "view notification");
    }
}
