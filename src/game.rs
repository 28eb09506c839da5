use serde::Serialize;
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::board::Board;
use crate::config::{ControlModes, GameConfig, PlayerIds};
use crate::error::GameError;
use crate::selector::{MoveSelector, selector_for};
use crate::timer::AutoPlayTimer;
use crate::types::{
    ControlMode, GameResult, GameSnapshot, LegalMoves, Move, MoveRecord, Phase, Player, Position,
};
use crate::view::GameView;

/// Whose turn it is and what they may play. Replaced wholesale every turn.
#[derive(Debug, Clone)]
struct TurnState {
    player: Player,
    legal: LegalMoves,
}

/// What happened after a move was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextTurn {
    /// The opponent is to move.
    Continue { player: Player },
    /// The opponent was blocked; the mover goes again.
    Passed { skipped: Player, next: Player },
    GameOver { result: GameResult },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub record: MoveRecord,
    pub next: NextTurn,
}

/// Turn state machine. Owns the board and the pending autoplay task, and is
/// the only thing that mutates either.
///
/// Time is passed in by the caller (`now`); the controller never reads a
/// clock itself.
pub struct GameController<V: GameView> {
    board: Board,
    view: V,
    selector: Box<dyn MoveSelector>,
    control: ControlModes,
    player_ids: PlayerIds,
    pass_when_blocked: bool,
    turn: TurnState,
    phase: Phase,
    timer: AutoPlayTimer,
    is_pass: bool,
    flipped: Vec<Position>,
    history: Vec<MoveRecord>,
}

impl<V: GameView> GameController<V> {
    /// Validates `config` and builds an idle controller. Nothing is sent to
    /// the view until `start_game`.
    pub fn new(config: &GameConfig, view: V) -> Result<Self, GameError> {
        Self::with_selector(config, view, selector_for(config.selection))
    }

    pub fn with_selector(
        config: &GameConfig,
        view: V,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, GameError> {
        let board = Board::from_config(config)?;
        let legal = board.find_legal_moves(Player::Player1);

        Ok(Self {
            board,
            view,
            selector,
            control: config.control,
            player_ids: config.player_ids,
            pass_when_blocked: config.pass_when_blocked,
            turn: TurnState {
                player: Player::Player1,
                legal,
            },
            phase: Phase::Idle,
            timer: AutoPlayTimer::new(config.autoplay_delay()),
            is_pass: false,
            flipped: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Resets the board, hands the first turn to player 1 and redraws
    /// everything.
    pub fn start_game(&mut self, now: Instant) {
        if let Some(task) = self.timer.cancel() {
            debug!(task = ?task.id, "cancelled pending autoplay on restart");
        }

        self.view.notify_legal_moves_cleared();
        self.view.notify_pieces_cleared();
        self.board.reset();
        for (at, owner) in self.board.pieces() {
            self.view.notify_piece_added(at, owner);
        }

        self.is_pass = false;
        self.flipped.clear();
        self.history.clear();

        info!(size = self.board.size(), "game started");
        self.advance(Player::Player1, now);
    }

    /// Same as `start_game`; safe in any phase.
    pub fn reset_game(&mut self, now: Instant) {
        info!(phase = %self.phase, "game reset requested");
        self.start_game(now);
    }

    /// Applies the human player's move at `target`.
    ///
    /// `target` must equal one of the current legal positions exactly.
    /// A refused call changes nothing and notifies nothing.
    pub fn submit_target(&mut self, target: Position, now: Instant) -> Result<MoveOutcome, GameError> {
        if self.phase != Phase::AwaitingInput {
            debug!(%target, phase = %self.phase, "input ignored");
            return Err(GameError::InputNotExpected { phase: self.phase });
        }

        let player = self.turn.player;
        let Some(mv) = self.turn.legal.get(target).cloned() else {
            debug!(%target, %player, "not a legal move");
            return Err(GameError::NotALegalMove {
                position: target,
                player,
            });
        };

        self.play(mv, now)
    }

    /// Runs the scheduled automated move if it is due at `now`.
    ///
    /// If the selector offers nothing or the chosen move is refused, the turn
    /// is entered again from the current board, so a fresh task is pending
    /// before the error is returned.
    pub fn poll(&mut self, now: Instant) -> Result<Option<MoveOutcome>, GameError> {
        let Some(task) = self.timer.take_due(now) else {
            return Ok(None);
        };
        if self.phase != Phase::AutoPlaying || task.player != self.turn.player {
            warn!(task = ?task.id, player = %task.player, "discarding stale autoplay task");
            return Ok(None);
        }

        let Some(mv) = self
            .selector
            .select_move(&self.board, &self.turn.legal)
            .cloned()
        else {
            warn!(player = %task.player, "selector returned no move, retrying turn");
            self.advance(task.player, now);
            return Err(GameError::NoMoveSelected {
                player: task.player,
            });
        };

        debug!(player = %task.player, position = %mv.position, "autoplay move selected");
        match self.play(mv, now) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(err) => {
                warn!(%err, player = %task.player, "autoplay move refused, retrying turn");
                self.advance(task.player, now);
                Err(err)
            }
        }
    }

    /// When the pending automated move becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn current_player(&self) -> Player {
        self.turn.player
    }

    pub fn legal_moves(&self) -> &LegalMoves {
        &self.turn.legal
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn result(&self) -> GameResult {
        let player1_count = self.board.count(Player::Player1);
        let player2_count = self.board.count(Player::Player2);
        let winner = match player1_count.cmp(&player2_count) {
            std::cmp::Ordering::Greater => Some(Player::Player1),
            std::cmp::Ordering::Less => Some(Player::Player2),
            std::cmp::Ordering::Equal => None,
        };
        GameResult {
            winner,
            player1_count,
            player2_count,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.board.size(),
            board: self.board.to_array(&self.player_ids),
            current_player: self.player_ids.of(self.turn.player),
            player1_count: self.board.count(Player::Player1),
            player2_count: self.board.count(Player::Player2),
            phase: self.phase,
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
            legal_moves: self.turn.legal.positions(),
        }
    }

    fn play(&mut self, mv: Move, now: Instant) -> Result<MoveOutcome, GameError> {
        let player = self.turn.player;
        let flipped = self.board.apply_move(&mv, player)?;
        self.timer.cancel();

        self.view.notify_legal_moves_cleared();
        self.view.notify_piece_added(mv.position, player);
        for &at in &flipped {
            self.view.notify_piece_flipped(at, player);
        }

        let record = MoveRecord {
            number: self.history.len() + 1,
            player,
            position: mv.position,
            flipped: flipped.clone(),
        };
        info!(
            number = record.number,
            %player,
            position = %mv.position,
            flipped = flipped.len(),
            "move applied"
        );
        self.history.push(record.clone());
        self.flipped = flipped;

        let next = self.advance(player.opponent(), now);
        Ok(MoveOutcome { record, next })
    }

    /// Hands the turn to `player`, skipping them if blocked and passing is
    /// enabled, and ends the game when nobody can move.
    fn advance(&mut self, player: Player, now: Instant) -> NextTurn {
        let legal = self.board.find_legal_moves(player);
        if !legal.is_empty() {
            self.is_pass = false;
            self.enter_turn(legal, now);
            return NextTurn::Continue { player };
        }

        if self.pass_when_blocked {
            let next = player.opponent();
            let other = self.board.find_legal_moves(next);
            if !other.is_empty() {
                info!(skipped = %player, "no legal moves, turn passes");
                self.is_pass = true;
                self.view.notify_turn_passed(player);
                self.enter_turn(other, now);
                return NextTurn::Passed {
                    skipped: player,
                    next,
                };
            }
        }

        self.turn = TurnState { player, legal };
        NextTurn::GameOver {
            result: self.finish(),
        }
    }

    fn enter_turn(&mut self, legal: LegalMoves, now: Instant) {
        let player = legal.player;
        self.view.notify_legal_moves(&legal.positions(), player);
        self.turn = TurnState { player, legal };

        match self.control.of(player) {
            ControlMode::Human => {
                self.phase = Phase::AwaitingInput;
            }
            ControlMode::Automated => {
                self.phase = Phase::AutoPlaying;
                let task = self.timer.schedule(player, now);
                debug!(?task, %player, delay = ?self.timer.delay(), "autoplay scheduled");
            }
        }
    }

    fn finish(&mut self) -> GameResult {
        self.timer.cancel();
        self.phase = Phase::GameOver;
        self.view.notify_legal_moves_cleared();

        let result = self.result();
        info!(
            winner = ?result.winner,
            player1 = result.player1_count,
            player2 = result.player2_count,
            "game over"
        );
        debug!("final board\n{}", self.board);
        self.view.notify_game_over(&result);
        result
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Player, now: Instant) {
        self.timer.cancel();
        self.board = board;
        self.is_pass = false;
        self.flipped.clear();
        self.advance(current_player, now);
    }
}
