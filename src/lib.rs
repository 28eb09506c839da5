use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod search;
pub mod selector;
#[cfg(not(target_arch = "wasm32"))]
pub mod session;
pub mod timer;
pub mod types;
pub mod view;
pub mod wasm;

pub use board::Board;
pub use config::GameConfig;
pub use error::GameError;
pub use game::{GameController, MoveOutcome, NextTurn};
pub use types::{CapturedRun, CellState, LegalMoves, Move, Phase, Player, Position};
pub use view::{EventLog, GameView, ViewEvent};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
