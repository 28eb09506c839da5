use tracing::debug;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::GameController;
use crate::types::Position;
use crate::view::EventLog;

#[wasm_bindgen]
pub struct ReversiGame {
    controller: GameController<EventLog>,
}

#[wasm_bindgen]
impl ReversiGame {
    /// `config` may be `undefined` for the standard game.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ReversiGame, JsError> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let controller = GameController::new(&config, EventLog::new())?;
        Ok(Self { controller })
    }

    pub fn start(&mut self) {
        self.controller.start_game(Instant::now());
    }

    pub fn reset(&mut self) {
        self.controller.reset_game(Instant::now());
    }

    /// Returns the move outcome, or `null` when the click is not a legal move
    /// right now. A refused click leaves the board as it was.
    #[wasm_bindgen(js_name = submitTarget)]
    pub fn submit_target(&mut self, x: i32, y: i32) -> Result<JsValue, JsError> {
        match self
            .controller
            .submit_target(Position::new(x, y), Instant::now())
        {
            Ok(outcome) => Ok(serde_wasm_bindgen::to_value(&outcome)?),
            Err(err @ (GameError::NotALegalMove { .. } | GameError::InputNotExpected { .. })) => {
                debug!(%err, "click ignored");
                Ok(JsValue::NULL)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Runs the automated move if it is due. Returns whether a move was
    /// applied.
    pub fn tick(&mut self) -> Result<bool, JsError> {
        Ok(self.controller.poll(Instant::now())?.is_some())
    }

    /// View notifications since the last call, oldest first.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsError> {
        let events = self.controller.view_mut().drain();
        Ok(serde_wasm_bindgen::to_value(&events)?)
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.controller.snapshot())?)
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.controller.is_game_over()
    }
}
