//! Browser surface over [`GameInstance`].

use wasm_bindgen::prelude::*;

use crate::game::{GameConfig, GameInstance};

#[wasm_bindgen]
pub struct WasmGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined`/`null` or a partial `GameConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsError> {
        let config = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            inner: GameInstance::new_with_default_selector(config),
        })
    }

    pub fn select(&mut self, row: u8, col: u8) -> bool {
        self.inner.select(row, col)
    }

    #[wasm_bindgen(js_name = aiMove)]
    pub fn ai_move(&mut self) -> Result<(), JsError> {
        Ok(self.inner.do_ai_move()?)
    }

    pub fn pass(&mut self) -> Result<(), JsError> {
        Ok(self.inner.pass()?)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(js_name = isAiTurn)]
    pub fn is_ai_turn(&self) -> bool {
        self.inner.is_ai_turn()
    }

    #[wasm_bindgen(js_name = hasLegalMoves)]
    pub fn has_legal_moves(&self) -> bool {
        self.inner.has_legal_moves_for_current()
    }

    /// Destinations of the selected piece as `[{ to, captures }]`.
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.get_legal_moves())?)
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.to_game_state())?)
    }

    pub fn result(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.to_game_result())?)
    }
}
