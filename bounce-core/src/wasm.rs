//! WASM bindings for bounce-core
//!
//! JavaScript-friendly wrapper over the integer-coded facade. Every operation
//! returns the numeric return code (0 = OK, 1 = EMPTY, 2 = FORBIDDEN,
//! 3 = PARAM).

use wasm_bindgen::prelude::*;

use crate::codes::CodedGame;
use crate::command::Command;

/// WASM-friendly wrapper around CodedGame
#[wasm_bindgen]
pub struct WasmGame {
    inner: CodedGame,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game in the setup phase
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: CodedGame::new_game() }
    }

    #[wasm_bindgen(js_name = placePiece)]
    pub fn place_piece(&mut self, size: i32, player: i32, column: i32) -> i32 {
        self.inner.place_piece(size, player, column).code()
    }

    #[wasm_bindgen(js_name = piecesAvailable)]
    pub fn pieces_available(&self, size: i32, player: i32) -> i32 {
        self.inner.nb_pieces_available(size, player)
    }

    #[wasm_bindgen(js_name = pickPiece)]
    pub fn pick_piece(&mut self, player: i32, line: i32, column: i32) -> i32 {
        self.inner.pick_piece(player, line, column).code()
    }

    /// Direction codes: 0 goal, 1 south, 2 north, 3 east, 4 west
    #[wasm_bindgen(js_name = isMovePossible)]
    pub fn is_move_possible(&self, direction: i32) -> bool {
        self.inner.is_move_possible(direction)
    }

    #[wasm_bindgen(js_name = movePiece)]
    pub fn move_piece(&mut self, direction: i32) -> i32 {
        self.inner.move_piece(direction).code()
    }

    #[wasm_bindgen(js_name = swapPiece)]
    pub fn swap_piece(&mut self, line: i32, column: i32) -> i32 {
        self.inner.swap_piece(line, column).code()
    }

    #[wasm_bindgen(js_name = cancelMovement)]
    pub fn cancel_movement(&mut self) -> i32 {
        self.inner.cancel_movement().code()
    }

    #[wasm_bindgen(js_name = cancelStep)]
    pub fn cancel_step(&mut self) -> i32 {
        self.inner.cancel_step().code()
    }

    /// Run one line of command notation, e.g. "pick S 0 3"
    pub fn apply(&mut self, command: &str) -> Result<i32, JsError> {
        let command: Command = command.parse()?;
        Ok(self.inner.apply(&command).code())
    }

    /// Size at a cell, 0 when empty
    #[wasm_bindgen(js_name = pieceSize)]
    pub fn piece_size(&self, line: i32, column: i32) -> i32 {
        self.inner.get_piece_size(line, column)
    }

    /// 0 (none), 1 (South) or 2 (North)
    pub fn winner(&self) -> i32 {
        self.inner.get_winner()
    }

    #[wasm_bindgen(js_name = movementLeft)]
    pub fn movement_left(&self) -> i32 {
        self.inner.movement_left()
    }

    /// Full state: phase, cells, goals, reserves and hand
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.game().snapshot()).map_err(JsValue::from)
    }

    /// Independent copy of the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame { inner: self.inner.copy_game() }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
