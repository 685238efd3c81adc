#![cfg(target_arch = "wasm32")]

use checkers::wasm_api::WasmGame;
use checkers::wasm_ready;
use js_sys::{Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn field(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).expect("field must exist")
}

#[wasm_bindgen_test]
fn module_reports_ready() {
    assert!(wasm_ready());
}

#[wasm_bindgen_test]
fn default_game_starts_with_side_a() {
    let game = WasmGame::new(JsValue::UNDEFINED).ok().expect("default config");
    let state = game.state().ok().expect("state serializes");

    assert_eq!(field(&state, "current_player").as_string().as_deref(), Some("A"));
    assert_eq!(field(&state, "a_count").as_f64(), Some(12.0));
    assert!(!game.is_ai_turn());
}

#[wasm_bindgen_test]
fn click_move_then_ai_reply() {
    let config = Object::new();
    Reflect::set(&config, &JsValue::from_str("search_depth"), &JsValue::from(1))
        .expect("set depth");
    let mut game = WasmGame::new(config.into()).ok().expect("partial config");

    assert!(game.select(5, 2));
    assert!(game.select(4, 3));
    assert!(game.is_ai_turn());

    game.ai_move().ok().expect("AI move");
    let state = game.state().ok().expect("state serializes");
    assert_eq!(field(&state, "current_player").as_string().as_deref(), Some("A"));
}
