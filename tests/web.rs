//! Runs the simulation inside a browser against descriptors parsed the way
//! the game parses them, through JSON.parse and serde-wasm-bindgen.

use platformer_core::config::{Difficulty, GameConfig};
use platformer_core::context::{SimulationContext, Viewport};
use platformer_core::engine::input::KeyPress;
use platformer_core::level::{validate_levels, LevelDescriptor};
use platformer_core::loader::LevelLoader;
use platformer_core::object::GameObject;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const LEVELS: &str = r#"[
    { "tag": "start", "completion": "anyKey", "objects": [
        { "name": "start", "id": "background", "class": "BackgroundStart",
          "data": { "src": "images/start.png", "width": 640, "height": 360 } }
    ] },
    { "tag": "hills", "objects": [
        { "name": "grass", "id": "floor", "class": "Platform",
          "data": { "src": "images/grass.png", "width": 64, "height": 64 } },
        { "name": "tube", "id": "tube", "class": "Tube",
          "data": { "src": "images/tube.png", "width": 300, "height": 300 },
          "xPercentage": 0.6, "yPercentage": 1.0 },
        { "name": "mario", "id": "player", "class": "PlayerHills",
          "data": { "src": "images/mario.png", "width": 256, "height": 520,
                    "rows": 13, "columns": 8, "scaleSize": 40,
                    "animations": {
                        "a": { "row": 10, "frames": 7 },
                        "d": { "row": 2, "frames": 7 },
                        "wa": { "row": 11, "frames": 15 },
                        "wd": { "row": 10, "frames": 15 }
                    } } }
    ] }
]"#;

fn levels() -> Vec<LevelDescriptor> {
    let value = js_sys::JSON::parse(LEVELS).unwrap();
    serde_wasm_bindgen::from_value(value).unwrap()
}

fn loader() -> LevelLoader {
    let ctx = SimulationContext::new(
        GameConfig::default(),
        Difficulty::Normal,
        Viewport::new(800.0, 500.0, 0.9),
    );
    LevelLoader::new(levels(), ctx).unwrap()
}

#[wasm_bindgen_test]
fn descriptors_parse_from_js_values() {
    let levels = levels();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[1].objects[2].class, "PlayerHills");
    validate_levels(&levels).unwrap();
}

#[wasm_bindgen_test]
fn config_parses_partially_from_js_values() {
    let value = js_sys::JSON::parse(r#"{ "gravity": 4.5 }"#).unwrap();
    let config: GameConfig = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(config.gravity, 4.5);
    assert_eq!(config.player_speed, GameConfig::default().player_speed);
}

#[wasm_bindgen_test]
fn any_key_starts_the_first_level() {
    let mut loader = loader();
    assert!(loader.world().player().is_none());

    loader
        .tick(&[KeyPress::KeyDown("Enter".into())], 1000.0 / 60.0)
        .unwrap();

    assert_eq!(loader.current(), 1);
    let player = loader.world().player().unwrap();
    // feet on the floor line at 0.9 of the window height
    assert!((player.entity().rect().bottom() - 450.0).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn player_walks_into_the_tube_and_stops() {
    let mut loader = loader();
    loader
        .tick(&[KeyPress::KeyDown("Enter".into())], 1000.0 / 60.0)
        .unwrap();
    loader
        .tick(&[KeyPress::KeyDown("d".into())], 1000.0 / 60.0)
        .unwrap();

    for _ in 0..600 {
        loader.tick(&[], 1000.0 / 60.0).unwrap();
    }

    let player = loader.world().player().unwrap();
    let tube = loader
        .world()
        .objects()
        .iter()
        .find(|object| object.entity().name == "tube")
        .unwrap();
    // blocked the frame it first overlaps, at most one step deep
    let speed = GameConfig::default().player_speed;
    let (right, left) = (player.entity().rect().right(), tube.entity().rect().left());
    assert!(right > left - speed && right <= left + speed);
    assert_eq!(loader.current(), 1);
}
