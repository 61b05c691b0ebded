// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
pub mod collision;
pub mod config;
pub mod context;
pub mod engine;
mod game;
pub mod level;
pub mod loader;
pub mod object;
pub mod schedule;
pub mod sprite;
pub mod world;

#[cfg(test)]
mod testutils;

use engine::GameLoop;
use game::Platformer;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs the panic hook
/// - loads config, levels and images
/// - starts the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = GameLoop::start(Platformer::new()).await {
            error!("Could not start game: {:#}", err);
        }
    });

    Ok(())
}
