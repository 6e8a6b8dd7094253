//! World Tree WASM Web Runtime
//!
//! Binds browser keyboard, pointer and wheel events to the free camera and
//! steps it once per animation frame. The page's renderer reads the camera
//! pose back every frame; lighting, bloom, assets and the chat overlay stay
//! on the JavaScript side.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod timer;
pub mod events;
pub mod loading;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point, called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("World Tree web runtime initialized");
}

/// Create a new application instance bound to a canvas.
///
/// `config_json` is an optional JSON camera config; missing fields take defaults.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn create_app(canvas_id: String, config_json: Option<String>) -> Result<app::App, JsValue> {
    let app = app::App::new(&canvas_id, config_json)?;
    Ok(app)
}
