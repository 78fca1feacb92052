mod config;
mod dom;
mod loader;
mod network;

use infinite_gallery_core::Gallery;
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::dom::DomSurface;
use crate::network::FetchPhotoSource;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or("no global `window` exists")?;
    let config = config::load_config();

    let endpoint = config
        .endpoint()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let surface = DomSurface::mount(&config.container_id, &config.loader_id)?;
    let gallery = Gallery::new(&config, FetchPhotoSource::new(endpoint), surface);

    loader::install_scroll_listener(&window, &gallery)?;

    // First batch loads regardless of scroll position
    if gallery.begin_initial_load().is_dispatch() {
        loader::spawn_load(&gallery);
    }

    info!(
        initial = config.initial_count,
        sustained = config.sustained_count,
        "gallery started"
    );
    Ok(())
}
