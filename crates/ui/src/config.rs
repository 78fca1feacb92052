//! Page-provided configuration
//!
//! Reads `window.GALLERY_CONFIG` (set by the page before the module loads)
//! and lets a `?key=` URL parameter override the access key.

use infinite_gallery_core::GalleryConfig;
use tracing::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{window, UrlSearchParams};

fn read_config() -> Result<GalleryConfig, JsValue> {
    let win = window().ok_or("no window")?;
    let raw = js_sys::Reflect::get(&win, &"GALLERY_CONFIG".into())?;

    let mut config = if raw.is_undefined() || raw.is_null() {
        warn!("GALLERY_CONFIG not found, using defaults");
        GalleryConfig::default()
    } else {
        let json = String::from(js_sys::JSON::stringify(&raw)?);
        serde_json::from_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    if let Some(key) = url_param(&win, "key") {
        config.access_key = key;
    }

    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}

fn url_param(win: &web_sys::Window, name: &str) -> Option<String> {
    let search = win.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

/// Load configuration, falling back to defaults when it is invalid
pub fn load_config() -> GalleryConfig {
    read_config().unwrap_or_else(|e| {
        error!(error = ?e, "invalid GALLERY_CONFIG, using defaults");
        GalleryConfig::default()
    })
}
