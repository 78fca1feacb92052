//! Browser glue for the load cycle: scroll listener, load tasks, backoff timers

use std::rc::Rc;
use std::time::Duration;

use infinite_gallery_core::{Gallery, LoadOutcome, ScrollMetrics};
use tracing::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Window};

use crate::dom::{describe_js_value, DomSurface};
use crate::network::FetchPhotoSource;

pub type WebGallery = Gallery<FetchPhotoSource, DomSurface>;

/// Current scroll offset, viewport height and document height
pub fn viewport_metrics(win: &Window) -> Option<ScrollMetrics> {
    let scroll_y = win.scroll_y().ok()?;
    let inner_height = win.inner_height().ok()?.as_f64()?;
    let offset_height = f64::from(win.document()?.body()?.offset_height());
    Some(ScrollMetrics::new(scroll_y, inner_height, offset_height))
}

pub fn install_scroll_listener(win: &Window, gallery: &Rc<WebGallery>) -> Result<(), JsValue> {
    let gallery = gallery.clone();
    let win_clone = win.clone();
    let callback = Closure::wrap(Box::new(move || {
        if let Some(metrics) = viewport_metrics(&win_clone) {
            if gallery.on_scroll(&metrics).is_dispatch() {
                spawn_load(&gallery);
            }
        }
    }) as Box<dyn FnMut()>);

    win.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Run one load on the event loop. Only call after a `Dispatch` trigger.
pub fn spawn_load(gallery: &Rc<WebGallery>) {
    let gallery = gallery.clone();
    spawn_local(async move {
        match gallery.load_next().await {
            LoadOutcome::Rendered { batch, mounted } => {
                debug!(batch = %batch, mounted, "batch mounted");
            }
            LoadOutcome::Failed {
                retry_in: Some(delay),
            } => schedule_resume(gallery, delay),
            LoadOutcome::Failed { retry_in: None } => {}
        }
    });
}

/// `setTimeout` takes a signed 32-bit millisecond delay
fn timeout_ms(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

fn schedule_resume(gallery: Rc<WebGallery>, delay: Duration) {
    let Some(win) = window() else {
        return;
    };

    let win_clone = win.clone();
    let callback = Closure::once(Box::new(move || {
        // Without metrics only readiness is restored; the next scroll loads
        let metrics = viewport_metrics(&win_clone)
            .unwrap_or_else(|| ScrollMetrics::new(0.0, 0.0, f64::INFINITY));
        if gallery.resume_after_backoff(&metrics).is_dispatch() {
            spawn_load(&gallery);
        }
    }) as Box<dyn FnOnce()>);

    if let Err(e) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        timeout_ms(delay),
    ) {
        error!(error = %describe_js_value(&e), "failed to schedule retry");
    }
    callback.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_ms() {
        assert_eq!(timeout_ms(Duration::from_secs(2)), 2_000);
        assert_eq!(timeout_ms(Duration::from_secs(u64::MAX)), i32::MAX);
    }
}
