use std::cell::RefCell;
use std::rc::Rc;

use infinite_gallery_core::{ImageOutcome, PhotoEntry, SettleCallback, Surface};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlElement, HtmlImageElement};

/// DOM call failure, stringified from the thrown `JsValue`
#[derive(Debug, thiserror::Error)]
#[error("DOM error: {0}")]
pub struct DomError(String);

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self(describe_js_value(&value))
    }
}

/// Readable message for a thrown JS value
pub fn describe_js_value(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Get document helper
fn get_document() -> Option<Document> {
    window().and_then(|w| w.document())
}

fn set_attributes(el: &Element, attrs: &[(&str, &str)]) -> Result<(), JsValue> {
    for (name, value) in attrs {
        el.set_attribute(name, value)?;
    }
    Ok(())
}

/// Photo container plus loading spinner
pub struct DomSurface {
    document: Document,
    container: Element,
    loader: Option<HtmlElement>,
}

impl DomSurface {
    pub fn mount(container_id: &str, loader_id: &str) -> Result<Self, JsValue> {
        let document = get_document().ok_or("No document")?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("No #{container_id} element")))?;

        let loader = document
            .get_element_by_id(loader_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if loader.is_none() {
            warn!(loader_id, "spinner element not found");
        }

        Ok(Self {
            document,
            container,
            loader,
        })
    }
}

impl Surface for DomSurface {
    type Error = DomError;

    fn append_entry(&self, entry: &PhotoEntry, on_settled: SettleCallback) -> Result<(), DomError> {
        let anchor = self.document.create_element("a")?;
        set_attributes(
            &anchor,
            &[
                ("href", entry.href.as_str()),
                ("target", entry.target),
                ("rel", entry.rel),
            ],
        )?;

        let image = self
            .document
            .create_element("img")?
            .dyn_into::<HtmlImageElement>()
            .map_err(JsValue::from)?;
        set_attributes(&image, &[("alt", entry.label.as_str()), ("title", entry.label.as_str())])?;

        anchor.append_child(&image)?;
        self.container.append_child(&anchor)?;

        // src last: loading starts only once both listeners are attached
        watch_settle(&image, on_settled)?;
        image.set_src(&entry.src);
        Ok(())
    }

    fn hide_spinner(&self) {
        if let Some(loader) = &self.loader {
            loader.set_hidden(true);
        }
    }
}

/// Fire `on_settled` on whichever of `load` / `error` comes first
fn watch_settle(image: &HtmlImageElement, on_settled: SettleCallback) -> Result<(), JsValue> {
    let slot = Rc::new(RefCell::new(Some(on_settled)));

    for (event, outcome) in [("load", ImageOutcome::Loaded), ("error", ImageOutcome::Failed)] {
        let slot = slot.clone();
        let callback = Closure::wrap(Box::new(move || {
            let settle = slot.borrow_mut().take();
            if let Some(settle) = settle {
                settle(outcome);
            }
        }) as Box<dyn FnMut()>);
        image.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        callback.forget();
    }
    Ok(())
}
