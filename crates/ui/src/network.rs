use async_trait::async_trait;
use infinite_gallery_core::{Batch, FetchError, PhotoSource};
use infinite_gallery_protocol::{parse_batch, PhotoEndpoint};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Response};

use crate::dom::describe_js_value;

/// Photo source backed by `window.fetch`
pub struct FetchPhotoSource {
    endpoint: PhotoEndpoint,
}

impl FetchPhotoSource {
    pub const fn new(endpoint: PhotoEndpoint) -> Self {
        Self { endpoint }
    }
}

fn network_error(value: JsValue) -> FetchError {
    FetchError::Network(describe_js_value(&value))
}

#[async_trait(?Send)]
impl PhotoSource for FetchPhotoSource {
    async fn fetch_batch(&self, count: u32) -> Result<Batch, FetchError> {
        let win = window().ok_or_else(|| FetchError::Network("no window".to_string()))?;
        debug!(url = %self.endpoint.redacted_url(count), "GET");

        let resp_val = JsFuture::from(win.fetch_with_str(&self.endpoint.random_url(count)))
            .await
            .map_err(network_error)?;
        let resp: Response = resp_val.dyn_into().map_err(network_error)?;

        if !resp.ok() {
            return Err(FetchError::Status {
                status: resp.status(),
                status_text: resp.status_text(),
            });
        }

        let body = JsFuture::from(resp.text().map_err(network_error)?)
            .await
            .map_err(network_error)?
            .as_string()
            .ok_or_else(|| FetchError::Network("response body is not text".to_string()))?;

        Ok(parse_batch(&body)?)
    }
}
