//! Fetch controller: one outbound request per call, outcome returned to the caller

use async_trait::async_trait;
use infinite_gallery_protocol::{ApiError, Batch};
use tracing::debug;

use crate::session::GallerySession;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request itself failed (connectivity, CORS, unreadable body)
    #[error("network error: {0}")]
    Network(String),
    #[error("photo API returned HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Remote supplier of random photos
///
/// Futures are not `Send`: implementations run on the browser event loop.
#[async_trait(?Send)]
pub trait PhotoSource {
    async fn fetch_batch(&self, count: u32) -> Result<Batch, FetchError>;
}

pub struct FetchController<S> {
    source: S,
}

impl<S: PhotoSource> FetchController<S> {
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Request the next batch at the session's current page size
    pub async fn request_next_batch(&self, session: &GallerySession) -> Result<Batch, FetchError> {
        let count = session.page_size();
        debug!(count, "requesting photo batch");
        let batch = self.source.fetch_batch(count).await?;
        debug!(count, received = batch.len(), "photo batch received");
        Ok(batch)
    }
}
