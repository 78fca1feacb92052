//! Turns photo records into link-wrapped image entries on a [`Surface`]

use infinite_gallery_protocol::PhotoRecord;
use tracing::warn;

use crate::tracker::{BatchId, ImageOutcome};

/// Links open in a new browsing context
pub const LINK_TARGET: &str = "_blank";
/// No `window.opener` handle and no referrer for the opened page
pub const LINK_REL: &str = "noopener noreferrer";

/// One `<a><img></a>` pair, ready to be mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub href: String,
    pub target: &'static str,
    pub rel: &'static str,
    pub src: String,
    /// Used for both `alt` and `title`
    pub label: String,
}

impl PhotoEntry {
    pub fn from_record(record: &PhotoRecord, fallback_caption: &str) -> Self {
        Self {
            href: record.link_url().to_string(),
            target: LINK_TARGET,
            rel: LINK_REL,
            src: record.display_url().to_string(),
            label: record.caption().unwrap_or(fallback_caption).to_string(),
        }
    }
}

/// Fired once when the image of an entry finishes loading or fails
pub type SettleCallback = Box<dyn FnOnce(ImageOutcome)>;

/// Where entries are mounted
pub trait Surface {
    type Error: std::fmt::Display;

    /// Append `entry` after every existing entry. `on_settled` must be
    /// invoked at most once, when the image loads or fails.
    fn append_entry(&self, entry: &PhotoEntry, on_settled: SettleCallback)
        -> Result<(), Self::Error>;

    fn hide_spinner(&self);
}

pub struct Renderer {
    fallback_caption: String,
}

impl Renderer {
    pub fn new(fallback_caption: impl Into<String>) -> Self {
        Self {
            fallback_caption: fallback_caption.into(),
        }
    }

    /// Append every record of the batch in order. Returns how many entries
    /// were mounted; entries the surface rejects are settled as failed.
    pub fn render<V: Surface>(
        &self,
        surface: &V,
        batch: BatchId,
        records: &[PhotoRecord],
        mut settle_for: impl FnMut() -> SettleCallback,
    ) -> usize {
        let mut appended = 0;
        for record in records {
            let entry = PhotoEntry::from_record(record, &self.fallback_caption);
            match surface.append_entry(&entry, settle_for()) {
                Ok(()) => appended += 1,
                Err(e) => {
                    warn!(batch = %batch, src = %entry.src, error = %e, "failed to mount photo");
                    settle_for()(ImageOutcome::Failed);
                }
            }
        }
        appended
    }
}
