//! Load cycle: scroll trigger → fetch → render → settle → ready

use std::rc::{Rc, Weak};
use std::time::Duration;

use infinite_gallery_protocol::PhotoRecord;
use tracing::{debug, error, info, warn};

use crate::backoff::Backoff;
use crate::config::{GalleryConfig, RecoveryPolicy};
use crate::fetch::{FetchController, PhotoSource};
use crate::render::{Renderer, SettleCallback, Surface};
use crate::scroll::{IgnoreReason, ScrollGate, ScrollMetrics, Trigger};
use crate::session::GallerySession;
use crate::tracker::{BatchId, ImageOutcome};

/// Result of one [`Gallery::load_next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered { batch: BatchId, mounted: usize },
    /// Fetch failed. `retry_in` is set when the session is cooling down
    /// and the host should call [`Gallery::resume_after_backoff`].
    Failed { retry_in: Option<Duration> },
}

pub struct Gallery<S, V> {
    session: GallerySession,
    controller: FetchController<S>,
    renderer: Renderer,
    surface: V,
    gate: ScrollGate,
    recovery: RecoveryPolicy,
    backoff: Backoff,
}

impl<S, V> Gallery<S, V>
where
    S: PhotoSource + 'static,
    V: Surface + 'static,
{
    pub fn new(config: &GalleryConfig, source: S, surface: V) -> Rc<Self> {
        Rc::new(Self {
            session: GallerySession::new(config.initial_count, config.sustained_count),
            controller: FetchController::new(source),
            renderer: Renderer::new(config.fallback_caption.clone()),
            surface,
            gate: ScrollGate::new(config.scroll_threshold),
            recovery: config.recovery,
            backoff: config.backoff(),
        })
    }

    pub const fn session(&self) -> &GallerySession {
        &self.session
    }

    pub const fn surface(&self) -> &V {
        &self.surface
    }

    pub const fn source(&self) -> &S {
        self.controller.source()
    }

    /// Startup fetch, independent of scroll position
    pub fn begin_initial_load(&self) -> Trigger {
        if self.session.begin_initial() {
            info!(count = self.session.page_size(), "loading first batch");
            Trigger::Dispatch
        } else {
            Trigger::Ignored(IgnoreReason::Busy)
        }
    }

    /// Scroll handler. On [`Trigger::Dispatch`] the host must run
    /// [`Self::load_next`]; anything else is a no-op.
    pub fn on_scroll(&self, metrics: &ScrollMetrics) -> Trigger {
        if !self.gate.is_near_bottom(metrics) {
            return Trigger::Ignored(IgnoreReason::NotNearBottom);
        }
        if !self.session.try_acquire() {
            return Trigger::Ignored(IgnoreReason::Busy);
        }
        debug!(remaining = metrics.remaining(), "near bottom, loading more");
        Trigger::Dispatch
    }

    /// Fetch the next batch and render it, or apply the recovery policy
    pub async fn load_next(self: &Rc<Self>) -> LoadOutcome {
        match self.controller.request_next_batch(&self.session).await {
            Ok(batch) => {
                let (id, mounted) = self.render(&batch);
                LoadOutcome::Rendered { batch: id, mounted }
            }
            Err(e) => {
                error!(error = %e, "error fetching photos");
                let failures = self.session.fail(self.recovery);
                match self.recovery {
                    RecoveryPolicy::Backoff => {
                        let delay = self.backoff.delay(failures);
                        warn!(failures, ?delay, "retrying after backoff");
                        LoadOutcome::Failed {
                            retry_in: Some(delay),
                        }
                    }
                    RecoveryPolicy::Stall => {
                        warn!("loading stopped after failed fetch");
                        LoadOutcome::Failed { retry_in: None }
                    }
                }
            }
        }
    }

    /// Start a render pass: reset the load counter and mount every record
    pub fn render(self: &Rc<Self>, records: &[PhotoRecord]) -> (BatchId, usize) {
        let batch = self.session.begin_render(records.len());
        let weak = Rc::downgrade(self);
        let mounted = self
            .renderer
            .render(&self.surface, batch, records, || settle_callback(&weak, batch));

        if let Some(settled) = self.session.settle_if_complete(batch) {
            self.on_batch_settled(settled.batch, settled.hide_spinner);
        }
        (batch, mounted)
    }

    /// Image completion signal for an entry of `batch`
    pub fn image_settled(&self, batch: BatchId, outcome: ImageOutcome) {
        if outcome == ImageOutcome::Failed {
            warn!(batch = %batch, "image failed to load");
        }
        if let Some(settled) = self.session.settle(batch, outcome) {
            if settled.failed_images > 0 {
                warn!(batch = %batch, failed = settled.failed_images, "batch settled with failed images");
            }
            self.on_batch_settled(settled.batch, settled.hide_spinner);
        }
    }

    fn on_batch_settled(&self, batch: BatchId, hide_spinner: bool) {
        if hide_spinner {
            self.surface.hide_spinner();
        }
        info!(batch = %batch, next_count = self.session.page_size(), "batch settled, ready for more");
    }

    /// Backoff elapsed: become ready and re-check the scroll position so
    /// an empty or short page loads again without user input
    pub fn resume_after_backoff(&self, metrics: &ScrollMetrics) -> Trigger {
        if !self.session.resume() {
            return Trigger::Ignored(IgnoreReason::Busy);
        }
        self.on_scroll(metrics)
    }
}

fn settle_callback<S, V>(gallery: &Weak<Gallery<S, V>>, batch: BatchId) -> SettleCallback
where
    S: PhotoSource + 'static,
    V: Surface + 'static,
{
    let gallery = gallery.clone();
    Box::new(move |outcome: ImageOutcome| {
        if let Some(gallery) = gallery.upgrade() {
            gallery.image_settled(batch, outcome);
        }
    })
}
