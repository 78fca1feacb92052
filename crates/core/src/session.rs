//! Per-page session state
//!
//! Holds the ready flag (as an explicit [`Phase`]), the current request
//! size, and the load tracker of the batch being rendered. Lives for one
//! page session and is only touched from the event loop thread.

use std::cell::{Cell, RefCell};

use tracing::{debug, warn};

use crate::config::RecoveryPolicy;
use crate::tracker::{BatchId, ImageOutcome, LoadTracker, Progress};

/// Where the load cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, startup fetch not issued yet
    Starting,
    /// A request is in flight
    Fetching,
    /// Waiting for every image of the batch to settle
    Rendering(BatchId),
    /// Ready: the next qualifying scroll may fetch
    Idle,
    /// A fetch failed; waiting out the backoff delay
    CoolingDown,
    /// A fetch failed and loading stopped for good
    Stalled,
}

/// Emitted once when the batch under render has fully settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettled {
    pub batch: BatchId,
    pub failed_images: usize,
    /// First settled batch of the session: the spinner goes away now
    pub hide_spinner: bool,
}

pub struct GallerySession {
    phase: Cell<Phase>,
    initial_count: u32,
    sustained_count: u32,
    upgraded: Cell<bool>,
    tracker: RefCell<Option<LoadTracker>>,
    next_batch: Cell<u64>,
    consecutive_failures: Cell<u32>,
    total_failures: Cell<u32>,
    spinner_hidden: Cell<bool>,
}

impl GallerySession {
    pub const fn new(initial_count: u32, sustained_count: u32) -> Self {
        Self {
            phase: Cell::new(Phase::Starting),
            initial_count,
            sustained_count,
            upgraded: Cell::new(false),
            tracker: RefCell::new(None),
            next_batch: Cell::new(1),
            consecutive_failures: Cell::new(0),
            total_failures: Cell::new(0),
            spinner_hidden: Cell::new(false),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// The ready flag: true only when no fetch or render is outstanding
    pub fn is_ready(&self) -> bool {
        self.phase.get() == Phase::Idle
    }

    /// Photos to request next
    pub fn page_size(&self) -> u32 {
        if self.upgraded.get() {
            self.sustained_count
        } else {
            self.initial_count
        }
    }

    /// Unconditional startup fetch. Succeeds once per session.
    pub fn begin_initial(&self) -> bool {
        if self.phase.get() == Phase::Starting {
            self.phase.set(Phase::Fetching);
            true
        } else {
            false
        }
    }

    /// Take the ready flag for a scroll-triggered fetch
    pub fn try_acquire(&self) -> bool {
        if self.phase.get() == Phase::Idle {
            self.phase.set(Phase::Fetching);
            true
        } else {
            false
        }
    }

    /// Start a render pass of `total` images, resetting the load counter
    pub fn begin_render(&self, total: usize) -> BatchId {
        let phase = self.phase.get();
        if phase != Phase::Fetching {
            warn!(?phase, "render pass started outside of a fetch");
        }

        let id = BatchId(self.next_batch.get());
        self.next_batch.set(id.0 + 1);
        *self.tracker.borrow_mut() = Some(LoadTracker::new(id, total));
        self.consecutive_failures.set(0);
        self.phase.set(Phase::Rendering(id));
        debug!(batch = %id, total, "render pass started");
        id
    }

    /// Record one settled image of `batch`
    pub fn settle(&self, batch: BatchId, outcome: ImageOutcome) -> Option<BatchSettled> {
        let progress = {
            let mut tracker = self.tracker.borrow_mut();
            match tracker.as_mut() {
                Some(t) if t.batch() == batch => t.record(outcome),
                _ => {
                    debug!(batch = %batch, "ignoring settle signal from stale batch");
                    return None;
                }
            }
        };

        match progress {
            Progress::Complete => self.complete(batch),
            Progress::Pending { .. } | Progress::Overflow => None,
        }
    }

    /// Complete `batch` if it has nothing left to settle (empty batches)
    pub fn settle_if_complete(&self, batch: BatchId) -> Option<BatchSettled> {
        let complete = self
            .tracker
            .borrow()
            .as_ref()
            .is_some_and(|t| t.batch() == batch && t.is_complete());
        if complete {
            self.complete(batch)
        } else {
            None
        }
    }

    fn complete(&self, batch: BatchId) -> Option<BatchSettled> {
        if self.phase.get() != Phase::Rendering(batch) {
            return None;
        }
        let failed_images = self
            .tracker
            .borrow_mut()
            .take()
            .map_or(0, |t| t.failed());

        self.phase.set(Phase::Idle);
        self.upgraded.set(true);
        let hide_spinner = !self.spinner_hidden.replace(true);

        Some(BatchSettled {
            batch,
            failed_images,
            hide_spinner,
        })
    }

    /// Record a failed fetch and apply `policy`. Returns the number of
    /// consecutive failures including this one.
    pub fn fail(&self, policy: RecoveryPolicy) -> u32 {
        let failures = self.consecutive_failures.get().saturating_add(1);
        self.consecutive_failures.set(failures);
        self.total_failures.set(self.total_failures.get().saturating_add(1));

        self.phase.set(match policy {
            RecoveryPolicy::Backoff => Phase::CoolingDown,
            RecoveryPolicy::Stall => Phase::Stalled,
        });
        failures
    }

    /// Leave the cooldown after a failed fetch
    pub fn resume(&self) -> bool {
        if self.phase.get() == Phase::CoolingDown {
            self.phase.set(Phase::Idle);
            true
        } else {
            false
        }
    }

    /// (loaded, total) of the batch under render
    pub fn load_counter(&self) -> Option<(usize, usize)> {
        self.tracker
            .borrow()
            .as_ref()
            .map(|t| (t.loaded(), t.total()))
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.get()
    }

    pub fn total_failures(&self) -> u32 {
        self.total_failures.get()
    }

    pub fn spinner_hidden(&self) -> bool {
        self.spinner_hidden.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendering(session: &GallerySession, total: usize) -> BatchId {
        assert!(session.begin_initial() || session.try_acquire());
        session.begin_render(total)
    }

    #[test]
    fn test_starts_not_ready() {
        let session = GallerySession::new(5, 30);
        assert_eq!(session.phase(), Phase::Starting);
        assert!(!session.is_ready());
        assert!(!session.try_acquire());
        assert_eq!(session.page_size(), 5);
    }

    #[test]
    fn test_initial_fetch_only_once() {
        let session = GallerySession::new(5, 30);
        assert!(session.begin_initial());
        assert!(!session.begin_initial());
        assert_eq!(session.phase(), Phase::Fetching);
    }

    #[test]
    fn test_full_cycle_upgrades_page_size() {
        let session = GallerySession::new(5, 30);
        let batch = rendering(&session, 2);
        assert_eq!(session.load_counter(), Some((0, 2)));
        assert!(session.settle(batch, ImageOutcome::Loaded).is_none());
        assert!(!session.is_ready());

        let settled = session.settle(batch, ImageOutcome::Failed).unwrap();
        assert_eq!(settled.failed_images, 1);
        assert!(settled.hide_spinner);
        assert!(session.is_ready());
        assert_eq!(session.page_size(), 30);
        assert_eq!(session.load_counter(), None);

        let next = rendering(&session, 1);
        let settled = session.settle(next, ImageOutcome::Loaded).unwrap();
        assert!(!settled.hide_spinner);
        assert_eq!(session.page_size(), 30);
    }

    #[test]
    fn test_stale_batch_ignored() {
        let session = GallerySession::new(5, 30);
        let first = rendering(&session, 1);
        session.settle(first, ImageOutcome::Loaded).unwrap();

        let second = rendering(&session, 2);
        assert!(session.settle(first, ImageOutcome::Loaded).is_none());
        assert_eq!(session.load_counter(), Some((0, 2)));
        assert_eq!(session.phase(), Phase::Rendering(second));
    }

    #[test]
    fn test_empty_batch() {
        let session = GallerySession::new(5, 30);
        let batch = rendering(&session, 0);
        assert!(session.settle_if_complete(batch).is_some());
        assert!(session.is_ready());
    }

    #[test]
    fn test_settle_if_complete_pending() {
        let session = GallerySession::new(5, 30);
        let batch = rendering(&session, 3);
        assert!(session.settle_if_complete(batch).is_none());
        assert_eq!(session.phase(), Phase::Rendering(batch));
    }

    #[test]
    fn test_backoff_policy_recovers() {
        let session = GallerySession::new(5, 30);
        session.begin_initial();
        assert_eq!(session.fail(RecoveryPolicy::Backoff), 1);
        assert_eq!(session.phase(), Phase::CoolingDown);
        assert!(!session.is_ready());
        assert!(session.resume());
        assert!(session.is_ready());
        assert!(!session.resume());

        session.try_acquire();
        assert_eq!(session.fail(RecoveryPolicy::Backoff), 2);
        session.resume();
        session.try_acquire();
        session.begin_render(1);
        assert_eq!(session.consecutive_failures(), 0);
        assert_eq!(session.total_failures(), 2);
    }

    #[test]
    fn test_stall_policy_never_recovers() {
        let session = GallerySession::new(5, 30);
        session.begin_initial();
        session.fail(RecoveryPolicy::Stall);
        assert_eq!(session.phase(), Phase::Stalled);
        assert!(!session.resume());
        assert!(!session.try_acquire());
        assert!(!session.begin_initial());
        assert_eq!(session.page_size(), 5);
    }
}
