//! Common test utilities
#![allow(dead_code)] // Not every test file uses every helper

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use infinite_gallery_core::{
    Batch, FetchError, Gallery, GalleryConfig, ImageOutcome, LoadOutcome, PhotoEntry,
    PhotoRecord, PhotoSource, ScrollMetrics, SettleCallback, Surface, Trigger,
};

type Reply = Result<Batch, FetchError>;

/// Photo source whose requests stay in flight until answered
#[derive(Default)]
pub struct MockSource {
    requests: RefCell<Vec<u32>>,
    pending: RefCell<VecDeque<oneshot::Sender<Reply>>>,
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
}

impl MockSource {
    /// Counts of every request issued so far
    pub fn requests(&self) -> Vec<u32> {
        self.requests.borrow().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.get()
    }

    /// Answer the oldest outstanding request
    pub fn reply(&self, reply: Reply) -> bool {
        let sender = self.pending.borrow_mut().pop_front();
        sender.is_some_and(|tx| tx.send(reply).is_ok())
    }
}

#[async_trait(?Send)]
impl PhotoSource for MockSource {
    async fn fetch_batch(&self, count: u32) -> Result<Batch, FetchError> {
        self.requests.borrow_mut().push(count);
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push_back(tx);

        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));

        let reply = rx
            .await
            .unwrap_or_else(|_| Err(FetchError::Network("request dropped".to_string())));

        self.in_flight.set(self.in_flight.get() - 1);
        reply
    }
}

/// In-memory mount point standing in for the DOM container
#[derive(Default)]
pub struct MockSurface {
    entries: RefCell<Vec<PhotoEntry>>,
    unsettled: RefCell<Vec<SettleCallback>>,
    spinner_hides: Cell<u32>,
}

impl MockSurface {
    pub fn entries(&self) -> Vec<PhotoEntry> {
        self.entries.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn spinner_hides(&self) -> u32 {
        self.spinner_hides.get()
    }

    pub fn unsettled(&self) -> usize {
        self.unsettled.borrow().len()
    }

    /// Fire the completion signal of the oldest `n` unsettled images
    pub fn settle(&self, n: usize, outcome: ImageOutcome) {
        let callbacks: Vec<SettleCallback> = {
            let mut unsettled = self.unsettled.borrow_mut();
            let n = n.min(unsettled.len());
            unsettled.drain(..n).collect()
        };
        for callback in callbacks {
            callback(outcome);
        }
    }

    pub fn settle_all(&self, outcome: ImageOutcome) {
        self.settle(usize::MAX, outcome);
    }
}

impl Surface for MockSurface {
    type Error = String;

    fn append_entry(&self, entry: &PhotoEntry, on_settled: SettleCallback) -> Result<(), String> {
        self.entries.borrow_mut().push(entry.clone());
        self.unsettled.borrow_mut().push(on_settled);
        Ok(())
    }

    fn hide_spinner(&self) {
        self.spinner_hides.set(self.spinner_hides.get() + 1);
    }
}

pub type MockGallery = Gallery<MockSource, MockSurface>;

/// Single-threaded event loop driving a gallery
pub struct Harness {
    pool: LocalPool,
    pub gallery: Rc<MockGallery>,
    outcomes: Rc<RefCell<Vec<LoadOutcome>>>,
}

/// Route gallery logs to the test output (shown for failing tests)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

impl Harness {
    pub fn new(config: &GalleryConfig) -> Self {
        init_tracing();
        Self {
            pool: LocalPool::new(),
            gallery: Gallery::new(config, MockSource::default(), MockSurface::default()),
            outcomes: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&GalleryConfig::default())
    }

    pub fn source(&self) -> &MockSource {
        self.gallery.source()
    }

    pub fn surface(&self) -> &MockSurface {
        self.gallery.surface()
    }

    pub fn outcomes(&self) -> Vec<LoadOutcome> {
        self.outcomes.borrow().clone()
    }

    pub fn start(&mut self) -> Trigger {
        let trigger = self.gallery.begin_initial_load();
        self.dispatch(trigger);
        trigger
    }

    pub fn scroll(&mut self, metrics: ScrollMetrics) -> Trigger {
        let trigger = self.gallery.on_scroll(&metrics);
        self.dispatch(trigger);
        trigger
    }

    pub fn resume(&mut self, metrics: ScrollMetrics) -> Trigger {
        let trigger = self.gallery.resume_after_backoff(&metrics);
        self.dispatch(trigger);
        trigger
    }

    /// Answer the oldest request and let the loop run
    pub fn reply(&mut self, reply: Result<Batch, FetchError>) {
        assert!(self.source().reply(reply), "no request in flight");
        self.pool.run_until_stalled();
    }

    fn dispatch(&mut self, trigger: Trigger) {
        if trigger.is_dispatch() {
            let gallery = self.gallery.clone();
            let outcomes = self.outcomes.clone();
            self.pool
                .spawner()
                .spawn_local(async move {
                    let outcome = gallery.load_next().await;
                    outcomes.borrow_mut().push(outcome);
                })
                .expect("spawn load");
        }
        self.pool.run_until_stalled();
    }
}

pub fn photos(n: usize) -> Batch {
    (0..n)
        .map(|i| {
            PhotoRecord::new(
                format!("https://images.example/{i}?w=1080"),
                format!("https://unsplash.com/photos/{i}"),
                Some("a photo"),
            )
        })
        .collect()
}

/// 500 units above the bottom
pub const fn near_bottom() -> ScrollMetrics {
    ScrollMetrics::new(3_500.0, 800.0, 4_800.0)
}

pub const fn top_of_long_page() -> ScrollMetrics {
    ScrollMetrics::new(0.0, 800.0, 20_000.0)
}
