//! Per-batch completion tracking
//!
//! Counts settled images against the batch size and reports completion once.

use std::fmt;

/// Identifies one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an image finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Loaded,
    /// Decode or network failure; still counts as settled
    Failed,
}

/// Result of recording one settled image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending { loaded: usize, total: usize },
    /// Reported exactly once, by the image that completes the batch
    Complete,
    /// Signal arrived after completion
    Overflow,
}

/// (loaded, total) for the current batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTracker {
    batch: BatchId,
    loaded: usize,
    failed: usize,
    total: usize,
}

impl LoadTracker {
    pub const fn new(batch: BatchId, total: usize) -> Self {
        Self {
            batch,
            loaded: 0,
            failed: 0,
            total,
        }
    }

    pub const fn batch(&self) -> BatchId {
        self.batch
    }

    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    pub const fn total(&self) -> usize {
        self.total
    }

    pub const fn failed(&self) -> usize {
        self.failed
    }

    pub const fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    pub fn record(&mut self, outcome: ImageOutcome) -> Progress {
        if self.is_complete() {
            return Progress::Overflow;
        }
        self.loaded += 1;
        if outcome == ImageOutcome::Failed {
            self.failed += 1;
        }
        if self.is_complete() {
            Progress::Complete
        } else {
            Progress::Pending {
                loaded: self.loaded,
                total: self.total,
            }
        }
    }
}
