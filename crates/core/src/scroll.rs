//! Scroll-position gate for loading the next batch

/// Viewport snapshot taken on a scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// `window.scrollY`
    pub scroll_y: f64,
    /// `window.innerHeight`
    pub inner_height: f64,
    /// `document.body.offsetHeight`
    pub offset_height: f64,
}

impl ScrollMetrics {
    pub const fn new(scroll_y: f64, inner_height: f64, offset_height: f64) -> Self {
        Self {
            scroll_y,
            inner_height,
            offset_height,
        }
    }

    /// Distance between the bottom of the viewport and the end of the document
    pub fn remaining(&self) -> f64 {
        self.offset_height - (self.scroll_y + self.inner_height)
    }
}

/// Why a scroll event did not start a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotNearBottom,
    /// A fetch is in flight, a batch is rendering, or loading is paused
    Busy,
}

/// Decision for one scroll event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Readiness was taken; the host must run the load
    Dispatch,
    Ignored(IgnoreReason),
}

impl Trigger {
    pub const fn is_dispatch(self) -> bool {
        matches!(self, Self::Dispatch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGate {
    threshold: f64,
}

impl ScrollGate {
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// `scroll_y + inner_height >= offset_height - threshold`
    pub fn is_near_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics.scroll_y + metrics.inner_height >= metrics.offset_height - self.threshold
    }
}

impl Default for ScrollGate {
    fn default() -> Self {
        Self::new(1000.0)
    }
}
