//! Infinite-scroll load cycle for infinite-gallery
//!
//! Host-independent: the browser frontend supplies a [`PhotoSource`] and a
//! [`Surface`], forwards scroll and image events, and runs the futures.
//!
//! ```text
//! on_scroll ──Dispatch──▶ load_next ──▶ PhotoSource ──▶ render ──▶ Surface
//!     ▲                                                              │
//!     └──────────── ready ◀── image_settled × batch size ◀───────────┘
//! ```

pub mod backoff;
pub mod config;
pub mod fetch;
pub mod gallery;
pub mod render;
pub mod scroll;
pub mod session;
pub mod tracker;

pub use backoff::Backoff;
pub use config::{ConfigError, GalleryConfig, RecoveryPolicy};
pub use fetch::{FetchController, FetchError, PhotoSource};
pub use gallery::{Gallery, LoadOutcome};
pub use infinite_gallery_protocol::{Batch, PhotoRecord};
pub use render::{PhotoEntry, Renderer, SettleCallback, Surface, LINK_REL, LINK_TARGET};
pub use scroll::{IgnoreReason, ScrollGate, ScrollMetrics, Trigger};
pub use session::{BatchSettled, GallerySession, Phase};
pub use tracker::{BatchId, ImageOutcome, LoadTracker, Progress};
