//! Photo API wire types for infinite-gallery
//!
//! Defines the JSON shapes returned by the Unsplash `photos/random` endpoint
//! and the request URL consumed by the UI.

pub mod endpoint;
pub mod error;
pub mod photo;

pub use endpoint::*;
pub use error::*;
pub use photo::*;
