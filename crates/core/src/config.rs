//! Gallery configuration
//!
//! Pages provide overrides as a JSON object (`window.GALLERY_CONFIG`);
//! every field falls back to its default.

use std::time::Duration;

use infinite_gallery_protocol::{PhotoEndpoint, DEFAULT_API_BASE, MAX_COUNT};
use serde::{Deserialize, Serialize};

use crate::backoff::Backoff;

/// What happens to readiness after a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryPolicy {
    /// Cool down, then become ready again
    #[default]
    Backoff,
    /// Stop loading for the rest of the session
    Stall,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be between 1 and {max}, got {value}", max = MAX_COUNT)]
    CountOutOfRange { field: &'static str, value: u32 },
    #[error("initialCount ({initial}) exceeds sustainedCount ({sustained})")]
    CountsInverted { initial: u32, sustained: u32 },
    #[error("scrollThreshold must be a non-negative number, got {0}")]
    BadThreshold(f64),
    #[error("apiBase must not be empty")]
    EmptyApiBase,
}

/// Full gallery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    pub api_base: String,
    pub access_key: String,
    /// Photos requested before the first batch has settled
    pub initial_count: u32,
    /// Photos requested once the first batch has settled
    pub sustained_count: u32,
    /// Distance from the document bottom that triggers the next fetch
    pub scroll_threshold: f64,
    /// Image label used when a photo has no caption
    pub fallback_caption: String,
    pub container_id: String,
    pub loader_id: String,
    pub recovery: RecoveryPolicy,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_key: String::new(),
            initial_count: 5,
            sustained_count: 30,
            scroll_threshold: 1000.0,
            fallback_caption: "Unsplash Image".to_string(),
            container_id: "image-container".to_string(),
            loader_id: "loader".to_string(),
            recovery: RecoveryPolicy::Backoff,
            backoff_base_ms: 1_000,
            backoff_max_ms: 30_000,
        }
    }
}

impl GalleryConfig {
    /// Parse and validate a JSON config object
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("initialCount", self.initial_count),
            ("sustainedCount", self.sustained_count),
        ] {
            if value == 0 || value > MAX_COUNT {
                return Err(ConfigError::CountOutOfRange { field, value });
            }
        }
        if self.initial_count > self.sustained_count {
            return Err(ConfigError::CountsInverted {
                initial: self.initial_count,
                sustained: self.sustained_count,
            });
        }
        if !self.scroll_threshold.is_finite() || self.scroll_threshold < 0.0 {
            return Err(ConfigError::BadThreshold(self.scroll_threshold));
        }
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::EmptyApiBase);
        }
        if self.access_key.is_empty() {
            tracing::warn!("no accessKey configured, photo requests will be rejected");
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Result<PhotoEndpoint, infinite_gallery_protocol::ApiError> {
        PhotoEndpoint::new(&self.api_base, self.access_key.clone())
    }

    pub const fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
        )
    }
}
