use url::Url;

use crate::error::ApiError;

/// Default random-photo endpoint
pub const DEFAULT_API_BASE: &str = "https://api.unsplash.com/photos/random/";

/// Largest `count` the random endpoint accepts
pub const MAX_COUNT: u32 = 30;

/// Random-photo endpoint with its access credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEndpoint {
    base: Url,
    access_key: String,
}

impl PhotoEndpoint {
    pub fn new(base: &str, access_key: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            base: Url::parse(base)?,
            access_key: access_key.into(),
        })
    }

    /// Request URL for a batch of `count` photos
    pub fn random_url(&self, count: u32) -> String {
        self.build(count, &self.access_key)
    }

    /// Same as [`Self::random_url`] with the credential masked, for logs
    pub fn redacted_url(&self, count: u32) -> String {
        self.build(count, "***")
    }

    fn build(&self, count: u32, client_id: &str) -> String {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("count", &count.to_string());
        url.into()
    }
}
