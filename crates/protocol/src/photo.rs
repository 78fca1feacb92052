use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Image renditions of a photo. Only the display size is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
}

/// Outbound links of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoLinks {
    /// Photo page on the provider's site
    pub html: String,
}

/// A photo as returned by the API
///
/// Unknown fields are ignored; the gallery only needs the display URL,
/// the click-through URL and the caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub urls: PhotoUrls,
    pub links: PhotoLinks,
    #[serde(default)]
    pub alt_description: Option<String>,
}

impl PhotoRecord {
    /// Build a record from the three consumed fields
    pub fn new(
        display_url: impl Into<String>,
        link_url: impl Into<String>,
        caption: Option<&str>,
    ) -> Self {
        Self {
            id: None,
            urls: PhotoUrls {
                regular: display_url.into(),
            },
            links: PhotoLinks {
                html: link_url.into(),
            },
            alt_description: caption.map(ToString::to_string),
        }
    }

    pub fn display_url(&self) -> &str {
        &self.urls.regular
    }

    pub fn link_url(&self) -> &str {
        &self.links.html
    }

    /// Caption, treating an empty string the same as a missing one
    pub fn caption(&self) -> Option<&str> {
        self.alt_description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Ordered photos delivered by one request
pub type Batch = Vec<PhotoRecord>;

/// Decode a `photos/random` response body
///
/// Accepts the array returned when `count` is set, a bare photo object
/// (the endpoint's shape without `count`), and the `{"errors": [...]}`
/// payload the API sends on rejection.
pub fn parse_batch(body: &str) -> Result<Batch, ApiError> {
    let value: Value = serde_json::from_str(body)?;

    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(ref map) if map.contains_key("errors") => {
            let messages: Vec<String> = map
                .get("errors")
                .and_then(Value::as_array)
                .map(|errs| {
                    errs.iter()
                        .map(|e| e.as_str().map_or_else(|| e.to_string(), ToString::to_string))
                        .collect()
                })
                .unwrap_or_default();
            Err(ApiError::Rejected(messages))
        }
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(ApiError::UnexpectedShape(json_kind(&other))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
