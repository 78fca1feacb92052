/// Errors decoding or addressing the photo API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(&'static str),
    #[error("API rejected request: {}", .0.join("; "))]
    Rejected(Vec<String>),
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}
