//! Error types for the Customer.io client.
//!
//! # Design
//! Only failures that prevent a round-trip from completing are errors. A
//! response with a non-200 status is reported as `Ok(false)` by the client,
//! and no variant carries an HTTP status.

/// Errors returned by `CustomerIo` operations and the request builder.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// DNS, connect, URL or I/O failure while talking to the API.
    #[error("transport failed: {0}")]
    Transport(#[from] Box<ureq::Error>),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}
