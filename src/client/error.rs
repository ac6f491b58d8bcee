use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The network failed and nothing usable was cached.
    #[error("no connection")]
    Offline,

    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid input")]
    Validation(#[from] ValidationErrors),

    #[error("unknown product {0}")]
    UnknownProduct(Uuid),

    #[error("already reviewed, try again after {retry_at}")]
    Throttled { retry_at: DateTime<Utc> },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("local storage: {0}")]
    Storage(String),
}
