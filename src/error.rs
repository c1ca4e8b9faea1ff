use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Bus error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single fetch of an external source did not produce a value.
///
/// A failed fetch never clears the value already held by the source; the
/// refresher logs the error and retries on its normal cadence.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Missing field `{0}` in response")]
    MissingField(&'static str),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Service reported an error: {0}")]
    Remote(String),

    #[error("No upcoming high tide in predictions")]
    NoHighTide,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClusterError>;
