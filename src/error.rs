/// Error types shared across the gallery
///
/// Engine code (sorting, pagination) is total and never fails.
/// Only the collaborators that touch the outside world return these.
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain the picture list
#[derive(Debug, Error)]
pub enum FetchError {
    /// The payload could not be read at all
    #[error("failed to read picture data: {0}")]
    Io(#[from] std::io::Error),

    /// The fetch did not complete within its bound
    #[error("picture data fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The source answered with a non-2xx status
    #[error("picture data request failed with status {0}")]
    Status(u16),

    /// The payload is not a JSON array of records
    #[error("malformed picture data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure to load a single tile thumbnail
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The loader has nothing it could resolve the source to
    #[error("image source not found: {0}")]
    MissingSource(String),
}

/// Failure to read or validate the gallery configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
