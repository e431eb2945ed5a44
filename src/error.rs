//! Error types for the presentation runtime

use thiserror::Error;

/// Result type alias for presenter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while presenting hero media
#[derive(Error, Debug)]
pub enum Error {
    /// The media subsystem reported a load failure (network/codec)
    #[error("media load failed: {0}")]
    Load(String),

    /// The deadline elapsed with insufficient data
    #[error("media load timed out after {0}ms")]
    Timeout(u64),

    /// Playback was refused after a successful load (autoplay policy).
    /// Non-fatal: a paused first frame still counts as shown.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The presenter worker thread is gone or never came up
    #[error("presenter worker unavailable: {0}")]
    Worker(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
