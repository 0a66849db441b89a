//! Error types for the playback crate.

use thiserror::Error;

/// Result type for playback operations.
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Errors that can occur while building or driving a playback.
///
/// Nothing fails while a valid script is playing; these cover
/// configuration and script validation plus internal consistency checks.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A script, step, or configuration value was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant was broken (e.g. two live timers for one owner).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A script file could not be parsed.
    #[error("script format error: {0}")]
    ScriptFormat(#[from] serde_json::Error),

    /// A script file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
