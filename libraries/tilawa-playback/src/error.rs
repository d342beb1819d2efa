//! Error types for playback sequencing

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The player task has shut down
    #[error("Player is not running")]
    PlayerClosed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
