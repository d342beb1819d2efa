/// Core error types for Tilawa
use thiserror::Error;

/// Result type alias using `TilawaError`
pub type Result<T> = std::result::Result<T, TilawaError>;

/// Core error type for Tilawa
#[derive(Error, Debug)]
pub enum TilawaError {
    /// Surah number outside 1..=114
    #[error("Invalid surah: {0}")]
    InvalidSurah(u16),

    /// Ayah number outside the surah's verse count
    #[error("Invalid ayah {ayah} for surah {surah}")]
    InvalidAyah {
        /// Surah the ayah was looked up in
        surah: u16,
        /// Out-of-range ayah number
        ayah: u16,
    },

    /// Range bounds that cannot be played
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Verse text could not be fetched or decoded
    #[error("Verse text error: {0}")]
    VerseText(String),

    /// Range parsing (AI) failed
    #[error("Range parse error: {0}")]
    RangeParse(String),

    /// Range parsing was rejected by the upstream request ceiling
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Audio transport could not start or control playback
    #[error("Audio error: {0}")]
    Audio(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl TilawaError {
    /// Create a verse text error
    pub fn verse_text(msg: impl Into<String>) -> Self {
        Self::VerseText(msg.into())
    }

    /// Create a range parse error
    pub fn range_parse(msg: impl Into<String>) -> Self {
        Self::RangeParse(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create an invalid range error
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Whether this error is a rate-limit rejection rather than a failure
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
