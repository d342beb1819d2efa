//! Error types for the Tilawa HTTP clients.

use thiserror::Error;
use tilawa_core::TilawaError;

/// Errors that can occur when talking to an HTTP upstream.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Upstream is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse upstream response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Rejected by the request ceiling
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Response parsed but describes an unplayable value
    #[error(transparent)]
    Core(#[from] TilawaError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Whether the error came from a request ceiling
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Map into the core error reported by a verse text provider
    pub fn into_verse_error(self) -> TilawaError {
        match self {
            Self::Core(e) => e,
            other => other.into_core(TilawaError::VerseText),
        }
    }

    /// Map into the core error reported by a range parser
    pub fn into_range_error(self) -> TilawaError {
        match self {
            Self::Core(e) => e,
            other => other.into_core(TilawaError::RangeParse),
        }
    }

    fn into_core(self, otherwise: fn(String) -> TilawaError) -> TilawaError {
        match self {
            Self::RateLimited(message) => TilawaError::RateLimited(message),
            Self::Request(e) if e.is_connect() || e.is_timeout() => {
                TilawaError::Network(e.to_string())
            }
            Self::ServerUnreachable(message) => TilawaError::Network(message),
            other => otherwise(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_survives_mapping() {
        let err = ClientError::RateLimited("slow down".into());
        assert!(err.is_rate_limited());
        assert!(err.into_range_error().is_rate_limited());
    }

    #[test]
    fn test_server_error_maps_by_operation() {
        let verse = ClientError::ServerError {
            status: 500,
            message: "boom".into(),
        }
        .into_verse_error();
        assert!(matches!(verse, TilawaError::VerseText(m) if m.contains("boom")));

        let range = ClientError::ParseError("bad json".into()).into_range_error();
        assert!(matches!(range, TilawaError::RangeParse(_)));
    }

    #[test]
    fn test_core_error_passes_through() {
        let err = ClientError::Core(TilawaError::invalid_range("start after end"));
        assert!(matches!(err.into_range_error(), TilawaError::InvalidRange(_)));
    }
}
