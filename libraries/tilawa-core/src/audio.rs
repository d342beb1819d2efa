//! Per-verse audio addressing
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Default remote host serving per-verse recitation files
pub const DEFAULT_AUDIO_HOST: &str = "https://everyayah.com/data";

/// Default reciter directory on the audio host
pub const DEFAULT_RECITER: &str = "Alafasy_128kbps";

/// Where verse recordings live
///
/// A verse's audio is `{host}/{reciter}/{SSS}{AAA}.mp3` with the surah and
/// ayah numbers zero-padded to three digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSource {
    /// Base URL of the audio host
    pub host: String,

    /// Reciter directory name
    pub reciter: String,
}

impl AudioSource {
    /// Create an audio source for a host and reciter
    pub fn new(host: impl Into<String>, reciter: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            reciter: reciter.into(),
        }
    }

    /// File name of a verse recording, e.g. `089001.mp3`
    pub fn file_name(position: Position) -> String {
        format!("{:03}{:03}.mp3", position.surah(), position.ayah())
    }

    /// Full URL of a verse recording
    pub fn url_for(&self, position: Position) -> String {
        format!(
            "{}/{}/{}",
            self.host,
            self.reciter,
            Self::file_name(position)
        )
    }
}

impl Default for AudioSource {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIO_HOST, DEFAULT_RECITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pads_surah_and_ayah() {
        let url = AudioSource::default().url_for(Position::new(2, 255).unwrap());
        assert_eq!(url, "https://everyayah.com/data/Alafasy_128kbps/002255.mp3");
    }

    #[test]
    fn custom_reciter_and_trailing_slash() {
        let source = AudioSource::new("http://localhost:9000/audio/", "Husary_64kbps");
        let url = source.url_for(Position::new(114, 6).unwrap());
        assert_eq!(url, "http://localhost:9000/audio/Husary_64kbps/114006.mp3");
    }
}
