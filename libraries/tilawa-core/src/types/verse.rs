//! Verse text content
use serde::{Deserialize, Serialize};

/// Text and metadata for one verse
///
/// Ephemeral: refetched on every position change, never cached across positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseContent {
    /// Arabic text of the verse
    #[serde(rename = "arabic", default)]
    pub arabic_text: String,

    /// English translation of the verse
    #[serde(rename = "english", default)]
    pub english_text: String,

    /// Verse count of the verse's surah, when the provider reports it
    #[serde(rename = "numberOfAyahs", default)]
    pub surah_verse_count: Option<u16>,
}

impl VerseContent {
    /// Create verse content
    pub fn new(
        arabic_text: impl Into<String>,
        english_text: impl Into<String>,
        surah_verse_count: Option<u16>,
    ) -> Self {
        Self {
            arabic_text: arabic_text.into(),
            english_text: english_text.into(),
            surah_verse_count,
        }
    }

    /// Whether both text fields are empty
    pub fn is_empty(&self) -> bool {
        self.arabic_text.is_empty() && self.english_text.is_empty()
    }
}
