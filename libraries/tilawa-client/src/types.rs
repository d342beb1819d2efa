//! Configuration and wire types for the Tilawa HTTP clients.

use serde::{Deserialize, Serialize};
use tilawa_core::{PlaybackRange, TilawaError};

/// Default alquran.cloud API host
pub const DEFAULT_QURAN_API_URL: &str = "https://api.alquran.cloud";

/// Default translation edition
pub const DEFAULT_TRANSLATION: &str = "en.asad";

/// Default OpenAI API host
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Default model used for range parsing
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Header carrying the caller identity for rate limiting
pub const SESSION_HEADER: &str = "x-session-id";

// ===== Configuration =====

/// Settings for the alquran.cloud verse text provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuranCloudConfig {
    /// API base URL, without the `/v1` path
    #[serde(default = "default_quran_url")]
    pub base_url: String,

    /// Translation edition fetched alongside the Arabic text
    #[serde(default = "default_translation")]
    pub translation: String,
}

impl Default for QuranCloudConfig {
    fn default() -> Self {
        Self {
            base_url: default_quran_url(),
            translation: default_translation(),
        }
    }
}

fn default_quran_url() -> String {
    DEFAULT_QURAN_API_URL.to_string()
}

fn default_translation() -> String {
    DEFAULT_TRANSLATION.to_string()
}

/// Settings for the OpenAI range parser
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: String,

    /// Chat model
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, without the `/v1` path
    #[serde(default = "default_openai_url")]
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_openai_url(),
        }
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_openai_url() -> String {
    DEFAULT_OPENAI_URL.to_string()
}

/// Settings for the Tilawa server client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server URL (e.g., "http://localhost:3001")
    pub url: String,

    /// Caller identity; a random one is generated when absent
    pub session_id: Option<String>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_id: None,
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

// ===== Tilawa API =====

/// Body of `POST /api/parse-range`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseRangeRequest {
    pub input_as_text: String,
}

/// Range as produced by the AI or returned by the server, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFields {
    pub surah: i64,
    pub start_ayah: i64,
    pub end_ayah: i64,
    pub repeat_ayah_count: i64,
    pub repeat_range_count: i64,
}

impl RangeFields {
    /// Validate into a playable range
    ///
    /// Repeat counts below one mean "play once".
    pub fn into_range(self) -> tilawa_core::Result<PlaybackRange> {
        let verse = |field: &str, value: i64| {
            u16::try_from(value).map_err(|_| {
                TilawaError::invalid_range(format!("{} out of range: {}", field, value))
            })
        };
        let count = |value: i64| value.clamp(1, i64::from(u32::MAX)) as u32;

        PlaybackRange::new(
            verse("surah", self.surah)?,
            verse("startAyah", self.start_ayah)?,
            verse("endAyah", self.end_ayah)?,
            count(self.repeat_ayah_count),
            count(self.repeat_range_count),
        )
    }
}

impl From<PlaybackRange> for RangeFields {
    fn from(range: PlaybackRange) -> Self {
        Self {
            surah: range.surah().into(),
            start_ayah: range.start_ayah().into(),
            end_ayah: range.end_ayah().into(),
            repeat_ayah_count: range.repeat_ayah_count().into(),
            repeat_range_count: range.repeat_range_count().into(),
        }
    }
}

/// Error body returned by the Tilawa server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response of `GET /api/audio/{surah}/{ayah}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioUrlResponse {
    pub url: String,
}

// ===== alquran.cloud =====

/// Envelope of an alquran.cloud `/v1/ayah` response
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AyahEnvelope {
    #[serde(default)]
    pub data: Option<AyahData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AyahData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub surah: Option<AyahSurah>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AyahSurah {
    #[serde(default)]
    pub number_of_ayahs: Option<u16>,
}

impl AyahEnvelope {
    pub(crate) fn text(&self) -> String {
        self.data
            .as_ref()
            .and_then(|d| d.text.clone())
            .unwrap_or_default()
    }

    pub(crate) fn number_of_ayahs(&self) -> Option<u16> {
        self.data
            .as_ref()
            .and_then(|d| d.surah.as_ref())
            .and_then(|s| s.number_of_ayahs)
    }
}

// ===== OpenAI =====

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub response_format: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}
