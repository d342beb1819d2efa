//! Client for the Tilawa server API.

use crate::error::{ClientError, Result};
use crate::http;
use crate::types::{
    AudioUrlResponse, ClientConfig, HealthResponse, ParseRangeRequest, RangeFields,
    SESSION_HEADER,
};
use async_trait::async_trait;
use reqwest::Client;
use tilawa_core::{PlaybackRange, Position, RangeParser, VerseContent, VerseTextProvider};
use tracing::{debug, info};

/// Client for a running Tilawa server
///
/// Every request carries the same `x-session-id`, so the server's rate limit
/// applies to this client as one caller.
///
/// # Example
///
/// ```ignore
/// use tilawa_client::{ClientConfig, TilawaClient};
/// use tilawa_core::Position;
///
/// let client = TilawaClient::new(ClientConfig::new("http://localhost:3001"))?;
/// let verse = client.verse(Position::new(89, 1)?).await?;
/// println!("{}", verse.english_text);
/// ```
#[derive(Debug, Clone)]
pub struct TilawaClient {
    http: Client,
    url: String,
    session_id: String,
}

impl TilawaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: http::build_http()?,
            url: http::normalize_url(&config.url)?,
            session_id: config
                .session_id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        })
    }

    /// Server URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Caller identity sent with every request
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/api/health", self.url);
        debug!(url = %url, "Checking server health");

        let response = http::send(self.http.get(&url)).await?;
        let health: HealthResponse = http::decode(response, "health response").await?;

        info!(status = %health.status, version = %health.version, "Connected to server");
        Ok(health)
    }

    /// Fetch the text of a verse
    pub async fn verse(&self, position: Position) -> Result<VerseContent> {
        let url = format!(
            "{}/api/verse/{}/{}",
            self.url,
            position.surah(),
            position.ayah()
        );
        debug!(url = %url, "Fetching verse");

        let response = http::send(self.get(&url)).await?;
        http::decode(response, "verse response").await
    }

    /// Ask the server to parse a range request
    pub async fn parse_range(&self, text: &str) -> Result<PlaybackRange> {
        let url = format!("{}/api/parse-range", self.url);
        debug!(url = %url, "Parsing range");

        let body = ParseRangeRequest {
            input_as_text: text.to_string(),
        };
        let response = http::send(
            self.http
                .post(&url)
                .header(SESSION_HEADER, &self.session_id)
                .json(&body),
        )
        .await?;
        let fields: RangeFields = http::decode(response, "range response").await?;
        Ok(fields.into_range()?)
    }

    /// Audio URL the server would play for a verse
    pub async fn audio_url(&self, position: Position) -> Result<String> {
        let url = format!(
            "{}/api/audio/{}/{}",
            self.url,
            position.surah(),
            position.ayah()
        );
        let response = http::send(self.get(&url)).await?;
        let audio: AudioUrlResponse = http::decode(response, "audio response").await?;
        Ok(audio.url)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.get(url).header(SESSION_HEADER, &self.session_id)
    }
}

#[async_trait]
impl VerseTextProvider for TilawaClient {
    async fn fetch_verse(&self, position: Position) -> tilawa_core::Result<VerseContent> {
        self.verse(position)
            .await
            .map_err(ClientError::into_verse_error)
    }
}

#[async_trait]
impl RangeParser for TilawaClient {
    async fn parse_range(&self, text: &str) -> tilawa_core::Result<PlaybackRange> {
        TilawaClient::parse_range(self, text)
            .await
            .map_err(ClientError::into_range_error)
    }
}
