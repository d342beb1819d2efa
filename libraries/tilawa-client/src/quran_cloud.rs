//! Verse text from the alquran.cloud API.

use crate::error::{ClientError, Result};
use crate::http;
use crate::types::{AyahEnvelope, QuranCloudConfig};
use async_trait::async_trait;
use reqwest::Client;
use tilawa_core::{Position, VerseContent, VerseTextProvider};
use tracing::debug;

/// Fetches Arabic text and a translation for one verse
///
/// Both editions are requested concurrently. The text is returned as the
/// upstream sends it; wrap the client in a `NormalizingProvider` for display.
#[derive(Debug, Clone)]
pub struct QuranCloudClient {
    http: Client,
    base_url: String,
    translation: String,
}

impl QuranCloudClient {
    pub fn new(config: QuranCloudConfig) -> Result<Self> {
        Ok(Self {
            http: http::build_http()?,
            base_url: http::normalize_url(&config.base_url)?,
            translation: config.translation,
        })
    }

    /// Translation edition in use
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Fetch both editions of a verse
    pub async fn get_verse(&self, position: Position) -> Result<VerseContent> {
        let arabic_url = format!("{}/v1/ayah/{}", self.base_url, position);
        let translation_url = format!("{}/{}", arabic_url, self.translation);

        let (arabic, translation) = tokio::try_join!(
            self.get_edition(&arabic_url),
            self.get_edition(&translation_url)
        )?;

        debug!(%position, "Fetched verse text");

        Ok(VerseContent::new(
            arabic.text(),
            translation.text(),
            arabic.number_of_ayahs(),
        ))
    }

    async fn get_edition(&self, url: &str) -> Result<AyahEnvelope> {
        debug!(url = %url, "Fetching verse edition");
        let response = http::send(self.http.get(url)).await?;
        http::decode(response, "verse response").await
    }
}

#[async_trait]
impl VerseTextProvider for QuranCloudClient {
    async fn fetch_verse(&self, position: Position) -> tilawa_core::Result<VerseContent> {
        self.get_verse(position)
            .await
            .map_err(ClientError::into_verse_error)
    }
}
