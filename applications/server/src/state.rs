/// Shared application state
use crate::{
    config::ServerConfig,
    error::{Result, ServerError},
    middleware::RateLimiter,
};
use std::sync::Arc;
use tilawa_client::{OpenAiRangeParser, QuranCloudClient};
use tilawa_core::{AudioSource, RangeParser, VerseTextProvider};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub verse_provider: Arc<dyn VerseTextProvider>,
    pub range_parser: Arc<dyn RangeParser>,
    pub rate_limiter: Arc<RateLimiter>,
    pub audio: Arc<AudioSource>,
}

impl AppState {
    pub fn new(
        verse_provider: Arc<dyn VerseTextProvider>,
        range_parser: Arc<dyn RangeParser>,
        rate_limiter: Arc<RateLimiter>,
        audio: AudioSource,
    ) -> Self {
        Self {
            verse_provider,
            range_parser,
            rate_limiter,
            audio: Arc::new(audio),
        }
    }

    /// Build the upstream clients described by `config`
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let verse_provider = QuranCloudClient::new(config.quran.clone())
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let range_parser = OpenAiRangeParser::new(config.openai.clone())
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let rate_limiter = RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window(),
        );

        Ok(Self::new(
            Arc::new(verse_provider),
            Arc::new(range_parser),
            Arc::new(rate_limiter),
            config.audio.source(),
        ))
    }
}
