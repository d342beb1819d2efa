/// Common test utilities and fixtures
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tilawa_core::{
    AudioSource, PlaybackRange, Position, RangeParser, Result, TilawaError, VerseContent,
    VerseTextProvider,
};
use tilawa_server::{AppState, RateLimiter};

/// Provider returning canned text, or failing for one surah
pub struct StubProvider {
    pub failing_surah: Option<u16>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl VerseTextProvider for StubProvider {
    async fn fetch_verse(&self, position: Position) -> Result<VerseContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_surah == Some(position.surah()) {
            return Err(TilawaError::verse_text("upstream returned 503"));
        }
        Ok(VerseContent::new(
            fixtures::ARABIC,
            fixtures::ENGLISH,
            Some(position.surah_verse_count()),
        ))
    }
}

/// Parser that understands a handful of fixed phrases
pub struct StubParser {
    pub calls: AtomicUsize,
}

#[async_trait]
impl RangeParser for StubParser {
    async fn parse_range(&self, text: &str) -> Result<PlaybackRange> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match text {
            fixtures::FAJR_REQUEST => PlaybackRange::new(89, 1, 5, 2, 3),
            fixtures::BACKWARDS_REQUEST => PlaybackRange::new(89, 5, 1, 1, 1),
            fixtures::QUOTA_REQUEST => Err(TilawaError::RateLimited("quota".into())),
            _ => Err(TilawaError::range_parse("model returned no range")),
        }
    }
}

/// Test app state with stub upstreams
pub struct TestApp {
    pub state: AppState,
    pub provider: Arc<StubProvider>,
    pub parser: Arc<StubParser>,
}

pub fn create_test_state() -> TestApp {
    create_test_state_with_limit(5, Duration::from_secs(60))
}

pub fn create_test_state_with_limit(max_requests: u32, window: Duration) -> TestApp {
    let provider = Arc::new(StubProvider {
        failing_surah: Some(fixtures::FAILING_SURAH),
        calls: AtomicUsize::new(0),
    });
    let parser = Arc::new(StubParser {
        calls: AtomicUsize::new(0),
    });
    let state = AppState::new(
        provider.clone(),
        parser.clone(),
        Arc::new(RateLimiter::new(max_requests, window)),
        AudioSource::default(),
    );

    TestApp {
        state,
        provider,
        parser,
    }
}

/// Test fixtures
pub mod fixtures {
    pub const ARABIC: &str = "وَٱلْفَجْرِ";
    pub const ENGLISH: &str = "CONSIDER the daybreak";
    pub const FAILING_SURAH: u16 = 2;

    pub const FAJR_REQUEST: &str = "al-fajr 1 to 5, each twice, three times over";
    pub const BACKWARDS_REQUEST: &str = "al-fajr from 5 down to 1";
    pub const QUOTA_REQUEST: &str = "anything while the model quota is exhausted";
}
