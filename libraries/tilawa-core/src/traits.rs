/// Collaborator traits for Tilawa
///
/// The sequencer talks to the outside world only through these seams: verse
/// text comes from a `VerseTextProvider`, ranges from a `RangeParser`, and
/// audio goes out through an `AudioTransport`.
use crate::error::Result;
use crate::text::normalize_verse_text;
use crate::types::{PlaybackRange, Position, VerseContent};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Source of verse text and translation
///
/// Implementations must be idempotent and free of caller-visible side effects.
/// No caching is expected; callers refetch on every position change.
#[async_trait]
pub trait VerseTextProvider: Send + Sync {
    /// Fetch Arabic text, translation and surah verse count for a verse
    ///
    /// # Errors
    /// Returns an error if the upstream source is unreachable or returns malformed data
    async fn fetch_verse(&self, position: Position) -> Result<VerseContent>;
}

/// Turns free-form text into a structured playback range
#[async_trait]
pub trait RangeParser: Send + Sync {
    /// Parse a request such as "repeat verses 1 to 5 of surah 89 three times"
    ///
    /// # Errors
    /// Returns `TilawaError::RateLimited` when the request ceiling is hit and
    /// `TilawaError::RangeParse` when the text cannot be turned into a range
    async fn parse_range(&self, text: &str) -> Result<PlaybackRange>;
}

/// One-shot completion callback handed to the audio transport
///
/// Carries the generation of the cue it belongs to so late completions from a
/// superseded resource can be told apart from the current one.
pub struct CompletionSignal {
    generation: u64,
    notify: Box<dyn FnOnce(u64) + Send + 'static>,
}

impl CompletionSignal {
    /// Create a signal for the given cue generation
    pub fn new(generation: u64, notify: impl FnOnce(u64) + Send + 'static) -> Self {
        Self {
            generation,
            notify: Box::new(notify),
        }
    }

    /// Generation of the cue this signal completes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Report that the resource finished playing
    pub fn finished(self) {
        (self.notify)(self.generation);
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Plays a single audio resource at a time
///
/// Starting a new resource supersedes whatever was loaded before.
#[async_trait]
pub trait AudioTransport: Send + Sync {
    /// Load and start the resource at `url`
    ///
    /// The transport calls `completion.finished()` once when the resource ends.
    ///
    /// # Errors
    /// Returns an error if playback cannot start (e.g. resource not found)
    async fn play(&self, url: &str, completion: CompletionSignal) -> Result<()>;

    /// Pause the current resource
    async fn pause(&self) -> Result<()>;

    /// Resume the current resource from where it was paused
    async fn resume(&self) -> Result<()>;

    /// Stop and unload the current resource
    async fn stop(&self) -> Result<()>;
}

#[async_trait]
impl<T: VerseTextProvider + ?Sized> VerseTextProvider for Arc<T> {
    async fn fetch_verse(&self, position: Position) -> Result<VerseContent> {
        (**self).fetch_verse(position).await
    }
}

#[async_trait]
impl<T: RangeParser + ?Sized> RangeParser for Arc<T> {
    async fn parse_range(&self, text: &str) -> Result<PlaybackRange> {
        (**self).parse_range(text).await
    }
}

#[async_trait]
impl<T: AudioTransport + ?Sized> AudioTransport for Arc<T> {
    async fn play(&self, url: &str, completion: CompletionSignal) -> Result<()> {
        (**self).play(url, completion).await
    }

    async fn pause(&self) -> Result<()> {
        (**self).pause().await
    }

    async fn resume(&self) -> Result<()> {
        (**self).resume().await
    }

    async fn stop(&self) -> Result<()> {
        (**self).stop().await
    }
}

/// Provider decorator that normalizes the Arabic text of every fetched verse
pub struct NormalizingProvider<P> {
    inner: P,
}

impl<P: VerseTextProvider> NormalizingProvider<P> {
    /// Wrap a provider
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: VerseTextProvider> VerseTextProvider for NormalizingProvider<P> {
    async fn fetch_verse(&self, position: Position) -> Result<VerseContent> {
        let mut verse = self.inner.fetch_verse(position).await?;
        verse.arabic_text = normalize_verse_text(&verse.arabic_text, position);
        Ok(verse)
    }
}
