//! Integration tests for the async player
//!
//! Drives a real player task against in-memory verse providers and audio
//! transports, with the tokio clock paused so delays are deterministic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tilawa_core::{
    AudioTransport, CompletionSignal, PlaybackRange, Position, Result, TilawaError, VerseContent,
    VerseTextProvider,
};
use tilawa_playback::{
    PlaybackStatus, Player, PlayerConfig, PlayerHandle, PlayerSnapshot, RetryPolicy,
    SequencerEvent,
};
use tokio::sync::broadcast;

// ===== Helpers =====

/// Provider returning "text s:a" for every verse, with optional per-verse delay or failure
#[derive(Default)]
struct MockProvider {
    delays: HashMap<Position, Duration>,
    failures: Vec<Position>,
    fetches: Mutex<Vec<Position>>,
}

impl MockProvider {
    fn with_delay(mut self, position: Position, delay: Duration) -> Self {
        self.delays.insert(position, delay);
        self
    }

    fn failing_at(mut self, position: Position) -> Self {
        self.failures.push(position);
        self
    }

    fn fetch_count(&self, position: Position) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| **p == position)
            .count()
    }
}

#[async_trait]
impl VerseTextProvider for MockProvider {
    async fn fetch_verse(&self, position: Position) -> Result<VerseContent> {
        self.fetches.lock().unwrap().push(position);
        if let Some(delay) = self.delays.get(&position) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(&position) {
            return Err(TilawaError::verse_text("upstream unavailable"));
        }
        Ok(VerseContent::new(
            format!("text {}", position),
            format!("translation {}", position),
            Some(position.surah_verse_count()),
        ))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum TransportMode {
    /// Every resource finishes as soon as it starts
    AutoFinish,
    /// Completion signals are held until the test fires them
    Hold,
    /// Every start fails
    Fail,
}

struct MockTransport {
    mode: TransportMode,
    played: Mutex<Vec<String>>,
    held: Mutex<Vec<CompletionSignal>>,
    attempts: AtomicUsize,
    pauses: AtomicUsize,
    resumes: AtomicUsize,
}

impl MockTransport {
    fn new(mode: TransportMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            played: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            pauses: AtomicUsize::new(0),
            resumes: AtomicUsize::new(0),
        })
    }

    fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    /// Fire the completion of the most recently started resource
    fn finish_latest(&self) {
        let signal = self.held.lock().unwrap().pop();
        if let Some(signal) = signal {
            signal.finished();
        }
    }
}

#[async_trait]
impl AudioTransport for MockTransport {
    async fn play(&self, url: &str, completion: CompletionSignal) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            TransportMode::Fail => Err(TilawaError::audio("device unavailable")),
            TransportMode::AutoFinish => {
                self.played.lock().unwrap().push(url.to_string());
                completion.finished();
                Ok(())
            }
            TransportMode::Hold => {
                self.played.lock().unwrap().push(url.to_string());
                self.held.lock().unwrap().push(completion);
                Ok(())
            }
        }
    }

    async fn pause(&self) -> Result<()> {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

fn pos(surah: u16, ayah: u16) -> Position {
    Position::new(surah, ayah).unwrap()
}

fn url(surah: u16, ayah: u16) -> String {
    format!(
        "https://everyayah.com/data/Alafasy_128kbps/{:03}{:03}.mp3",
        surah, ayah
    )
}

fn spawn_player(
    provider: Arc<MockProvider>,
    transport: Arc<MockTransport>,
    retry: RetryPolicy,
) -> PlayerHandle {
    let config = PlayerConfig {
        retry,
        ..PlayerConfig::default()
    };
    Player::spawn(config, provider, transport)
}

async fn wait_for_snapshot(
    handle: &PlayerHandle,
    predicate: impl FnMut(&PlayerSnapshot) -> bool,
) -> PlayerSnapshot {
    let mut rx = handle.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for player state")
        .expect("player closed")
        .clone();
    snapshot
}

async fn wait_for_event(
    events: &mut broadcast::Receiver<SequencerEvent>,
    predicate: impl Fn(&SequencerEvent) -> bool,
) -> SequencerEvent {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Let spawned tasks run to quiescence
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

// ===== Startup =====

#[tokio::test(start_paused = true)]
async fn test_loads_start_verse_without_playing() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider.clone(), transport.clone(), RetryPolicy::default());

    let snapshot = wait_for_snapshot(&handle, |s| s.verse_position.is_some()).await;

    assert_eq!(snapshot.position, pos(89, 1));
    assert_eq!(snapshot.verse.arabic_text, "text 89:1");
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(!snapshot.playing);
    assert!(transport.played().is_empty());
}

// ===== Range Playback =====

#[tokio::test(start_paused = true)]
async fn test_range_plays_every_repeat_then_idles() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::AutoFinish);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());
    let mut events = handle.events();

    handle
        .start_range(PlaybackRange::new(89, 2, 4, 2, 2).unwrap())
        .unwrap();
    wait_for_event(&mut events, |e| {
        matches!(e, SequencerEvent::RangeCompleted { .. })
    })
    .await;

    let expected: Vec<String> = [2, 2, 3, 3, 4, 4, 2, 2, 3, 3, 4, 4]
        .iter()
        .map(|ayah| url(89, *ayah))
        .collect();
    assert_eq!(transport.played(), expected);

    let snapshot = wait_for_snapshot(&handle, |s| s.status == PlaybackStatus::Idle).await;
    assert_eq!(snapshot.position, pos(89, 2));
    assert!(snapshot.range.is_some());
    assert!(!snapshot.playing);
}

#[tokio::test(start_paused = true)]
async fn test_range_at_current_verse_still_plays() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider.clone(), transport.clone(), RetryPolicy::default());
    wait_for_snapshot(&handle, |s| s.verse_position.is_some()).await;

    handle
        .start_range(PlaybackRange::new(89, 1, 1, 1, 1).unwrap())
        .unwrap();
    settle().await;

    assert_eq!(transport.played(), vec![url(89, 1)]);
    assert_eq!(provider.fetch_count(pos(89, 1)), 2);
    assert_eq!(handle.snapshot().status, PlaybackStatus::Range);
}

#[tokio::test(start_paused = true)]
async fn test_manual_step_leaves_range() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle
        .start_range(PlaybackRange::new(89, 2, 4, 2, 2).unwrap())
        .unwrap();
    settle().await;
    handle.next().unwrap();

    let snapshot =
        wait_for_snapshot(&handle, |s| s.position == pos(89, 3) && s.range.is_none()).await;
    assert_eq!(snapshot.status, PlaybackStatus::Sequential);

    transport.finish_latest();
    let snapshot = wait_for_snapshot(&handle, |s| s.position == pos(89, 4)).await;
    assert!(snapshot.range.is_none());
    assert_eq!(transport.played(), vec![url(89, 2), url(89, 3), url(89, 4)]);
}

// ===== Sequential Playback =====

#[tokio::test(start_paused = true)]
async fn test_sequential_playback_crosses_surah_boundary() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.seek(pos(1, 7)).unwrap();
    handle.toggle_play().unwrap();
    settle().await;
    transport.finish_latest();

    let snapshot = wait_for_snapshot(&handle, |s| s.verse_position == Some(pos(2, 1))).await;
    assert_eq!(snapshot.position, pos(2, 1));
    assert_eq!(transport.played(), vec![url(1, 7), url(2, 1)]);
}

#[tokio::test(start_paused = true)]
async fn test_previous_wraps_to_last_surah() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.seek(pos(1, 1)).unwrap();
    handle.previous().unwrap();

    let snapshot = wait_for_snapshot(&handle, |s| s.verse_position == Some(pos(114, 6))).await;
    assert_eq!(snapshot.verse.arabic_text, "text 114:6");
    assert!(transport.played().is_empty());
}

// ===== Pause / Resume =====

#[tokio::test(start_paused = true)]
async fn test_toggle_resumes_same_verse() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.toggle_play().unwrap();
    settle().await;
    handle.toggle_play().unwrap();
    settle().await;
    assert_eq!(handle.snapshot().status, PlaybackStatus::Idle);
    assert_eq!(transport.pauses.load(Ordering::SeqCst), 1);

    handle.toggle_play().unwrap();
    settle().await;

    assert_eq!(transport.resumes.load(Ordering::SeqCst), 1);
    assert_eq!(transport.played(), vec![url(89, 1)]);
    assert!(handle.snapshot().playing);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_after_step_restarts_new_verse() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.toggle_play().unwrap();
    settle().await;
    handle.toggle_play().unwrap();
    handle.next().unwrap();
    handle.toggle_play().unwrap();
    settle().await;

    assert_eq!(transport.resumes.load(Ordering::SeqCst), 0);
    assert_eq!(transport.played(), vec![url(89, 1), url(89, 2)]);
}

// ===== Superseded Work =====

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_for_old_verse_is_discarded() {
    let provider =
        Arc::new(MockProvider::default().with_delay(pos(89, 1), Duration::from_millis(500)));
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport, RetryPolicy::default());

    handle.next().unwrap();
    wait_for_snapshot(&handle, |s| s.verse_position == Some(pos(89, 2))).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.verse_position, Some(pos(89, 2)));
    assert_eq!(snapshot.verse.arabic_text, "text 89:2");
}

#[tokio::test(start_paused = true)]
async fn test_completion_of_superseded_audio_is_ignored() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.toggle_play().unwrap();
    settle().await;
    // Take the 89:1 signal aside, then move on
    let stale = transport.held.lock().unwrap().pop().unwrap();
    handle.seek(pos(90, 5)).unwrap();
    settle().await;

    stale.finished();
    settle().await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.position, pos(90, 5));
    assert_eq!(transport.played(), vec![url(89, 1), url(90, 5)]);
}

// ===== Failures =====

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_keeps_previous_text() {
    let provider = Arc::new(MockProvider::default().failing_at(pos(89, 2)));
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.toggle_play().unwrap();
    wait_for_snapshot(&handle, |s| s.verse_position == Some(pos(89, 1))).await;
    settle().await;
    transport.finish_latest();

    let snapshot = wait_for_snapshot(&handle, |s| s.last_error.is_some()).await;
    assert_eq!(snapshot.position, pos(89, 2));
    assert_eq!(snapshot.verse_position, Some(pos(89, 1)));
    assert_eq!(snapshot.verse.arabic_text, "text 89:1");
    assert_eq!(transport.played(), vec![url(89, 1), url(89, 2)]);
}

#[tokio::test(start_paused = true)]
async fn test_audio_failure_stalls_after_retries() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Fail);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());
    let mut events = handle.events();

    handle.toggle_play().unwrap();
    wait_for_event(&mut events, |e| matches!(e, SequencerEvent::Stalled { .. })).await;

    let snapshot = wait_for_snapshot(&handle, |s| s.status == PlaybackStatus::Stalled).await;
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    assert!(!snapshot.playing);
    assert!(snapshot.last_error.is_some());

    // Toggling recovers and tries again
    handle.toggle_play().unwrap();
    wait_for_snapshot(&handle, |s| s.status == PlaybackStatus::Sequential).await;
}

#[tokio::test(start_paused = true)]
async fn test_browsing_after_stall_reports_idle() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Fail);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::default());

    handle.toggle_play().unwrap();
    wait_for_snapshot(&handle, |s| s.status == PlaybackStatus::Stalled).await;

    handle.next().unwrap();
    let snapshot = wait_for_snapshot(&handle, |s| s.position == pos(89, 2)).await;
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert!(!snapshot.playing);
    assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
}

// ===== Lifecycle =====

#[tokio::test(start_paused = true)]
async fn test_stop_keeps_position_and_range() {
    let provider = Arc::new(MockProvider::default());
    let transport = MockTransport::new(TransportMode::Hold);
    let handle = spawn_player(provider, transport.clone(), RetryPolicy::none());

    handle
        .start_range(PlaybackRange::new(89, 3, 5, 1, 1).unwrap())
        .unwrap();
    settle().await;
    handle.stop().unwrap();
    settle().await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Idle);
    assert_eq!(snapshot.position, pos(89, 3));
    assert!(snapshot.range.is_some());

    // A completion arriving after stop does not advance
    transport.finish_latest();
    settle().await;
    assert_eq!(handle.snapshot().position, pos(89, 3));
}
