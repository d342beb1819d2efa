//! Core types for playback sequencing

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tilawa_core::{AudioSource, PlaybackRange, Position, VerseContent};

/// Progress through the repeat counts of an active range
///
/// Both counters are 1-based: `(1, 1)` means the first play of the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatState {
    /// Plays of the current ayah so far (including the current one)
    pub ayah_repeats_done: u32,

    /// Passes through the range so far (including the current one)
    pub range_repeats_done: u32,
}

impl RepeatState {
    /// Counters at the start of a range
    pub const fn initial() -> Self {
        Self {
            ayah_repeats_done: 1,
            range_repeats_done: 1,
        }
    }
}

impl Default for RepeatState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Sequencer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Not playing
    Idle,

    /// Playing verse after verse with no range
    Sequential,

    /// Playing inside an active range
    Range,

    /// Audio could not be started after retrying; waits for the caller
    Stalled,
}

/// Instruction to (re)load a verse
///
/// Issued for every position change and every forced re-trigger. The
/// generation increases strictly with each cue, so results tagged with an
/// older generation belong to a superseded cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Verse to load
    pub position: Position,

    /// Generation of this cue
    pub generation: u64,

    /// Whether the verse's audio should be played
    pub play_audio: bool,
}

/// Configuration for the sequencer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Initial position (default: 89:1)
    pub start: Position,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            start: Position::default(),
        }
    }
}

/// Bounded exponential backoff for starting audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first (default: 3)
    pub max_attempts: u32,

    /// Delay after the first failure (default: 250ms)
    pub initial_backoff: Duration,

    /// Upper bound for any single delay (default: 2s)
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(2),
        }
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Default)]
pub struct PlayerConfig {
    /// Sequencer settings
    pub sequencer: SequencerConfig,

    /// Where verse audio lives
    pub audio: AudioSource,

    /// Retry policy for starting audio
    pub retry: RetryPolicy,
}

/// Published view of the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    /// Current verse
    pub position: Position,

    /// Active range (kept after natural completion, shown at its start)
    pub range: Option<PlaybackRange>,

    /// Repeat progress
    pub repeat: RepeatState,

    /// Whether the sequencer-driven loop is running
    pub playing: bool,

    /// Sequencer state
    pub status: PlaybackStatus,

    /// Generation of the latest cue
    pub generation: u64,

    /// Last successfully loaded verse text
    pub verse: VerseContent,

    /// Position `verse` was loaded for
    pub verse_position: Option<Position>,

    /// Most recent fetch or audio failure, cleared on the next success
    pub last_error: Option<String>,
}
