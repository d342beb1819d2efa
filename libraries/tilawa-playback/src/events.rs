//! Sequencer Events
//!
//! Event-based communication for UI synchronization. Events are queued by the
//! sequencer and drained by whoever drives it.

use serde::{Deserialize, Serialize};
use tilawa_core::{PlaybackRange, Position};

/// Events emitted by the sequencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequencerEvent {
    /// Playing flag changed
    StateChanged {
        /// New value of the playing flag
        playing: bool,
    },

    /// A cue was issued for a verse
    PositionChanged {
        /// Verse to load
        position: Position,
        /// Generation of the cue
        generation: u64,
        /// Whether its audio is played
        play_audio: bool,
    },

    /// A range was installed and playback moved to its start
    RangeStarted {
        /// The new range
        range: PlaybackRange,
    },

    /// Manual navigation dropped the active range
    RangeCleared,

    /// The current ayah is replayed
    AyahRepeated {
        /// Verse being replayed
        position: Position,
        /// Play number of this verse (2 on the first repeat)
        repeat: u32,
    },

    /// The range restarted from its first ayah for another pass
    RangePassStarted {
        /// Pass number (2 on the first repeat)
        pass: u32,
    },

    /// The final pass through the range finished
    RangeCompleted {
        /// The finished range
        range: PlaybackRange,
    },

    /// Audio for a cue could not be started
    Stalled {
        /// Verse whose audio failed
        position: Position,
        /// Generation of the failed cue
        generation: u64,
    },
}
