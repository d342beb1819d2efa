//! Tilawa - Playback Sequencing
//!
//! Platform-agnostic verse sequencing for the Tilawa recitation player.
//!
//! This crate provides:
//! - Sequential playback across surah boundaries (114 wraps to 1)
//! - Range playback with per-ayah and per-range repeat counts
//! - Manual navigation that drops back to browsing when a range is active
//! - Generation-tagged cues so late fetches and completions are discarded
//! - Bounded audio start retry with a terminal stalled state
//!
//! # Architecture
//!
//! `tilawa-playback` performs no I/O of its own:
//! - [`Sequencer`] is a synchronous state machine returning [`Cue`]s
//! - [`Player`] is a tokio task owning a sequencer and driving the
//!   `VerseTextProvider` and `AudioTransport` collaborators from `tilawa-core`
//!
//! # Example: Range with repeats
//!
//! ```rust
//! use tilawa_core::PlaybackRange;
//! use tilawa_playback::{PlaybackStatus, Sequencer};
//!
//! let mut sequencer = Sequencer::default();
//!
//! // Verses 2-4 of Al-Fajr, each verse twice, the whole range twice
//! let range = PlaybackRange::new(89, 2, 4, 2, 2).unwrap();
//! let mut cue = sequencer.start_range(range);
//!
//! let mut played = vec![cue.position.ayah()];
//! while let Some(next) = sequencer.handle_completion(cue.generation) {
//!     if !next.play_audio {
//!         break;
//!     }
//!     played.push(next.position.ayah());
//!     cue = next;
//! }
//!
//! assert_eq!(played, [2, 2, 3, 3, 4, 4, 2, 2, 3, 3, 4, 4]);
//! assert_eq!(sequencer.status(), PlaybackStatus::Idle);
//! ```

mod error;
mod events;
mod player;
mod sequencer;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::SequencerEvent;
pub use player::{Player, PlayerHandle};
pub use sequencer::Sequencer;
pub use types::{
    Cue, PlaybackStatus, PlayerConfig, PlayerSnapshot, RepeatState, RetryPolicy, SequencerConfig,
};
