//! Tilawa Core
//!
//! Platform-agnostic core types, collaborator traits and text handling for the
//! Tilawa recitation player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Position`, `PlaybackRange`, `VerseContent` and the static surah table
//! - **Collaborator Traits**: `VerseTextProvider`, `RangeParser`, `AudioTransport`
//! - **Text Normalization**: opening-invocation stripping and miscoded character repair
//! - **Audio Addressing**: deterministic per-verse audio URLs
//! - **Error Handling**: unified `TilawaError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tilawa_core::{AudioSource, PlaybackRange, Position};
//!
//! let position = Position::new(89, 1).unwrap();
//! assert_eq!(position.next(), Position::new(89, 2).unwrap());
//!
//! let range = PlaybackRange::new(89, 1, 5, 2, 1).unwrap();
//! assert!(range.contains(position));
//!
//! let url = AudioSource::default().url_for(position);
//! assert_eq!(url, "https://everyayah.com/data/Alafasy_128kbps/089001.mp3");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audio;
pub mod error;
pub mod text;
pub mod traits;
pub mod types;

pub use audio::AudioSource;
pub use error::{Result, TilawaError};
pub use text::{fix_miscoded_characters, normalize_verse_text, strip_opening_invocation};
pub use traits::{AudioTransport, CompletionSignal, NormalizingProvider, RangeParser, VerseTextProvider};
pub use types::{
    surah_verse_count, PlaybackRange, Position, VerseContent, OPENING_SURAH, SURAH_COUNT,
    TOTAL_VERSES,
};
