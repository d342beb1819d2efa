//! Playback range with ayah/range repeat counts

use super::position::Position;
use crate::error::{Result, TilawaError};
use serde::{Deserialize, Serialize};

/// A span of verses within one surah, replayed with repeat counts
///
/// Wire form (camelCase) matches the range-parsing endpoint:
/// `{ surah, startAyah, endAyah, repeatAyahCount, repeatRangeCount }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RangeParts")]
pub struct PlaybackRange {
    surah: u16,
    start_ayah: u16,
    end_ayah: u16,
    repeat_ayah_count: u32,
    repeat_range_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeParts {
    surah: u16,
    start_ayah: u16,
    end_ayah: u16,
    #[serde(default = "one")]
    repeat_ayah_count: u32,
    #[serde(default = "one")]
    repeat_range_count: u32,
}

fn one() -> u32 {
    1
}

impl TryFrom<RangeParts> for PlaybackRange {
    type Error = TilawaError;

    fn try_from(parts: RangeParts) -> Result<Self> {
        Self::new(
            parts.surah,
            parts.start_ayah,
            parts.end_ayah,
            parts.repeat_ayah_count,
            parts.repeat_range_count,
        )
    }
}

impl PlaybackRange {
    /// Create a validated range
    ///
    /// Both bounds must be valid verses of `surah` and `start_ayah <= end_ayah`.
    /// Repeat counts of zero mean "play once" and are stored as 1.
    pub fn new(
        surah: u16,
        start_ayah: u16,
        end_ayah: u16,
        repeat_ayah_count: u32,
        repeat_range_count: u32,
    ) -> Result<Self> {
        Position::new(surah, start_ayah)?;
        Position::new(surah, end_ayah)?;
        if start_ayah > end_ayah {
            return Err(TilawaError::invalid_range(format!(
                "start ayah {} is after end ayah {}",
                start_ayah, end_ayah
            )));
        }

        Ok(Self {
            surah,
            start_ayah,
            end_ayah,
            repeat_ayah_count: repeat_ayah_count.max(1),
            repeat_range_count: repeat_range_count.max(1),
        })
    }

    /// Range covering a single verse, played once
    pub fn single(position: Position) -> Self {
        Self {
            surah: position.surah(),
            start_ayah: position.ayah(),
            end_ayah: position.ayah(),
            repeat_ayah_count: 1,
            repeat_range_count: 1,
        }
    }

    /// Surah the range belongs to
    pub fn surah(&self) -> u16 {
        self.surah
    }

    /// First ayah of the range
    pub fn start_ayah(&self) -> u16 {
        self.start_ayah
    }

    /// Last ayah of the range (inclusive)
    pub fn end_ayah(&self) -> u16 {
        self.end_ayah
    }

    /// Times each ayah is played before advancing
    pub fn repeat_ayah_count(&self) -> u32 {
        self.repeat_ayah_count
    }

    /// Times the whole range is played before stopping
    pub fn repeat_range_count(&self) -> u32 {
        self.repeat_range_count
    }

    /// Position of the first ayah
    pub fn start(&self) -> Position {
        Position::new(self.surah, self.start_ayah).unwrap_or_default()
    }

    /// Position of the last ayah
    pub fn end(&self) -> Position {
        Position::new(self.surah, self.end_ayah).unwrap_or_default()
    }

    /// Number of verses in the range
    pub fn len(&self) -> u16 {
        self.end_ayah - self.start_ayah + 1
    }

    /// Ranges always hold at least one verse
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `position` lies inside the range
    pub fn contains(&self, position: Position) -> bool {
        position.surah() == self.surah
            && (self.start_ayah..=self.end_ayah).contains(&position.ayah())
    }

    /// Audio completions needed to play the range through every repeat
    pub fn total_plays(&self) -> u64 {
        u64::from(self.len())
            * u64::from(self.repeat_ayah_count)
            * u64::from(self.repeat_range_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_range() {
        let range = PlaybackRange::new(89, 2, 4, 2, 2).unwrap();
        assert_eq!(range.len(), 3);
        assert_eq!(range.total_plays(), 12);
        assert_eq!(range.start(), Position::new(89, 2).unwrap());
        assert_eq!(range.end(), Position::new(89, 4).unwrap());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let result = PlaybackRange::new(89, 5, 4, 1, 1);
        assert!(matches!(result, Err(TilawaError::InvalidRange(_))));
    }

    #[test]
    fn bounds_checked_against_surah() {
        assert!(PlaybackRange::new(1, 1, 8, 1, 1).is_err());
        assert!(PlaybackRange::new(115, 1, 1, 1, 1).is_err());
    }

    #[test]
    fn zero_repeats_mean_once() {
        let range = PlaybackRange::new(1, 1, 7, 0, 0).unwrap();
        assert_eq!(range.repeat_ayah_count(), 1);
        assert_eq!(range.repeat_range_count(), 1);
    }

    #[test]
    fn contains_checks_surah_and_bounds() {
        let range = PlaybackRange::new(2, 10, 20, 1, 1).unwrap();
        assert!(range.contains(Position::new(2, 10).unwrap()));
        assert!(range.contains(Position::new(2, 20).unwrap()));
        assert!(!range.contains(Position::new(2, 21).unwrap()));
        assert!(!range.contains(Position::new(3, 15).unwrap()));
    }

    #[test]
    fn camel_case_wire_format() {
        let json = r#"{"surah":89,"startAyah":1,"endAyah":5,"repeatAyahCount":3,"repeatRangeCount":2}"#;
        let range: PlaybackRange = serde_json::from_str(json).unwrap();
        assert_eq!(range, PlaybackRange::new(89, 1, 5, 3, 2).unwrap());

        let back = serde_json::to_value(range).unwrap();
        assert_eq!(back["startAyah"], 1);
        assert_eq!(back["repeatRangeCount"], 2);
    }

    #[test]
    fn missing_repeat_counts_default_to_one() {
        let json = r#"{"surah":112,"startAyah":1,"endAyah":4}"#;
        let range: PlaybackRange = serde_json::from_str(json).unwrap();
        assert_eq!(range.repeat_ayah_count(), 1);
        assert_eq!(range.repeat_range_count(), 1);
    }

    #[test]
    fn invalid_wire_range_rejected() {
        let json = r#"{"surah":89,"startAyah":9,"endAyah":2,"repeatAyahCount":1,"repeatRangeCount":1}"#;
        assert!(serde_json::from_str::<PlaybackRange>(json).is_err());
    }
}
