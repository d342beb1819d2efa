//! Verse position with surah-boundary wraparound

use super::surah::{surah_verse_count, SURAH_COUNT};
use crate::error::{Result, TilawaError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A verse address: (surah 1-114, ayah 1..=verse count)
///
/// Stepping past the last ayah of a surah moves to ayah 1 of the next surah
/// (114 wraps to 1); stepping before ayah 1 moves to the last ayah of the
/// previous surah (1 wraps to 114).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PositionParts")]
pub struct Position {
    surah: u16,
    ayah: u16,
}

#[derive(Deserialize)]
struct PositionParts {
    surah: u16,
    ayah: u16,
}

impl TryFrom<PositionParts> for Position {
    type Error = TilawaError;

    fn try_from(parts: PositionParts) -> Result<Self> {
        Self::new(parts.surah, parts.ayah)
    }
}

impl Position {
    /// Create a validated position
    pub fn new(surah: u16, ayah: u16) -> Result<Self> {
        let count = surah_verse_count(surah).ok_or(TilawaError::InvalidSurah(surah))?;
        if ayah == 0 || ayah > count {
            return Err(TilawaError::InvalidAyah { surah, ayah });
        }
        Ok(Self { surah, ayah })
    }

    /// Last ayah of a surah
    pub fn last_of(surah: u16) -> Result<Self> {
        let count = surah_verse_count(surah).ok_or(TilawaError::InvalidSurah(surah))?;
        Ok(Self { surah, ayah: count })
    }

    /// Surah number (1-114)
    pub fn surah(&self) -> u16 {
        self.surah
    }

    /// Ayah number within the surah
    pub fn ayah(&self) -> u16 {
        self.ayah
    }

    /// Verse count of this position's surah
    pub fn surah_verse_count(&self) -> u16 {
        // Construction guarantees the surah is in the table.
        surah_verse_count(self.surah).unwrap_or(self.ayah)
    }

    /// Following verse, crossing into the next surah at the boundary
    #[must_use]
    pub fn next(&self) -> Self {
        if self.ayah < self.surah_verse_count() {
            return Self {
                surah: self.surah,
                ayah: self.ayah + 1,
            };
        }
        let surah = if self.surah == SURAH_COUNT { 1 } else { self.surah + 1 };
        Self { surah, ayah: 1 }
    }

    /// Preceding verse, crossing into the previous surah at the boundary
    #[must_use]
    pub fn previous(&self) -> Self {
        if self.ayah > 1 {
            return Self {
                surah: self.surah,
                ayah: self.ayah - 1,
            };
        }
        let surah = if self.surah == 1 { SURAH_COUNT } else { self.surah - 1 };
        Self {
            surah,
            ayah: surah_verse_count(surah).unwrap_or(1),
        }
    }

    /// Position `steps` verses ahead, following the wrap policy
    #[must_use]
    pub fn advance(&self, steps: u32) -> Self {
        (0..steps).fold(*self, |pos, _| pos.next())
    }
}

impl Default for Position {
    /// Starting position of the player (Al-Fajr, first verse)
    fn default() -> Self {
        Self { surah: 89, ayah: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}
