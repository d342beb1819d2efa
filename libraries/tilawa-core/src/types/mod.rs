mod position;
mod range;
mod surah;
mod verse;

pub use position::Position;
pub use range::PlaybackRange;
pub use surah::{surah_verse_count, OPENING_SURAH, SURAH_COUNT, TOTAL_VERSES};
pub use verse::VerseContent;
