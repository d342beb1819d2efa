//! Static surah table

/// Number of surahs
pub const SURAH_COUNT: u16 = 114;

/// The opening chapter, which already consists of the opening invocation
pub const OPENING_SURAH: u16 = 1;

/// Total number of verses across all surahs
pub const TOTAL_VERSES: u32 = 6236;

/// Verse count of each surah, indexed by `surah - 1`
const VERSE_COUNTS: [u16; SURAH_COUNT as usize] = [
    7, 286, 200, 176, 120, 165, 206, 75, 129, 109, // 1-10
    123, 111, 43, 52, 99, 128, 111, 110, 98, 135, // 11-20
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, // 21-30
    34, 30, 73, 54, 45, 83, 182, 88, 75, 85, // 31-40
    54, 53, 89, 59, 37, 35, 38, 29, 18, 45, // 41-50
    60, 49, 62, 55, 78, 96, 29, 22, 24, 13, // 51-60
    14, 11, 11, 18, 12, 12, 30, 52, 52, 44, // 61-70
    28, 28, 20, 56, 40, 31, 50, 40, 46, 42, // 71-80
    29, 19, 36, 25, 22, 17, 19, 26, 30, 20, // 81-90
    15, 21, 11, 8, 8, 19, 5, 8, 8, 11, // 91-100
    11, 8, 3, 9, 5, 4, 7, 3, 6, 3, // 101-110
    5, 4, 5, 6, // 111-114
];

/// Verse count of a surah, or `None` if the surah number is out of range
pub fn surah_verse_count(surah: u16) -> Option<u16> {
    if surah == 0 {
        return None;
    }
    VERSE_COUNTS.get(usize::from(surah - 1)).copied()
}
