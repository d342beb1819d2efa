//! Verse text normalization
//!
//! Pure, deterministic helpers applied to Arabic verse text before display:
//! - Strip the opening invocation that the text source prefixes to the first
//!   verse of every surah except the opening chapter
//! - Repair characters the text source encodes with the wrong code points

use crate::types::{Position, OPENING_SURAH};

/// Number of words in the opening invocation
const INVOCATION_WORDS: usize = 4;

/// Substitutions for known encoding defects, as (pattern, replacement)
///
/// Patterns are disjoint and no replacement contains a pattern, so the table
/// is idempotent. Incomplete: dagger alifs and other letters carrying maddah
/// are still rendered as delivered.
const MISCODED_CHARACTERS: &[(&str, &str)] = &[
    // Small high rounded zero used as sukun on alif
    ("\u{06DF}", "\u{0652}"),
    // Farsi yeh in place of Arabic yeh
    ("\u{06CC}", "\u{064A}"),
    // Alif followed by small high madda
    ("\u{0627}\u{06E4}", "\u{0622}"),
    // Noon with open kasratan
    ("\u{0646}\u{08F2}", "\u{0646}\u{0656}"),
    // Meem with small high madda
    ("\u{0645}\u{06E4}", "\u{0645}\u{0653}"),
    // Lam with small high madda
    ("\u{0644}\u{06E4}", "\u{0644}\u{0653}"),
];

/// Remove the opening invocation from the first verse of a surah
///
/// Drops the first four whitespace-delimited words when `ayah == 1` and the
/// surah is not the opening chapter; returns `text` unchanged otherwise.
/// Works on word count, not on matching the invocation itself. The remaining
/// words are rejoined with single spaces, so runs of whitespace and line
/// breaks in the rest of the verse collapse.
pub fn strip_opening_invocation(text: &str, surah: u16, ayah: u16) -> String {
    if ayah != 1 || surah == OPENING_SURAH {
        return text.to_string();
    }

    text.split_whitespace()
        .skip(INVOCATION_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace miscoded characters with their correct forms
pub fn fix_miscoded_characters(text: &str) -> String {
    MISCODED_CHARACTERS
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            if acc.contains(pattern) {
                acc.replace(pattern, replacement)
            } else {
                acc
            }
        })
}

/// Full normalization for the Arabic text of the verse at `position`
pub fn normalize_verse_text(text: &str, position: Position) -> String {
    let stripped = strip_opening_invocation(text, position.surah(), position.ayah());
    fix_miscoded_characters(&stripped)
}
