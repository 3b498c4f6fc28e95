//! Locale-aware ordering for street names and report rows
//!
//! Final listings sort by a collation key derived from Unicode
//! decomposition, so accented names ("Árpád utca") sort next to their base
//! letter instead of after 'z' as raw byte order would place them.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Collation key for a display string.
///
/// Primary weight: NFD-decomposed, combining marks stripped, lowercased.
/// Secondary weight: the original string, so "Ó utca" and "O utca" stay
/// distinct and order deterministically.
pub fn collation_key(text: &str) -> (String, String) {
    let primary: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    (primary, text.to_string())
}

/// Compares two display strings in collation order.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Sorts a list of display strings in place, in collation order.
pub fn sort_collated(items: &mut [String]) {
    items.sort_by(|a, b| collate(a, b));
}
