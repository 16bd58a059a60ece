//! Name normalization for skill, specialization and bonus-target matching.
//!
//! Records are authored by hand, so "Combat rapproché", "combat rapproche"
//! and "COMBAT  RAPPROCHÉ" must all refer to the same skill.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds a name to its comparison key: diacritics stripped, lowercased,
/// surrounding whitespace trimmed and inner whitespace collapsed.
pub fn normalize(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true when both names normalize to the same non-empty key.
pub fn names_match(left: &str, right: &str) -> bool {
    let left = normalize(left);
    !left.is_empty() && left == normalize(right)
}
