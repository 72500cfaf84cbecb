//! Name normalization and collation.
//!
//! Two rules live here:
//!
//! - **Identity**: [`NameKey`] lower-cases both names and collapses runs of
//!   whitespace, so `"Ana  María|GARCÍA"` and `"ana maría|garcía"` are the
//!   same person for duplicate detection. Diacritics are significant.
//! - **Ordering**: [`compare_names`] orders names the way a Spanish reader
//!   expects with base sensitivity. Case and accents are ignored
//!   (`García` sorts with `garcia`), but `ñ` is its own letter after `n`.

use std::cmp::Ordering;
use std::fmt;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Sorts after every letter so that `ñ` lands between `n` and `o`.
const ENYE_WEIGHT: char = '\u{10FFFF}';
const COMBINING_TILDE: char = '\u{0303}';

/// Normalized `given|family` key used for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(given_name: &str, family_name: &str) -> Self {
        Self(format!(
            "{}|{}",
            normalize_component(given_name),
            normalize_component(family_name)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for word in value.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// Join the non-empty parts with a single space.
///
/// Parts are expected to be trimmed already.
pub fn compose_name(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the sort key used by [`compare_names`].
pub fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    let mut last = None;
    for ch in value.nfd() {
        if is_combining_mark(ch) {
            if ch == COMBINING_TILDE && last == Some('n') {
                key.push(ENYE_WEIGHT);
                last = Some(ENYE_WEIGHT);
            }
            continue;
        }
        for lower in ch.to_lowercase() {
            key.push(lower);
            last = Some(lower);
        }
    }
    key
}

/// Locale-aware, case- and accent-insensitive comparison.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}
