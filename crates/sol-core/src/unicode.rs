//! String normalization and word segmentation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize to NFC, optionally stripping diacritics and collapsing whitespace.
///
/// With `remove_diacritics`, the text is decomposed first and every
/// combining mark is dropped before recomposing. With `remove_extra_spaces`,
/// whitespace runs become a single ASCII space and the result is trimmed.
/// Idempotent for every combination of the two options.
pub fn normalize(text: &str, remove_extra_spaces: bool, remove_diacritics: bool) -> String {
    let composed: String = if remove_diacritics {
        text.nfd().filter(|&c| !is_combining_mark(c)).nfc().collect()
    } else {
        text.nfc().collect()
    };
    if remove_extra_spaces {
        composed.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        composed
    }
}

/// Letters and digits, plus combining marks (vowel signs in Indic scripts
/// are marks, and splitting on them would break words apart).
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c)
}

/// Maximal runs of word characters, in order.
pub fn words_of(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (is_word_char(c), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                words.push(&text[s..i]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}

/// The word run containing char index `position`, or `""` when the
/// position is out of bounds or on a non-word character.
pub fn word_at(text: &str, position: usize) -> &str {
    let offsets: Vec<(usize, char)> = text.char_indices().collect();
    let Some(&(_, c)) = offsets.get(position) else {
        return "";
    };
    if !is_word_char(c) {
        return "";
    }
    let mut first = position;
    while first > 0 && is_word_char(offsets[first - 1].1) {
        first -= 1;
    }
    let mut last = position;
    while last + 1 < offsets.len() && is_word_char(offsets[last + 1].1) {
        last += 1;
    }
    let end = offsets
        .get(last + 1)
        .map(|&(i, _)| i)
        .unwrap_or(text.len());
    &text[offsets[first].0..end]
}

/// Lowercased, normalized words of `text`.
pub fn match_words(text: &str, ignore_diacritics: bool) -> Vec<String> {
    let normalized = normalize(text, true, ignore_diacritics);
    words_of(&normalized)
        .into_iter()
        .map(str::to_lowercase)
        .collect()
}

/// Whole-string comparison key for locales without word delimiters:
/// the lowercased word characters of the normalized text, concatenated.
pub fn summary_of(text: &str, ignore_diacritics: bool) -> String {
    match_words(text, ignore_diacritics).concat()
}
