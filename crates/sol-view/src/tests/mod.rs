mod proptest_view;

use sol_core::locale::Locale;
use sol_core::matching::MatchingOptions;
use sol_core::solution::ParsedSolutions;

/// Sentences with matching data built (diacritics and order kept).
pub(super) fn make_list(locale: &str, texts: &[&str]) -> ParsedSolutions {
    let mut list = ParsedSolutions::from_sentences(
        texts.iter().map(|s| s.to_string()).collect(),
        &Locale::new(locale),
    );
    list.build_matching(MatchingOptions {
        ignore_diacritics: false,
        ignore_word_order: false,
    });
    list
}
