//! Matching data: the locale-aware representation of each solution used for
//! scoring and filtering.
//!
//! Word-based locales store a lowercased word list per solution plus a
//! corpus-wide word set; other locales store a normalized summary string.
//! Display text is never touched.

pub mod score;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::locale::Locale;
use crate::settings::settings;
use crate::solution::{ParsedSolutions, SolutionError, SolutionList};
use crate::unicode::{match_words, summary_of};

use score::{summary_grams, words_grams, GramBag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingOptions {
    pub ignore_diacritics: bool,
    pub ignore_word_order: bool,
}

impl Default for MatchingOptions {
    fn default() -> Self {
        let m = &settings().matching;
        Self {
            ignore_diacritics: m.ignore_diacritics,
            ignore_word_order: m.ignore_word_order,
        }
    }
}

/// List-level matching data, attached once.
#[derive(Debug, Clone)]
pub struct ListMatching {
    pub options: MatchingOptions,
    pub locale: Locale,
    /// Sorted, deduplicated words of every solution (word-based locales only).
    pub word_set: Option<Vec<String>>,
}

impl ListMatching {
    pub fn is_word_based(&self) -> bool {
        self.word_set.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRepr {
    Words(Vec<String>),
    Summary(String),
}

/// Per-solution matching data.
#[derive(Debug, Clone)]
pub struct SolutionMatching {
    /// Stable cache key (the solution's reference).
    pub id: u32,
    pub repr: MatchRepr,
    /// Precomputed grams; `None` for folded solutions, whose grams depend
    /// on the answer.
    pub(crate) grams: Option<GramBag>,
}

impl SolutionMatching {
    pub fn words(&self) -> Option<&[String]> {
        match &self.repr {
            MatchRepr::Words(w) => Some(w),
            MatchRepr::Summary(_) => None,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.repr {
            MatchRepr::Summary(s) => Some(s),
            MatchRepr::Words(_) => None,
        }
    }
}

impl ParsedSolutions {
    /// Attach matching data. Returns false (and does nothing) if it was
    /// already built.
    pub fn build_matching(&mut self, options: MatchingOptions) -> bool {
        if self.matching.is_some() {
            return false;
        }
        let locale = self.locale().clone();
        let word_based = locale.is_word_based();
        let _span = debug_span!("build_matching", %locale, word_based, solutions = self.len()).entered();

        let mut word_set: BTreeSet<String> = BTreeSet::new();
        for solution in self.solutions_mut() {
            let text = solution.text();
            let folded = solution.is_folded();
            let (repr, grams) = if word_based {
                let mut words = match_words(&text, options.ignore_diacritics);
                if options.ignore_word_order {
                    words.sort();
                }
                word_set.extend(words.iter().cloned());
                let grams = (!folded).then(|| words_grams(&words, !options.ignore_word_order));
                (MatchRepr::Words(words), grams)
            } else {
                let summary = summary_of(&text, options.ignore_diacritics);
                let grams = (!folded).then(|| summary_grams(&summary));
                (MatchRepr::Summary(summary), grams)
            };
            solution.matching = Some(SolutionMatching {
                id: solution.reference as u32,
                repr,
                grams,
            });
        }

        let word_set = word_based.then(|| word_set.into_iter().collect::<Vec<_>>());
        debug!(words = word_set.as_ref().map_or(0, Vec::len));
        self.matching = Some(ListMatching {
            options,
            locale,
            word_set,
        });
        true
    }
}

/// Attach matching data to a parsed list; a no-op when already built.
pub fn build_list_matching_data(
    list: &mut SolutionList,
    options: MatchingOptions,
) -> Result<(), SolutionError> {
    list.parsed_mut()?.build_matching(options);
    Ok(())
}
