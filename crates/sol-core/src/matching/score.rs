//! Similarity scoring of a learner answer against every solution.
//!
//! The coefficient is a Dice coefficient over multisets of padded
//! character bigrams. Word-based lists score each word's bigrams and,
//! unless word order is ignored, add one gram per adjacent word pair so
//! that reordering costs something. Summary-based lists score bigrams of
//! the whole summary string. An answer identical to a solution scores 1.0,
//! the maximum.

use std::collections::HashMap;
use std::iter::once;

use tracing::{debug, debug_span};

use super::{ListMatching, MatchRepr, MatchingOptions};
use crate::pattern::{unfold, unfold_groups, variation_count, Token};
use crate::solution::{ParsedSolutions, SolutionError, SolutionList};
use crate::unicode::{match_words, summary_of};

pub(crate) type GramBag = HashMap<String, u32>;

const BOUNDARY_START: char = '\u{2}';
const BOUNDARY_END: char = '\u{3}';
const LINK: char = '\u{1}';
const TIE_EPSILON: f64 = 1e-9;

/// Cap on variations enumerated for one folded solution.
pub(crate) const VARIATION_LIMIT: usize = 256;

fn push_padded_bigrams(bag: &mut GramBag, text: &str) {
    let chars: Vec<char> = once(BOUNDARY_START)
        .chain(text.chars())
        .chain(once(BOUNDARY_END))
        .collect();
    for pair in chars.windows(2) {
        *bag.entry(pair.iter().collect()).or_default() += 1;
    }
}

pub(crate) fn words_grams(words: &[String], ordered: bool) -> GramBag {
    let mut bag = GramBag::new();
    for word in words {
        push_padded_bigrams(&mut bag, word);
    }
    if ordered {
        for pair in words.windows(2) {
            let link = format!("{}{LINK}{}", pair[0], pair[1]);
            *bag.entry(link).or_default() += 1;
        }
    }
    bag
}

pub(crate) fn summary_grams(summary: &str) -> GramBag {
    let mut bag = GramBag::new();
    if !summary.is_empty() {
        push_padded_bigrams(&mut bag, summary);
    }
    bag
}

/// Dice coefficient of two gram multisets, in `[0, 1]`.
pub(crate) fn dice(a: &GramBag, b: &GramBag) -> f64 {
    let total: u32 = a.values().sum::<u32>() + b.values().sum::<u32>();
    if total == 0 {
        return 0.0;
    }
    let common: u32 = a
        .iter()
        .map(|(gram, &n)| n.min(b.get(gram).copied().unwrap_or(0)))
        .sum();
    2.0 * f64::from(common) / f64::from(total)
}

/// Bigram similarity of two single words.
pub fn word_similarity(a: &str, b: &str) -> f64 {
    let mut x = GramBag::new();
    let mut y = GramBag::new();
    push_padded_bigrams(&mut x, a);
    push_padded_bigrams(&mut y, b);
    dice(&x, &y)
}

/// A learner answer prepared against a list's matching options.
#[derive(Debug, Clone)]
pub struct PreparedAnswer {
    pub repr: MatchRepr,
    options: MatchingOptions,
    grams: GramBag,
}

impl PreparedAnswer {
    /// `None` when the answer has nothing to compare (empty, or only
    /// punctuation and spaces).
    pub fn new(answer: &str, matching: &ListMatching) -> Option<Self> {
        let options = matching.options;
        if matching.is_word_based() {
            let mut words = match_words(answer, options.ignore_diacritics);
            if words.is_empty() {
                return None;
            }
            if options.ignore_word_order {
                words.sort();
            }
            let grams = words_grams(&words, !options.ignore_word_order);
            Some(Self {
                repr: MatchRepr::Words(words),
                options,
                grams,
            })
        } else {
            let summary = summary_of(answer, options.ignore_diacritics);
            if summary.is_empty() {
                return None;
            }
            let grams = summary_grams(&summary);
            Some(Self {
                repr: MatchRepr::Summary(summary),
                options,
                grams,
            })
        }
    }

    /// How well one alternative of a group fits the answer. Words present
    /// in the answer count up, absent words count down, so an empty
    /// alternative wins when the answer omits the word.
    fn affinity(&self, alternative: &str) -> f64 {
        match &self.repr {
            MatchRepr::Words(answer_words) => match_words(alternative, self.options.ignore_diacritics)
                .iter()
                .map(|w| {
                    let best = answer_words
                        .iter()
                        .map(|a| word_similarity(w, a))
                        .fold(0.0, f64::max);
                    2.0 * best - 1.0
                })
                .sum(),
            MatchRepr::Summary(answer_summary) => {
                let s = summary_of(alternative, self.options.ignore_diacritics);
                let len = s.chars().count() as f64;
                if s.is_empty() {
                    0.0
                } else if answer_summary.contains(&s) {
                    len
                } else {
                    -len
                }
            }
        }
    }

    /// Per-token alternatives tied for the best affinity.
    pub(crate) fn choose_alternatives<'a>(&self, tokens: &'a [Token]) -> Vec<Vec<&'a str>> {
        tokens
            .iter()
            .map(|token| match token {
                Token::Text(t) => vec![t.as_str()],
                Token::Choice(alternatives) => {
                    let scored: Vec<(f64, &str)> = alternatives
                        .iter()
                        .map(|a| (self.affinity(a), a.as_str()))
                        .collect();
                    let best = scored.iter().map(|(s, _)| *s).fold(f64::MIN, f64::max);
                    scored
                        .into_iter()
                        .filter(|(s, _)| (best - s).abs() < TIE_EPSILON)
                        .map(|(_, a)| a)
                        .collect()
                }
            })
            .collect()
    }

    /// Variations of a folded solution restricted to the alternatives that
    /// best fit the answer. Falls back to one alternative per group when
    /// the ties would produce more than `limit` variations.
    pub(crate) fn constrained_variations(&self, tokens: &[Token], limit: usize) -> Vec<String> {
        let groups = self.choose_alternatives(tokens);
        let count = groups
            .iter()
            .fold(1usize, |acc, g| acc.saturating_mul(g.len().max(1)));
        if count <= limit {
            unfold_groups(&groups)
        } else {
            let firsts: Vec<Vec<&str>> = groups.into_iter().map(|g| g.into_iter().take(1).collect()).collect();
            unfold_groups(&firsts)
        }
    }

    /// Variations of a folded solution worth comparing with the answer:
    /// all of them when there are at most `limit`, otherwise the ones
    /// built from best-fitting alternatives.
    pub(crate) fn candidate_variations(&self, tokens: &[Token], limit: usize) -> Vec<String> {
        if variation_count(tokens) <= limit as u128 {
            unfold(tokens)
        } else {
            self.constrained_variations(tokens, limit)
        }
    }

    fn grams_for_text(&self, text: &str) -> GramBag {
        match self.repr {
            MatchRepr::Words(_) => {
                let mut words = match_words(text, self.options.ignore_diacritics);
                if self.options.ignore_word_order {
                    words.sort();
                }
                words_grams(&words, !self.options.ignore_word_order)
            }
            MatchRepr::Summary(_) => summary_grams(&summary_of(text, self.options.ignore_diacritics)),
        }
    }

    /// Score against precomputed grams, or the best score over the
    /// candidate variations of a folded solution.
    fn score_tokens(&self, precomputed: Option<&GramBag>, tokens: &[Token]) -> f64 {
        match precomputed {
            Some(grams) => dice(&self.grams, grams),
            None => self
                .candidate_variations(tokens, VARIATION_LIMIT)
                .iter()
                .map(|text| dice(&self.grams, &self.grams_for_text(text)))
                .fold(0.0, f64::max),
        }
    }
}

impl ParsedSolutions {
    /// Score every solution against `answer`, overwriting prior scores.
    ///
    /// Matching data is built with default options if missing. An answer
    /// with nothing to compare clears every score. Returns the best score.
    pub fn score(&mut self, answer: &str) -> Option<f64> {
        self.build_matching(MatchingOptions::default());
        let _span = debug_span!("score", solutions = self.len()).entered();
        let prepared = self
            .matching()
            .and_then(|matching| PreparedAnswer::new(answer, matching));
        let Some(prepared) = prepared else {
            for solution in self.solutions_mut() {
                solution.score = None;
            }
            debug!("empty answer, scores cleared");
            return None;
        };

        let mut best: Option<f64> = None;
        for solution in self.solutions_mut() {
            let grams = solution.matching.as_ref().and_then(|m| m.grams.as_ref());
            let score = prepared.score_tokens(grams, &solution.tokens);
            solution.score = Some(score);
            best = Some(best.map_or(score, |b: f64| b.max(score)));
        }
        debug!(best = ?best);
        best
    }

    /// The answer prepared against this list's matching data.
    pub fn prepare_answer(&self, answer: &str) -> Option<PreparedAnswer> {
        self.matching()
            .and_then(|matching| PreparedAnswer::new(answer, matching))
    }
}

/// Score `answer` against every solution of a parsed list.
pub fn score_answer(list: &mut SolutionList, answer: &str) -> Result<Option<f64>, SolutionError> {
    Ok(list.parsed_mut()?.score(answer))
}

pub(crate) fn is_tied(a: f64, b: f64) -> bool {
    (a - b).abs() < TIE_EPSILON
}
