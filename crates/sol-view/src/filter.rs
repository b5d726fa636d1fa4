//! Word and summary filters.
//!
//! Word-based lists match a filter word against each solution's word list
//! one word at a time, accumulating a bitmask of how words relate to the
//! query. The accumulated state is cached per (query, solution id) so that
//! a later pass, or a pass interrupted by a step budget, resumes where the
//! previous one stopped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use sol_core::flags::flag_options;
use sol_core::matching::MatchingOptions;
use sol_core::solution::{ParsedSolutions, Solution};
use sol_core::unicode::{match_words, summary_of};

pub const EXACT: u8 = 1;
pub const START: u8 = 1 << 1;
pub const END: u8 = 1 << 2;
pub const ANYWHERE: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Start,
    End,
    #[default]
    Anywhere,
}

impl MatchType {
    fn accepted(self) -> u8 {
        match self {
            Self::Exact => EXACT,
            Self::Start => EXACT | START,
            Self::End => EXACT | END,
            Self::Anywhere => EXACT | START | END | ANYWHERE,
        }
    }

    pub fn is_satisfied(self, mask: u8) -> bool {
        mask & self.accepted() != 0
    }
}

/// How `word` relates to `query`. An exact match sets only `EXACT`.
pub fn match_mask(word: &str, query: &str) -> u8 {
    if word == query {
        return EXACT;
    }
    let mut mask = 0;
    if word.starts_with(query) {
        mask |= START;
    }
    if word.ends_with(query) {
        mask |= END;
    }
    if mask == 0 && word.contains(query) {
        mask |= ANYWHERE;
    }
    mask
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordFilter {
    pub word: String,
    #[serde(default)]
    pub match_type: MatchType,
    #[serde(default)]
    pub exclude: bool,
}

impl WordFilter {
    pub fn new(word: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            word: word.into(),
            match_type,
            exclude: false,
        }
    }

    pub fn excluding(word: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            exclude: true,
            ..Self::new(word, match_type)
        }
    }

    /// Parse `word[:type]` where type is one of exact, start, end, anywhere.
    pub fn parse(spec: &str, exclude: bool) -> Option<Self> {
        let (word, match_type) = match spec.rsplit_once(':') {
            Some((word, ty)) => {
                let ty = match ty.to_ascii_lowercase().as_str() {
                    "exact" => MatchType::Exact,
                    "start" => MatchType::Start,
                    "end" => MatchType::End,
                    "anywhere" => MatchType::Anywhere,
                    _ => return None,
                };
                (word, ty)
            }
            None => (spec, MatchType::Anywhere),
        };
        if word.trim().is_empty() {
            return None;
        }
        Some(Self {
            word: word.to_string(),
            match_type,
            exclude,
        })
    }

    /// Word-based queries keep only their first word, the unit that
    /// solution word lists are split into.
    fn prepare(&self, options: &MatchingOptions, word_based: bool) -> Option<PreparedFilter> {
        let query = if word_based {
            match_words(&self.word, options.ignore_diacritics)
                .into_iter()
                .next()
                .unwrap_or_default()
        } else {
            summary_of(&self.word, options.ignore_diacritics)
        };
        (!query.is_empty()).then(|| PreparedFilter {
            query,
            match_type: self.match_type,
            exclude: self.exclude,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PreparedFilter {
    query: String,
    match_type: MatchType,
    exclude: bool,
}

/// Filters prepared against a list's matching options. Filters whose
/// query normalizes to nothing are dropped.
pub(crate) fn prepare_filters(list: &ParsedSolutions, filters: &[WordFilter]) -> Vec<PreparedFilter> {
    let (options, word_based) = match list.matching() {
        Some(m) => (m.options, m.is_word_based()),
        None => (MatchingOptions::default(), list.locale().is_word_based()),
    };
    filters
        .iter()
        .filter_map(|f| f.prepare(&options, word_based))
        .collect()
}

/// Number of words a resumable match may examine before yielding.
#[derive(Debug, Clone, Copy)]
pub struct StepBudget {
    remaining: Option<usize>,
}

impl StepBudget {
    pub fn unlimited() -> Self {
        Self { remaining: None }
    }

    pub fn limited(steps: usize) -> Self {
        Self {
            remaining: Some(steps),
        }
    }

    fn take(&mut self) -> bool {
        match &mut self.remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Matched,
    Unmatched,
    /// Budget exhausted before the match resolved; call again to resume.
    Pending,
}

#[derive(Debug, Clone, Copy, Default)]
struct MatchProgress {
    mask: u8,
    next: usize,
}

/// Partial word-match state keyed by (query, solution id).
#[derive(Debug, Default)]
pub struct WordMatchCache {
    entries: HashMap<(String, u32), MatchProgress>,
}

impl WordMatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Match `query` against `words`, resuming from cached progress.
    ///
    /// The accumulated mask does not depend on the match type, so progress
    /// cached for one type is reused by another.
    pub fn match_words(
        &mut self,
        query: &str,
        id: u32,
        words: &[String],
        match_type: MatchType,
        budget: &mut StepBudget,
    ) -> MatchState {
        let progress = self.entries.entry((query.to_string(), id)).or_default();
        loop {
            if match_type.is_satisfied(progress.mask) {
                return MatchState::Matched;
            }
            let Some(word) = words.get(progress.next) else {
                return MatchState::Unmatched;
            };
            if !budget.take() {
                return MatchState::Pending;
            }
            progress.mask |= match_mask(word, query);
            progress.next += 1;
        }
    }
}

/// Single-pass match of a summary string.
pub fn summary_matches(summary: &str, query: &str, match_type: MatchType) -> bool {
    match_type.is_satisfied(match_mask(summary, query))
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("solution {reference} has no matching data")]
    MissingMatchingData { reference: usize },
}

fn filter_matches(
    solution: &Solution,
    filter: &PreparedFilter,
    cache: &mut WordMatchCache,
) -> Result<bool, FilterError> {
    let matching = solution
        .matching()
        .ok_or(FilterError::MissingMatchingData {
            reference: solution.reference,
        })?;
    let matched = match (matching.words(), matching.summary()) {
        (Some(words), _) => {
            let state = cache.match_words(
                &filter.query,
                matching.id,
                words,
                filter.match_type,
                &mut StepBudget::unlimited(),
            );
            state == MatchState::Matched
        }
        (None, Some(summary)) => summary_matches(summary, &filter.query, filter.match_type),
        (None, None) => false,
    };
    Ok(matched)
}

fn passes(solution: &Solution, filters: &[PreparedFilter], cache: &mut WordMatchCache) -> Result<bool, FilterError> {
    for filter in filters {
        if filter_matches(solution, filter, cache)? == filter.exclude {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Keep the references in `candidates` whose solutions pass every filter
/// and, when `flag_mask` is non-zero, share a flag bit with it. A solution
/// that cannot be evaluated counts as a non-match.
pub(crate) fn filter_references(
    list: &ParsedSolutions,
    candidates: &[usize],
    filters: &[PreparedFilter],
    flag_mask: u32,
    cache: &mut WordMatchCache,
) -> Vec<usize> {
    let mut failures = 0usize;
    let kept = candidates
        .iter()
        .copied()
        .filter(|&reference| {
            let Some(solution) = list.get(reference) else {
                return false;
            };
            if flag_mask != 0 && solution.flags & flag_mask == 0 {
                return false;
            }
            match passes(solution, filters, cache) {
                Ok(pass) => pass,
                Err(err) => {
                    failures += 1;
                    if failures == 1 {
                        warn!(%err, "solution treated as non-match");
                    }
                    false
                }
            }
        })
        .collect();
    if failures > 1 {
        warn!(failures, "solutions treated as non-matches");
    }
    kept
}

/// A flag option together with the number of solutions carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFlag {
    pub name: String,
    pub bit: u32,
    pub count: usize,
}

/// Flag options that can be offered for `list`: those with at least one
/// matching solution, and nothing at all unless two or more qualify.
pub fn available_flags(list: &ParsedSolutions) -> Vec<AvailableFlag> {
    let offered: Vec<AvailableFlag> = flag_options(list.locale())
        .into_iter()
        .map(|option| AvailableFlag {
            count: list
                .solutions()
                .iter()
                .filter(|s| s.flags & option.bit != 0)
                .count(),
            name: option.name,
            bit: option.bit,
        })
        .filter(|flag| flag.count > 0)
        .collect();
    if offered.len() < 2 {
        Vec::new()
    } else {
        offered
    }
}
