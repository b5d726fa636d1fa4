//! Correction building: pick the best-scoring solutions, enumerate their
//! variations, diff each against the answer and keep the smallest edit.
//!
//! Only meaningful once the answer has been accepted by the grading policy
//! (outside this crate) but might still deserve a correction, e.g. a typo or
//! a missing accent.

pub mod diff;

#[cfg(test)]
mod tests;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::matching::score::{is_tied, VARIATION_LIMIT};
use crate::solution::{ParsedSolutions, Solution, SolutionError, SolutionList};
use crate::unicode::normalize;

pub use diff::{changed_word_chars, render_inline, word_change_groups, DiffKind, DiffSegment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    /// Reference of the solution the variation came from.
    pub reference: usize,
    pub variation: String,
    pub diff: Vec<DiffSegment>,
}

impl Correction {
    pub fn render_inline(&self) -> String {
        render_inline(&self.diff)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CorrectionOutcome {
    Correction(Correction),
    /// Nothing worth showing: empty answer, no solutions, or the answer
    /// already matches a variation.
    None,
    /// Locale policy: corrections are not attempted.
    Unsupported,
}

impl CorrectionOutcome {
    pub fn correction(&self) -> Option<&Correction> {
        match self {
            Self::Correction(c) => Some(c),
            _ => None,
        }
    }
}

/// Ranking key: fewer word-changing runs, then fewer changed characters,
/// then earlier solution.
type Rank = (usize, usize, usize);

impl ParsedSolutions {
    /// Solutions tied for the best score, or all of them when unscored.
    pub fn best_solutions(&self) -> Vec<&Solution> {
        let best = self
            .solutions()
            .iter()
            .filter_map(|s| s.score)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |b| b.max(s))));
        match best {
            Some(best) => self
                .solutions()
                .iter()
                .filter(|s| s.score.map_or(false, |x| is_tied(x, best)))
                .collect(),
            None => self.solutions().iter().collect(),
        }
    }

    pub fn build_correction(&self, answer: &str) -> CorrectionOutcome {
        let _span = debug_span!("build_correction", locale = %self.locale()).entered();
        if !self.locale().supports_correction() {
            debug!("correction unsupported for locale");
            return CorrectionOutcome::Unsupported;
        }
        let answer = normalize(answer, true, false);
        if answer.is_empty() {
            return CorrectionOutcome::None;
        }

        let prepared = if self.has_scores() {
            self.prepare_answer(&answer)
        } else {
            None
        };

        let mut best: Option<(Rank, Correction)> = None;
        for solution in self.best_solutions() {
            let variations = match (&prepared, solution.is_folded()) {
                (Some(p), true) => p.candidate_variations(&solution.tokens, VARIATION_LIMIT),
                _ => solution.variations(),
            };
            for variation in variations {
                let diff = diff::diff(&answer, &variation);
                let groups = word_change_groups(&diff);
                if groups == 0 {
                    // The answer already reads as an accepted variation.
                    debug!(reference = solution.reference, "answer matches a variation");
                    return CorrectionOutcome::None;
                }
                let rank = (groups, changed_word_chars(&diff), solution.reference);
                if best.as_ref().map_or(true, |(r, _)| rank < *r) {
                    best = Some((
                        rank,
                        Correction {
                            reference: solution.reference,
                            variation,
                            diff,
                        },
                    ));
                }
            }
        }

        match best {
            Some((rank, correction)) => {
                debug!(reference = correction.reference, groups = rank.0, "correction selected");
                CorrectionOutcome::Correction(correction)
            }
            None => CorrectionOutcome::None,
        }
    }
}

/// Build the best correction for `answer` from a parsed list.
pub fn build_correction(list: &SolutionList, answer: &str) -> Result<CorrectionOutcome, SolutionError> {
    Ok(list.parsed()?.build_correction(answer))
}
