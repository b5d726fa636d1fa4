//! Solutions and solution lists.
//!
//! A `SolutionList` starts `Unparsed` (holding a graph and/or compact
//! patterns) and becomes `Parsed` on the first `ensure_parsed` call. Once
//! parsed, the list and the text of its solutions never change; only
//! scores and matching data are attached afterwards.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::flags::compute_flags;
use crate::graph::SolutionGraph;
use crate::locale::Locale;
use crate::matching::{ListMatching, SolutionMatching};
use crate::pattern::{self, Token};

#[derive(Debug, thiserror::Error)]
pub enum SolutionError {
    #[error("malformed graph: layer {layer} alternative {alternative} points to missing target {target}")]
    MalformedGraph {
        layer: usize,
        alternative: usize,
        target: usize,
    },

    #[error("solution list has not been parsed")]
    NotParsed,

    #[error("invalid challenge payload: {0}")]
    Payload(String),
}

/// Which source representation a parsed list was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Fully enumerated graph paths (or a flat sentence list).
    Expanded,
    /// Compact patterns, possibly folded.
    Compact,
}

/// One accepted answer.
#[derive(Debug, Clone)]
pub struct Solution {
    pub locale: Locale,
    /// Position in the owning list; stable tie-break and cache key.
    pub reference: usize,
    pub tokens: Vec<Token>,
    pub score: Option<f64>,
    pub flags: u32,
    pub(crate) matching: Option<SolutionMatching>,
}

impl Solution {
    pub fn from_text(locale: &Locale, reference: usize, text: String) -> Self {
        Self::from_tokens(locale, reference, vec![Token::Text(text)])
    }

    pub fn from_tokens(locale: &Locale, reference: usize, tokens: Vec<Token>) -> Self {
        let flags = compute_flags(locale, &pattern::render_folded(&tokens));
        Self {
            locale: locale.clone(),
            reference,
            tokens,
            score: None,
            flags,
            matching: None,
        }
    }

    /// True if the solution still embeds alternatives.
    pub fn is_folded(&self) -> bool {
        pattern::is_folded(&self.tokens)
    }

    /// Display text: folded form, alternatives bracketed in place.
    pub fn text(&self) -> String {
        pattern::render_folded(&self.tokens)
    }

    /// Every concrete reading of this solution.
    pub fn variations(&self) -> Vec<String> {
        if self.is_folded() {
            pattern::unfold(&self.tokens)
        } else {
            vec![self.text()]
        }
    }

    pub fn variation_count(&self) -> u128 {
        pattern::variation_count(&self.tokens)
    }

    pub fn matching(&self) -> Option<&SolutionMatching> {
        self.matching.as_ref()
    }
}

/// Locale and delimiting information carried by a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeMeta {
    pub locale: Locale,
    pub whitespace_delimited: bool,
}

/// A list whose expansion has been deferred.
#[derive(Debug, Clone)]
pub struct UnparsedSolutions {
    pub graph: Option<SolutionGraph>,
    pub patterns: Option<Vec<String>>,
    pub meta: ChallengeMeta,
}

impl UnparsedSolutions {
    /// Which kind `parse(preferred)` would produce.
    pub fn resolve_kind(&self, preferred: ListKind) -> ListKind {
        match (preferred, self.graph.is_some(), self.patterns.is_some()) {
            (ListKind::Expanded, true, _) => ListKind::Expanded,
            (ListKind::Compact, _, true) => ListKind::Compact,
            (_, true, false) => ListKind::Expanded,
            (_, false, true) => ListKind::Compact,
            (preferred, _, _) => preferred,
        }
    }

    /// Build a parsed list, preferring `preferred` and falling back to
    /// whichever representation is present.
    pub fn parse(&self, preferred: ListKind) -> Result<ParsedSolutions, SolutionError> {
        let locale = &self.meta.locale;
        match self.resolve_kind(preferred) {
            ListKind::Expanded => match &self.graph {
                Some(graph) => ParsedSolutions::from_graph(graph, locale),
                None => Ok(ParsedSolutions::new(locale.clone(), ListKind::Expanded, Vec::new())),
            },
            ListKind::Compact => match &self.patterns {
                Some(patterns) => Ok(ParsedSolutions::from_patterns(patterns, locale)),
                None => Ok(ParsedSolutions::new(locale.clone(), ListKind::Compact, Vec::new())),
            },
        }
    }
}

/// A concrete, ordered list of solutions.
#[derive(Debug, Clone)]
pub struct ParsedSolutions {
    locale: Locale,
    kind: ListKind,
    solutions: Vec<Solution>,
    pub(crate) matching: Option<ListMatching>,
}

impl ParsedSolutions {
    fn new(locale: Locale, kind: ListKind, solutions: Vec<Solution>) -> Self {
        Self {
            locale,
            kind,
            solutions,
            matching: None,
        }
    }

    pub fn from_graph(graph: &SolutionGraph, locale: &Locale) -> Result<Self, SolutionError> {
        let sentences = graph.expand()?;
        Ok(Self::from_sentences(sentences, locale))
    }

    pub fn from_patterns(patterns: &[String], locale: &Locale) -> Self {
        let _span = debug_span!("parse_patterns", count = patterns.len()).entered();
        let solutions = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| Solution::from_tokens(locale, i, pattern::parse_pattern(p)))
            .collect();
        Self::new(locale.clone(), ListKind::Compact, solutions)
    }

    /// One solution per already-known-correct sentence.
    pub fn from_sentences(sentences: Vec<String>, locale: &Locale) -> Self {
        let solutions: Vec<Solution> = sentences
            .into_iter()
            .enumerate()
            .map(|(i, s)| Solution::from_text(locale, i, s))
            .collect();
        debug!(locale = %locale, solutions = solutions.len(), "parsed sentences");
        Self::new(locale.clone(), ListKind::Expanded, solutions)
    }

    /// One solution per accepted word-bank token sequence.
    pub fn from_word_bank(
        sequences: Vec<Vec<String>>,
        locale: &Locale,
        whitespace_delimited: bool,
    ) -> Self {
        let separator = if whitespace_delimited { " " } else { "" };
        let sentences = sequences.into_iter().map(|t| t.join(separator)).collect();
        Self::from_sentences(sentences, locale)
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub(crate) fn solutions_mut(&mut self) -> &mut [Solution] {
        &mut self.solutions
    }

    pub fn get(&self, reference: usize) -> Option<&Solution> {
        self.solutions.get(reference)
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn matching(&self) -> Option<&ListMatching> {
        self.matching.as_ref()
    }

    pub fn has_scores(&self) -> bool {
        self.solutions.iter().any(|s| s.score.is_some())
    }

    /// Overwrite one score, e.g. with a grade computed elsewhere. Returns
    /// false for an unknown reference.
    pub fn set_score(&mut self, reference: usize, score: Option<f64>) -> bool {
        match self.solutions.get_mut(reference) {
            Some(solution) => {
                solution.score = score;
                true
            }
            None => false,
        }
    }
}

/// Deferred or concrete solution list.
#[derive(Debug, Clone)]
pub enum SolutionList {
    Unparsed(UnparsedSolutions),
    Parsed(ParsedSolutions),
}

impl SolutionList {
    pub fn unparsed(
        graph: Option<SolutionGraph>,
        patterns: Option<Vec<String>>,
        meta: ChallengeMeta,
    ) -> Self {
        Self::Unparsed(UnparsedSolutions {
            graph,
            patterns,
            meta,
        })
    }

    pub fn locale(&self) -> &Locale {
        match self {
            Self::Unparsed(u) => &u.meta.locale,
            Self::Parsed(p) => &p.locale,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// Parse on first call; later calls return the existing list whatever
    /// `preferred` says. On error the list stays unparsed.
    pub fn ensure_parsed(&mut self, preferred: ListKind) -> Result<&mut ParsedSolutions, SolutionError> {
        if let Self::Unparsed(unparsed) = self {
            let parsed = unparsed.parse(preferred)?;
            *self = Self::Parsed(parsed);
        }
        match self {
            Self::Parsed(parsed) => Ok(parsed),
            Self::Unparsed(_) => Err(SolutionError::NotParsed),
        }
    }

    pub fn parsed(&self) -> Result<&ParsedSolutions, SolutionError> {
        match self {
            Self::Parsed(parsed) => Ok(parsed),
            Self::Unparsed(_) => Err(SolutionError::NotParsed),
        }
    }

    pub fn parsed_mut(&mut self) -> Result<&mut ParsedSolutions, SolutionError> {
        match self {
            Self::Parsed(parsed) => Ok(parsed),
            Self::Unparsed(_) => Err(SolutionError::NotParsed),
        }
    }
}
