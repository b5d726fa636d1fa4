//! Sort orders for solution views.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use sol_core::solution::{ParsedSolutions, Solution};
use sol_core::unicode::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    #[default]
    Similarity,
    Alphabetical,
}

impl SortKind {
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Similarity => SortDirection::Descending,
            Self::Alphabetical => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    pub kind: SortKind,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(kind: SortKind) -> Self {
        Self {
            kind,
            direction: kind.default_direction(),
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            direction: self.direction.reversed(),
            ..self
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::new(SortKind::default())
    }
}

/// One run of a collation key. Numbers order before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    /// Digit run without leading zeros, ordered by length then digits.
    Number(usize, String),
    Text(String),
}

/// Collation key: case, diacritics and punctuation are ignored, digit runs
/// compare numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey(Vec<KeyPart>);

impl CollationKey {
    pub fn new(text: &str) -> Self {
        let folded = normalize(text, false, true).to_lowercase();
        let mut parts = Vec::new();
        let mut text_run = String::new();
        let mut digit_run = String::new();

        fn flush_digits(parts: &mut Vec<KeyPart>, run: &mut String) {
            if run.is_empty() {
                return;
            }
            let trimmed = run.trim_start_matches('0');
            let digits = if trimmed.is_empty() { "0" } else { trimmed };
            parts.push(KeyPart::Number(digits.len(), digits.to_string()));
            run.clear();
        }
        fn flush_text(parts: &mut Vec<KeyPart>, run: &mut String) {
            if !run.is_empty() {
                parts.push(KeyPart::Text(std::mem::take(run)));
            }
        }

        for c in folded.chars() {
            if c.is_ascii_digit() {
                flush_text(&mut parts, &mut text_run);
                digit_run.push(c);
            } else if c.is_alphanumeric() {
                flush_digits(&mut parts, &mut digit_run);
                text_run.push(c);
            } else {
                flush_digits(&mut parts, &mut digit_run);
                flush_text(&mut parts, &mut text_run);
            }
        }
        flush_digits(&mut parts, &mut digit_run);
        flush_text(&mut parts, &mut text_run);
        Self(parts)
    }
}

fn compare_scores(a: &Solution, b: &Solution, direction: SortDirection) -> Ordering {
    match (a.score, b.score) {
        (Some(x), Some(y)) => direction.apply(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
        // unscored last in either direction
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort `references` in place. Ties always fall back to the reference.
pub fn sort_references(list: &ParsedSolutions, references: &mut [usize], order: SortOrder) {
    match order.kind {
        SortKind::Similarity => references.sort_by(|&a, &b| match (list.get(a), list.get(b)) {
            (Some(x), Some(y)) => compare_scores(x, y, order.direction).then(a.cmp(&b)),
            _ => a.cmp(&b),
        }),
        SortKind::Alphabetical => {
            let mut keyed: Vec<(CollationKey, String, usize)> = references
                .iter()
                .map(|&r| {
                    let text = list.get(r).map(Solution::text).unwrap_or_default();
                    (CollationKey::new(&text), text, r)
                })
                .collect();
            keyed.sort_by(|a, b| {
                order
                    .direction
                    .apply(a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
                    .then(a.2.cmp(&b.2))
            });
            for (slot, (_, _, r)) in references.iter_mut().zip(keyed) {
                *slot = r;
            }
        }
    }
}
