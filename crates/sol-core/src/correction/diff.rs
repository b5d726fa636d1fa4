//! Word-level diff on top of the `diff` crate's LCS.
//!
//! Both texts are split into pieces: word runs, whitespace runs, and single
//! other characters. Words compare case-insensitively and any two
//! whitespace runs compare equal, so only real edits show up.

use serde::{Deserialize, Serialize};

use crate::unicode::is_word_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Unchanged,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffSegment {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }

    pub fn is_change(&self) -> bool {
        self.kind != DiffKind::Unchanged
    }

    /// Changes made only of spaces and punctuation are ignorable.
    pub fn has_word_chars(&self) -> bool {
        self.text.chars().any(is_word_char)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceKind {
    Word,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct Piece<'a> {
    text: &'a str,
    kind: PieceKind,
}

fn kind_of(c: char) -> PieceKind {
    if is_word_char(c) {
        PieceKind::Word
    } else if c.is_whitespace() {
        PieceKind::Space
    } else {
        PieceKind::Other
    }
}

fn pieces(text: &str) -> Vec<Piece<'_>> {
    let mut out: Vec<Piece<'_>> = Vec::new();
    let mut start = 0;
    let mut current: Option<PieceKind> = None;
    for (i, c) in text.char_indices() {
        let kind = kind_of(c);
        match current {
            Some(k) if k == kind && kind != PieceKind::Other => {}
            Some(k) => {
                out.push(Piece {
                    text: &text[start..i],
                    kind: k,
                });
                start = i;
                current = Some(kind);
            }
            None => current = Some(kind),
        }
    }
    if let Some(k) = current {
        out.push(Piece {
            text: &text[start..],
            kind: k,
        });
    }
    out
}

impl PartialEq for Piece<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            PieceKind::Space => true,
            PieceKind::Word => self.text == other.text || self.text.to_lowercase() == other.text.to_lowercase(),
            PieceKind::Other => self.text == other.text,
        }
    }
}

/// Diff `answer` against `target`. Unchanged segments carry the target's
/// text; within each changed run, removals come before additions.
pub fn diff(answer: &str, target: &str) -> Vec<DiffSegment> {
    let a = pieces(answer);
    let b = pieces(target);

    let mut out: Vec<DiffSegment> = Vec::new();
    let mut removed = String::new();
    let mut added = String::new();
    for result in ::diff::slice(&a, &b) {
        match result {
            ::diff::Result::Left(piece) => removed.push_str(piece.text),
            ::diff::Result::Right(piece) => added.push_str(piece.text),
            ::diff::Result::Both(_, piece) => {
                flush_changes(&mut out, &mut removed, &mut added);
                push_unchanged(&mut out, piece.text);
            }
        }
    }
    flush_changes(&mut out, &mut removed, &mut added);
    out
}

fn flush_changes(out: &mut Vec<DiffSegment>, removed: &mut String, added: &mut String) {
    if !removed.is_empty() {
        out.push(DiffSegment::new(DiffKind::Removed, removed));
        removed.clear();
    }
    if !added.is_empty() {
        out.push(DiffSegment::new(DiffKind::Added, added));
        added.clear();
    }
}

fn push_unchanged(out: &mut Vec<DiffSegment>, text: &str) {
    match out.last_mut() {
        Some(last) if last.kind == DiffKind::Unchanged => last.text.push_str(text),
        _ => out.push(DiffSegment::new(DiffKind::Unchanged, text)),
    }
}

/// Number of changed runs that involve word characters.
pub fn word_change_groups(diff: &[DiffSegment]) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    let mut group_has_words = false;
    for segment in diff {
        if segment.is_change() {
            in_group = true;
            group_has_words |= segment.has_word_chars();
        } else {
            if in_group && group_has_words {
                groups += 1;
            }
            in_group = false;
            group_has_words = false;
        }
    }
    if in_group && group_has_words {
        groups += 1;
    }
    groups
}

/// Word characters added or removed.
pub fn changed_word_chars(diff: &[DiffSegment]) -> usize {
    diff.iter()
        .filter(|s| s.is_change())
        .map(|s| s.text.chars().filter(|&c| is_word_char(c)).count())
        .sum()
}

/// Inline rendering: `[-removed-]{+added+}`.
pub fn render_inline(diff: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in diff {
        match segment.kind {
            DiffKind::Unchanged => out.push_str(&segment.text),
            DiffKind::Removed => {
                out.push_str("[-");
                out.push_str(&segment.text);
                out.push_str("-]");
            }
            DiffKind::Added => {
                out.push_str("{+");
                out.push_str(&segment.text);
                out.push_str("+}");
            }
        }
    }
    out
}
