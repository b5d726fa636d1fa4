pub mod config_ops;
pub mod correct_ops;
pub mod expand_ops;
pub mod export_ops;
pub mod filter_ops;
pub mod score_ops;

use std::fs;
use std::path::{Path, PathBuf};

use sol_core::matching::MatchingOptions;
use sol_core::settings::SettingsError;
use sol_core::solution::{ListKind, ParsedSolutions, SolutionError, SolutionList};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Solution(#[from] SolutionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("invalid filter {0:?} (expected WORD[:exact|start|end|anywhere])")]
    InvalidFilter(String),
    #[error("unknown flag {name:?}; offered: {offered}")]
    UnknownFlag { name: String, offered: String },
    #[error("export of {rows} rows needs confirmation (pass --yes)")]
    NeedsConfirmation { rows: u128 },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Matching switches shared by the scoring commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchFlags {
    pub ignore_diacritics: bool,
    pub ignore_word_order: bool,
}

impl MatchFlags {
    /// Switches set on the command line win over the configured defaults.
    pub fn options(self) -> MatchingOptions {
        let defaults = MatchingOptions::default();
        MatchingOptions {
            ignore_diacritics: self.ignore_diacritics || defaults.ignore_diacritics,
            ignore_word_order: self.ignore_word_order || defaults.ignore_word_order,
        }
    }
}

/// Read a challenge payload and parse its solution list.
pub fn load_solutions(path: &Path, kind: ListKind) -> Result<ParsedSolutions, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut list = SolutionList::from_payload(&json)?;
    list.ensure_parsed(kind)?;
    match list {
        SolutionList::Parsed(parsed) => Ok(parsed),
        SolutionList::Unparsed(_) => Err(SolutionError::NotParsed.into()),
    }
}

/// Pad `text` with spaces to `width` display columns.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(text);
    let mut out = text.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(w)));
    out
}

pub(crate) fn column_width<'a>(cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

pub(crate) fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{s:.3}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("学生", 6), "学生  ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(0.5)), "0.500");
        assert_eq!(format_score(None), "-");
    }
}
