use serde::Serialize;

use sol_core::settings::SettingsError;
use sol_core::solution::{Solution, SolutionError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Solution(#[from] SolutionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("view worker unavailable")]
    WorkerUnavailable,
    #[error("timed out waiting for the view")]
    Timeout,
    #[error("solution list lock poisoned")]
    LockPoisoned,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A solution as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionRecord {
    pub reference: usize,
    pub text: String,
    pub folded: bool,
    pub score: Option<f64>,
    pub flags: u32,
}

impl From<&Solution> for SolutionRecord {
    fn from(s: &Solution) -> Self {
        Self {
            reference: s.reference,
            text: s.text(),
            folded: s.is_folded(),
            score: s.score,
            flags: s.flags,
        }
    }
}

/// Which solutions an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    All,
    /// Everything passing the current filters, in display order.
    Filtered,
    /// The current page.
    Page,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportResult {
    Rendered { text: String, rows: u128 },
    /// Above the configured threshold; retry with confirmation.
    NeedsConfirmation { rows: u128 },
}
