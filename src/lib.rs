//! Solution graph and answer-matching engine.
//!
//! Parsing, scoring, correction and export live in `sol_core`; the staged
//! filter/sort/page view lives in `sol_view`. This crate ties them into one
//! session per challenge with view recomputation off the caller's thread.

pub mod api;
mod async_worker;
pub mod trace_init;

pub use sol_core;
pub use sol_view;

pub use api::{ChallengeSession, EngineError, ExportResult, ExportTarget, SolutionRecord};
