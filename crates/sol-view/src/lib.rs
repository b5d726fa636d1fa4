//! Interactive filter/sort/page engine over parsed solution lists.
//!
//! A `ListView` is owned per displayed list. It keeps the word-match cache
//! and the output of each stage so that a change to the page only repages,
//! a change to the sort only resorts and repages, and so on.

pub mod filter;
pub mod page;
pub mod sort;
mod view;

#[cfg(test)]
mod tests;

pub use filter::{AvailableFlag, FilterError, MatchState, MatchType, StepBudget, WordFilter, WordMatchCache};
pub use page::{resize_page, PageSize};
pub use sort::{SortDirection, SortKind, SortOrder};
pub use view::{ListView, Stage, ViewParams, ViewSnapshot};
