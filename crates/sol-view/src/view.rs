//! Staged list view: filter, then sort, then page.
//!
//! Each stage is a function of the previous stage's output plus its own
//! parameters. `refresh` finds the first stage whose parameters changed
//! and recomputes from there down.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use sol_core::solution::ParsedSolutions;

use crate::filter::{available_flags, filter_references, prepare_filters, AvailableFlag, WordFilter, WordMatchCache};
use crate::page::PageSize;
use crate::sort::{sort_references, SortKind, SortOrder};

/// Everything a view depends on besides the list itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub filters: Vec<WordFilter>,
    /// Selected flag bits; zero means no flag filtering.
    #[serde(default)]
    pub flag_mask: u32,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: PageSize,
    /// Bumped whenever the list is rescored.
    #[serde(default)]
    pub score_revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Filter,
    Sort,
    Page,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    /// References of the solutions on the current page, in display order.
    pub items: Vec<usize>,
    pub page: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub total: usize,
    pub filtered: usize,
    /// Offered flag options; empty when flag filtering is not offered.
    pub flags: Vec<AvailableFlag>,
    /// Flag bits actually applied.
    pub flag_mask: u32,
}

#[derive(Debug, Default)]
pub struct ListView {
    cache: WordMatchCache,
    applied: Option<ViewParams>,
    flags: Vec<AvailableFlag>,
    flag_mask: u32,
    total: usize,
    filtered: Vec<usize>,
    sorted: Vec<usize>,
    last_stage: Option<Stage>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// First stage recomputed by the last `refresh`.
    pub fn last_stage(&self) -> Option<Stage> {
        self.last_stage
    }

    /// Filtered references in list order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// Filtered references in display order.
    pub fn sorted(&self) -> &[usize] {
        &self.sorted
    }

    pub fn cache(&self) -> &WordMatchCache {
        &self.cache
    }

    fn first_changed_stage(&self, list: &ParsedSolutions, params: &ViewParams) -> Stage {
        let Some(applied) = &self.applied else {
            return Stage::Filter;
        };
        if self.total != list.len() || applied.filters != params.filters || applied.flag_mask != params.flag_mask {
            Stage::Filter
        } else if applied.sort != params.sort
            || (params.sort.kind == SortKind::Similarity && applied.score_revision != params.score_revision)
        {
            Stage::Sort
        } else {
            Stage::Page
        }
    }

    pub fn refresh(&mut self, list: &ParsedSolutions, params: &ViewParams) -> ViewSnapshot {
        let stage = self.first_changed_stage(list, params);
        let _span = debug_span!("view_refresh", ?stage, solutions = list.len()).entered();

        if stage <= Stage::Filter {
            self.run_filter(list, params);
        }
        if stage <= Stage::Sort {
            self.sorted = self.filtered.clone();
            sort_references(list, &mut self.sorted, params.sort);
        }

        let page_count = params.page_size.page_count(self.sorted.len());
        let page = params.page.min(page_count - 1);
        let items = self.sorted[params.page_size.bounds(page, self.sorted.len())].to_vec();
        debug!(filtered = self.sorted.len(), page, page_count);

        self.applied = Some(params.clone());
        self.last_stage = Some(stage);
        ViewSnapshot {
            items,
            page,
            page_count,
            page_size: params.page_size,
            total: self.total,
            filtered: self.sorted.len(),
            flags: self.flags.clone(),
            flag_mask: self.flag_mask,
        }
    }

    fn run_filter(&mut self, list: &ParsedSolutions, params: &ViewParams) {
        let list_changed = self.total != list.len() || self.applied.is_none();
        if list_changed {
            self.cache.clear();
            self.flags = available_flags(list);
            self.total = list.len();
        }
        let offered = self.flags.iter().fold(0u32, |acc, f| acc | f.bit);
        let flag_mask = params.flag_mask & offered;

        // Filters only ever narrow: with the same flags and the old
        // filters as a prefix, only the new ones need running.
        let narrowing = match &self.applied {
            Some(applied) if !list_changed && flag_mask == self.flag_mask => {
                params.filters.starts_with(&applied.filters).then_some(applied.filters.len())
            }
            _ => None,
        };
        let filtered = match narrowing {
            Some(done) => {
                let fresh = prepare_filters(list, &params.filters[done..]);
                filter_references(list, &self.filtered, &fresh, 0, &mut self.cache)
            }
            None => {
                let all: Vec<usize> = (0..list.len()).collect();
                let prepared = prepare_filters(list, &params.filters);
                filter_references(list, &all, &prepared, flag_mask, &mut self.cache)
            }
        };
        debug!(narrowing = narrowing.is_some(), kept = filtered.len(), "filtered");
        self.filtered = filtered;
        self.flag_mask = flag_mask;
    }
}
