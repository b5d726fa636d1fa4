use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::Duration;

use tracing::{debug, debug_span};

use sol_core::correction::CorrectionOutcome;
use sol_core::export::{ExportForm, ExportFormat, ExportPlan, ExportScope};
use sol_core::locale::Locale;
use sol_core::matching::MatchingOptions;
use sol_core::solution::{ListKind, ParsedSolutions, SolutionError, SolutionList};
use sol_view::{resize_page, ListView, PageSize, SortOrder, ViewParams, ViewSnapshot, WordFilter};

use crate::async_worker::ViewWorker;

use super::types::{EngineError, ExportResult, ExportTarget, SolutionRecord};

struct Ready {
    solutions: Arc<RwLock<ParsedSolutions>>,
    worker: ViewWorker,
}

/// All engine state for one challenge: its solution list, matching
/// options, the current view parameters and the background view worker.
///
/// The list stays unparsed until the first call that needs solutions.
pub struct ChallengeSession {
    locale: Locale,
    pending: Option<SolutionList>,
    ready: Option<Ready>,
    options: MatchingOptions,
    params: ViewParams,
    last_view: Option<ViewSnapshot>,
}

impl ChallengeSession {
    pub fn new(list: SolutionList) -> Self {
        Self {
            locale: list.locale().clone(),
            pending: Some(list),
            ready: None,
            options: MatchingOptions::default(),
            params: ViewParams::default(),
            last_view: None,
        }
    }

    pub fn from_payload(json: &str) -> Result<Self, EngineError> {
        Ok(Self::new(SolutionList::from_payload(json)?))
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn is_parsed(&self) -> bool {
        self.ready.is_some() || self.pending.as_ref().is_some_and(SolutionList::is_parsed)
    }

    /// Matching options apply when the list is parsed; returns false once
    /// it already has been.
    pub fn set_matching_options(&mut self, options: MatchingOptions) -> bool {
        if self.ready.is_some() {
            return false;
        }
        self.options = options;
        true
    }

    fn ensure_ready(&mut self, preferred: ListKind) -> Result<&Ready, EngineError> {
        if self.ready.is_none() {
            let list = self.pending.as_mut().ok_or(SolutionError::NotParsed)?;
            // On error the list stays pending.
            list.ensure_parsed(preferred)?;
            let Some(SolutionList::Parsed(mut parsed)) = self.pending.take() else {
                return Err(SolutionError::NotParsed.into());
            };
            parsed.build_matching(self.options);
            debug!(kind = ?parsed.kind(), solutions = parsed.len(), "session ready");
            let solutions = Arc::new(RwLock::new(parsed));
            let worker = ViewWorker::new(Arc::clone(&solutions))?;
            self.ready = Some(Ready { solutions, worker });
        }
        self.ready.as_ref().ok_or(EngineError::Solution(SolutionError::NotParsed))
    }

    fn ready(&mut self) -> Result<&Ready, EngineError> {
        self.ensure_ready(ListKind::Expanded)
    }

    fn read(solutions: &RwLock<ParsedSolutions>) -> Result<RwLockReadGuard<'_, ParsedSolutions>, EngineError> {
        solutions.read().map_err(|_| EngineError::LockPoisoned)
    }

    /// Parse (preferring `preferred` on first call) and return the shared list.
    pub fn solutions(&mut self, preferred: ListKind) -> Result<Arc<RwLock<ParsedSolutions>>, EngineError> {
        Ok(Arc::clone(&self.ensure_ready(preferred)?.solutions))
    }

    pub fn solution_records(&mut self, preferred: ListKind) -> Result<Vec<SolutionRecord>, EngineError> {
        let ready = self.ensure_ready(preferred)?;
        let list = Self::read(&ready.solutions)?;
        Ok(list.solutions().iter().map(SolutionRecord::from).collect())
    }

    /// Score `answer` against every solution. An answer with nothing to
    /// compare clears the scores and returns `None`.
    pub fn score(&mut self, answer: &str) -> Result<Option<f64>, EngineError> {
        let _span = debug_span!("session_score").entered();
        let best = {
            let ready = self.ready()?;
            let mut list = ready.solutions.write().map_err(|_| EngineError::LockPoisoned)?;
            list.score(answer)
        };
        self.params.score_revision += 1;
        if self.last_view.is_some() {
            self.submit_view()?;
        }
        Ok(best)
    }

    pub fn correction(&mut self, answer: &str) -> Result<CorrectionOutcome, EngineError> {
        let ready = self.ready()?;
        let list = Self::read(&ready.solutions)?;
        Ok(list.build_correction(answer))
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    pub fn view_params(&self) -> &ViewParams {
        &self.params
    }

    fn submit_view(&mut self) -> Result<u64, EngineError> {
        let params = self.params.clone();
        self.ready()?.worker.submit(params)
    }

    pub fn add_filter(&mut self, filter: WordFilter) -> Result<u64, EngineError> {
        self.params.filters.push(filter);
        self.params.page = 0;
        self.submit_view()
    }

    /// Remove the filter at `index`; out-of-range indices only resubmit.
    pub fn remove_filter(&mut self, index: usize) -> Result<u64, EngineError> {
        if index < self.params.filters.len() {
            self.params.filters.remove(index);
            self.params.page = 0;
        }
        self.submit_view()
    }

    pub fn clear_filters(&mut self) -> Result<u64, EngineError> {
        self.params.filters.clear();
        self.params.page = 0;
        self.submit_view()
    }

    pub fn toggle_flag(&mut self, bit: u32) -> Result<u64, EngineError> {
        self.params.flag_mask ^= bit;
        self.params.page = 0;
        self.submit_view()
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> Result<u64, EngineError> {
        self.params.sort = sort;
        self.params.page = 0;
        self.submit_view()
    }

    pub fn set_page(&mut self, page: usize) -> Result<u64, EngineError> {
        self.params.page = page;
        self.submit_view()
    }

    /// Change the page size, keeping the item at the top of the current
    /// page visible.
    pub fn set_page_size(&mut self, page_size: PageSize) -> Result<u64, EngineError> {
        // The requested page may be past the end; the last view knows by
        // how much, as long as it was paged with the same size.
        let page = match &self.last_view {
            Some(v) if v.page_size == self.params.page_size => self.params.page.min(v.page_count.saturating_sub(1)),
            _ => self.params.page,
        };
        self.params.page = resize_page(page, self.params.page_size, page_size);
        self.params.page_size = page_size;
        self.submit_view()
    }

    /// Latest view for the current parameters, if the worker has one.
    pub fn poll_view(&mut self) -> Option<ViewSnapshot> {
        let result = self.ready.as_ref()?.worker.try_recv()?;
        self.last_view = Some(result.snapshot.clone());
        Some(result.snapshot)
    }

    /// Submit the current parameters and wait for their view.
    pub fn refresh_view_blocking(&mut self, timeout: Duration) -> Result<ViewSnapshot, EngineError> {
        self.submit_view()?;
        let result = self.ready()?.worker.recv_current(timeout)?;
        self.last_view = Some(result.snapshot.clone());
        Ok(result.snapshot)
    }

    pub fn last_view(&self) -> Option<&ViewSnapshot> {
        self.last_view.as_ref()
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Render an export. Above the configured row threshold nothing is
    /// rendered unless `confirmed`.
    pub fn export(
        &mut self,
        target: ExportTarget,
        form: ExportForm,
        format: ExportFormat,
        confirmed: bool,
    ) -> Result<ExportResult, EngineError> {
        let params = self.params.clone();
        let ready = self.ready()?;
        let list = Self::read(&ready.solutions)?;
        let scope = match target {
            ExportTarget::All => ExportScope::All,
            ExportTarget::Filtered | ExportTarget::Page => {
                // Computed here rather than taken from the worker, which
                // may still be working on older parameters.
                let mut view = ListView::new();
                let snapshot = view.refresh(&list, &params);
                if target == ExportTarget::Filtered {
                    ExportScope::Filtered(view.sorted().to_vec())
                } else {
                    ExportScope::Page(snapshot.items)
                }
            }
        };
        let plan = ExportPlan::new(&list, &scope, form, format);
        if plan.needs_confirmation() && !confirmed {
            return Ok(ExportResult::NeedsConfirmation { rows: plan.rows() });
        }
        Ok(ExportResult::Rendered {
            text: plan.render(),
            rows: plan.rows(),
        })
    }
}
