use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use sol_core::solution::ParsedSolutions;
use sol_view::{ListView, ViewParams, ViewSnapshot};

use crate::api::EngineError;

// ---------------------------------------------------------------------------
// Work / Result types
// ---------------------------------------------------------------------------

pub(crate) struct ViewWork {
    pub params: ViewParams,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct ViewResult {
    pub generation: u64,
    pub snapshot: ViewSnapshot,
}

// ---------------------------------------------------------------------------
// ViewWorker
// ---------------------------------------------------------------------------

/// Background recomputation of one list's view. Only the result of the
/// most recent request is ever delivered.
pub(crate) struct ViewWorker {
    work_tx: mpsc::Sender<ViewWork>,
    result_rx: Mutex<mpsc::Receiver<ViewResult>>,
    generation: Arc<AtomicU64>,
}

impl ViewWorker {
    pub fn new(solutions: Arc<RwLock<ParsedSolutions>>) -> Result<Self, EngineError> {
        let generation = Arc::new(AtomicU64::new(0));
        let (work_tx, work_rx) = mpsc::channel::<ViewWork>();
        let (result_tx, result_rx) = mpsc::channel::<ViewResult>();
        {
            let generation = Arc::clone(&generation);
            thread::Builder::new()
                .name("sol-view".into())
                .spawn(move || view_worker(work_rx, result_tx, generation, solutions))
                .map_err(|_| EngineError::WorkerUnavailable)?;
        }
        Ok(Self {
            work_tx,
            result_rx: Mutex::new(result_rx),
            generation,
        })
    }

    /// Queue a recomputation, superseding any earlier request.
    pub fn submit(&self, params: ViewParams) -> Result<u64, EngineError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.work_tx
            .send(ViewWork { params, generation })
            .map_err(|_| EngineError::WorkerUnavailable)?;
        Ok(generation)
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Latest current result, if any; stale results are dropped.
    pub fn try_recv(&self) -> Option<ViewResult> {
        let rx = self.result_rx.lock().ok()?;
        let mut current = None;
        while let Ok(result) = rx.try_recv() {
            if result.generation == self.current_generation() {
                current = Some(result);
            }
        }
        current
    }

    /// Wait up to `timeout` for the result of the current request.
    pub fn recv_current(&self, timeout: Duration) -> Result<ViewResult, EngineError> {
        let rx = self.result_rx.lock().map_err(|_| EngineError::LockPoisoned)?;
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(result) if result.generation == self.current_generation() => return Ok(result),
                Ok(_) => continue,
                Err(mpsc::RecvTimeoutError::Timeout) => return Err(EngineError::Timeout),
                Err(mpsc::RecvTimeoutError::Disconnected) => return Err(EngineError::WorkerUnavailable),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Worker thread
// ---------------------------------------------------------------------------

fn view_worker(
    rx: mpsc::Receiver<ViewWork>,
    tx: mpsc::Sender<ViewResult>,
    generation: Arc<AtomicU64>,
    solutions: Arc<RwLock<ParsedSolutions>>,
) {
    let mut view = ListView::new();
    while let Ok(work) = rx.recv() {
        // Drain: if multiple work items queued, skip to latest
        let mut latest = work;
        while let Ok(newer) = rx.try_recv() {
            latest = newer;
        }

        // Check staleness before doing work
        if latest.generation != generation.load(Ordering::SeqCst) {
            continue;
        }

        let snapshot = {
            let Ok(list) = solutions.read() else {
                warn!("solution list lock poisoned, view worker stopping");
                return;
            };
            view.refresh(&list, &latest.params)
        };

        // Check staleness after recomputation
        if latest.generation != generation.load(Ordering::SeqCst) {
            debug!(generation = latest.generation, "stale view result dropped");
            continue;
        }

        if tx
            .send(ViewResult {
                generation: latest.generation,
                snapshot,
            })
            .is_err()
        {
            return;
        }
    }
}
