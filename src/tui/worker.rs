//! Background API workers for a non-blocking TUI.
//!
//! Each remote call runs on its own thread and reports exactly one terminal
//! message over an mpsc channel. Delivery is gated on a cancellation flag
//! owned by the view that spawned the task: a cancelled task's result is
//! dropped on the worker side, so a stale response can never reach the
//! state machine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::TriageService;
use crate::domain::{DiagnosisOutcome, HistoryEntry, PredictRequest};
use crate::ports::DiagnosisApi;
use crate::LabscopeError;

/// Handle to a running one-shot task.
pub struct TaskHandle<T> {
    rx: Receiver<T>,
    cancelled: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl<T> TaskHandle<T> {
    /// Take the task's message if it has arrived (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Discard the task's eventual result. The request itself is not
    /// interrupted; its outcome is dropped on the worker thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Spawners for the remote operations the UI runs in the background.
pub struct ApiWorker;

impl ApiWorker {
    /// Submit a panel for prediction.
    #[must_use]
    pub fn spawn_predict<A>(
        service: Arc<TriageService<A>>,
        patient_name: String,
        request: PredictRequest,
    ) -> TaskHandle<Result<DiagnosisOutcome, LabscopeError>>
    where
        A: DiagnosisApi + 'static,
    {
        spawn_task(move || service.submit(&patient_name, &request))
    }

    /// Fetch the stored history.
    #[must_use]
    pub fn spawn_history<A>(
        service: Arc<TriageService<A>>,
    ) -> TaskHandle<Result<Vec<HistoryEntry>, LabscopeError>>
    where
        A: DiagnosisApi + 'static,
    {
        spawn_task(move || service.fetch_history())
    }

    /// Download a prescription document.
    #[must_use]
    pub fn spawn_download<A>(
        service: Arc<TriageService<A>>,
        id: i64,
    ) -> TaskHandle<Result<PathBuf, LabscopeError>>
    where
        A: DiagnosisApi + 'static,
    {
        spawn_task(move || service.download_prescription(id))
    }
}

fn spawn_task<T, F>(job: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    let handle = thread::spawn(move || {
        let outcome = job();
        if flag.load(Ordering::Relaxed) {
            tracing::debug!("Dropping result of a cancelled task");
            return;
        }
        // The receiver may already be gone during shutdown
        let _ = tx.send(outcome);
    });

    TaskHandle {
        rx,
        cancelled,
        _handle: handle,
    }
}
