use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

use super::contact::ContactDraft;
use super::session::{SessionController, SessionError, SessionState};
use super::submission::{ResultSink, SubmissionReceipt};

/// Default debounce before auto-advancing to the next question, long enough
/// for the respondent to see their selection register.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(400);

/// Tokio-side owner of a session and its auto-advance timer.
///
/// Recording an answer schedules a delayed [`SessionController::fire_advance`]
/// on the runtime and keeps the task's abort handle; every competing
/// transition aborts the pending task outright. A timer that slips past the
/// abort still cannot move the session, because the controller rejects stale
/// tickets by generation.
pub struct SessionHandle<S> {
    inner: Arc<Mutex<SessionController<S>>>,
    advance_delay: Duration,
    pending: Arc<Mutex<Option<PendingAdvance>>>,
    next_seq: Arc<AtomicU64>,
    saving: Arc<AtomicBool>,
}

/// The currently scheduled advance. The sequence number lets a finishing
/// timer tell whether the slot still belongs to it, so a late cleanup never
/// discards a newer timer's abort handle.
struct PendingAdvance {
    seq: u64,
    handle: AbortHandle,
}

impl<S> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            advance_delay: self.advance_delay,
            pending: self.pending.clone(),
            next_seq: self.next_seq.clone(),
            saving: self.saving.clone(),
        }
    }
}

impl<S: ResultSink + 'static> SessionHandle<S> {
    pub fn new(controller: SessionController<S>, advance_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            advance_delay,
            pending: Arc::new(Mutex::new(None)),
            next_seq: Arc::new(AtomicU64::new(0)),
            saving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().expect("session lock").state().clone()
    }

    /// Read access to the underlying controller.
    pub fn with<R>(&self, f: impl FnOnce(&SessionController<S>) -> R) -> R {
        let controller = self.inner.lock().expect("session lock");
        f(&controller)
    }

    pub fn start(&self) -> Result<(), SessionError> {
        self.cancel_pending();
        self.inner.lock().expect("session lock").start()
    }

    /// Record a selection and, unless this was the final question, schedule
    /// the debounced advance.
    pub fn select_answer(&self, value: f64) -> Result<(), SessionError> {
        self.cancel_pending();
        let ticket = self
            .inner
            .lock()
            .expect("session lock")
            .select_answer(value)?;

        if let Some(ticket) = ticket {
            let inner = self.inner.clone();
            let pending = self.pending.clone();
            let delay = self.advance_delay;
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
            let task = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let advanced = inner.lock().expect("session lock").fire_advance(ticket);
                if !advanced {
                    debug!("scheduled advance went stale before firing");
                }
                clear_pending_if_owned(&pending, seq);
            });
            *self.pending.lock().expect("pending lock") = Some(PendingAdvance {
                seq,
                handle: task.abort_handle(),
            });
        }
        Ok(())
    }

    pub fn previous(&self) -> Result<(), SessionError> {
        self.cancel_pending();
        self.inner.lock().expect("session lock").previous()
    }

    pub fn submit_answers(&self) -> Result<(), SessionError> {
        self.cancel_pending();
        self.inner.lock().expect("session lock").submit_answers()
    }

    pub fn review_answers(&self) -> Result<(), SessionError> {
        self.cancel_pending();
        self.inner.lock().expect("session lock").review_answers()
    }

    /// Validate contact details and submit the results. While one submission
    /// is running, a concurrent invocation is rejected with an in-flight
    /// error instead of queueing behind the lock.
    pub fn save_results(&self, draft: &ContactDraft) -> Result<SubmissionReceipt, SessionError> {
        if self.saving.swap(true, Ordering::SeqCst) {
            return Err(SessionError::SubmissionInFlight);
        }
        self.cancel_pending();
        let result = self.inner.lock().expect("session lock").save_results(draft);
        self.saving.store(false, Ordering::SeqCst);
        result
    }

    fn cancel_pending(&self) {
        if let Some(entry) = self.pending.lock().expect("pending lock").take() {
            entry.handle.abort();
        }
    }
}

/// Remove the pending entry only when it still belongs to the finishing
/// timer identified by `seq`. A timer from an earlier schedule that finishes
/// late must not evict a newer timer's abort handle.
fn clear_pending_if_owned(pending: &Mutex<Option<PendingAdvance>>, seq: u64) {
    let mut slot = pending.lock().expect("pending lock");
    if slot.as_ref().map(|entry| entry.seq) == Some(seq) {
        slot.take();
    }
}
