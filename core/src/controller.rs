//! Owns the single active analysis session.
//!
//! Each [`StreamController::start`] call supersedes the previous session:
//! its cancellation token fires and the shared generation counter moves on,
//! so a superseded task can no longer mutate [`SessionState`] even if it is
//! still draining an in-flight chunk.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use futures::StreamExt;
use srenity_async_utils::OrCancelExt;
use srenity_async_utils::StreamCancelExt;
use srenity_protocol::AnalyzeRequest;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::event_decoder::events;
use crate::reassembler::records;
use crate::session::Applied;
use crate::session::SessionState;
use crate::transport::AnalysisTransport;

/// Lifecycle callbacks. Each fires at most once per session.
pub trait SessionHooks: Send + Sync {
    /// The session ended through `Done` or transport close.
    fn on_complete(&self) {}

    /// The backend reported an error or the transport failed.
    fn on_error(&self, _error: &AnalysisError) {}
}

struct NoHooks;

impl SessionHooks for NoHooks {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    Done,
    TransportClosed,
}

/// How a session ended, as seen by its own task.
#[derive(Debug)]
pub enum SessionOutcome {
    Completed(CompletionReason),
    Failed(AnalysisError),
    /// Cancelled explicitly or superseded by a newer session.
    Cancelled,
}

impl SessionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Handle to one started session.
#[derive(Debug)]
pub struct SessionHandle {
    generation: u64,
    outcome: oneshot::Receiver<SessionOutcome>,
}

impl SessionHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the session task to finish.
    pub async fn wait(self) -> SessionOutcome {
        self.outcome.await.unwrap_or(SessionOutcome::Cancelled)
    }
}

struct ActiveSession {
    generation: u64,
    cancel: CancellationToken,
}

/// Starts, supersedes and cancels analysis sessions.
pub struct StreamController {
    transport: Arc<dyn AnalysisTransport>,
    hooks: Arc<dyn SessionHooks>,
    state: watch::Sender<SessionState>,
    generation: Arc<AtomicU64>,
    active: Option<ActiveSession>,
}

impl StreamController {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            transport,
            hooks: Arc::new(NoHooks),
            state,
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn SessionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Read-only view of the session state, updated as events arrive.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[cfg(test)]
    fn has_session(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a new session, cancelling the current one first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, request: AnalyzeRequest) -> SessionHandle {
        if let Some(previous) = self.active.take() {
            tracing::info!(
                generation = previous.generation,
                "superseding active analysis session"
            );
            previous.cancel.cancel();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(SessionState::started());

        let cancel = CancellationToken::new();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let session = SessionTask {
            generation,
            current: Arc::clone(&self.generation),
            cancel: cancel.clone(),
            state: self.state.clone(),
            hooks: Arc::clone(&self.hooks),
        };
        let transport = Arc::clone(&self.transport);

        tracing::info!(
            generation,
            alert_id = request.alert_id.as_deref().unwrap_or("-"),
            service_id = request.service_id.as_deref().unwrap_or("-"),
            "starting analysis session"
        );
        tokio::spawn(async move {
            let outcome = session.run(transport, request).await;
            let _ = outcome_tx.send(outcome);
        });

        self.active = Some(ActiveSession { generation, cancel });
        SessionHandle {
            generation,
            outcome: outcome_rx,
        }
    }

    /// Cancels the active session. No-op when there is none.
    pub fn cancel(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        active.cancel.cancel();
        let current = self.generation.load(Ordering::SeqCst);
        self.state.send_if_modified(|state| {
            active.generation == current && state.close()
        });
        tracing::info!(generation = active.generation, "analysis session cancelled");
    }
}

impl Drop for StreamController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

/// Everything a spawned session needs; owned by its task.
struct SessionTask {
    generation: u64,
    current: Arc<AtomicU64>,
    cancel: CancellationToken,
    state: watch::Sender<SessionState>,
    hooks: Arc<dyn SessionHooks>,
}

impl SessionTask {
    async fn run(
        self,
        transport: Arc<dyn AnalysisTransport>,
        request: AnalyzeRequest,
    ) -> SessionOutcome {
        let body = match transport.open_stream(&request).or_cancel(&self.cancel).await {
            Err(_) => return self.cancelled(),
            Ok(Err(err)) => return self.fail(err),
            Ok(Ok(body)) => body,
        };

        let mut stream = events(records(body)).boxed();
        loop {
            let event = match stream.next_or_cancel(&self.cancel).await {
                Err(_) => return self.cancelled(),
                Ok(None) => return self.complete(CompletionReason::TransportClosed),
                Ok(Some(Err(err))) => return self.fail(err),
                Ok(Some(Ok(event))) => event,
            };
            if self.cancel.is_cancelled() {
                return self.cancelled();
            }

            tracing::debug!(generation = self.generation, kind = event.kind(), "event");
            let mut applied = Applied::Ignored;
            self.mutate(|state| {
                applied = state.apply(event);
                !matches!(applied, Applied::Ignored | Applied::Unchanged)
            });
            match applied {
                Applied::Continue | Applied::Unchanged => {}
                Applied::Completed => {
                    tracing::info!(generation = self.generation, "analysis complete");
                    self.hooks.on_complete();
                    return SessionOutcome::Completed(CompletionReason::Done);
                }
                Applied::Failed(message) => {
                    let err = AnalysisError::Backend(message);
                    tracing::warn!(generation = self.generation, "backend reported error: {err}");
                    self.hooks.on_error(&err);
                    return SessionOutcome::Failed(err);
                }
                // Superseded, or already closed by `cancel()`.
                Applied::Ignored => return SessionOutcome::Cancelled,
            }
        }
    }

    fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Applies `f` only while this session is still the current one.
    fn mutate(&self, f: impl FnOnce(&mut SessionState) -> bool) -> bool {
        self.state
            .send_if_modified(|state| self.is_current() && f(state))
    }

    fn complete(&self, reason: CompletionReason) -> SessionOutcome {
        if self.mutate(SessionState::close) {
            tracing::info!(generation = self.generation, ?reason, "analysis stream closed");
            self.hooks.on_complete();
            SessionOutcome::Completed(reason)
        } else {
            SessionOutcome::Cancelled
        }
    }

    fn fail(&self, err: AnalysisError) -> SessionOutcome {
        let message = err.to_string();
        if self.mutate(|state| state.fail(message)) {
            tracing::warn!(generation = self.generation, "analysis session failed: {err}");
            self.hooks.on_error(&err);
            SessionOutcome::Failed(err)
        } else {
            SessionOutcome::Cancelled
        }
    }

    fn cancelled(&self) -> SessionOutcome {
        self.mutate(SessionState::close);
        tracing::debug!(generation = self.generation, "session task observed cancellation");
        SessionOutcome::Cancelled
    }
}
