//! Per-session analysis state.
//!
//! [`SessionState::apply`] is the only mutation point for decoded events.
//! Once a session has reached a terminal state every further event is
//! ignored, so `is_streaming` flips to false exactly once.

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use srenity_protocol::RcaResult;
use srenity_protocol::RunbookAction;

use crate::event_decoder::AnalysisEvent;

/// One entry of the append-only status log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusMessage {
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            received_at: Utc::now(),
        }
    }
}

/// Observable state of the current (or most recent) session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub status_messages: Vec<StatusMessage>,
    pub rca: Option<RcaResult>,
    pub runbooks: Vec<RunbookAction>,
    pub is_streaming: bool,
    pub error: Option<String>,
}

/// What applying an event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Continue,
    /// Nothing to record, e.g. a status event with an empty message.
    Unchanged,
    /// `Done` was observed.
    Completed,
    /// The backend reported an error; the message was recorded.
    Failed(String),
    /// The session had already reached a terminal state.
    Ignored,
}

impl SessionState {
    /// State at the start of a session.
    pub fn started() -> Self {
        Self {
            is_streaming: true,
            ..Self::default()
        }
    }

    pub fn status_texts(&self) -> impl Iterator<Item = &str> {
        self.status_messages.iter().map(|m| m.message.as_str())
    }

    pub fn apply(&mut self, event: AnalysisEvent) -> Applied {
        if !self.is_streaming {
            return Applied::Ignored;
        }
        match event {
            AnalysisEvent::Status { message } if message.is_empty() => Applied::Unchanged,
            AnalysisEvent::Status { message } => {
                self.status_messages.push(StatusMessage::new(message));
                Applied::Continue
            }
            AnalysisEvent::RcaComplete { result } => {
                self.rca = Some(result);
                Applied::Continue
            }
            AnalysisEvent::RunbookComplete { runbooks } => {
                self.runbooks = runbooks;
                Applied::Continue
            }
            AnalysisEvent::Error { message } => {
                if self.fail(message.clone()) {
                    Applied::Failed(message)
                } else {
                    Applied::Ignored
                }
            }
            AnalysisEvent::Done => {
                self.close();
                Applied::Completed
            }
        }
    }

    /// Ends the session without an error (transport close or cancel).
    /// Returns whether this call performed the transition.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.is_streaming, false)
    }

    /// Ends the session with an error. Returns whether this call performed
    /// the transition; an already-terminal session keeps its first outcome.
    pub fn fail(&mut self, message: String) -> bool {
        if !self.is_streaming || self.error.is_some() {
            return false;
        }
        self.error = Some(message);
        self.is_streaming = false;
        true
    }
}
