//! Record → event decoding.
//!
//! Malformed payloads do not end a session. They surface as a status
//! message carrying the raw payload so the operator still sees activity.

use futures::Stream;
use futures::StreamExt;
use srenity_protocol::AnalysisUpdate;
use srenity_protocol::DONE_SENTINEL;
use srenity_protocol::EVENT_PREFIX;
use srenity_protocol::RcaResult;
use srenity_protocol::RunbookAction;

use crate::error::AnalysisError;

/// A typed unit of analysis progress.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    Status { message: String },
    RcaComplete { result: RcaResult },
    RunbookComplete { runbooks: Vec<RunbookAction> },
    Error { message: String },
    /// Terminal sentinel; nothing after it is decoded.
    Done,
}

impl AnalysisEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::RcaComplete { .. } => "rca_complete",
            Self::RunbookComplete { .. } => "runbook_complete",
            Self::Error { .. } => "error",
            Self::Done => "done",
        }
    }
}

impl From<AnalysisUpdate> for AnalysisEvent {
    fn from(update: AnalysisUpdate) -> Self {
        match update {
            AnalysisUpdate::Status { message } => Self::Status { message },
            AnalysisUpdate::RcaComplete { rca } => Self::RcaComplete { result: rca },
            AnalysisUpdate::RunbookComplete { runbooks } => Self::RunbookComplete { runbooks },
            AnalysisUpdate::Error { message } => Self::Error {
                message: message.unwrap_or_else(|| "Unknown error".to_string()),
            },
        }
    }
}

/// Decodes records for one session.
#[derive(Debug, Default)]
pub struct EventDecoder {
    finished: bool,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the terminal sentinel has been decoded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decodes one record. Returns `None` for records that carry no event
    /// and for every record after `Done`.
    pub fn decode(&mut self, record: &str) -> Option<AnalysisEvent> {
        if self.finished {
            return None;
        }
        let Some(payload) = record.strip_prefix(EVENT_PREFIX) else {
            if !record.trim().is_empty() {
                tracing::debug!("ignoring record without event prefix: {record:?}");
            }
            return None;
        };
        let payload = payload.trim();
        if payload.is_empty() {
            return None;
        }
        if payload == DONE_SENTINEL {
            self.finished = true;
            return Some(AnalysisEvent::Done);
        }

        match serde_json::from_str::<AnalysisUpdate>(payload) {
            Ok(update) => Some(update.into()),
            Err(err) => {
                tracing::warn!("non-JSON or unrecognized event payload ({err}): {payload}");
                Some(AnalysisEvent::Status {
                    message: payload.to_string(),
                })
            }
        }
    }
}

/// Lazily decodes a record stream. Ends right after `Done`, on the first
/// transport error, or when the records run out.
pub fn events<S>(records: S) -> impl Stream<Item = Result<AnalysisEvent, AnalysisError>> + Send
where
    S: Stream<Item = Result<String, AnalysisError>> + Send,
{
    async_stream::stream! {
        let mut records = std::pin::pin!(records);
        let mut decoder = EventDecoder::new();
        while let Some(record) = records.next().await {
            match record {
                Ok(record) => {
                    if let Some(event) = decoder.decode(&record) {
                        yield Ok(event);
                        if decoder.is_finished() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    yield Err(err);
                    return;
                }
            }
        }
    }
}
