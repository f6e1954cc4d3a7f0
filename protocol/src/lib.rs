//! Wire types shared between the SREnity dashboard and the analysis backend.
//!
//! The backend streams newline-delimited records over a chunked HTTP
//! response. Each record that carries an event starts with [`EVENT_PREFIX`]
//! and is followed either by [`DONE_SENTINEL`] or by a JSON-encoded
//! [`AnalysisUpdate`].

pub mod analysis;
pub mod rca;
pub mod runbook;

pub use analysis::AnalysisUpdate;
pub use analysis::AnalyzeRequest;
pub use analysis::AnalyzeResponse;
pub use rca::RcaResult;
pub use rca::SummarySection;
pub use rca::TierAnalysis;
pub use runbook::RunbookAction;

/// Prefix of every record that carries an event.
pub const EVENT_PREFIX: &str = "data: ";

/// Payload that terminates a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Streaming analysis endpoint.
pub const STREAM_PATH: &str = "/api/analyze/stream";

/// One-shot analysis endpoint that predates streaming.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Formats a single wire record, including the trailing newline.
pub fn encode_record(payload: &str) -> String {
    format!("{EVENT_PREFIX}{payload}\n")
}
