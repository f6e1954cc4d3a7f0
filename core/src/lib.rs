//! Root of the `srenity-core` library: the streaming analysis pipeline and
//! the section normalizer behind the `srenity` CLI.

// Library code reports through `tracing`; only the CLI writes to the
// terminal.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod controller;
pub mod error;
pub mod event_decoder;
pub mod normalize;
pub mod progress;
pub mod reassembler;
pub mod session;
pub mod transport;

pub use controller::CompletionReason;
pub use controller::SessionHandle;
pub use controller::SessionHooks;
pub use controller::SessionOutcome;
pub use controller::StreamController;
pub use error::AnalysisError;
pub use event_decoder::AnalysisEvent;
pub use session::SessionState;
pub use session::StatusMessage;
pub use transport::AnalysisTransport;
pub use transport::HttpTransport;
