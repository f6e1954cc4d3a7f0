use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failures that end an analysis session or a one-shot call.
///
/// Operator-initiated cancellation is not represented here; it surfaces as
/// [`srenity_async_utils::Cancelled`] and is never recorded as an error.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The backend answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// Opening or reading the response body failed.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The backend reported an `error` event on a healthy stream.
    #[error("{0}")]
    Backend(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Whether the transport itself failed, as opposed to the backend
    /// reporting a failure in-band.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Network(_) | Self::InvalidResponse(_)
        )
    }
}
