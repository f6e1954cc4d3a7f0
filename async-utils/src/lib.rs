//! Cooperative cancellation for analysis sessions.
//!
//! A session suspends only while opening its request and while waiting for
//! the next chunk of the response body. Both suspend points are wrapped with
//! the helpers here so that a cancelled [`CancellationToken`] stops the
//! session the next time it would resume.

use std::fmt;
use std::future::Future;

use futures::Stream;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// Returned in place of a value when the token fired first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Races a future against a cancellation token.
///
/// The token is polled first, so a future that is ready in the same poll as
/// a cancellation still reports [`Cancelled`]: no work resumes after the
/// signal has been observed.
pub trait OrCancelExt: Future + Sized {
    fn or_cancel<'a>(
        self,
        token: &'a CancellationToken,
    ) -> impl Future<Output = Result<Self::Output, Cancelled>> + Send + 'a
    where
        Self: Send + 'a,
        Self::Output: Send;
}

impl<F: Future> OrCancelExt for F {
    fn or_cancel<'a>(
        self,
        token: &'a CancellationToken,
    ) -> impl Future<Output = Result<Self::Output, Cancelled>> + Send + 'a
    where
        Self: Send + 'a,
        Self::Output: Send,
    {
        async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(Cancelled),
                out = self => Ok(out),
            }
        }
    }
}

/// Pulls the next item from a stream unless the token fires first.
pub trait StreamCancelExt: Stream + Unpin + Send {
    fn next_or_cancel<'a>(
        &'a mut self,
        token: &'a CancellationToken,
    ) -> impl Future<Output = Result<Option<Self::Item>, Cancelled>> + Send + 'a
    where
        Self::Item: Send,
    {
        self.next().or_cancel(token)
    }
}

impl<S: Stream + Unpin + Send> StreamCancelExt for S {}
