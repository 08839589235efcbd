//! Request-scoped context passed explicitly through persistence and cache
//! calls.
//!
//! Every port operation takes a [`RequestContext`]. The context carries an
//! optional deadline that both the cache tier and the relational tier honour,
//! plus a correlation identifier for log output.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

/// Error returned when an operation outlives its request deadline.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Context for a single inbound request.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use taskmanager::context::RequestContext;
///
/// let ctx = RequestContext::background();
/// assert!(ctx.deadline().is_none());
/// assert!(ctx.remaining().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    deadline: Option<Instant>,
    correlation_id: Option<Uuid>,
}

impl RequestContext {
    /// Creates a context with no deadline and no correlation identifier.
    #[must_use]
    pub const fn background() -> Self {
        Self {
            deadline: None,
            correlation_id: None,
        }
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline.
    ///
    /// An earlier deadline already present on the context is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(
            self.deadline
                .map_or(deadline, |current| current.min(deadline)),
        );
        self
    }

    /// Sets the correlation identifier used in log output.
    #[must_use]
    pub const fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the correlation identifier, if any.
    #[must_use]
    pub const fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }

    /// Returns the time left before the deadline.
    ///
    /// Returns `None` when the context has no deadline and `Some(ZERO)` once
    /// the deadline has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Fails if the deadline has already passed.
    ///
    /// # Errors
    ///
    /// Returns [`DeadlineExceeded`] once the deadline has passed.
    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        if self.is_expired() {
            Err(DeadlineExceeded)
        } else {
            Ok(())
        }
    }

    /// Drives `future` to completion unless the deadline passes first.
    ///
    /// # Errors
    ///
    /// Returns [`DeadlineExceeded`] if the deadline elapses before the future
    /// completes. The future is dropped in that case, and is never polled
    /// when the deadline has already passed.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        self.check()?;
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, future)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(future.await),
        }
    }
}
