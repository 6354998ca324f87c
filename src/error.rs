//! Error types used by the hub and its subscriptions.
//!
//! This module defines two enums:
//!
//! - [`TryRecvError`]: returned by [`Subscription::try_recv`](crate::Subscription::try_recv).
//! - `DispatchError` (crate-internal): why a single dispatch attempt was abandoned.
//!
//! Publishing never returns an error: abandoned dispatches are logged and dropped.
//! `as_label` gives both a stable snake_case label for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced when polling a subscription without waiting.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// The queue holds no message right now; the subscription is still live.
    #[error("subscription queue is empty")]
    Empty,

    /// The subscription was removed and every queued message has been read.
    #[error("subscription closed")]
    Closed,
}

impl TryRecvError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use hubcast::TryRecvError;
    ///
    /// assert_eq!(TryRecvError::Closed.as_label(), "subscription_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TryRecvError::Empty => "subscription_empty",
            TryRecvError::Closed => "subscription_closed",
        }
    }

    /// Returns a human-readable message.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

impl From<tokio::sync::mpsc::error::TryRecvError> for TryRecvError {
    fn from(err: tokio::sync::mpsc::error::TryRecvError) -> Self {
        match err {
            tokio::sync::mpsc::error::TryRecvError::Empty => TryRecvError::Empty,
            tokio::sync::mpsc::error::TryRecvError::Disconnected => TryRecvError::Closed,
        }
    }
}

/// # Reasons a dispatch attempt was abandoned.
///
/// A dispatch is one try to enqueue one message on one subscriber's queue.
/// Neither variant is retried or reported to the publisher.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DispatchError {
    /// The queue stayed full for the whole delivery window.
    #[error("queue full; gave up after {after:?}")]
    Expired {
        /// The delivery window that elapsed (`0s` = no wait).
        after: Duration,
    },

    /// The subscription was removed or its reader went away.
    #[error("subscription closed")]
    Closed,
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Expired { .. } => "dispatch_expired",
            DispatchError::Closed => "dispatch_closed",
        }
    }
}
