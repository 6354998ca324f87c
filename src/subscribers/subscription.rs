//! # Subscription handle: the reading end of a per-subscriber queue.
//!
//! [`Subscription`] is returned by [`Broadcaster::subscribe`](crate::Broadcaster::subscribe)
//! and owned by exactly one consumer. It wraps a bounded `mpsc` receiver plus the
//! cancellation token that marks the subscription dead.
//!
//! ## Lifecycle
//! ```text
//! subscribe() ──► live ──► unsubscribe(id) / shutdown() / reaped ──► dead
//!                  │                                                 │
//!                  └── recv() yields messages                         └── recv() drains the
//!                                                                        queue, then None
//! ```
//!
//! ## Rules
//! - **End-of-stream is terminal**: once `recv()` returned `None`, it keeps returning `None`.
//! - **Queued messages survive removal**: messages enqueued before removal can still be read.
//! - **Dropping is fine**: the next publish targeting a dropped subscription reaps it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::TryRecvError;
use crate::messages::Message;

/// Global counter for subscription ids; ids are never reused.
static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque identifier of a subscription.
///
/// Ids are unique for the life of the process, so an id kept after its
/// subscription died can never address a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn next() -> Self {
        Self(SUBSCRIPTION_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Reading end of one subscription.
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: mpsc::Receiver<Arc<Message<T>>>,
    closed: CancellationToken,
    capacity: usize,
}

impl<T> Subscription<T> {
    pub(crate) fn new(
        id: SubscriptionId,
        rx: mpsc::Receiver<Arc<Message<T>>>,
        closed: CancellationToken,
        capacity: usize,
    ) -> Self {
        Self {
            id,
            rx,
            closed,
            capacity,
        }
    }

    /// Identifier to pass to [`Broadcaster::unsubscribe`](crate::Broadcaster::unsubscribe).
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next message.
    ///
    /// Returns `None` once the subscription has been removed and its queue is drained.
    /// Cancel safe.
    pub async fn recv(&mut self) -> Option<Arc<Message<T>>> {
        tokio::select! {
            biased;
            msg = self.rx.recv() => msg,
            _ = self.closed.cancelled() => {
                self.rx.close();
                self.rx.recv().await
            }
        }
    }

    /// Takes the next message without waiting.
    ///
    /// - [`TryRecvError::Empty`]: live, nothing queued
    /// - [`TryRecvError::Closed`]: removed and drained
    pub fn try_recv(&mut self) -> Result<Arc<Message<T>>, TryRecvError> {
        let closed = self.closed.is_cancelled();
        if closed {
            self.rx.close();
        }
        match self.rx.try_recv() {
            Ok(msg) => Ok(msg),
            Err(mpsc::error::TryRecvError::Empty) if closed => Err(TryRecvError::Closed),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns `true` once the subscription has been removed from its hub.
    ///
    /// Messages may still be queued; see [`recv`](Self::recv).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Number of messages currently queued.
    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` if no message is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Queue bound shared by every subscription of the same hub.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("queued", &self.rx.len())
            .field("capacity", &self.capacity)
            .field("closed", &self.closed.is_cancelled())
            .finish()
    }
}
