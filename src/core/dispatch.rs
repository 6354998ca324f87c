//! # Single dispatch attempt: one message to one subscriber.
//!
//! ```text
//! dispatch(registry, target, msg)
//!     ├─ target closed / reader dropped ──► Err(Closed)
//!     ├─ filter rejects                 ──► Ok(Filtered)
//!     ├─ expire = 0 ── try_reserve
//!     │                ├─ room   ──► commit ──► Ok(Delivered)
//!     │                └─ full   ──► Err(Expired{0s})
//!     └─ expire > 0 ── reserve() raced against timeout(expire) and target.closed
//!                      ├─ room           ──► commit ──► Ok(Delivered)
//!                      ├─ window elapsed ──► Err(Expired{expire})
//!                      └─ closed         ──► Err(Closed)
//!
//! commit: registry read lock ─► id still live? ─► permit.send(msg)
//!                                      └─ no  ─► Err(Closed), slot released
//! ```
//!
//! ## Rules
//! - Never retried, never reported to the publisher.
//! - Closure is checked before the filter, so dropped readers are reported even when
//!   their filter rejects everything.
//! - Removal wins over a pending wait: a cancelled token aborts the wait immediately.
//! - The enqueue itself happens under the registry read lock, so once `unsubscribe`
//!   or `shutdown` returned, no dispatch can add to that queue.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use crate::core::registry::{Registry, Target};
use crate::error::DispatchError;
use crate::messages::Message;

/// Successful outcomes of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// Message enqueued.
    Delivered,
    /// Filter rejected the message; queue untouched.
    Filtered,
}

/// Runs one dispatch attempt.
pub(crate) async fn dispatch<T>(
    registry: &Registry<T>,
    target: &Target<T>,
    message: Arc<Message<T>>,
) -> Result<Delivery, DispatchError>
where
    T: Send + Sync + 'static,
{
    if target.closed.is_cancelled() || target.sender.is_closed() {
        return Err(DispatchError::Closed);
    }
    if let Some(filter) = &target.filter {
        if !filter.accept(&message) {
            return Ok(Delivery::Filtered);
        }
    }

    let window = message.expire_after();
    let permit = if window.is_zero() {
        target.sender.try_reserve().map_err(|err| match err {
            TrySendError::Full(()) => DispatchError::Expired { after: window },
            TrySendError::Closed(()) => DispatchError::Closed,
        })?
    } else {
        tokio::select! {
            biased;
            _ = target.closed.cancelled() => return Err(DispatchError::Closed),
            reserved = tokio::time::timeout(window, target.sender.reserve()) => match reserved {
                Ok(Ok(permit)) => permit,
                Ok(Err(_)) => return Err(DispatchError::Closed),
                Err(_) => return Err(DispatchError::Expired { after: window }),
            },
        }
    };

    if registry.commit(target.id, permit, message).await {
        Ok(Delivery::Delivered)
    } else {
        Err(DispatchError::Closed)
    }
}
