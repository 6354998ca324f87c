//! # Messages published through the hub.
//!
//! A [`Message`] is the immutable unit of data a [`Broadcaster`](crate::Broadcaster)
//! fans out. It carries a topic label (`event`), an opaque payload (`data`), an
//! origin label (`source`), a wall-clock creation time (`timestamp`) and a delivery
//! window in seconds (`expire`).
//!
//! ## Rules
//! - **Immutable once published**: the hub wraps it in an `Arc` and shares the same
//!   instance with every subscriber.
//! - **Not validated**: empty event/source or a non-RFC 3339 timestamp are accepted.
//! - **`expire = 0`**: a dispatch to a full queue is abandoned without waiting.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use hubcast::Message;
//!
//! let msg = Message::new("user_action", "clicked button")
//!     .with_source("web")
//!     .with_expire(5);
//!
//! assert_eq!(msg.event, "user_action");
//! assert_eq!(msg.source, "web");
//! assert_eq!(msg.expire_after(), Duration::from_secs(5));
//! assert!(msg.parsed_timestamp().is_some());
//! ```

use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Delivery window (seconds) applied by [`Message::new`].
pub const DEFAULT_EXPIRE: u64 = 300;

/// A message published to the hub.
///
/// ### Field semantics
/// - `event`: topic/kind label, used by filters
/// - `data`: payload, never inspected by the hub
/// - `source`: origin label
/// - `timestamp`: creation time, RFC 3339 text (`2026-01-02T15:04:05Z`)
/// - `expire`: seconds a dispatch to a full queue may wait before giving up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<T> {
    /// Topic or kind of the event.
    pub event: String,
    /// Opaque payload.
    pub data: T,
    /// Where the message originated from.
    pub source: String,
    /// Creation time in RFC 3339 format.
    pub timestamp: String,
    /// Delivery window in seconds (`0` = do not wait).
    pub expire: u64,
}

impl<T> Message<T> {
    /// Creates a message stamped with the current UTC time.
    ///
    /// `source` is empty and `expire` is [`DEFAULT_EXPIRE`].
    pub fn new(event: impl Into<String>, data: T) -> Self {
        Self {
            event: event.into(),
            data,
            source: String::new(),
            timestamp: now_rfc3339(),
            expire: DEFAULT_EXPIRE,
        }
    }

    /// Sets the origin label.
    #[inline]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Overrides the creation timestamp.
    #[inline]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Sets the delivery window in whole seconds.
    #[inline]
    pub fn with_expire(mut self, secs: u64) -> Self {
        self.expire = secs;
        self
    }

    /// Sets the delivery window from a `Duration` (sub-second part is dropped).
    #[inline]
    pub fn with_expire_after(mut self, window: Duration) -> Self {
        self.expire = window.as_secs();
        self
    }

    /// Returns the delivery window as a `Duration`.
    #[inline]
    pub fn expire_after(&self) -> Duration {
        Duration::from_secs(self.expire)
    }

    /// Parses `timestamp` as RFC 3339.
    ///
    /// Returns `None` for anything that does not parse; the hub never relies on it.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}

/// Current UTC time as RFC 3339 with second precision.
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
