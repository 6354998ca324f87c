//! # LogWriter: simple message logger
//!
//! A minimal consumer that drains a [`Subscription`] and writes every message
//! through `tracing` at `INFO`. Use it for tests or demos.
//!
//! ## Example output (with a fmt subscriber installed)
//! ```text
//! INFO hubcast: message subscription=sub-3 event="user_action" source="web" timestamp="2026-01-02T15:04:05Z" data="clicked"
//! INFO hubcast: subscription closed subscription=sub-3 written=1
//! ```

use std::fmt::Debug;

use tokio::task::JoinHandle;
use tracing::info;

use crate::subscribers::Subscription;

/// Message writer consumer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reads `sub` until end-of-stream, logging each message.
    ///
    /// Returns the number of messages written.
    pub async fn run<T: Debug>(&self, mut sub: Subscription<T>) -> usize {
        let id = sub.id();
        let mut written = 0usize;

        while let Some(msg) = sub.recv().await {
            info!(
                target: "hubcast",
                subscription = %id,
                event = %msg.event,
                source = %msg.source,
                timestamp = %msg.timestamp,
                data = ?msg.data,
                "message"
            );
            written += 1;
        }
        info!(target: "hubcast", subscription = %id, written, "subscription closed");
        written
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn<T>(self, sub: Subscription<T>) -> JoinHandle<usize>
    where
        T: Debug + Send + Sync + 'static,
    {
        tokio::spawn(async move { self.run(sub).await })
    }
}
