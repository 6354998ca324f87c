//! # hubcast
//!
//! **hubcast** is a concurrent publish/subscribe hub for async Rust.
//!
//! A [`Broadcaster`] fans each published [`Message`] out to a dynamically changing
//! set of subscriptions. Every subscription owns a bounded queue and may carry a
//! [`Filter`]. Delivery is at-most-once and best effort: a subscriber whose queue
//! stays full for the message's `expire` window simply misses that message.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  publisher   │   │  publisher   │   │  publisher   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Broadcaster (cloneable handle)                                   │
//! │  - Registry: SubscriptionId → (queue sender, filter, close token) │
//! │  - publish(): snapshot → one dispatch task per subscriber → join  │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     filter 1?          filter 2?          filter N?
//!        ▼                  ▼                  ▼
//!     [queue 1]          [queue 2]          [queue N]     (bounded, Config::queue_capacity)
//!        ▼                  ▼                  ▼
//!   Subscription 1     Subscription 2     Subscription N  (one reader each)
//! ```
//!
//! ### Dispatch
//! ```text
//! per (subscriber, message):
//!   ├─► filter rejects          ─► skip (queue untouched)
//!   ├─► room in queue           ─► enqueue
//!   ├─► full, room within expire ─► enqueue
//!   ├─► full for whole expire   ─► drop for this subscriber
//!   └─► removed meanwhile       ─► drop, wait aborted at once
//! ```
//!
//! ### Lifecycle
//! ```text
//! subscribe() ──► live ──► unsubscribe(id) | shutdown() | reader dropped + next publish ──► dead
//! ```
//! A subscription is closed exactly once; its reader drains what was queued and then
//! sees end-of-stream.
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Hub**           | Subscribe, unsubscribe, shutdown, filtered fan-out.           | [`Broadcaster`]                           |
//! | **Messages**      | Immutable envelope with topic, payload and expire window.     | [`Message`]                               |
//! | **Subscriptions** | Bounded reader handle with end-of-stream on removal.          | [`Subscription`], [`SubscriptionId`]      |
//! | **Filters**       | Per-subscription interest predicates.                         | [`Filter`], [`Topic`]                     |
//! | **Errors**        | Typed error for non-blocking polling.                         | [`TryRecvError`]                          |
//! | **Configuration** | Centralize hub settings.                                      | [`Config`]                                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use hubcast::{Broadcaster, Config, Message};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let hub = Broadcaster::with_config(Config::with_queue_capacity(1));
//!     let mut sub = hub.subscribe_filtered(|m: &Message<u32>| m.event == "x").await;
//!
//!     // queue holds one message; the second publish gives up at once (expire = 0)
//!     hub.publish(Message::new("x", 1u32).with_expire(0)).await;
//!     hub.publish(Message::new("x", 2).with_expire(0)).await;
//!
//!     assert_eq!(sub.len(), 1);
//!     assert_eq!(sub.recv().await.unwrap().data, 1);
//!
//!     hub.unsubscribe(sub.id()).await;
//!     assert!(sub.recv().await.is_none());
//! }
//! ```
mod core;
mod error;
mod messages;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{Broadcaster, Config};
pub use error::TryRecvError;
pub use messages::{DEFAULT_EXPIRE, Message};
pub use subscribers::{Filter, Subscription, SubscriptionId, Topic};

// Optional: expose a simple built-in logger consumer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
