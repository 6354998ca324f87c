//! # Subscriptions and their filters.
//!
//! This module provides the reading side of the hub: the [`Subscription`] handle
//! returned by [`Broadcaster::subscribe`](crate::Broadcaster::subscribe) and the
//! [`Filter`] trait deciding which messages a subscription is interested in.
//!
//! ## Architecture
//! ```text
//! Broadcaster::publish(msg)
//!     │
//!     ├──► filter 1? ──► [queue 1] ──► Subscription 1 (reader)
//!     │                  (bounded)
//!     ├──► filter 2? ──► [queue 2] ──► Subscription 2 (reader)
//!     │                  (bounded)
//!     └──► filter N? ──► [queue N] ──► Subscription N (reader)
//! ```
//!
//! ## Contents
//! - [`Subscription`], [`SubscriptionId`] reader handle and its opaque id
//! - [`Filter`], [`Topic`] interest predicates
//! - `LogWriter` (feature `logging`) reference consumer

mod filter;
#[cfg(feature = "logging")]
mod log;
mod subscription;

pub use filter::{Filter, Topic};
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscription::{Subscription, SubscriptionId};
