//! # Broadcaster: registry of subscriptions and concurrent filtered fan-out.
//!
//! The [`Broadcaster`] owns the subscription registry and delivers each
//! published [`Message`] to every live subscription whose filter accepts it.
//!
//! ## Key responsibilities
//! - create subscriptions with a bounded queue of the configured capacity
//! - remove one subscription, or all of them, closing each queue exactly once
//! - fan out a message with one dispatch task per subscriber, bounded by `message.expire`
//! - reap subscriptions whose reader has been dropped
//!
//! ## High-level architecture
//! ```text
//! publish(msg)
//!   │
//!   ├─► Registry::snapshot()          (read lock, released before dispatch)
//!   │
//!   ├─► spawn dispatch(target_1, msg) ─┐
//!   ├─► spawn dispatch(target_2, msg) ─┤  parallel; each bounded by msg.expire
//!   └─► spawn dispatch(target_N, msg) ─┤
//!                                      ▼
//!                              join_all(handles)
//!                                      │
//!                      ├─ Delivered / Filtered ──► trace
//!                      ├─ Expired              ──► debug, message dropped for that subscriber
//!                      ├─ Closed               ──► Registry::remove(id)  (reap)
//!                      └─ task panicked        ──► warn
//! ```
//!
//! ## Rules
//! - **At-most-once, best effort**: nothing is retried or reported to the publisher.
//! - **Bounded wait**: `publish` returns after at most ~`expire` seconds, however many
//!   subscribers are full, because dispatches run in parallel.
//! - **No ordering across subscribers**: two subscribers may see the same message at
//!   different times. Each queue is FIFO for a single publisher.
//! - **Concurrent publishes are not serialized**: the registry lock only guards the
//!   snapshot and the final enqueue, never a wait for room, so a slow subscriber
//!   never delays an unrelated publish.
//! - **Removal is final**: once `unsubscribe`/`shutdown` returns, no in-flight publish
//!   adds to the removed queues.
//!
//! ## Example
//! ```rust
//! use hubcast::{Broadcaster, Message};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let hub = Broadcaster::new(100);
//!
//!     let mut all = hub.subscribe().await;
//!     let mut actions = hub
//!         .subscribe_filtered(|m: &Message<&'static str>| m.event == "user_action")
//!         .await;
//!
//!     hub.publish(Message::new("user_action", "clicked").with_source("web")).await;
//!     hub.publish(Message::new("heartbeat", "ping")).await;
//!
//!     assert_eq!(all.recv().await.unwrap().event, "user_action");
//!     assert_eq!(all.recv().await.unwrap().event, "heartbeat");
//!     assert_eq!(actions.recv().await.unwrap().data, "clicked");
//!
//!     hub.shutdown().await;
//!     assert!(all.recv().await.is_none());
//!     assert!(actions.recv().await.is_none());
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, trace, warn};

use crate::core::config::Config;
use crate::core::dispatch::{Delivery, dispatch};
use crate::core::registry::Registry;
use crate::error::DispatchError;
use crate::messages::Message;
use crate::subscribers::{Filter, Subscription, SubscriptionId};

/// Publish/subscribe hub.
///
/// Cheap to clone: clones share the same registry.
pub struct Broadcaster<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for Broadcaster<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("queue_capacity", &self.registry.capacity())
            .finish_non_exhaustive()
    }
}

impl<T> Default for Broadcaster<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl<T> Broadcaster<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a hub whose subscription queues hold `queue_capacity` messages.
    ///
    /// A capacity of `0` is clamped to `1`.
    #[must_use]
    pub fn new(queue_capacity: usize) -> Self {
        Self::with_config(Config::with_queue_capacity(queue_capacity))
    }

    /// Creates a hub from a [`Config`].
    #[must_use]
    pub fn with_config(cfg: Config) -> Self {
        Self {
            registry: Arc::new(Registry::new(&cfg)),
        }
    }

    /// Subscribes to every message.
    pub async fn subscribe(&self) -> Subscription<T> {
        self.subscribe_with(None).await
    }

    /// Subscribes to the messages `filter` accepts.
    pub async fn subscribe_filtered<F>(&self, filter: F) -> Subscription<T>
    where
        F: Filter<T>,
    {
        self.subscribe_with(Some(Arc::new(filter))).await
    }

    /// Subscribes with an optional, already shared filter (`None` = accept all).
    pub async fn subscribe_with(&self, filter: Option<Arc<dyn Filter<T>>>) -> Subscription<T> {
        let filtered = filter.is_some();
        let sub = self.registry.register(filter).await;
        debug!(subscription = %sub.id(), filtered, "subscribed");
        sub
    }

    /// Removes a subscription and closes its queue.
    ///
    /// Idempotent: returns `true` only for the call that actually closed it;
    /// already-removed or unknown ids return `false`.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.remove(id).await;
        if removed {
            debug!(subscription = %id, "unsubscribed");
        }
        removed
    }

    /// Removes and closes every subscription; returns how many were closed.
    ///
    /// The hub stays usable: later subscriptions work, and a publish with no
    /// subscriptions is a no-op.
    pub async fn shutdown(&self) -> usize {
        let closed = self.registry.drain().await;
        debug!(closed, "shutdown");
        closed
    }

    /// Fans `message` out to every matching subscription.
    ///
    /// Returns once every dispatch delivered, was filtered out, or gave up.
    /// See [`publish_arc`](Self::publish_arc).
    pub async fn publish(&self, message: Message<T>) {
        self.publish_arc(Arc::new(message)).await;
    }

    /// Fans a shared message out to every matching subscription.
    ///
    /// ### Per subscriber
    /// 1. Filter rejects: skipped, queue untouched.
    /// 2. Room in the queue: enqueued.
    /// 3. Queue full: waits up to `message.expire` seconds for room (no wait for `0`),
    ///    then drops the message for that subscriber.
    ///
    /// ### Notes
    /// - Dispatches run as parallel tasks; the call waits for the slowest one.
    /// - Subscriptions found closed during dispatch are removed from the registry.
    pub async fn publish_arc(&self, message: Arc<Message<T>>) {
        let targets = self.registry.snapshot().await;
        if targets.is_empty() {
            trace!(event = %message.event, "publish without subscribers");
            return;
        }

        let handles: Vec<_> = targets
            .into_iter()
            .map(|target| {
                let message = Arc::clone(&message);
                let registry = Arc::clone(&self.registry);
                tokio::spawn(async move {
                    let outcome = dispatch(&registry, &target, message).await;
                    (target.id, outcome)
                })
            })
            .collect();

        let mut dead = Vec::new();
        for joined in join_all(handles).await {
            match joined {
                Ok((id, Ok(Delivery::Delivered))) => {
                    trace!(subscription = %id, event = %message.event, "delivered");
                }
                Ok((id, Ok(Delivery::Filtered))) => {
                    trace!(subscription = %id, event = %message.event, "filtered");
                }
                Ok((id, Err(DispatchError::Closed))) => dead.push(id),
                Ok((id, Err(err))) => {
                    debug!(
                        subscription = %id,
                        event = %message.event,
                        reason = err.as_label(),
                        error = %err,
                        "dispatch abandoned"
                    );
                }
                Err(join_err) => {
                    warn!(event = %message.event, error = %join_err, "dispatch task failed");
                }
            }
        }

        for id in dead {
            if self.registry.remove(id).await {
                debug!(subscription = %id, "reaped subscription with dropped reader");
            }
        }
    }

    /// Number of live subscriptions.
    pub async fn len(&self) -> usize {
        self.registry.len().await
    }

    /// Returns `true` if there are no live subscriptions.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns `true` if `id` is still live.
    pub async fn contains(&self, id: SubscriptionId) -> bool {
        self.registry.contains(id).await
    }

    /// Queue bound shared by every subscription of this hub.
    #[inline]
    pub fn queue_capacity(&self) -> usize {
        self.registry.capacity()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::error::TryRecvError;
    use crate::subscribers::Topic;

    fn msg(event: &str, expire: u64) -> Message<u32> {
        Message::new(event, 0).with_expire(expire)
    }

    #[tokio::test]
    async fn test_unfiltered_subscriber_receives_message() {
        let hub = Broadcaster::new(4);
        let mut sub = hub.subscribe().await;

        hub.publish(Message::new("x", 7u32).with_source("test")).await;

        let got = sub.try_recv().unwrap();
        assert_eq!(got.event, "x");
        assert_eq!(got.data, 7);
        assert_eq!(got.source, "test");
    }

    #[tokio::test]
    async fn test_filter_selects_subscribers() {
        let hub = Broadcaster::new(4);
        let mut only_a = hub.subscribe_filtered(|m: &Message<u32>| m.event == "a").await;
        let mut all = hub.subscribe().await;

        hub.publish(msg("b", 0)).await;

        assert_eq!(only_a.try_recv().unwrap_err(), TryRecvError::Empty);
        assert_eq!(only_a.len(), 0);
        assert_eq!(all.try_recv().unwrap().event, "b");

        hub.publish(msg("a", 0)).await;
        assert_eq!(only_a.try_recv().unwrap().event, "a");
        assert_eq!(all.try_recv().unwrap().event, "a");
    }

    #[tokio::test]
    async fn test_topic_filter() {
        let hub = Broadcaster::new(4);
        let mut sub = hub.subscribe_filtered(Topic::new(["login", "logout"])).await;

        for event in ["login", "click", "logout"] {
            hub.publish(msg(event, 0)).await;
        }

        assert_eq!(sub.try_recv().unwrap().event, "login");
        assert_eq!(sub.try_recv().unwrap().event, "logout");
        assert_eq!(sub.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn test_full_queue_with_zero_expire_drops_second_message() {
        let hub: Broadcaster<u32> = Broadcaster::new(1);
        let mut sub = hub.subscribe_filtered(|m: &Message<u32>| m.event == "x").await;

        hub.publish(Message::new("x", 1).with_expire(0)).await;
        hub.publish(Message::new("x", 2).with_expire(0)).await;

        assert_eq!(sub.len(), 1);
        assert_eq!(sub.try_recv().unwrap().data, 1);
        assert_eq!(sub.try_recv().unwrap_err(), TryRecvError::Empty);
        assert!(hub.contains(sub.id()).await);
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let hub: Broadcaster<u32> = Broadcaster::new(1);
        let mut sub = hub.subscribe().await;
        let id = sub.id();

        assert!(hub.unsubscribe(id).await);
        assert!(!hub.unsubscribe(id).await);
        assert!(hub.is_empty().await);
        assert!(sub.is_closed());
        assert!(sub.recv().await.is_none());

        hub.publish(msg("x", 0)).await;
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_noop() {
        let hub: Broadcaster<u32> = Broadcaster::new(1);
        let other: Broadcaster<u32> = Broadcaster::new(1);
        let foreign = other.subscribe().await;
        let _own = hub.subscribe().await;

        assert!(!hub.unsubscribe(foreign.id()).await);
        assert_eq!(hub.len().await, 1);
        assert!(!foreign.is_closed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_unsubscribe_has_one_winner() {
        let hub: Broadcaster<u32> = Broadcaster::new(1);
        let mut sub = hub.subscribe().await;
        let id = sub.id();

        let racers: Vec<_> = (0..16)
            .map(|_| {
                let hub = hub.clone();
                tokio::spawn(async move { hub.unsubscribe(id).await })
            })
            .collect();

        let winners = join_all(racers)
            .await
            .into_iter()
            .filter(|r| matches!(r, Ok(true)))
            .count();
        assert_eq!(winners, 1);
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_closes_everything() {
        let hub = Broadcaster::new(2);
        let mut a = hub.subscribe().await;
        let mut b = hub.subscribe_filtered(|m: &Message<u32>| m.event == "b").await;
        hub.publish(msg("a", 0)).await;

        assert_eq!(hub.shutdown().await, 2);
        assert!(hub.is_empty().await);
        assert_eq!(hub.shutdown().await, 0);

        hub.publish(msg("b", 0)).await;

        assert_eq!(a.recv().await.unwrap().event, "a");
        assert!(a.recv().await.is_none());
        assert!(b.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_subscribe_after_shutdown_works() {
        let hub = Broadcaster::new(2);
        hub.shutdown().await;

        let mut sub = hub.subscribe().await;
        hub.publish(msg("late", 0)).await;
        assert_eq!(sub.try_recv().unwrap().event, "late");
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_queue_bounds_publish_by_expire() {
        let hub = Broadcaster::new(1);
        let sub = hub.subscribe().await;
        hub.publish(msg("fill", 0)).await;

        let started = Instant::now();
        hub.publish(msg("late", 2)).await;
        let waited = started.elapsed();

        assert!(waited >= Duration::from_secs(2), "gave up after {waited:?}");
        assert!(waited < Duration::from_secs(3), "waited {waited:?}");
        assert_eq!(sub.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_subscribers_wait_in_parallel() {
        let hub = Broadcaster::new(1);
        let subs = vec![hub.subscribe().await, hub.subscribe().await, hub.subscribe().await];
        hub.publish(msg("fill", 0)).await;

        let started = Instant::now();
        hub.publish(msg("late", 3)).await;
        let waited = started.elapsed();

        assert!(waited >= Duration::from_secs(3));
        assert!(waited < Duration::from_secs(4), "dispatches ran sequentially: {waited:?}");
        assert!(subs.iter().all(|s| s.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_subscriber_does_not_delay_others() {
        let hub = Broadcaster::new(1);
        let slow = hub.subscribe().await;
        let mut fast = hub.subscribe().await;
        hub.publish(msg("fill", 0)).await;
        fast.try_recv().unwrap();

        let pending = tokio::spawn({
            let hub = hub.clone();
            async move { hub.publish(msg("late", 30)).await }
        });

        assert_eq!(fast.recv().await.unwrap().event, "late");
        assert!(!pending.is_finished());
        pending.await.unwrap();
        assert_eq!(slow.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_publishes_are_not_serialized() {
        let hub = Broadcaster::new(1);
        let _full = hub.subscribe().await;
        hub.publish(msg("fill", 0)).await;

        let blocked = tokio::spawn({
            let hub = hub.clone();
            async move { hub.publish(msg("waits", 60)).await }
        });
        tokio::task::yield_now().await;

        let started = Instant::now();
        hub.publish(msg("quick", 0)).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(!blocked.is_finished());

        hub.shutdown().await;
        blocked.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_unblocks_inflight_publish() {
        let hub = Broadcaster::new(1);
        let mut sub = hub.subscribe().await;
        let id = sub.id();
        hub.publish(msg("fill", 0)).await;

        let started = Instant::now();
        let pending = tokio::spawn({
            let hub = hub.clone();
            async move { hub.publish(msg("never", 60)).await }
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(hub.unsubscribe(id).await);
        pending.await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(60));

        assert_eq!(sub.recv().await.unwrap().event, "fill");
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_delivery_after_unsubscribe_returns() {
        let hub: Broadcaster<u32> = Broadcaster::new(4);
        let mut late = 0usize;

        for _ in 0..20_000 {
            let sub = hub.subscribe().await;
            let publisher = tokio::spawn({
                let hub = hub.clone();
                async move { hub.publish(msg("race", 0)).await }
            });

            assert!(hub.unsubscribe(sub.id()).await);
            let at_close = sub.len();
            publisher.await.unwrap();
            if sub.len() != at_close {
                late += 1;
            }
        }

        assert_eq!(late, 0, "messages enqueued after unsubscribe returned");
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_reaped() {
        let hub = Broadcaster::new(1);
        let keep = hub.subscribe().await;
        let gone = hub.subscribe().await;
        let gone_id = gone.id();
        drop(gone);

        hub.publish(msg("x", 5)).await;

        assert!(!hub.contains(gone_id).await);
        assert!(hub.contains(keep.id()).await);
        assert_eq!(hub.len().await, 1);
        assert!(!hub.unsubscribe(gone_id).await);
    }

    #[tokio::test]
    async fn test_dropped_filtered_subscription_is_reaped() {
        let hub = Broadcaster::new(1);
        let gone = hub.subscribe_filtered(|m: &Message<u32>| m.event == "never").await;
        let id = gone.id();
        drop(gone);

        hub.publish(msg("x", 0)).await;

        assert!(!hub.contains(id).await);
        assert!(hub.is_empty().await);
    }

    #[tokio::test]
    async fn test_panicking_filter_is_contained() {
        let hub = Broadcaster::new(1);
        let _bad = hub
            .subscribe_filtered(|_: &Message<u32>| -> bool { panic!("filter exploded") })
            .await;
        let mut good = hub.subscribe().await;

        hub.publish(msg("x", 0)).await;

        assert_eq!(good.try_recv().unwrap().event, "x");
        assert_eq!(hub.len().await, 2);
    }

    #[tokio::test]
    async fn test_publish_arc_shares_one_instance() {
        let hub = Broadcaster::new(1);
        let mut a = hub.subscribe().await;
        let mut b = hub.subscribe().await;

        let shared = Arc::new(msg("x", 0));
        hub.publish_arc(Arc::clone(&shared)).await;

        assert!(Arc::ptr_eq(&a.try_recv().unwrap(), &shared));
        assert!(Arc::ptr_eq(&b.try_recv().unwrap(), &shared));
    }

    #[tokio::test]
    async fn test_clones_share_registry() {
        let hub: Broadcaster<u32> = Broadcaster::with_config(Config::with_queue_capacity(0));
        let twin = hub.clone();
        let sub = twin.subscribe().await;

        assert_eq!(hub.queue_capacity(), 1);
        assert!(hub.contains(sub.id()).await);
        assert_eq!(Broadcaster::<u32>::default().queue_capacity(), 1024);
    }
}
