//! # Subscription registry: the hub's only shared mutable state.
//!
//! Maps each live [`SubscriptionId`] to the writing side of its queue, its
//! optional filter and the token that marks it dead.
//!
//! ## Architecture
//! ```text
//! subscribe()   ──► write lock ──► insert(id, entry)
//! unsubscribe() ──► write lock ──► remove(id) ──► token.cancel(), drop sender
//! shutdown()    ──► write lock ──► drain()    ──► token.cancel() for each
//! publish()     ──► read lock  ──► snapshot() ──► Vec<Target> (lock released)
//! dispatch()    ──► read lock  ──► commit(id) ──► permit.send() if id still live
//! ```
//!
//! ## Rules
//! - Contains only live subscriptions; an id appears at most once
//! - Removal is idempotent: whoever takes the entry out of the map closes it, exactly once
//! - The lock is never held while a dispatch waits for queue room
//! - A reserved slot is filled under the read lock, after checking the id is still live,
//!   so `remove`/`drain` (write lock) are totally ordered against every enqueue

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio::sync::mpsc::Permit;
use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::messages::Message;
use crate::subscribers::{Filter, Subscription, SubscriptionId};

/// Writing side of one subscription, as stored in the registry.
struct Entry<T> {
    sender: mpsc::Sender<Arc<Message<T>>>,
    filter: Option<Arc<dyn Filter<T>>>,
    closed: CancellationToken,
}

impl<T> Entry<T> {
    /// Marks the subscription dead; dropping the entry afterwards releases the sender.
    fn close(self) {
        self.closed.cancel();
    }
}

/// Everything a dispatch task needs to reach one subscriber.
pub(crate) struct Target<T> {
    pub(crate) id: SubscriptionId,
    pub(crate) sender: mpsc::Sender<Arc<Message<T>>>,
    pub(crate) filter: Option<Arc<dyn Filter<T>>>,
    pub(crate) closed: CancellationToken,
}

/// Registry of live subscriptions.
pub(crate) struct Registry<T> {
    entries: RwLock<HashMap<SubscriptionId, Entry<T>>>,
    capacity: usize,
}

impl<T> Registry<T> {
    /// Creates an empty registry sized from `cfg`.
    pub(crate) fn new(cfg: &Config) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: cfg.queue_capacity_clamped(),
        }
    }

    /// Queue bound shared by every subscription.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocates a queue, registers it under `filter` and returns the reading side.
    pub(crate) async fn register(&self, filter: Option<Arc<dyn Filter<T>>>) -> Subscription<T> {
        let id = SubscriptionId::next();
        let (sender, rx) = mpsc::channel(self.capacity);
        let closed = CancellationToken::new();

        let entry = Entry {
            sender,
            filter,
            closed: closed.clone(),
        };
        self.entries.write().await.insert(id, entry);

        Subscription::new(id, rx, closed, self.capacity)
    }

    /// Removes and closes a subscription.
    ///
    /// Returns `true` only for the call that actually removed it.
    pub(crate) async fn remove(&self, id: SubscriptionId) -> bool {
        let taken = self.entries.write().await.remove(&id);
        match taken {
            Some(entry) => {
                entry.close();
                true
            }
            None => false,
        }
    }

    /// Removes and closes every subscription; returns how many were closed.
    pub(crate) async fn drain(&self) -> usize {
        let drained: Vec<Entry<T>> = {
            let mut entries = self.entries.write().await;
            entries.drain().map(|(_, entry)| entry).collect()
        };

        let count = drained.len();
        for entry in drained {
            entry.close();
        }
        count
    }

    /// Copies out the current set of targets for a publish.
    pub(crate) async fn snapshot(&self) -> Vec<Target<T>> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .map(|(id, entry)| Target {
                id: *id,
                sender: entry.sender.clone(),
                filter: entry.filter.clone(),
                closed: entry.closed.clone(),
            })
            .collect()
    }

    /// Enqueues `message` through a reserved slot if `id` is still live.
    ///
    /// Returns `false` (and releases the slot) when the subscription was removed
    /// after the slot was reserved.
    pub(crate) async fn commit(
        &self,
        id: SubscriptionId,
        permit: Permit<'_, Arc<Message<T>>>,
        message: Arc<Message<T>>,
    ) -> bool {
        let entries = self.entries.read().await;
        if !entries.contains_key(&id) {
            return false;
        }
        permit.send(message);
        true
    }

    /// Number of live subscriptions.
    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if `id` is live.
    pub(crate) async fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.read().await.contains_key(&id)
    }
}
