//! # Interest filters
//!
//! A [`Filter`] decides whether a message should be delivered to a subscription.
//! It is evaluated once per (subscription, message) inside the dispatch task, so it
//! must be cheap and must not block.
//!
//! Any `Fn(&Message<T>) -> bool + Send + Sync + 'static` closure is a filter.
//! [`Topic`] covers the common "these event names only" case.
//!
//! ## Example
//! ```rust
//! use hubcast::{Filter, Message, Topic};
//!
//! let only_x = |m: &Message<()>| m.event == "x";
//! assert!(only_x.accept(&Message::new("x", ())));
//!
//! let topic = Topic::new(["login", "logout"]);
//! assert!(Filter::<()>::accept(&topic, &Message::new("logout", ())));
//! assert!(!Filter::<()>::accept(&topic, &Message::new("click", ())));
//! ```

use std::collections::HashSet;

use crate::messages::Message;

/// Contract for subscription filters.
pub trait Filter<T>: Send + Sync + 'static {
    /// Returns `true` if `message` should be delivered.
    fn accept(&self, message: &Message<T>) -> bool;
}

impl<T, F> Filter<T> for F
where
    F: Fn(&Message<T>) -> bool + Send + Sync + 'static,
{
    #[inline]
    fn accept(&self, message: &Message<T>) -> bool {
        self(message)
    }
}

/// Accepts messages whose `event` is one of a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct Topic {
    events: HashSet<String>,
}

impl Topic {
    /// Builds a topic filter from event names.
    pub fn new<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: events.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `event` is part of the topic.
    #[inline]
    pub fn contains(&self, event: &str) -> bool {
        self.events.contains(event)
    }
}

impl<T> Filter<T> for Topic {
    fn accept(&self, message: &Message<T>) -> bool {
        self.contains(&message.event)
    }
}
