//! # Hub configuration.
//!
//! Provides [`Config`] centralized settings for a [`Broadcaster`](crate::Broadcaster).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → clamped to 1 (a bounded queue needs room for one message)

/// Configuration for a broadcaster.
///
/// ## Field semantics
/// - `queue_capacity`: bound of every subscription queue created by the hub (min 1; clamped)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Capacity of each subscription queue.
    ///
    /// When a queue is full, a dispatch waits up to the message's `expire`
    /// window for room and then drops the message for that subscriber.
    pub queue_capacity: usize,
}

impl Config {
    /// Creates a config with the given queue capacity.
    #[inline]
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self { queue_capacity }
    }

    /// Returns the queue capacity clamped to a minimum of 1.
    ///
    /// The registry uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `queue_capacity = 1024`
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
        }
    }
}
