//! Hub core: registry, dispatch and fan-out.
//!
//! The public API from this module is [`Broadcaster`] and its [`Config`].
//!
//! Internal modules:
//! - [`registry`]: live subscriptions behind an async `RwLock`;
//! - [`dispatch`]: one time-bounded delivery attempt to one subscriber;
//! - [`broadcaster`]: snapshot, parallel dispatch, join and reaping.

mod broadcaster;
mod config;
mod dispatch;
mod registry;

pub use broadcaster::Broadcaster;
pub use config::Config;
