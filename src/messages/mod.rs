//! Message data model.
//!
//! ## Contents
//! - [`Message`] the payload envelope fanned out by the hub
//! - [`DEFAULT_EXPIRE`] delivery window used by [`Message::new`]

mod message;

pub use message::{DEFAULT_EXPIRE, Message};
