//! # Fan-out Example
//!
//! Shows a hub with three subscribers:
//! - an unfiltered [`LogWriter`] that logs everything
//! - a topic subscriber counting user actions
//! - a deliberately slow subscriber whose small queue overflows
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example fanout --features logging
//! ```

use std::time::Duration;

use hubcast::{Broadcaster, LogWriter, Message, Topic};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .init();

    let hub: Broadcaster<String> = Broadcaster::new(2);

    let logger = LogWriter::new().spawn(hub.subscribe().await);

    let mut actions = hub.subscribe_filtered(Topic::new(["user_action"])).await;
    let counter = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Some(msg) = actions.recv().await {
            seen += 1;
            println!("[action] #{seen} data={:?} source={}", msg.data, msg.source);
        }
        seen
    });

    // never read: fills after two messages, later ones are dropped for it
    let stalled = hub.subscribe().await;

    for i in 0..5 {
        let event = if i % 2 == 0 { "user_action" } else { "heartbeat" };
        let msg = Message::new(event, format!("payload-{i}"))
            .with_source("demo")
            .with_expire(1);
        hub.publish(msg).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    println!("stalled subscriber holds {} message(s)", stalled.len());

    let closed = hub.shutdown().await;
    println!("closed {closed} subscription(s)");

    let logged = logger.await.unwrap_or(0);
    let counted = counter.await.unwrap_or(0);
    println!("logged={logged} actions={counted}");
}
