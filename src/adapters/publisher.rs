//! Publisher adapters and the outbound forwarder.
//!
//! Node tasks publish through [`ChannelPublisher`], which encodes the
//! value and enqueues it without blocking. The I/O task drains the queue
//! into a [`Transport`] with [`forward_outbound`]; [`LogPublisher`] is the
//! transport used when no broker is attached.
//!
//! Topics are `<namespace>/feeds/<feed key>`.

use core::fmt::Write;

use heapless::String;
use log::{info, warn};

use crate::app::commands::{Feed, OutboundValue};
use crate::app::ports::{Publisher, Transport};
use crate::channels::{Outbound, OutboundReceiver, OutboundSender, TOPIC_CAPACITY};
use crate::error::PublishError;

/// Full topic for `feed`. `None` if it does not fit.
pub fn topic(namespace: &str, feed: Feed) -> Option<String<TOPIC_CAPACITY>> {
    let mut t = String::new();
    write!(t, "{}/feeds/{}", namespace, feed.key()).ok()?;
    Some(t)
}

// ── Channel publisher ─────────────────────────────────────────

/// Enqueues onto the outbound channel. Never blocks.
#[derive(Clone, Copy)]
pub struct ChannelPublisher<'a> {
    tx: OutboundSender<'a>,
}

impl<'a> ChannelPublisher<'a> {
    pub fn new(tx: OutboundSender<'a>) -> Self {
        Self { tx }
    }
}

impl Publisher for ChannelPublisher<'_> {
    fn publish(&mut self, feed: Feed, value: OutboundValue) -> Result<(), PublishError> {
        let payload = value.encode();
        self.tx
            .try_send(Outbound { feed, payload })
            .map_err(|_| PublishError::QueueFull)
    }
}

// ── Log publisher ─────────────────────────────────────────────

/// Writes every publish to the serial log.
#[derive(Debug, Default)]
pub struct LogPublisher {
    sent: u32,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self { sent: 0 }
    }

    /// Messages logged so far.
    pub fn sent(&self) -> u32 {
        self.sent
    }
}

impl Publisher for LogPublisher {
    fn publish(&mut self, feed: Feed, value: OutboundValue) -> Result<(), PublishError> {
        self.sent += 1;
        info!("PUB | {} = {}", feed.key(), value.encode());
        Ok(())
    }
}

impl Transport for LogPublisher {
    fn send(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        self.sent += 1;
        info!("PUB | {} = {}", topic, payload);
        Ok(())
    }
}

// ── Outbound forwarding ───────────────────────────────────────

fn forward_one<T: Transport>(transport: &mut T, namespace: &str, msg: &Outbound) {
    let Some(topic) = topic(namespace, msg.feed) else {
        warn!("Outbound: topic for {} too long, dropped", msg.feed.key());
        return;
    };
    // Not retried.
    if let Err(e) = transport.send(&topic, &msg.payload) {
        warn!("Outbound: send to {} failed: {}", topic, e);
    }
}

/// Forward everything currently queued. Returns how many were taken.
pub fn flush_outbound<T: Transport>(
    rx: OutboundReceiver<'_>,
    transport: &mut T,
    namespace: &str,
) -> usize {
    let mut n = 0;
    while let Ok(msg) = rx.try_receive() {
        forward_one(transport, namespace, &msg);
        n += 1;
    }
    n
}

/// Await and forward outbound messages forever.
pub async fn forward_outbound<T: Transport>(
    rx: OutboundReceiver<'_>,
    mut transport: T,
    namespace: &str,
) {
    info!("Outbound forwarder started ({}/feeds/...)", namespace);
    loop {
        let msg = rx.receive().await;
        forward_one(&mut transport, namespace, &msg);
    }
}
