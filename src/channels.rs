//! Remote-channel message queues.
//!
//! Bounded `embassy-sync` MPMC channels between the node tasks and the
//! (external) broker transport. No heap; producers use `try_send` and
//! never block.
//!
//! ```text
//! ┌──────────────┐  InboundMessage  ┌──────────────┐
//! │  Transport   │─────────────────▶│  Reconciler  │
//! │  (I/O task)  │◀─────────────────│  menu, samplers
//! └──────────────┘     Outbound     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use heapless::String;

use crate::app::commands::{Feed, PAYLOAD_CAPACITY, Payload};

/// Longest accepted inbound topic.
pub const TOPIC_CAPACITY: usize = 64;

/// Channel depth for inbound (remote → node) messages.
pub const INBOUND_DEPTH: usize = 8;

/// Channel depth for outbound (node → remote) messages.
pub const OUTBOUND_DEPTH: usize = 16;

/// A message received from the broker, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<TOPIC_CAPACITY>,
    pub payload: Payload,
}

impl InboundMessage {
    /// Build a message, truncating an oversized payload to its buffer.
    ///
    /// A topic longer than its buffer is reduced to its last segment (the
    /// feed key). `None` only if even that does not fit.
    pub fn new(topic: &str, payload: &str) -> Option<Self> {
        let topic = if topic.len() > TOPIC_CAPACITY {
            topic.rsplit('/').next().unwrap_or(topic)
        } else {
            topic
        };
        Some(Self {
            topic: String::try_from(topic).ok()?,
            payload: String::try_from(truncate(payload, PAYLOAD_CAPACITY)).ok()?,
        })
    }
}

/// Longest prefix of `s` that fits `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// An encoded value queued for the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub feed: Feed,
    pub payload: Payload,
}

pub type InboundChannel = Channel<CriticalSectionRawMutex, InboundMessage, INBOUND_DEPTH>;
pub type OutboundChannel = Channel<CriticalSectionRawMutex, Outbound, OUTBOUND_DEPTH>;

pub type InboundReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, InboundMessage, INBOUND_DEPTH>;
pub type OutboundSender<'a> = Sender<'a, CriticalSectionRawMutex, Outbound, OUTBOUND_DEPTH>;
pub type OutboundReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, Outbound, OUTBOUND_DEPTH>;

/// Inbound channel: transport → reconciler.
pub static INBOUND_CHANNEL: InboundChannel = Channel::new();

/// Outbound channel: node tasks → transport.
pub static OUTBOUND_CHANNEL: OutboundChannel = Channel::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_payload_is_truncated() {
        let msg = InboundMessage::new("u/feeds/dadn-fan-1", "12345678901234567").unwrap();
        assert_eq!(msg.payload.as_str(), "1234567890123456");

        // Multi-byte characters are never split.
        let accented = format!("1{}", "\u{e9}".repeat(8));
        let msg = InboundMessage::new("u/feeds/DADN_Door", &accented).unwrap();
        assert_eq!(msg.payload.len(), 15);
        assert!(accented.starts_with(msg.payload.as_str()));
    }

    #[test]
    fn oversized_topic_keeps_the_feed_key() {
        let namespace = "n".repeat(TOPIC_CAPACITY);
        let msg = InboundMessage::new(&format!("{namespace}/feeds/DADN_Door"), "1").unwrap();
        assert_eq!(msg.topic.as_str(), "DADN_Door");

        let long_key = "x".repeat(TOPIC_CAPACITY + 1);
        assert!(InboundMessage::new(&long_key, "1").is_none());
    }

    #[test]
    fn local_channel_is_bounded() {
        let ch: InboundChannel = Channel::new();
        for _ in 0..INBOUND_DEPTH {
            assert!(ch.try_send(InboundMessage::new("DADN_Door", "1").unwrap()).is_ok());
        }
        assert!(ch.try_send(InboundMessage::new("DADN_Door", "1").unwrap()).is_err());
    }
}
