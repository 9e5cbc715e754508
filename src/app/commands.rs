//! Remote feed keys, inbound commands and outbound values.
//!
//! Inbound payloads are plain strings. Parsing never rejects: a boolean
//! feed is on only for `"1"`, a fan payload is read as a leading integer
//! and anything non-numeric is 0.

use core::fmt::Write as _;

use heapless::String;

use super::dispatch::Led;

/// Capacity of an encoded outbound payload.
pub const PAYLOAD_CAPACITY: usize = 16;

pub type Payload = String<PAYLOAD_CAPACITY>;

// ── Feeds ─────────────────────────────────────────────────────

/// A remote channel key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Temperature,
    Humidity,
    Light,
    Led(Led),
    Door,
    Fan,
    /// Presence detection reported by the camera service (inbound only).
    Detection,
}

impl Feed {
    /// Every feed, in a fixed order.
    pub const ALL: [Feed; 10] = [
        Feed::Temperature,
        Feed::Humidity,
        Feed::Light,
        Feed::Led(Led::One),
        Feed::Led(Led::Two),
        Feed::Led(Led::Three),
        Feed::Led(Led::Four),
        Feed::Door,
        Feed::Fan,
        Feed::Detection,
    ];

    /// Key used on the remote broker.
    pub const fn key(self) -> &'static str {
        match self {
            Feed::Temperature => "DADN_Temp",
            Feed::Humidity => "DADN_Humi",
            Feed::Light => "DADN_Light",
            Feed::Led(Led::One) => "DADN_LED_1",
            Feed::Led(Led::Two) => "DADN_LED_2",
            Feed::Led(Led::Three) => "DADN_LED_3",
            Feed::Led(Led::Four) => "DADN_LED_4",
            Feed::Door => "DADN_Door",
            Feed::Fan => "dadn-fan-1",
            Feed::Detection => "dadn-ai",
        }
    }

    pub fn from_key(key: &str) -> Option<Feed> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Resolve a full topic (`<namespace>/feeds/<key>`) or a bare key.
    pub fn from_topic(topic: &str) -> Option<Feed> {
        let key = topic.rsplit('/').next().unwrap_or(topic);
        Self::from_key(key)
    }
}

// ── Inbound ───────────────────────────────────────────────────

/// A remote actuator command, already mapped to a typed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundCommand {
    Door { open: bool },
    Led { led: Led, on: bool },
    /// Raw requested speed; clamped by dispatch.
    Fan { speed: i32 },
    Detection { detected: bool },
}

impl InboundCommand {
    /// Map a feed and payload to a command.
    ///
    /// Returns `None` for feeds this node only publishes.
    pub fn parse(feed: Feed, payload: &str) -> Option<Self> {
        match feed {
            Feed::Door => Some(Self::Door {
                open: parse_flag(payload),
            }),
            Feed::Led(led) => Some(Self::Led {
                led,
                on: parse_flag(payload),
            }),
            Feed::Fan => Some(Self::Fan {
                speed: parse_leading_int(payload),
            }),
            Feed::Detection => Some(Self::Detection {
                detected: parse_flag(payload),
            }),
            Feed::Temperature | Feed::Humidity | Feed::Light => None,
        }
    }
}

/// `"1"` (after trimming) is true, everything else false.
pub fn parse_flag(payload: &str) -> bool {
    payload.trim() == "1"
}

/// Leading decimal integer with optional sign; 0 when there is none.
/// Saturates instead of overflowing.
pub fn parse_leading_int(payload: &str) -> i32 {
    let s = payload.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i32 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i32::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(d);
    }
    if negative { -value } else { value }
}

// ── Outbound ──────────────────────────────────────────────────

/// A value published on a feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutboundValue {
    Flag(bool),
    /// Percentages and fan speed.
    Level(u8),
    /// Degrees Celsius, one decimal.
    Celsius(f32),
}

impl OutboundValue {
    /// Wire encoding: `"1"`/`"0"`, plain integer, or one-decimal float.
    pub fn encode(&self) -> Payload {
        let mut out = Payload::new();
        // The longest rendering of these variants fits the buffer.
        let _ = match *self {
            OutboundValue::Flag(on) => out.push_str(if on { "1" } else { "0" }).map_err(drop),
            OutboundValue::Level(v) => write!(out, "{v}").map_err(drop),
            OutboundValue::Celsius(c) => write!(out, "{c:.1}").map_err(drop),
        };
        out
    }
}
