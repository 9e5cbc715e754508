//! Port traits: the hexagonal boundary between node logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ dispatch / menu / samplers (domain)
//! ```
//!
//! Driven adapters (actuators, display, sensors, buttons, transport)
//! implement these traits. Domain types consume them via generics, so the
//! core never touches hardware directly and host tests substitute
//! recording mocks.

use super::commands::{Feed, OutboundValue};
use super::dispatch::{FanSpeed, Led};
use crate::drivers::button::ButtonId;
use crate::error::{DriverError, PublishError, SensorError};
use crate::menu::render::Frame;
use crate::scheduler::TaskId;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Physical outputs. Every write must be safe to repeat.
pub trait ActuatorPort {
    /// Move the latch to open (90°) or closed (0°).
    fn write_door(&mut self, open: bool) -> Result<(), DriverError>;

    /// Light or extinguish one indicator.
    fn write_led(&mut self, led: Led, on: bool) -> Result<(), DriverError>;

    /// Drive the fan output proportionally to `speed`.
    fn write_fan(&mut self, speed: FanSpeed) -> Result<(), DriverError>;
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Two-row character display.
pub trait DisplayPort {
    /// Blank the whole surface.
    fn clear(&mut self);

    /// Write a full frame.
    fn draw(&mut self, frame: &Frame);
}

// ───────────────────────────────────────────────────────────────
// Publisher port (domain → remote channel)
// ───────────────────────────────────────────────────────────────

/// Outward publish. Implementations must not block.
pub trait Publisher {
    fn publish(&mut self, feed: Feed, value: OutboundValue) -> Result<(), PublishError>;
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn publish(&mut self, feed: Feed, value: OutboundValue) -> Result<(), PublishError> {
        (**self).publish(feed, value)
    }
}

/// Wire-level sink that the outbound queue is drained into.
pub trait Transport {
    fn send(&mut self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One temperature / humidity measurement, unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    pub temperature_c: f32,
    pub humidity_percent: f32,
}

pub trait ClimateSource {
    fn read(&mut self) -> Result<ClimateSample, SensorError>;
}

pub trait LightSource {
    /// Raw 12-bit ADC count (0..=4095).
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Button lines
// ───────────────────────────────────────────────────────────────

/// Raw access to the four pulled-up, active-low button inputs.
pub trait ButtonLines {
    /// `true` while the line is held low.
    fn is_pressed(&mut self, button: ButtonId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Task delegate (decouples the scheduler from the units it runs)
// ───────────────────────────────────────────────────────────────

/// Callback the cooperative [`Scheduler`](crate::scheduler::Scheduler)
/// invokes when a task is due.
pub trait TaskDelegate {
    fn run_task(&mut self, task: TaskId);
}
