//! Hardware adapter: bridges the actuator drivers to [`ActuatorPort`].
//!
//! Owns the door servo, indicator strip and fan driver. This is the only
//! actuator path in the system that touches real peripherals; on
//! non-espidf targets the drivers fall back to in-memory simulation.

use crate::app::dispatch::{FanSpeed, Led};
use crate::app::ports::ActuatorPort;
use crate::drivers::door::DoorServo;
use crate::drivers::fan::FanDriver;
use crate::drivers::leds::LedStrip;
use crate::error::DriverError;

/// Concrete adapter that combines all actuators behind one port.
pub struct HardwareAdapter {
    door: DoorServo,
    leds: LedStrip,
    fan: FanDriver,
}

impl HardwareAdapter {
    pub fn new(door: DoorServo, leds: LedStrip, fan: FanDriver) -> Self {
        Self { door, leds, fan }
    }

    pub fn door(&self) -> &DoorServo {
        &self.door
    }

    pub fn leds(&self) -> &LedStrip {
        &self.leds
    }

    pub fn fan(&self) -> &FanDriver {
        &self.fan
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn write_door(&mut self, open: bool) -> Result<(), DriverError> {
        self.door.set_open(open)
    }

    fn write_led(&mut self, led: Led, on: bool) -> Result<(), DriverError> {
        self.leds.set(led, on)
    }

    fn write_fan(&mut self, speed: FanSpeed) -> Result<(), DriverError> {
        self.fan.set(speed)
    }
}
