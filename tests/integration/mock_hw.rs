//! Mock adapters for integration tests.
//!
//! Records every actuator, publish and display call so tests can assert
//! on the full history without touching real registers.

use std::collections::VecDeque;

use homenode::app::commands::{Feed, OutboundValue};
use homenode::app::dispatch::{FanSpeed, Led};
use homenode::app::ports::{
    ActuatorPort, ClimateSample, ClimateSource, DisplayPort, LightSource, Publisher,
};
use homenode::clock::CalendarTime;
use homenode::config::NodeConfig;
use homenode::error::{DriverError, PublishError, SensorError};
use homenode::menu::render::Frame;
use homenode::state::NodeState;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Door(bool),
    Led(Led, bool),
    Fan(FanSpeed),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub fail: bool,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Vec::new(),
            fail: true,
        }
    }

    fn record(&mut self, call: ActuatorCall) -> Result<(), DriverError> {
        self.calls.push(call);
        if self.fail {
            Err(DriverError::GpioWriteFailed)
        } else {
            Ok(())
        }
    }
}

impl ActuatorPort for MockHardware {
    fn write_door(&mut self, open: bool) -> Result<(), DriverError> {
        self.record(ActuatorCall::Door(open))
    }

    fn write_led(&mut self, led: Led, on: bool) -> Result<(), DriverError> {
        self.record(ActuatorCall::Led(led, on))
    }

    fn write_fan(&mut self, speed: FanSpeed) -> Result<(), DriverError> {
        self.record(ActuatorCall::Fan(speed))
    }
}

/// Boot a pool on mock hardware and forget the idle-forcing writes.
#[allow(dead_code)]
pub fn booted(start: CalendarTime) -> NodeState<MockHardware> {
    NodeState::new(MockHardware::new(), start)
}

/// Actuator writes made after boot (the first six are the idle forcing).
#[allow(dead_code)]
pub fn writes_since_boot(state: &NodeState<MockHardware>) -> Vec<ActuatorCall> {
    state.with_hardware(|hw| hw.calls.iter().skip(BOOT_WRITES).copied().collect())
}

/// Door + four LEDs + fan.
pub const BOOT_WRITES: usize = 6;

// ── RecordingPublisher ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPublisher {
    pub sent: Vec<(Feed, OutboundValue)>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_feed(&self, feed: Feed) -> Vec<OutboundValue> {
        self.sent
            .iter()
            .filter(|(f, _)| *f == feed)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, feed: Feed, value: OutboundValue) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Disconnected);
        }
        self.sent.push((feed, value));
        Ok(())
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingDisplay {
    pub clears: usize,
    pub frames: Vec<Frame>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn last_rows(&self) -> (String, String) {
        self.frames
            .last()
            .map(|f| (f.row_str(0).to_string(), f.row_str(1).to_string()))
            .unwrap_or_default()
    }
}

impl DisplayPort for RecordingDisplay {
    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

// ── Scripted sensor sources ───────────────────────────────────

/// Pops one scripted result per read; repeats the fallback when empty.
pub struct ScriptedClimate {
    pub script: VecDeque<Result<ClimateSample, SensorError>>,
    pub fallback: ClimateSample,
}

#[allow(dead_code)]
impl ScriptedClimate {
    pub fn steady(temperature_c: f32, humidity_percent: f32) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: ClimateSample {
                temperature_c,
                humidity_percent,
            },
        }
    }
}

impl ClimateSource for ScriptedClimate {
    fn read(&mut self) -> Result<ClimateSample, SensorError> {
        self.script.pop_front().unwrap_or(Ok(self.fallback))
    }
}

pub struct ScriptedLight {
    pub raw: Result<u16, SensorError>,
}

impl LightSource for ScriptedLight {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.raw
    }
}

// ── Config helpers ────────────────────────────────────────────

#[allow(dead_code)]
pub fn no_splash() -> NodeConfig {
    NodeConfig {
        splash_ms: 0,
        ..NodeConfig::default()
    }
}
