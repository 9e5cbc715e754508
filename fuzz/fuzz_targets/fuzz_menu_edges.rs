//! Fuzz target: `MenuController::tick` under arbitrary input
//!
//! Each byte is one render tick: the low bits pick a button edge to latch
//! (or none), bit 6 raises a door notice and bit 7 a detection notice.
//! Checks that the controller never panics, always draws a full frame
//! and never leaves the fan off-step.
//!
//! cargo fuzz run fuzz_menu_edges

#![no_main]

use homenode::app::commands::{Feed, OutboundValue};
use homenode::app::dispatch::{FanSpeed, Led};
use homenode::app::ports::{ActuatorPort, DisplayPort, Publisher};
use homenode::clock::CalendarTime;
use homenode::config::NodeConfig;
use homenode::drivers::button::{ButtonEdge, ButtonId};
use homenode::error::{DriverError, PublishError};
use homenode::menu::MenuController;
use homenode::menu::render::{COLS, Frame};
use homenode::state::{Notice, NodeState};
use libfuzzer_sys::fuzz_target;

struct NullHw;

impl ActuatorPort for NullHw {
    fn write_door(&mut self, _open: bool) -> Result<(), DriverError> {
        Ok(())
    }
    fn write_led(&mut self, _led: Led, _on: bool) -> Result<(), DriverError> {
        Ok(())
    }
    fn write_fan(&mut self, _speed: FanSpeed) -> Result<(), DriverError> {
        Ok(())
    }
}

struct Sink;

impl Publisher for Sink {
    fn publish(&mut self, _feed: Feed, _value: OutboundValue) -> Result<(), PublishError> {
        Ok(())
    }
}

struct Checked;

impl DisplayPort for Checked {
    fn clear(&mut self) {}

    fn draw(&mut self, frame: &Frame) {
        for row in 0..2 {
            assert_eq!(frame.row_str(row).len(), COLS);
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let config = NodeConfig {
        splash_ms: 0,
        ..NodeConfig::default()
    };
    let state = NodeState::new(NullHw, CalendarTime::default());
    let mut menu = MenuController::new(&config);

    for &byte in data {
        let button = ButtonId::ALL[usize::from(byte & 0x03)];
        match (byte >> 2) & 0x03 {
            1 => state.input().latch(ButtonEdge::pressed(button)),
            2 => state.input().latch(ButtonEdge::long(button)),
            _ => {}
        }
        if byte & 0x40 != 0 {
            state.notices().raise(Notice::Door);
        }
        if byte & 0x80 != 0 {
            state.notices().report_detection(byte & 0x20 != 0);
        }

        menu.tick(&state, &mut Checked, &mut Sink);

        let fan = state.actuators().fan.percent();
        assert!(fan <= 100 && fan % 20 == 0);
    }
});
