//! Fuzz target: inbound topic/payload through the reconciler
//!
//! Splits the input at the first NUL into a topic and a payload and
//! applies it to a fresh pool. Checks that no message panics, that at
//! most one value is echoed per message, and that the fan always lands
//! on a valid step.
//!
//! cargo fuzz run fuzz_inbound

#![no_main]

use homenode::app::commands::{Feed, OutboundValue};
use homenode::app::dispatch::{FanSpeed, Led};
use homenode::app::ports::{ActuatorPort, Publisher};
use homenode::app::reconciler;
use homenode::channels::InboundMessage;
use homenode::clock::CalendarTime;
use homenode::error::{DriverError, PublishError};
use homenode::state::NodeState;
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

#[derive(Default)]
struct Echoes(usize);

impl Publisher for Echoes {
    fn publish(&mut self, _feed: Feed, _value: OutboundValue) -> Result<(), PublishError> {
        self.0 += 1;
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let (topic, payload) = text.split_once('\0').unwrap_or((text, ""));
    let Some(msg) = InboundMessage::new(topic, payload) else {
        return;
    };

    let state = NodeState::new(NullHw, CalendarTime::default());
    let mut out = Echoes::default();
    reconciler::reconcile(&state, &mut out, &msg);
    assert!(out.0 <= 1, "one message echoed more than once");

    let fan = state.actuators().fan.percent();
    assert!(fan <= 100 && fan % 20 == 0, "fan off-step: {fan}");
});
