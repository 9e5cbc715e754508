//! Door latch servo: LEDC PWM channel 1 at 50 Hz.
//!
//! Open is 90°, closed is 0°. Pulse width maps linearly from 500 µs (0°)
//! to 2500 µs (180°).

use crate::drivers::hw_init;
use crate::error::DriverError;
use crate::pins;

pub const OPEN_ANGLE: u8 = 90;
pub const CLOSED_ANGLE: u8 = 0;

const PULSE_MIN_US: u32 = 500;
const PULSE_MAX_US: u32 = 2500;
const FRAME_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;

/// LEDC duty for a servo angle (clamped to 180°).
pub fn angle_to_duty(angle: u8) -> u32 {
    let angle = u32::from(angle.min(180));
    let pulse_us = PULSE_MIN_US + (PULSE_MAX_US - PULSE_MIN_US) * angle / 180;
    pulse_us * (1 << pins::SERVO_PWM_RESOLUTION_BITS) / FRAME_US
}

pub struct DoorServo {
    angle: u8,
}

impl Default for DoorServo {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorServo {
    pub fn new() -> Self {
        Self {
            angle: CLOSED_ANGLE,
        }
    }

    pub fn set_open(&mut self, open: bool) -> Result<(), DriverError> {
        let angle = if open { OPEN_ANGLE } else { CLOSED_ANGLE };
        if !hw_init::ledc_set(hw_init::LEDC_CH_SERVO, angle_to_duty(angle)) {
            return Err(DriverError::ServoWriteFailed);
        }
        self.angle = angle;
        Ok(())
    }

    pub fn angle(&self) -> u8 {
        self.angle
    }
}
