//! Fan driver: LEDC PWM channel 0.
//!
//! Duty is proportional to the commanded speed (`speed * 255 / 100`).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::dispatch::FanSpeed;
use crate::drivers::hw_init;
use crate::error::DriverError;

pub struct FanDriver {
    speed: FanSpeed,
}

impl Default for FanDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FanDriver {
    pub fn new() -> Self {
        Self {
            speed: FanSpeed::OFF,
        }
    }

    pub fn set(&mut self, speed: FanSpeed) -> Result<(), DriverError> {
        if !hw_init::ledc_set(hw_init::LEDC_CH_FAN, u32::from(speed.duty())) {
            return Err(DriverError::PwmWriteFailed);
        }
        self.speed = speed;
        Ok(())
    }

    pub fn speed(&self) -> FanSpeed {
        self.speed
    }
}
