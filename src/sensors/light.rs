//! Ambient light on an ADC1 channel.
//!
//! On ESP-IDF the channel is configured by `hw_init` and read through the
//! oneshot driver. Host builds see a constant zero count.

use crate::app::ports::LightSource;
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins::LIGHT_ADC_CHANNEL;

pub struct AdcLight {
    channel: u32,
}

impl AdcLight {
    pub fn new() -> Self {
        Self {
            channel: LIGHT_ADC_CHANNEL,
        }
    }
}

impl Default for AdcLight {
    fn default() -> Self {
        Self::new()
    }
}

impl LightSource for AdcLight {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).ok_or(SensorError::AdcReadFailed)
    }
}
