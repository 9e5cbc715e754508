//! Indicator strip driver: four WS2812 pixels on one data line.
//!
//! Each indicator has a fixed colour when lit (see [`Led::colour`]).
//! The whole strip is re-sent on every change.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-stream generated by the RMT peripheral.
//! On host/test: tracks pixel state in-memory only.

use crate::app::dispatch::Led;
use crate::error::DriverError;
use crate::pins::LED_STRIP_LEN;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::rmt::{FixedLengthSignal, PinState, Pulse, TxRmtDriver};

/// Bits per pixel (GRB, 8 bits each).
#[cfg(target_os = "espidf")]
const BITS_PER_PIXEL: usize = 24;
#[cfg(target_os = "espidf")]
const SIGNAL_LEN: usize = LED_STRIP_LEN * BITS_PER_PIXEL;

pub struct LedStrip {
    pixels: [(u8, u8, u8); LED_STRIP_LEN],
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
}

impl LedStrip {
    #[cfg(target_os = "espidf")]
    pub fn new(tx: TxRmtDriver<'static>) -> Self {
        Self {
            pixels: [(0, 0, 0); LED_STRIP_LEN],
            tx,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            pixels: [(0, 0, 0); LED_STRIP_LEN],
        }
    }

    pub fn set(&mut self, led: Led, on: bool) -> Result<(), DriverError> {
        self.pixels[led.index()] = if on { led.colour() } else { (0, 0, 0) };
        self.show()
    }

    pub fn pixel(&self, led: Led) -> (u8, u8, u8) {
        self.pixels[led.index()]
    }

    /// Wire order: G, R, B per pixel, most significant bit first.
    pub fn grb_words(&self) -> [u32; LED_STRIP_LEN] {
        core::array::from_fn(|i| {
            let (r, g, b) = self.pixels[i];
            (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b)
        })
    }

    #[cfg(target_os = "espidf")]
    fn show(&mut self) -> Result<(), DriverError> {
        use core::time::Duration;

        let err = |_| DriverError::GpioWriteFailed;
        let ticks_hz = self.tx.counter_clock().map_err(err)?;
        let t0h = Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(350))
            .map_err(err)?;
        let t0l = Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(800))
            .map_err(err)?;
        let t1h = Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(700))
            .map_err(err)?;
        let t1l = Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(600))
            .map_err(err)?;

        let mut signal = FixedLengthSignal::<SIGNAL_LEN>::new();
        for (p, word) in self.grb_words().into_iter().enumerate() {
            for bit in 0..BITS_PER_PIXEL {
                let set = word & (1 << (BITS_PER_PIXEL - 1 - bit)) != 0;
                let pair = if set { (t1h, t1l) } else { (t0h, t0l) };
                signal.set(p * BITS_PER_PIXEL + bit, &pair).map_err(err)?;
            }
        }
        self.tx.start_blocking(&signal).map_err(err)
    }

    #[cfg(not(target_os = "espidf"))]
    fn show(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for LedStrip {
    fn default() -> Self {
        Self::new()
    }
}
