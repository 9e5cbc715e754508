//! DHT20 temperature / humidity sensor over I2C.
//!
//! Generic over any `embedded-hal` 1.0 `I2c` bus and `DelayNs`, so the
//! same driver runs on the ESP-IDF I2C master and against a fake bus in
//! tests.
//!
//! A measurement is triggered with `AC 33 00`, completes within 80 ms, and
//! returns seven bytes: status, 20-bit humidity, 20-bit temperature, CRC-8.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::{ClimateSample, ClimateSource};
use crate::error::SensorError;
use crate::pins::DHT20_I2C_ADDR;

const TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];
const MEASURE_MS: u32 = 80;
const STATUS_BUSY: u8 = 0x80;
const FULL_SCALE: f32 = 1_048_576.0; // 2^20

/// CRC-8, polynomial 0x31, initial value 0xFF.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x31 } else { crc << 1 };
        }
    }
    crc
}

/// Decode a raw seven-byte frame.
pub fn decode(frame: &[u8; 7]) -> Result<ClimateSample, SensorError> {
    if frame[0] & STATUS_BUSY != 0 {
        return Err(SensorError::NotReady);
    }
    if crc8(&frame[..6]) != frame[6] {
        return Err(SensorError::NotReady);
    }

    let raw_h = (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let raw_t = ((u32::from(frame[3]) & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);

    Ok(ClimateSample {
        temperature_c: raw_t as f32 / FULL_SCALE * 200.0 - 50.0,
        humidity_percent: raw_h as f32 / FULL_SCALE * 100.0,
    })
}

pub struct Dht20<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Dht20<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: DHT20_I2C_ADDR,
        }
    }

    /// Give the bus back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> ClimateSource for Dht20<I2C, D> {
    fn read(&mut self) -> Result<ClimateSample, SensorError> {
        self.i2c
            .write(self.address, &TRIGGER)
            .map_err(|_| SensorError::BusReadFailed)?;
        self.delay.delay_ms(MEASURE_MS);

        let mut frame = [0u8; 7];
        self.i2c
            .read(self.address, &mut frame)
            .map_err(|_| SensorError::BusReadFailed)?;
        decode(&frame)
    }
}
