//! Periodic sensor samplers.
//!
//! Each sampler owns one source. On every period it reads the source,
//! normalises the value, writes it into the shared pool, then publishes it.
//! A failed read keeps the previous reading and skips the publish; a failed
//! publish is logged and sampling continues.

pub mod climate;
pub mod light;

use log::{debug, warn};

use crate::app::commands::{Feed, OutboundValue};
use crate::app::ports::{ClimateSource, LightSource, Publisher};
use crate::error::SensorError;
use crate::state::NodeState;

/// Full-scale 12-bit ADC count.
pub const ADC_FULL_SCALE: u16 = 4095;

fn publish_or_warn<P: Publisher>(publisher: &mut P, feed: Feed, value: OutboundValue) {
    if let Err(e) = publisher.publish(feed, value) {
        warn!("Sampler: publish to {} failed: {}", feed.key(), e);
    }
}

/// Round to one decimal place.
pub fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Integer percent, truncated and clamped to 0..=100.
pub fn humidity_percent(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0) as u8
}

/// Raw ADC count scaled to 0..=100.
pub fn light_percent(raw: u16) -> u8 {
    (u32::from(raw.min(ADC_FULL_SCALE)) * 100 / u32::from(ADC_FULL_SCALE)) as u8
}

// ── Climate ───────────────────────────────────────────────────

pub struct ClimateSampler<S> {
    source: S,
}

impl<S: ClimateSource> ClimateSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Read, store, then publish humidity and temperature.
    pub fn sample<H, P: Publisher>(
        &mut self,
        state: &NodeState<H>,
        publisher: &mut P,
    ) -> Result<(), SensorError> {
        let reading = self.source.read().map_err(|e| {
            warn!("Climate: read failed, keeping last value: {}", e);
            e
        })?;

        let temperature_c = round_tenth(reading.temperature_c);
        let humidity = humidity_percent(reading.humidity_percent);
        state.update_sensors(|r| {
            r.temperature_c = temperature_c;
            r.humidity = humidity;
        });
        debug!("Climate: {:.1} C, {}%", temperature_c, humidity);

        publish_or_warn(publisher, Feed::Humidity, OutboundValue::Level(humidity));
        publish_or_warn(publisher, Feed::Temperature, OutboundValue::Celsius(temperature_c));
        Ok(())
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

// ── Light ─────────────────────────────────────────────────────

pub struct LightSampler<S> {
    source: S,
}

impl<S: LightSource> LightSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn sample<H, P: Publisher>(
        &mut self,
        state: &NodeState<H>,
        publisher: &mut P,
    ) -> Result<(), SensorError> {
        let raw = self.source.read_raw().map_err(|e| {
            warn!("Light: read failed, keeping last value: {}", e);
            e
        })?;

        let light = light_percent(raw);
        state.update_sensors(|r| r.light = light);
        debug!("Light: raw={} -> {}%", raw, light);

        publish_or_warn(publisher, Feed::Light, OutboundValue::Level(light));
        Ok(())
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
