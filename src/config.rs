//! Node configuration parameters
//!
//! All tunable periods and countdowns for the HomeNode firmware.
//! Menu countdowns are counted in render ticks, everything else in
//! milliseconds.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::clock::CalendarTime;
use crate::error::ConfigError;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Input ---
    /// Button line poll period (milliseconds)
    pub button_poll_ms: u32,
    /// Hold duration before a long press is reported (milliseconds)
    pub long_press_ms: u32,

    // --- Periodic tasks ---
    /// Calendar clock tick (milliseconds)
    pub clock_tick_ms: u32,
    /// Temperature / humidity sample period (milliseconds)
    pub climate_period_ms: u32,
    /// Light level sample period (milliseconds)
    pub light_period_ms: u32,
    /// Inbound command drain period for the cooperative runner (milliseconds)
    pub inbound_poll_ms: u32,

    // --- Menu ---
    /// Menu render tick (milliseconds)
    pub render_period_ms: u32,
    /// Settings page inactivity timeout (render ticks)
    pub page_timeout_ticks: u8,
    /// Notice overlay duration (render ticks)
    pub notice_ticks: u8,
    /// Clock separator blink period on the main page (render ticks)
    pub blink_ticks: u8,
    /// Welcome splash duration (milliseconds)
    pub splash_ms: u32,

    // --- Remote channel ---
    /// Account prefix for feed topics (`<namespace>/feeds/<feed>`)
    pub feed_namespace: String<32>,

    /// Calendar value used when no wall-clock time is available at boot
    pub default_start: CalendarTime,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut feed_namespace = String::new();
        // Fits: literal is shorter than the capacity.
        let _ = feed_namespace.push_str("homenode");

        Self {
            // Input
            button_poll_ms: 20,
            long_press_ms: 1000,

            // Periodic tasks
            clock_tick_ms: 1000,      // 1 Hz
            climate_period_ms: 30_000, // 30 s
            light_period_ms: 20_000,   // 20 s
            inbound_poll_ms: 100,

            // Menu
            render_period_ms: 200,
            page_timeout_ticks: 75, // 15 s at 200 ms
            notice_ticks: 25,       // 5 s
            blink_ticks: 5,         // 1 s
            splash_ms: 5000,

            feed_namespace,
            default_start: CalendarTime::default(),
        }
    }
}

impl NodeConfig {
    /// Reject configurations the task runners cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            (self.button_poll_ms, "button_poll_ms"),
            (self.long_press_ms, "long_press_ms"),
            (self.clock_tick_ms, "clock_tick_ms"),
            (self.climate_period_ms, "climate_period_ms"),
            (self.light_period_ms, "light_period_ms"),
            (self.inbound_poll_ms, "inbound_poll_ms"),
            (self.render_period_ms, "render_period_ms"),
        ];
        for (value, field) in periods {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
        }

        let ticks = [
            (self.page_timeout_ticks, "page_timeout_ticks"),
            (self.notice_ticks, "notice_ticks"),
            (self.blink_ticks, "blink_ticks"),
        ];
        for (value, field) in ticks {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
        }

        if self.button_poll_ms >= self.render_period_ms {
            return Err(ConfigError::PeriodOrder(
                "button poll must be faster than render",
            ));
        }
        if self.button_poll_ms >= self.clock_tick_ms {
            return Err(ConfigError::PeriodOrder(
                "button poll must be faster than clock",
            ));
        }
        if self.clock_tick_ms > self.light_period_ms || self.clock_tick_ms > self.climate_period_ms
        {
            return Err(ConfigError::PeriodOrder(
                "sensor sampling must not be faster than clock",
            ));
        }
        if self.long_press_ms <= self.button_poll_ms {
            return Err(ConfigError::PeriodOrder(
                "long press must span several polls",
            ));
        }
        if self.feed_namespace.is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        Ok(())
    }

    /// Consecutive pressed polls that make a long press.
    pub fn long_press_polls(&self) -> u32 {
        (self.long_press_ms / self.button_poll_ms.max(1)).max(1)
    }

    /// Render ticks covered by the welcome splash.
    pub fn splash_ticks(&self) -> u32 {
        self.splash_ms / self.render_period_ms.max(1)
    }
}
