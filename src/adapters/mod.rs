//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements        | Connects to                  |
//! |-------------|-------------------|------------------------------|
//! | `hardware`  | ActuatorPort      | ESP32 LEDC, RMT              |
//! | `display`   | DisplayPort       | HD44780 over PCF8574         |
//! | `publisher` | Publisher         | Outbound channel / log       |
//! |             | Transport         | Serial log output            |
//! | `time`      | -                 | ESP32 system time            |
//!
//! Sensor sources and button lines live with their drivers in
//! `sensors` and `drivers::button`.

pub mod display;
pub mod hardware;
pub mod publisher;
pub mod time;
