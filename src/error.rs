//! Unified error types for the HomeNode firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! task loops' error handling uniform. All variants are `Copy` so they can be
//! logged and passed between tasks without allocation.
//!
//! Nothing in the core is fatal: every error here ends in a `warn!` and the
//! task carries on with its next period.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Outbound publish could not be queued or sent.
    Publish(PublishError),
    /// A physical actuator write failed.
    Driver(DriverError),
    /// A sensor could not be sampled.
    Sensor(SensorError),
    /// A calendar value was out of range.
    Calendar(CalendarError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Publish(e) => write!(f, "publish: {e}"),
            Self::Driver(e) => write!(f, "driver: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Calendar(e) => write!(f, "calendar: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Publish errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The outbound queue is full; the message was dropped.
    QueueFull,
    /// Payload did not fit the fixed-capacity buffer.
    PayloadTooLong,
    /// Transport reported the broker as unreachable.
    Disconnected,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "outbound queue full"),
            Self::PayloadTooLong => write!(f, "payload too long"),
            Self::Disconnected => write!(f, "broker disconnected"),
        }
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

// ---------------------------------------------------------------------------
// Driver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
    /// Servo pulse could not be generated.
    ServoWriteFailed,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::ServoWriteFailed => write!(f, "servo write failed"),
        }
    }
}

impl From<DriverError> for Error {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transaction with the humidity sensor failed.
    BusReadFailed,
    /// Sensor returned a checksum mismatch or busy status.
    NotReady,
    /// ADC read returned an error.
    AdcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusReadFailed => write!(f, "I2C read failed"),
            Self::NotReady => write!(f, "sensor not ready"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Calendar errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    SecondOutOfRange,
    MinuteOutOfRange,
    HourOutOfRange,
    DayOutOfRange,
    MonthOutOfRange,
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecondOutOfRange => write!(f, "second out of range"),
            Self::MinuteOutOfRange => write!(f, "minute out of range"),
            Self::HourOutOfRange => write!(f, "hour out of range"),
            Self::DayOutOfRange => write!(f, "day out of range for month"),
            Self::MonthOutOfRange => write!(f, "month out of range"),
        }
    }
}

impl From<CalendarError> for Error {
    fn from(e: CalendarError) -> Self {
        Self::Calendar(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Returned by [`NodeConfig::validate`](crate::config::NodeConfig::validate).
/// The `&'static str` names the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A period or tick count was zero.
    Zero(&'static str),
    /// Task periods are not in the required relative order.
    PeriodOrder(&'static str),
    /// Feed namespace is empty.
    EmptyNamespace,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero(field) => write!(f, "{field} must be non-zero"),
            Self::PeriodOrder(what) => write!(f, "period order violated: {what}"),
            Self::EmptyNamespace => write!(f, "feed namespace is empty"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
