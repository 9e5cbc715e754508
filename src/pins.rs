//! GPIO / peripheral pin assignments for the HomeNode board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_UP_GPIO: i32 = 18;
pub const BUTTON_DOWN_GPIO: i32 = 19;
pub const BUTTON_OK_GPIO: i32 = 23;
pub const BUTTON_CHANGE_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Door latch servo signal (LEDC, 50 Hz).
pub const DOOR_SERVO_GPIO: i32 = 15;
/// Fan PWM (LEDC).
pub const FAN_PWM_GPIO: i32 = 27;
/// Data line of the four-pixel WS2812 indicator strip.
pub const LED_STRIP_GPIO: i32 = 32;
/// Number of pixels on the indicator strip.
pub const LED_STRIP_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// Photoresistor divider: ADC1 channel 5 (GPIO 33).
pub const LIGHT_ADC_GPIO: i32 = 33;
pub const LIGHT_ADC_CHANNEL: u32 = 5;

/// I²C bus shared by the humidity sensor and the character display.
pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// DHT20 temperature / humidity sensor.
pub const DHT20_I2C_ADDR: u8 = 0x38;
/// PCF8574 backpack of the 16x2 character display.
pub const LCD_I2C_ADDR: u8 = 0x21;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC frequency for the fan (5 kHz, 8-bit).
pub const FAN_PWM_FREQ_HZ: u32 = 5_000;
/// Servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// Servo timer resolution (bits).
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
