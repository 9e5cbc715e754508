//! Actuator drivers, button input, hardware initialisation, and task spawning.

pub mod button;
pub mod door;
pub mod fan;
pub mod hw_init;
pub mod leds;
pub mod task_pin;
