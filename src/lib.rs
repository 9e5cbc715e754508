//! HomeNode firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod clock;
pub mod config;
pub mod error;
pub mod io_task;
pub mod menu;
pub mod scheduler;
pub mod state;

mod pins;

// Hardware-facing modules; register access is cfg-gated inside, host builds
// get in-memory simulation.
pub mod adapters;
pub mod drivers;
pub mod sensors;
