//! Core-pinned thread spawning for the node's periodic tasks.
//!
//! ESP-IDF implements `std::thread` on pthreads, which are FreeRTOS tasks
//! underneath. `esp_pthread_set_cfg()` configures the *next*
//! `pthread_create()` from the calling thread, so the configure/spawn pair
//! must not interleave with other spawns on the same thread. On host
//! targets only the stack size is honoured.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): WiFi / lwIP live here.
    Pro = 0,
    /// Core 1 (APP_CPU): menu, sampling and actuator tasks.
    App = 1,
}

/// Placement and sizing for one spawned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPlacement {
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
    /// Null-terminated task name (e.g. `"menu\0"`).
    pub name: &'static str,
}

impl TaskPlacement {
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Spawn `f` as a pinned FreeRTOS task.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    placement: TaskPlacement,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    debug_assert!(placement.name.ends_with('\0'), "task name must be null-terminated");

    // SAFETY: cfg is fully initialised by the IDF default constructor and
    // the name pointer refers to a 'static null-terminated string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = placement.core as i32;
        cfg.prio = i32::from(placement.priority);
        cfg.stack_size = (placement.stack_kb * 1024) as i32;
        cfg.thread_name = placement.name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        placement.display_name(),
        placement.core,
        placement.priority,
        placement.stack_kb
    );

    std::thread::Builder::new()
        .name(placement.display_name().into())
        .spawn(f)
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    placement: TaskPlacement,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, stack={}KB)",
        placement.display_name(),
        placement.stack_kb
    );

    std::thread::Builder::new()
        .name(placement.display_name().into())
        .stack_size(placement.stack_kb * 1024)
        .spawn(f)
}
