//! ESP32 time adapter.
//!
//! Seeds the calendar clock at boot. Wall-clock synchronisation itself
//! (SNTP or otherwise) happens outside the node core.
//!
//! - **`target_os = "espidf"`**: reads the system time with
//!   `gettimeofday()` / `localtime_r()` and `esp_timer_get_time()`.
//! - **`not(target_os = "espidf")`**: no wall clock; uptime from
//!   `std::time::Instant`.

use crate::clock::CalendarTime;
use crate::state::NodeState;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1000
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Local calendar time, or `None` if the system clock was never set.
    #[cfg(target_os = "espidf")]
    pub fn wall_clock(&self) -> Option<CalendarTime> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Anything before 2020-01-01 is an unsynced RTC.
        const EPOCH_2020: i64 = 1_577_836_800;
        if (tv.tv_sec as i64) < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        from_tm(
            tm.tm_year + 1900,
            tm.tm_mon + 1,
            tm.tm_mday,
            tm.tm_hour,
            tm.tm_min,
            tm.tm_sec,
        )
    }

    /// On non-ESP targets (simulation) always `None`.
    #[cfg(not(target_os = "espidf"))]
    pub fn wall_clock(&self) -> Option<CalendarTime> {
        None
    }

    /// Wall clock if available, otherwise `fallback`.
    pub fn boot_time(&self, fallback: CalendarTime) -> CalendarTime {
        match self.wall_clock() {
            Some(now) => {
                log::info!("Time: wall clock {}", now);
                now
            }
            None => {
                log::info!("Time: no wall clock, starting at {}", fallback);
                fallback
            }
        }
    }

    /// Overwrite the pool calendar with the wall clock when one is
    /// available and the two disagree. Returns whether it was changed.
    pub fn resync<H>(&self, state: &NodeState<H>) -> bool {
        match self.wall_clock() {
            Some(now) if now != state.calendar() => {
                log::info!("Time: calendar resynced to {}", now);
                state.set_calendar(now);
                true
            }
            _ => false,
        }
    }
}

/// Convert broken-down `struct tm` fields (already 1-based month, full
/// year). Leap seconds fold into 59.
pub fn from_tm(
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
) -> Option<CalendarTime> {
    let narrow = |v: i32| u8::try_from(v).ok();
    CalendarTime::new(
        u16::try_from(year).ok()?,
        narrow(month)?,
        narrow(day)?,
        narrow(hour)?,
        narrow(minute)?,
        narrow(second.min(59))?,
    )
    .ok()
}
