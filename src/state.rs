//! Shared state pool.
//!
//! One `NodeState` is created at boot and shared by reference with every
//! task. Each field has a single writer:
//!
//! | Field       | Writer               | Readers                 |
//! |-------------|----------------------|-------------------------|
//! | actuators   | `ActuatorDispatch`   | menu, reconciler        |
//! | sensors     | climate / light      | menu                    |
//! | calendar    | clock task           | menu                    |
//! | notices     | dispatch, reconciler | menu (consumes)         |
//! | input       | button poller        | menu (consumes)         |

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::app::dispatch::{ActuatorDispatch, ActuatorState, Dispatcher};
use crate::app::ports::ActuatorPort;
use crate::clock::CalendarTime;
use crate::drivers::button::InputLatch;

/// Latest sampled environment values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReadings {
    /// Rounded to one decimal.
    pub temperature_c: f32,
    /// 0..=100
    pub humidity: u8,
    /// 0..=100
    pub light: u8,
}

// ── Notices ───────────────────────────────────────────────────

/// Transient overlay requests consumed by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Door,
    Detect,
}

/// Lock-free pending-notice flags plus the last detection result.
pub struct NoticeBoard {
    door: AtomicBool,
    detect: AtomicBool,
    detected: AtomicBool,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeBoard {
    pub const fn new() -> Self {
        Self {
            door: AtomicBool::new(false),
            detect: AtomicBool::new(false),
            detected: AtomicBool::new(false),
        }
    }

    fn flag(&self, notice: Notice) -> &AtomicBool {
        match notice {
            Notice::Door => &self.door,
            Notice::Detect => &self.detect,
        }
    }

    pub fn raise(&self, notice: Notice) {
        self.flag(notice).store(true, Ordering::Release);
    }

    pub fn is_pending(&self, notice: Notice) -> bool {
        self.flag(notice).load(Ordering::Acquire)
    }

    /// Consume a pending notice. Returns whether one was pending.
    pub fn take(&self, notice: Notice) -> bool {
        self.flag(notice).swap(false, Ordering::AcqRel)
    }

    /// Record a detection result and raise the detect notice.
    pub fn report_detection(&self, detected: bool) {
        self.detected.store(detected, Ordering::Release);
        self.raise(Notice::Detect);
    }

    pub fn detected(&self) -> bool {
        self.detected.load(Ordering::Acquire)
    }
}

// ── Pool ──────────────────────────────────────────────────────

pub struct NodeState<H> {
    actuators: ActuatorDispatch<H>,
    sensors: Mutex<CriticalSectionRawMutex, Cell<SensorReadings>>,
    calendar: Mutex<CriticalSectionRawMutex, Cell<CalendarTime>>,
    notices: NoticeBoard,
    input: InputLatch,
}

impl<H: ActuatorPort> NodeState<H> {
    /// Build the pool. The dispatch forces every output idle here, before
    /// any task can run.
    pub fn new(hw: H, start: CalendarTime) -> Self {
        Self {
            actuators: ActuatorDispatch::new(hw),
            sensors: Mutex::new(Cell::new(SensorReadings::default())),
            calendar: Mutex::new(Cell::new(start)),
            notices: NoticeBoard::new(),
            input: InputLatch::new(),
        }
    }

    /// Exclusive actuator section. See [`ActuatorDispatch::transact`].
    pub fn transact<R>(&self, f: impl FnOnce(&mut Dispatcher<'_, H>) -> R) -> R {
        self.actuators.transact(&self.notices, f)
    }

    pub fn actuators(&self) -> ActuatorState {
        self.actuators.snapshot()
    }

    pub fn with_hardware<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.actuators.with_hardware(f)
    }
}

impl<H> NodeState<H> {
    pub fn sensors(&self) -> SensorReadings {
        self.sensors.lock(Cell::get)
    }

    /// Read-modify-write the sensor record under the pool lock.
    pub fn update_sensors(&self, f: impl FnOnce(&mut SensorReadings)) {
        self.sensors.lock(|cell| {
            let mut r = cell.get();
            f(&mut r);
            cell.set(r);
        });
    }

    pub fn calendar(&self) -> CalendarTime {
        self.calendar.lock(Cell::get)
    }

    /// Advance the calendar one second and return the new value.
    pub fn tick_clock(&self) -> CalendarTime {
        self.calendar.lock(|cell| {
            let mut t = cell.get();
            t.tick();
            cell.set(t);
            t
        })
    }

    pub fn set_calendar(&self, time: CalendarTime) {
        self.calendar.lock(|cell| cell.set(time));
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn input(&self) -> &InputLatch {
        &self.input
    }
}
