//! Actuator dispatch: the single mutator of door, LED and fan state.
//!
//! ```text
//!   MenuController ──┐
//!                    ├──▶ transact(|d| ...) ──▶ ActuatorState + ActuatorPort
//!   Reconciler ──────┘        (one critical section)
//! ```
//!
//! Every operation writes the physical output and then the shared record.
//! The shared write happens even when the value is unchanged and even when
//! the driver reports an error; callers that want change suppression compare
//! against [`Dispatcher::state`] first.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{debug, warn};

use super::ports::ActuatorPort;
use crate::state::{Notice, NoticeBoard};

// ── Value types ───────────────────────────────────────────────

/// One of the four indicator lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Led {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
}

impl Led {
    pub const ALL: [Led; 4] = [Led::One, Led::Two, Led::Three, Led::Four];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// 1-based label used on the display.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Indicator colour when lit (R, G, B).
    pub const fn colour(self) -> (u8, u8, u8) {
        match self {
            Led::One => (0, 255, 0),
            Led::Two => (0, 0, 255),
            Led::Three => (255, 0, 0),
            Led::Four => (128, 128, 128),
        }
    }
}

/// Fan speed in percent, restricted to multiples of [`FanSpeed::STEP`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FanSpeed(u8);

impl FanSpeed {
    pub const STEP: u8 = 20;
    pub const OFF: FanSpeed = FanSpeed(0);
    pub const MAX: FanSpeed = FanSpeed(100);

    /// Clamp to 0..=100 and round to the nearest step.
    pub fn nearest(raw: i32) -> Self {
        let clamped = raw.clamp(0, i32::from(Self::MAX.0));
        let step = i32::from(Self::STEP);
        let rounded = (clamped + step / 2) / step * step;
        Self(rounded.min(i32::from(Self::MAX.0)) as u8)
    }

    pub fn step_up(self) -> Self {
        Self(self.0.saturating_add(Self::STEP).min(Self::MAX.0))
    }

    pub fn step_down(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP))
    }

    pub const fn percent(self) -> u8 {
        self.0
    }

    /// 8-bit PWM duty proportional to the speed.
    pub const fn duty(self) -> u8 {
        (self.0 as u16 * 255 / 100) as u8
    }

    pub const fn is_running(self) -> bool {
        self.0 > 0
    }
}

// ── Shared actuator record ────────────────────────────────────

/// Last commanded actuator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub door_open: bool,
    pub leds: [bool; 4],
    pub fan: FanSpeed,
}

impl ActuatorState {
    pub fn led(&self, led: Led) -> bool {
        self.leds[led.index()]
    }
}

struct Inner<H> {
    state: ActuatorState,
    hw: H,
}

/// Owner of the actuator record and the hardware port.
pub struct ActuatorDispatch<H> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<H>>>,
}

impl<H: ActuatorPort> ActuatorDispatch<H> {
    /// Take ownership of the hardware and drive every output to its idle
    /// level (door closed, LEDs off, fan stopped).
    pub fn new(mut hw: H) -> Self {
        if let Err(e) = hw.write_door(false) {
            warn!("Dispatch: initial door close failed: {}", e);
        }
        for led in Led::ALL {
            if let Err(e) = hw.write_led(led, false) {
                warn!("Dispatch: initial LED{} off failed: {}", led.number(), e);
            }
        }
        if let Err(e) = hw.write_fan(FanSpeed::OFF) {
            warn!("Dispatch: initial fan stop failed: {}", e);
        }

        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: ActuatorState::default(),
                hw,
            })),
        }
    }

    /// Run `f` with exclusive access to the record and the hardware.
    ///
    /// Must not be re-entered from inside `f`.
    pub fn transact<R>(
        &self,
        notices: &NoticeBoard,
        f: impl FnOnce(&mut Dispatcher<'_, H>) -> R,
    ) -> R {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            let Inner { state, hw } = &mut *inner;
            let mut d = Dispatcher { state, hw, notices };
            f(&mut d)
        })
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> ActuatorState {
        self.inner.lock(|cell| cell.borrow().state)
    }

    /// Inspect the hardware port (test and diagnostics use).
    pub fn with_hardware<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow().hw))
    }
}

/// Handle passed into [`ActuatorDispatch::transact`].
pub struct Dispatcher<'a, H> {
    state: &'a mut ActuatorState,
    hw: &'a mut H,
    notices: &'a NoticeBoard,
}

impl<H: ActuatorPort> Dispatcher<'_, H> {
    pub fn state(&self) -> ActuatorState {
        *self.state
    }

    /// Drive the latch and record the new position. Raises a door notice.
    pub fn set_door(&mut self, open: bool) {
        if let Err(e) = self.hw.write_door(open) {
            warn!("Dispatch: door write failed: {}", e);
        }
        self.state.door_open = open;
        self.notices.raise(Notice::Door);
        debug!("Dispatch: door {}", if open { "open" } else { "closed" });
    }

    pub fn set_led(&mut self, led: Led, on: bool) {
        if let Err(e) = self.hw.write_led(led, on) {
            warn!("Dispatch: LED{} write failed: {}", led.number(), e);
        }
        self.state.leds[led.index()] = on;
        debug!("Dispatch: LED{} {}", led.number(), if on { "on" } else { "off" });
    }

    pub fn set_fan(&mut self, speed: FanSpeed) {
        if let Err(e) = self.hw.write_fan(speed) {
            warn!("Dispatch: fan write failed: {}", e);
        }
        self.state.fan = speed;
        debug!("Dispatch: fan {}%", speed.percent());
    }

    /// Clamp an arbitrary request to a valid step, apply it and return it.
    pub fn set_fan_percent(&mut self, raw: i32) -> FanSpeed {
        let speed = FanSpeed::nearest(raw);
        self.set_fan(speed);
        speed
    }

    pub fn notice_pending(&self, notice: Notice) -> bool {
        self.notices.is_pending(notice)
    }

    /// Drop a pending notice raised earlier in this transaction.
    pub fn dismiss(&mut self, notice: Notice) {
        let _ = self.notices.take(notice);
    }
}
