//! Polled, debounced button driver with press and long-press edges.
//!
//! ## Hardware
//!
//! Four active-low momentary switches (Up, Down, Ok, Change) on pulled-up
//! inputs. The poller runs every `button_poll_ms` and feeds one raw sample
//! per button into a [`Debouncer`].
//!
//! ## Edge detection
//!
//! | Edge        | Condition                                    | Kind          |
//! |-------------|----------------------------------------------|---------------|
//! | Press       | Three consecutive pressed samples            | `Pressed`     |
//! | Long press  | Still held after `long_press_ms`             | `LongPressed` |
//!
//! Each edge is emitted once per physical hold. Edges are latched into an
//! [`InputLatch`] and consumed by the menu on its own tick.

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;
use log::debug;

use crate::app::ports::ButtonLines;

/// Samples that must agree before the stable level changes.
const FILTER_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonId {
    Up = 0,
    Down = 1,
    Ok = 2,
    Change = 3,
}

impl ButtonId {
    /// Processing order when several edges are pending.
    pub const ALL: [ButtonId; 4] = [ButtonId::Up, ButtonId::Down, ButtonId::Ok, ButtonId::Change];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Pressed,
    LongPressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonEdge {
    pub button: ButtonId,
    pub kind: EdgeKind,
}

impl ButtonEdge {
    pub const fn pressed(button: ButtonId) -> Self {
        Self {
            button,
            kind: EdgeKind::Pressed,
        }
    }

    pub const fn long(button: ButtonId) -> Self {
        Self {
            button,
            kind: EdgeKind::LongPressed,
        }
    }
}

// ── Debouncer ─────────────────────────────────────────────────

/// Per-button filter and hold counter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    history: [bool; FILTER_DEPTH],
    stable: bool,
    held_polls: u32,
    long_press_polls: u32,
    long_reported: bool,
}

impl Debouncer {
    pub fn new(long_press_polls: u32) -> Self {
        Self {
            history: [false; FILTER_DEPTH],
            stable: false,
            held_polls: 0,
            long_press_polls: long_press_polls.max(1),
            long_reported: false,
        }
    }

    /// Feed one raw sample (`true` = pressed). Returns an edge, if any.
    pub fn sample(&mut self, pressed: bool) -> Option<EdgeKind> {
        self.history.rotate_left(1);
        self.history[FILTER_DEPTH - 1] = pressed;

        let settled = self.history.iter().all(|&s| s == pressed);
        if settled && pressed != self.stable {
            self.stable = pressed;
            self.held_polls = 0;
            self.long_reported = false;
            return pressed.then_some(EdgeKind::Pressed);
        }

        if self.stable {
            self.held_polls = self.held_polls.saturating_add(1);
            if !self.long_reported && self.held_polls >= self.long_press_polls {
                self.long_reported = true;
                return Some(EdgeKind::LongPressed);
            }
        }
        None
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

// ── Input latch ───────────────────────────────────────────────

const LATCH_SLOTS: usize = ButtonId::ALL.len() * 2;

/// Lock-free edge flags, written by the poller and drained by the menu.
pub struct InputLatch {
    flags: [AtomicBool; LATCH_SLOTS],
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl InputLatch {
    pub const fn new() -> Self {
        Self {
            flags: [const { AtomicBool::new(false) }; LATCH_SLOTS],
        }
    }

    fn slot(edge: ButtonEdge) -> usize {
        let kind = match edge.kind {
            EdgeKind::Pressed => 0,
            EdgeKind::LongPressed => 1,
        };
        kind * ButtonId::ALL.len() + edge.button.index()
    }

    pub fn latch(&self, edge: ButtonEdge) {
        self.flags[Self::slot(edge)].store(true, Ordering::Release);
    }

    /// Consume one edge. Returns whether it was pending.
    pub fn take(&self, edge: ButtonEdge) -> bool {
        self.flags[Self::slot(edge)].swap(false, Ordering::AcqRel)
    }

    /// Consume every pending edge: short presses in button order first,
    /// then long presses in button order.
    pub fn drain(&self) -> Vec<ButtonEdge, LATCH_SLOTS> {
        let mut out = Vec::new();
        let ordered = ButtonId::ALL
            .into_iter()
            .map(ButtonEdge::pressed)
            .chain(ButtonId::ALL.into_iter().map(ButtonEdge::long));
        for edge in ordered {
            if self.take(edge) {
                // Capacity equals the number of distinct edges.
                let _ = out.push(edge);
            }
        }
        out
    }

    pub fn clear(&self) {
        for flag in &self.flags {
            flag.store(false, Ordering::Release);
        }
    }
}

// ── Poller ────────────────────────────────────────────────────

/// Owns the raw lines and one debouncer per button.
pub struct ButtonPoller<B> {
    lines: B,
    debouncers: [Debouncer; 4],
}

impl<B: ButtonLines> ButtonPoller<B> {
    pub fn new(lines: B, long_press_polls: u32) -> Self {
        Self {
            lines,
            debouncers: core::array::from_fn(|_| Debouncer::new(long_press_polls)),
        }
    }

    /// Sample every line once and latch any resulting edges.
    pub fn poll(&mut self, latch: &InputLatch) {
        for button in ButtonId::ALL {
            let raw = self.lines.is_pressed(button);
            if let Some(kind) = self.debouncers[button.index()].sample(raw) {
                debug!("Button {:?}: {:?}", button, kind);
                latch.latch(ButtonEdge { button, kind });
            }
        }
    }

    pub fn lines_mut(&mut self) -> &mut B {
        &mut self.lines
    }
}

// ── Line adapters ─────────────────────────────────────────────

/// Buttons read straight from the GPIO input registers.
pub struct GpioButtons;

impl GpioButtons {
    const PINS: [i32; 4] = [
        crate::pins::BUTTON_UP_GPIO,
        crate::pins::BUTTON_DOWN_GPIO,
        crate::pins::BUTTON_OK_GPIO,
        crate::pins::BUTTON_CHANGE_GPIO,
    ];
}

impl ButtonLines for GpioButtons {
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        !crate::drivers::hw_init::gpio_read(Self::PINS[button.index()])
    }
}

/// In-memory lines for host simulation. `true` = held down.
#[derive(Debug, Default, Clone)]
pub struct SimButtons {
    held: [bool; 4],
}

impl SimButtons {
    pub fn set(&mut self, button: ButtonId, held: bool) {
        self.held[button.index()] = held;
    }
}

impl ButtonLines for SimButtons {
    fn is_pressed(&mut self, button: ButtonId) -> bool {
        self.held[button.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(d: &mut Debouncer, samples: &[bool]) -> std::vec::Vec<EdgeKind> {
        samples.iter().filter_map(|&s| d.sample(s)).collect()
    }

    #[test]
    fn no_events_without_press() {
        let mut d = Debouncer::new(50);
        assert!(feed(&mut d, &[false; 20]).is_empty());
    }

    #[test]
    fn debounce_filters_rapid_noise() {
        let mut d = Debouncer::new(50);
        let edges = feed(&mut d, &[true, false, true, true, false, true, false]);
        assert!(edges.is_empty());
        assert!(!d.is_pressed());
    }

    #[test]
    fn held_press_yields_one_edge() {
        let mut d = Debouncer::new(1000);
        let edges = feed(&mut d, &[true; 200]);
        assert_eq!(edges, vec![EdgeKind::Pressed]);
    }

    #[test]
    fn long_press_detected_once() {
        let mut d = Debouncer::new(5);
        let edges = feed(&mut d, &[true; 40]);
        assert_eq!(edges, vec![EdgeKind::Pressed, EdgeKind::LongPressed]);
    }

    #[test]
    fn release_rearms_the_edge() {
        let mut d = Debouncer::new(100);
        let mut edges = feed(&mut d, &[true; 5]);
        edges.extend(feed(&mut d, &[false; 5]));
        edges.extend(feed(&mut d, &[true; 5]));
        assert_eq!(edges, vec![EdgeKind::Pressed, EdgeKind::Pressed]);
    }

    #[test]
    fn latch_drains_in_fixed_order() {
        let latch = InputLatch::new();
        latch.latch(ButtonEdge::long(ButtonId::Up));
        latch.latch(ButtonEdge::pressed(ButtonId::Change));
        latch.latch(ButtonEdge::pressed(ButtonId::Up));
        latch.latch(ButtonEdge::pressed(ButtonId::Ok));

        let edges = latch.drain();
        assert_eq!(
            edges.as_slice(),
            &[
                ButtonEdge::pressed(ButtonId::Up),
                ButtonEdge::pressed(ButtonId::Ok),
                ButtonEdge::pressed(ButtonId::Change),
                ButtonEdge::long(ButtonId::Up),
            ]
        );
        assert!(latch.drain().is_empty());
    }

    #[test]
    fn poller_latches_edges() {
        let latch = InputLatch::new();
        let mut poller = ButtonPoller::new(SimButtons::default(), 50);
        poller.lines_mut().set(ButtonId::Down, true);
        for _ in 0..10 {
            poller.poll(&latch);
        }
        assert!(latch.take(ButtonEdge::pressed(ButtonId::Down)));
        assert!(!latch.take(ButtonEdge::pressed(ButtonId::Down)));
        assert!(!latch.take(ButtonEdge::pressed(ButtonId::Up)));
    }
}
