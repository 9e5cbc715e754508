//! Paged menu controller.
//!
//! Function-pointer page table in the classic embedded style:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PageTable                                                   │
//! │  ┌──────────────┬──────────────┬──────────────┬───────────┐  │
//! │  │ Page         │ on_event     │ on_timeout   │ render    │  │
//! │  ├──────────────┼──────────────┼──────────────┼───────────┤  │
//! │  │ Main         │ fn -> Step   │ fn -> Option │ fn(frame) │  │
//! │  │ LedPage12    │ fn -> Step   │ fn -> Option │ fn(frame) │  │
//! │  │ ...          │              │              │           │  │
//! │  │ NoticeDetect │ None         │ fn -> Option │ fn(frame) │  │
//! │  └──────────────┴──────────────┴──────────────┴───────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers are pure: they mutate only [`MenuState`] and return a [`Step`]
//! naming the next page and/or an actuator [`Effect`]. The controller owns
//! the side effects (dispatch, publish, display).
//!
//! One [`MenuController::tick`] per render period:
//!
//! 1. Welcome splash while it lasts.
//! 2. Pending notice → notice page; this tick's button edges are dropped.
//! 3. Otherwise each latched edge goes to the current page's `on_event`.
//! 4. Countdown at zero → `on_timeout`.
//! 5. Render (clearing first after a page change).
//! 6. Countdown decrements once if non-zero.

pub mod pages;
pub mod render;

use log::{debug, info, warn};

use crate::app::commands::{Feed, OutboundValue};
use crate::app::dispatch::Led;
use crate::app::ports::{ActuatorPort, DisplayPort, Publisher};
use crate::config::NodeConfig;
use crate::drivers::button::{ButtonEdge, EdgeKind};
use crate::state::{NodeState, Notice};
use render::{Frame, RenderView};

// ---------------------------------------------------------------------------
// Page identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Page {
    #[default]
    Main = 0,
    LedPage12 = 1,
    LedPage34 = 2,
    FanPage = 3,
    DoorPage = 4,
    NoticeDoor = 5,
    NoticeDetect = 6,
}

impl Page {
    pub const COUNT: usize = 7;

    /// Settings pages time out back to `Main` after inactivity.
    pub fn is_settings(self) -> bool {
        matches!(
            self,
            Self::LedPage12 | Self::LedPage34 | Self::FanPage | Self::DoorPage
        )
    }

    pub fn is_notice(self) -> bool {
        matches!(self, Self::NoticeDoor | Self::NoticeDetect)
    }
}

// ---------------------------------------------------------------------------
// State, timing, handler results
// ---------------------------------------------------------------------------

/// Menu-private state. Never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub page: Page,
    /// Selected row on two-item pages (0 or 1).
    pub cursor_row: u8,
    pub countdown: u8,
    /// Clock separator visible.
    pub blink: bool,
}

/// Countdown reload values, in render ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTiming {
    pub page_timeout: u8,
    pub notice: u8,
    pub blink_ticks: u8,
}

impl MenuTiming {
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            page_timeout: config.page_timeout_ticks,
            notice: config.notice_ticks,
            blink_ticks: config.blink_ticks,
        }
    }

    /// Countdown loaded on entering `page`.
    pub fn entry_countdown(&self, page: Page) -> u8 {
        if page.is_settings() {
            self.page_timeout
        } else if page.is_notice() {
            self.notice
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanStep {
    Up,
    Down,
}

/// Actuator change requested by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ToggleLed(Led),
    Fan(FanStep),
    ToggleDoor,
}

/// Result of one `on_event` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    pub next: Option<Page>,
    pub effect: Option<Effect>,
}

impl Step {
    pub const fn stay() -> Self {
        Self {
            next: None,
            effect: None,
        }
    }

    pub const fn goto(page: Page) -> Self {
        Self {
            next: Some(page),
            effect: None,
        }
    }

    pub const fn effect(effect: Effect) -> Self {
        Self {
            next: None,
            effect: Some(effect),
        }
    }
}

pub type EventFn = fn(&mut MenuState, ButtonEdge) -> Step;
pub type TimeoutFn = fn(&mut MenuState, &MenuTiming) -> Option<Page>;
pub type RenderFn = fn(&MenuState, &RenderView, &mut Frame);

/// One row of the page table. Notice pages take no input.
pub struct PageDescriptor {
    pub page: Page,
    pub name: &'static str,
    pub on_event: Option<EventFn>,
    pub on_timeout: TimeoutFn,
    pub render: RenderFn,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct MenuController {
    table: [PageDescriptor; Page::COUNT],
    menu: MenuState,
    timing: MenuTiming,
    splash_remaining: u32,
    splash_drawn: bool,
    needs_clear: bool,
    frame: Frame,
}

impl MenuController {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            table: pages::build_page_table(),
            menu: MenuState::default(),
            timing: MenuTiming::from_config(config),
            splash_remaining: config.splash_ticks(),
            splash_drawn: false,
            needs_clear: true,
            frame: Frame::blank(),
        }
    }

    pub fn page(&self) -> Page {
        self.menu.page
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu
    }

    /// Last frame sent to the display.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn in_splash(&self) -> bool {
        self.splash_remaining > 0
    }

    /// Evaluate one render tick.
    pub fn tick<H, D, P>(&mut self, state: &NodeState<H>, display: &mut D, publisher: &mut P)
    where
        H: ActuatorPort,
        D: DisplayPort,
        P: Publisher,
    {
        if self.splash_remaining > 0 {
            self.splash(state, display);
            return;
        }

        if !self.apply_notices(state) {
            for edge in state.input().drain() {
                self.handle_edge(state, publisher, edge);
            }
        }

        if self.menu.countdown == 0 {
            let on_timeout = self.table[self.menu.page as usize].on_timeout;
            if let Some(next) = on_timeout(&mut self.menu, &self.timing) {
                self.enter(next);
            }
        }

        let view = RenderView {
            sensors: state.sensors(),
            calendar: state.calendar(),
            actuators: state.actuators(),
            detected: state.notices().detected(),
        };
        let mut frame = Frame::blank();
        (self.table[self.menu.page as usize].render)(&self.menu, &view, &mut frame);
        if self.needs_clear {
            display.clear();
            self.needs_clear = false;
        }
        display.draw(&frame);
        self.frame = frame;

        self.menu.countdown = self.menu.countdown.saturating_sub(1);
    }

    fn splash<H, D: DisplayPort>(&mut self, state: &NodeState<H>, display: &mut D) {
        if !self.splash_drawn {
            let mut frame = Frame::blank();
            frame.put(0, 0, "WELCOME TO");
            frame.put(0, 1, "OUR SMART HOME");
            display.clear();
            display.draw(&frame);
            self.frame = frame;
            self.splash_drawn = true;
        }
        state.input().clear();
        self.splash_remaining -= 1;
        if self.splash_remaining == 0 {
            debug!("Menu: splash done");
            self.needs_clear = true;
        }
    }

    /// Detect wins when both are pending. Returns true if a notice page
    /// was entered.
    fn apply_notices<H>(&mut self, state: &NodeState<H>) -> bool {
        let notices = state.notices();
        let door = notices.take(Notice::Door);
        let detect = notices.take(Notice::Detect);
        let target = match (detect, door) {
            (true, _) => Page::NoticeDetect,
            (false, true) => Page::NoticeDoor,
            (false, false) => return false,
        };
        if detect && door {
            debug!("Menu: door notice superseded by detection");
        }
        state.input().clear();
        self.enter(target);
        true
    }

    fn handle_edge<H: ActuatorPort, P: Publisher>(
        &mut self,
        state: &NodeState<H>,
        publisher: &mut P,
        edge: ButtonEdge,
    ) {
        let page = self.menu.page;
        let Some(on_event) = self.table[page as usize].on_event else {
            return;
        };
        // Long presses only navigate away from the main page.
        if edge.kind == EdgeKind::LongPressed && page != Page::Main {
            return;
        }
        if page.is_settings() {
            self.menu.countdown = self.timing.page_timeout;
        }

        let step = on_event(&mut self.menu, edge);
        if let Some(effect) = step.effect {
            run_effect(state, publisher, effect);
        }
        if let Some(next) = step.next {
            self.enter(next);
        }
    }

    fn enter(&mut self, next: Page) {
        info!(
            "Menu: {} -> {}",
            self.table[self.menu.page as usize].name,
            self.table[next as usize].name
        );
        self.menu.page = next;
        self.menu.cursor_row = 0;
        self.menu.countdown = self.timing.entry_countdown(next);
        self.needs_clear = true;
    }
}

/// Apply a page effect through dispatch and publish the result inside the
/// same actuator section.
fn run_effect<H: ActuatorPort, P: Publisher>(
    state: &NodeState<H>,
    publisher: &mut P,
    effect: Effect,
) {
    state.transact(|d| {
        let (feed, value) = match effect {
            Effect::ToggleLed(led) => {
                let on = !d.state().led(led);
                d.set_led(led, on);
                (Feed::Led(led), OutboundValue::Flag(on))
            }
            Effect::Fan(step) => {
                let current = d.state().fan;
                let speed = match step {
                    FanStep::Up => current.step_up(),
                    FanStep::Down => current.step_down(),
                };
                d.set_fan(speed);
                (Feed::Fan, OutboundValue::Level(speed.percent()))
            }
            Effect::ToggleDoor => {
                let open = !d.state().door_open;
                let pending = d.notice_pending(Notice::Door);
                d.set_door(open);
                // Local toggles stay on the door page; a notice raised
                // elsewhere before this one is kept.
                if !pending {
                    d.dismiss(Notice::Door);
                }
                (Feed::Door, OutboundValue::Flag(open))
            }
        };
        debug!("Menu: {:?} -> {} = {:?}", effect, feed.key(), value);
        if let Err(e) = publisher.publish(feed, value) {
            warn!("Menu: publish to {} failed: {}", feed.key(), e);
        }
    });
}
