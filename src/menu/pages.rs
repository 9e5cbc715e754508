//! Page handlers, layouts and the table builder.
//!
//! ```text
//!  MAIN ──[any edge]──▶ LED 1/2 ──[Change]──▶ LED 3/4 ──[Change]──▶ FAN
//!   ▲                      │                     │                   │
//!   │                   [timeout]             [timeout]          [Change]
//!   │                      ▼                     ▼                   ▼
//!   └────────────────── MAIN ◀──[Change / timeout]────────────────  DOOR
//!
//!  any page ──[pending notice]──▶ NOTICE DOOR | NOTICE DETECT ──[timeout]──▶ MAIN
//! ```

use super::render::{Frame, RenderView};
use super::{Effect, FanStep, MenuState, MenuTiming, Page, PageDescriptor, Step};
use crate::app::dispatch::Led;
use crate::drivers::button::{ButtonEdge, ButtonId, EdgeKind};

/// Column of the `<-` row marker.
const CURSOR_COL: usize = 14;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the page table. Indexed by `Page as usize`.
pub fn build_page_table() -> [PageDescriptor; Page::COUNT] {
    [
        PageDescriptor {
            page: Page::Main,
            name: "Main",
            on_event: Some(main_event),
            on_timeout: main_timeout,
            render: main_render,
        },
        PageDescriptor {
            page: Page::LedPage12,
            name: "LED 1/2",
            on_event: Some(led12_event),
            on_timeout: back_to_main,
            render: led12_render,
        },
        PageDescriptor {
            page: Page::LedPage34,
            name: "LED 3/4",
            on_event: Some(led34_event),
            on_timeout: back_to_main,
            render: led34_render,
        },
        PageDescriptor {
            page: Page::FanPage,
            name: "Fan",
            on_event: Some(fan_event),
            on_timeout: back_to_main,
            render: fan_render,
        },
        PageDescriptor {
            page: Page::DoorPage,
            name: "Door",
            on_event: Some(door_event),
            on_timeout: back_to_main,
            render: door_render,
        },
        PageDescriptor {
            page: Page::NoticeDoor,
            name: "Door notice",
            on_event: None,
            on_timeout: back_to_main,
            render: notice_door_render,
        },
        PageDescriptor {
            page: Page::NoticeDetect,
            name: "Detect notice",
            on_event: None,
            on_timeout: back_to_main,
            render: notice_detect_render,
        },
    ]
}

fn back_to_main(_menu: &mut MenuState, _timing: &MenuTiming) -> Option<Page> {
    Some(Page::Main)
}

fn on_off(on: bool) -> &'static str {
    if on { "<ON>" } else { "<OFF>" }
}

fn cursor(menu: &MenuState, frame: &mut Frame) {
    frame.put(CURSOR_COL, usize::from(menu.cursor_row), "<-");
}

// ═══════════════════════════════════════════════════════════════════════════
//  MAIN
// ═══════════════════════════════════════════════════════════════════════════

fn main_event(_menu: &mut MenuState, _edge: ButtonEdge) -> Step {
    Step::goto(Page::LedPage12)
}

/// Idle countdown drives the clock separator blink.
fn main_timeout(menu: &mut MenuState, timing: &MenuTiming) -> Option<Page> {
    menu.blink = !menu.blink;
    menu.countdown = timing.blink_ticks;
    None
}

fn main_render(menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    let s = view.sensors;
    frame.put_fmt(0, 0, format_args!("T:{:.1}", s.temperature_c));
    frame.put_fmt(6, 0, format_args!(" H:{}", s.humidity));
    frame.put_fmt(11, 0, format_args!(" L:{}", s.light));

    let c = view.calendar;
    frame.put_fmt(0, 1, format_args!("{}/{}/{}", c.day(), c.month(), c.year()));
    let sep = if menu.blink { ':' } else { ' ' };
    frame.put_fmt(11, 1, format_args!("{:02}{}{:02}", c.hour(), sep, c.minute()));
}

// ═══════════════════════════════════════════════════════════════════════════
//  LED pages
// ═══════════════════════════════════════════════════════════════════════════

fn led_event(menu: &mut MenuState, edge: ButtonEdge, pair: [Led; 2], next: Page) -> Step {
    if edge.kind != EdgeKind::Pressed {
        return Step::stay();
    }
    match edge.button {
        ButtonId::Up => {
            menu.cursor_row = 0;
            Step::stay()
        }
        ButtonId::Down => {
            menu.cursor_row = 1;
            Step::stay()
        }
        ButtonId::Ok => Step::effect(Effect::ToggleLed(pair[usize::from(menu.cursor_row.min(1))])),
        ButtonId::Change => Step::goto(next),
    }
}

fn led12_event(menu: &mut MenuState, edge: ButtonEdge) -> Step {
    led_event(menu, edge, [Led::One, Led::Two], Page::LedPage34)
}

fn led34_event(menu: &mut MenuState, edge: ButtonEdge) -> Step {
    led_event(menu, edge, [Led::Three, Led::Four], Page::FanPage)
}

fn led_render(menu: &MenuState, view: &RenderView, frame: &mut Frame, pair: [Led; 2]) {
    for (row, led) in pair.into_iter().enumerate() {
        frame.put_fmt(
            0,
            row,
            format_args!("LED{}: {}", led.number(), on_off(view.actuators.led(led))),
        );
    }
    cursor(menu, frame);
}

fn led12_render(menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    led_render(menu, view, frame, [Led::One, Led::Two]);
}

fn led34_render(menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    led_render(menu, view, frame, [Led::Three, Led::Four]);
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAN
// ═══════════════════════════════════════════════════════════════════════════

fn fan_event(_menu: &mut MenuState, edge: ButtonEdge) -> Step {
    if edge.kind != EdgeKind::Pressed {
        return Step::stay();
    }
    match edge.button {
        ButtonId::Up => Step::effect(Effect::Fan(FanStep::Up)),
        ButtonId::Down => Step::effect(Effect::Fan(FanStep::Down)),
        ButtonId::Ok => Step::stay(),
        ButtonId::Change => Step::goto(Page::DoorPage),
    }
}

fn fan_render(_menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    frame.put_fmt(0, 0, format_args!("FAN SPEED: <{}>", view.actuators.fan.percent()));
    frame.put(0, 1, "UP=BT1 DOWN=BT2");
}

// ═══════════════════════════════════════════════════════════════════════════
//  DOOR
// ═══════════════════════════════════════════════════════════════════════════

fn door_event(_menu: &mut MenuState, edge: ButtonEdge) -> Step {
    if edge.kind != EdgeKind::Pressed {
        return Step::stay();
    }
    match edge.button {
        ButtonId::Ok => Step::effect(Effect::ToggleDoor),
        ButtonId::Change => Step::goto(Page::Main),
        ButtonId::Up | ButtonId::Down => Step::stay(),
    }
}

fn door_render(menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    let label = if view.actuators.door_open { "<OPEN>" } else { "<CLOSE>" };
    frame.put_fmt(0, 0, format_args!("DOOR: {}", label));
    cursor(menu, frame);
}

// ═══════════════════════════════════════════════════════════════════════════
//  Notices
// ═══════════════════════════════════════════════════════════════════════════

fn notice_door_render(_menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    let text = if view.actuators.door_open { "DOOR IS OPENED" } else { "DOOR IS CLOSED" };
    frame.put(0, 1, text);
}

fn notice_detect_render(_menu: &MenuState, view: &RenderView, frame: &mut Frame) {
    let text = if view.detected { "HUMAN DETECTED" } else { "HUMAN NOT DETECTED" };
    frame.put(0, 0, text);
}
