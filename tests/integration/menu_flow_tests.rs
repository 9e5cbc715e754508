//! Menu navigation flows driven through the controller against mock
//! adapters.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use homenode::app::commands::{Feed, InboundCommand, OutboundValue};
use homenode::app::dispatch::{FanSpeed, Led};
use homenode::app::ports::Publisher;
use homenode::app::reconciler;
use homenode::error::PublishError;
use homenode::clock::CalendarTime;
use homenode::config::NodeConfig;
use homenode::drivers::button::{ButtonEdge, ButtonId};
use homenode::menu::{MenuController, Page};
use homenode::state::NodeState;

use super::mock_hw::{
    ActuatorCall, MockHardware, RecordingDisplay, RecordingPublisher, booted, no_splash,
    writes_since_boot,
};

struct Panel {
    state: NodeState<MockHardware>,
    menu: MenuController,
    display: RecordingDisplay,
    out: RecordingPublisher,
}

impl Panel {
    fn new(config: &NodeConfig) -> Self {
        let start = CalendarTime::new(2024, 3, 9, 7, 5, 0).unwrap();
        Self {
            state: booted(start),
            menu: MenuController::new(config),
            display: RecordingDisplay::default(),
            out: RecordingPublisher::new(),
        }
    }

    fn tick(&mut self) {
        self.menu.tick(&self.state, &mut self.display, &mut self.out);
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    fn press(&mut self, button: ButtonId) {
        self.state.input().latch(ButtonEdge::pressed(button));
        self.tick();
    }

    fn rows(&self) -> (String, String) {
        self.display.last_rows()
    }
}

#[test]
fn main_page_shows_readings_and_time() {
    let mut p = Panel::new(&no_splash());
    p.state.update_sensors(|s| {
        s.temperature_c = 23.4;
        s.humidity = 61;
        s.light = 7;
    });
    p.tick();
    let (top, bottom) = p.rows();
    assert_eq!(top, "T:23.4 H:61 L:7 ");
    assert!(bottom.starts_with("9/3/2024"));
    assert_eq!(&bottom[11..16], "07:05");
}

#[test]
fn splash_swallows_buttons_then_main_appears() {
    let config = NodeConfig {
        splash_ms: 1000,
        ..NodeConfig::default()
    };
    let mut p = Panel::new(&config);
    for _ in 0..config.splash_ticks() {
        p.press(ButtonId::Ok);
    }
    assert_eq!(p.rows().0, "WELCOME TO      ");
    assert_eq!(p.display.frames.len(), 1, "splash drawn once");

    p.tick();
    assert_eq!(p.menu.page(), Page::Main);
    assert_eq!(p.display.clears, 2);
    assert!(writes_since_boot(&p.state).is_empty());
}

#[test]
fn settings_cycle_returns_to_main() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    let expected = [
        Page::LedPage12,
        Page::LedPage34,
        Page::FanPage,
        Page::DoorPage,
        Page::Main,
    ];
    for page in expected {
        p.press(ButtonId::Change);
        assert_eq!(p.menu.page(), page);
    }
}

#[test]
fn long_press_from_main_opens_settings_once() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.state.input().latch(ButtonEdge::long(ButtonId::Ok));
    p.tick();
    assert_eq!(p.menu.page(), Page::LedPage12);

    // Ignored once inside the settings pages.
    p.state.input().latch(ButtonEdge::long(ButtonId::Change));
    p.tick();
    assert_eq!(p.menu.page(), Page::LedPage12);
}

#[test]
fn idle_settings_page_times_out() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.press(ButtonId::Up);
    assert_eq!(p.menu.page(), Page::LedPage12);

    p.ticks(74);
    assert_eq!(p.menu.page(), Page::LedPage12);
    p.tick();
    assert_eq!(p.menu.page(), Page::Main);
}

#[test]
fn timeout_resets_the_cursor() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.press(ButtonId::Up);
    p.press(ButtonId::Down);
    assert_eq!(p.menu.menu_state().cursor_row, 1);

    p.ticks(74);
    assert_eq!(p.menu.page(), Page::LedPage12);
    p.tick();
    assert_eq!(p.menu.page(), Page::Main);
    assert_eq!(p.menu.menu_state().cursor_row, 0);
}

#[test]
fn activity_restarts_the_timeout() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.press(ButtonId::Up);
    p.ticks(60);
    p.press(ButtonId::Down);
    p.ticks(60);
    assert_eq!(p.menu.page(), Page::LedPage12);
    p.ticks(15);
    assert_eq!(p.menu.page(), Page::Main);
}

#[test]
fn led_pages_toggle_the_selected_row() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.press(ButtonId::Change); // LED1/2
    p.press(ButtonId::Change); // LED3/4
    p.press(ButtonId::Down);
    p.press(ButtonId::Ok);

    assert!(p.state.actuators().led(Led::Four));
    assert!(!p.state.actuators().led(Led::Three));
    assert_eq!(p.rows(), ("LED3: <OFF>     ".into(), "LED4: <ON>    <-".into()));
    assert_eq!(
        p.out.sent,
        vec![(Feed::Led(Led::Four), OutboundValue::Flag(true))]
    );

    p.press(ButtonId::Ok);
    assert!(!p.state.actuators().led(Led::Four));
    assert_eq!(
        writes_since_boot(&p.state),
        vec![
            ActuatorCall::Led(Led::Four, true),
            ActuatorCall::Led(Led::Four, false),
        ]
    );
}

#[test]
fn fan_page_steps_and_clamps() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    for _ in 0..3 {
        p.press(ButtonId::Change);
    }
    assert_eq!(p.menu.page(), Page::FanPage);

    p.press(ButtonId::Down);
    assert_eq!(p.state.actuators().fan, FanSpeed::OFF);
    for _ in 0..6 {
        p.press(ButtonId::Up);
    }
    assert_eq!(p.state.actuators().fan, FanSpeed::MAX);
    assert_eq!(p.rows().0, "FAN SPEED: <100>");

    let levels: Vec<OutboundValue> = p.out.for_feed(Feed::Fan);
    assert_eq!(levels.first(), Some(&OutboundValue::Level(0)));
    assert_eq!(levels.last(), Some(&OutboundValue::Level(100)));
    assert_eq!(levels.len(), 7);
}

#[test]
fn door_page_toggles_without_a_notice() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    for _ in 0..4 {
        p.press(ButtonId::Change);
    }
    assert_eq!(p.menu.page(), Page::DoorPage);

    p.press(ButtonId::Ok);
    p.tick();
    assert_eq!(p.menu.page(), Page::DoorPage);
    assert!(p.state.actuators().door_open);
    assert_eq!(p.out.for_feed(Feed::Door), vec![OutboundValue::Flag(true)]);
}

#[test]
fn remote_door_change_overlays_and_expires() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.press(ButtonId::Change);
    assert_eq!(p.menu.page(), Page::LedPage12);

    p.state.transact(|d| d.set_door(false));
    p.tick();
    assert_eq!(p.menu.page(), Page::NoticeDoor);
    assert_eq!(p.rows().1, "DOOR IS CLOSED  ");

    p.ticks(24);
    assert_eq!(p.menu.page(), Page::NoticeDoor);
    p.tick();
    assert_eq!(p.menu.page(), Page::Main);
}

#[test]
fn detection_overlay_reports_result() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.state.notices().report_detection(true);
    p.tick();
    assert_eq!(p.menu.page(), Page::NoticeDetect);
    assert_eq!(p.rows().0, "HUMAN DETECTED  ");

    // A fresh notice restarts the overlay.
    p.ticks(20);
    p.state.notices().report_detection(false);
    p.tick();
    assert_eq!(p.rows().0, "HUMAN NOT DETECT");
    p.ticks(24);
    assert_eq!(p.menu.page(), Page::NoticeDetect);
}

/// Signals when a publish starts and holds it open for a while.
struct SlowPublisher {
    started: mpsc::Sender<()>,
    log: Arc<Mutex<Vec<&'static str>>>,
    sent: Vec<(Feed, OutboundValue)>,
}

impl Publisher for SlowPublisher {
    fn publish(&mut self, feed: Feed, value: OutboundValue) -> Result<(), PublishError> {
        let _ = self.started.send(());
        thread::sleep(Duration::from_millis(50));
        self.log.lock().unwrap().push("menu published");
        self.sent.push((feed, value));
        Ok(())
    }
}

#[test]
fn remote_command_waits_for_menu_publish() {
    let mut p = Panel::new(&no_splash());
    p.tick();
    p.press(ButtonId::Up);
    assert_eq!(p.menu.page(), Page::LedPage12);

    let (started, wait) = mpsc::channel();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut slow = SlowPublisher {
        started,
        log: Arc::clone(&log),
        sent: Vec::new(),
    };
    let state = &p.state;

    thread::scope(|scope| {
        let remote_log = Arc::clone(&log);
        scope.spawn(move || {
            wait.recv_timeout(Duration::from_secs(5)).unwrap();
            let command = InboundCommand::Led {
                led: Led::One,
                on: false,
            };
            reconciler::apply(state, &mut RecordingPublisher::new(), command);
            remote_log.lock().unwrap().push("remote applied");
        });

        state.input().latch(ButtonEdge::pressed(ButtonId::Ok));
        p.menu.tick(state, &mut p.display, &mut slow);
    });

    assert_eq!(*log.lock().unwrap(), vec!["menu published", "remote applied"]);
    assert_eq!(slow.sent, vec![(Feed::Led(Led::One), OutboundValue::Flag(true))]);
    assert!(!p.state.actuators().led(Led::One));
}
