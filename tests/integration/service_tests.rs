//! Whole-node runs: `NodeService` driven by the cooperative scheduler on
//! simulated time.

use embassy_sync::channel::Channel;

use homenode::app::commands::{Feed, OutboundValue};
use homenode::app::dispatch::Led;
use homenode::app::ports::ClimateSample;
use homenode::app::service::{NodeParts, NodeService};
use homenode::channels::{InboundChannel, InboundMessage};
use homenode::clock::CalendarTime;
use homenode::config::NodeConfig;
use homenode::drivers::button::{ButtonId, SimButtons};
use homenode::error::SensorError;
use homenode::menu::Page;
use homenode::scheduler::{Scheduler, TaskId};
use homenode::state::NodeState;

use super::mock_hw::{
    ActuatorCall, MockHardware, RecordingDisplay, RecordingPublisher, ScriptedClimate,
    ScriptedLight, booted, no_splash, writes_since_boot,
};

type Service<'a> = NodeService<
    'a,
    MockHardware,
    SimButtons,
    ScriptedClimate,
    ScriptedLight,
    RecordingDisplay,
    RecordingPublisher,
>;

type Parts = NodeParts<SimButtons, ScriptedClimate, ScriptedLight, RecordingDisplay, RecordingPublisher>;

fn parts(climate: ScriptedClimate, light_raw: u16) -> Parts {
    NodeParts {
        buttons: SimButtons::default(),
        climate,
        light: ScriptedLight { raw: Ok(light_raw) },
        display: RecordingDisplay::default(),
        publisher: RecordingPublisher::new(),
    }
}

fn service<'a>(
    config: &NodeConfig,
    state: &'a NodeState<MockHardware>,
    inbound: Option<&'a InboundChannel>,
) -> Service<'a> {
    NodeService::new(
        config,
        state,
        parts(ScriptedClimate::steady(21.0, 40.0), 0),
        inbound.map(|ch| ch.receiver()),
    )
}

#[test]
fn held_button_navigates_on_next_render() {
    let config = no_splash();
    let state = booted(CalendarTime::default());
    let mut node = service(&config, &state, None);
    let mut sched = Scheduler::new(&config);

    node.buttons_mut().set(ButtonId::Up, true);
    sched.run_for(60, &mut node);
    // Debounced, but not rendered yet.
    assert_eq!(node.menu().page(), Page::Main);

    sched.run_for(140, &mut node);
    assert_eq!(node.menu().page(), Page::LedPage12);
    assert_eq!(node.display().last_rows().1, "LED2: <OFF>     ");
}

#[test]
fn holding_ok_yields_a_single_press() {
    let config = no_splash();
    let state = booted(CalendarTime::default());
    let mut node = service(&config, &state, None);
    let mut sched = Scheduler::new(&config);

    sched.run_for(200, &mut node);
    node.buttons_mut().set(ButtonId::Change, true);
    sched.run_for(200, &mut node);
    node.buttons_mut().set(ButtonId::Change, false);
    sched.run_for(200, &mut node);
    assert_eq!(node.menu().page(), Page::LedPage12);

    // Held well past the long-press threshold.
    node.buttons_mut().set(ButtonId::Ok, true);
    sched.run_for(3000, &mut node);
    node.buttons_mut().set(ButtonId::Ok, false);
    sched.run_for(200, &mut node);

    assert_eq!(node.menu().page(), Page::LedPage12);
    assert_eq!(
        writes_since_boot(&state),
        vec![ActuatorCall::Led(Led::One, true)]
    );
}

#[test]
fn remote_door_command_shows_notice() {
    let config = no_splash();
    let state = booted(CalendarTime::default());
    let inbound: InboundChannel = Channel::new();
    let mut node = service(&config, &state, Some(&inbound));
    let mut sched = Scheduler::new(&config);

    inbound
        .try_send(InboundMessage::new("homenode/feeds/DADN_Door", "1").unwrap())
        .unwrap();
    sched.run_for(200, &mut node);

    assert!(state.actuators().door_open);
    assert_eq!(node.menu().page(), Page::NoticeDoor);
    assert_eq!(node.display().last_rows().1, "DOOR IS OPENED  ");
    assert_eq!(
        node.publisher().for_feed(Feed::Door),
        vec![OutboundValue::Flag(true)]
    );

    sched.run_for(5000, &mut node);
    assert_eq!(node.menu().page(), Page::Main);
}

#[test]
fn samplers_publish_and_feed_the_main_page() {
    let config = no_splash();
    let start = CalendarTime::new(2024, 12, 31, 23, 59, 50).unwrap();
    let state = booted(start);
    let mut node = NodeService::new(
        &config,
        &state,
        parts(ScriptedClimate::steady(24.0, 55.7), 2048),
        None,
    );
    let mut sched = Scheduler::new(&config);

    sched.run_for(30_000, &mut node);

    assert_eq!(node.runs(TaskId::Light), 1);
    assert_eq!(node.runs(TaskId::Climate), 1);
    assert_eq!(
        node.publisher().sent,
        vec![
            (Feed::Light, OutboundValue::Level(50)),
            (Feed::Humidity, OutboundValue::Level(55)),
            (Feed::Temperature, OutboundValue::Celsius(24.0)),
        ]
    );
    assert_eq!(state.calendar(), CalendarTime::new(2025, 1, 1, 0, 0, 20).unwrap());

    let (top, bottom) = node.display().last_rows();
    assert_eq!(top, "T:24.0 H:55 L:50");
    assert!(bottom.starts_with("1/1/2025"));
}

#[test]
fn failed_climate_read_keeps_last_value() {
    let config = no_splash();
    let state = booted(CalendarTime::default());
    let mut climate = ScriptedClimate::steady(19.5, 48.0);
    climate.script.push_back(Ok(ClimateSample {
        temperature_c: 22.0,
        humidity_percent: 30.0,
    }));
    climate.script.push_back(Err(SensorError::NotReady));
    let mut node = NodeService::new(&config, &state, parts(climate, 0), None);
    let mut sched = Scheduler::new(&config);

    sched.run_for(60_000, &mut node);
    assert_eq!(state.sensors().temperature_c, 22.0);
    assert_eq!(state.sensors().humidity, 30);
    assert_eq!(node.publisher().for_feed(Feed::Humidity), vec![OutboundValue::Level(30)]);

    sched.run_for(30_000, &mut node);
    assert_eq!(state.sensors().temperature_c, 19.5);
    assert_eq!(node.publisher().for_feed(Feed::Humidity).len(), 2);
}

#[test]
fn splash_holds_for_its_duration() {
    let config = NodeConfig::default();
    let state = booted(CalendarTime::default());
    let mut node = service(&config, &state, None);
    let mut sched = Scheduler::new(&config);

    node.buttons_mut().set(ButtonId::Change, true);
    sched.run_for(4800, &mut node);
    assert!(node.menu().in_splash());
    sched.run_for(200, &mut node);
    assert!(!node.menu().in_splash());
    assert_eq!(node.display().last_rows().0, "WELCOME TO      ");

    node.buttons_mut().set(ButtonId::Change, false);
    sched.run_for(200, &mut node);
    assert_eq!(node.menu().page(), Page::Main);
    assert!(node.display().last_rows().0.starts_with("T:0.0"));
}
