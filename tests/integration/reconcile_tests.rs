//! Integration tests for the inbound reconciler.
//!
//! Covers the per-actuator policy: LED always rewritten and never echoed,
//! fan always rewritten and echoed only when running, door compared first
//! and applied once per change.

use embassy_sync::channel::Channel;
use futures_lite::future;

use homenode::app::commands::{Feed, OutboundValue};
use homenode::app::dispatch::{FanSpeed, Led};
use homenode::app::reconciler::{self, Reconciled};
use homenode::channels::{InboundChannel, InboundMessage};
use homenode::clock::CalendarTime;
use homenode::state::{NodeState, Notice};

use super::mock_hw::{
    ActuatorCall, BOOT_WRITES, MockHardware, RecordingPublisher, booted, writes_since_boot,
};

fn msg(topic: &str, payload: &str) -> InboundMessage {
    InboundMessage::new(topic, payload).unwrap()
}

fn pool() -> NodeState<MockHardware> {
    booted(CalendarTime::default())
}

// ── Door ──────────────────────────────────────────────────────

#[test]
fn door_applies_once_per_change() {
    let state = pool();
    let mut out = RecordingPublisher::new();

    let first = reconciler::reconcile(&state, &mut out, &msg("home/feeds/DADN_Door", "1"));
    assert_eq!(first, Reconciled::Applied);
    assert!(state.actuators().door_open);
    assert!(state.notices().take(Notice::Door));

    let again = reconciler::reconcile(&state, &mut out, &msg("home/feeds/DADN_Door", "1"));
    assert_eq!(again, Reconciled::Unchanged);
    assert!(!state.notices().take(Notice::Door), "no notice for a no-op");

    assert_eq!(writes_since_boot(&state), vec![ActuatorCall::Door(true)]);
    assert_eq!(out.sent, vec![(Feed::Door, OutboundValue::Flag(true))]);
}

#[test]
fn door_echo_of_local_change_is_absorbed() {
    let state = pool();
    let mut out = RecordingPublisher::new();
    // Local toggle, then the broker bounces the same value back.
    state.transact(|d| d.set_door(true));
    let echoed = reconciler::reconcile(&state, &mut out, &msg("DADN_Door", "1"));
    assert_eq!(echoed, Reconciled::Unchanged);
    assert!(out.sent.is_empty());
    assert_eq!(writes_since_boot(&state).len(), 1);
}

#[test]
fn door_payload_is_trimmed_and_strict() {
    let state = pool();
    let mut out = RecordingPublisher::new();

    reconciler::reconcile(&state, &mut out, &msg("DADN_Door", " 1\r\n"));
    assert!(state.actuators().door_open);

    // Anything but "1" means closed.
    reconciler::reconcile(&state, &mut out, &msg("DADN_Door", "true"));
    assert!(!state.actuators().door_open);
    assert_eq!(
        out.for_feed(Feed::Door),
        vec![OutboundValue::Flag(true), OutboundValue::Flag(false)]
    );
}

// ── LEDs ──────────────────────────────────────────────────────

#[test]
fn led_is_rewritten_on_every_arrival_and_never_published() {
    let state = pool();
    let mut out = RecordingPublisher::new();
    for _ in 0..3 {
        assert_eq!(
            reconciler::reconcile(&state, &mut out, &msg("home/feeds/DADN_LED_3", "1")),
            Reconciled::Applied
        );
    }
    assert!(state.actuators().led(Led::Three));
    assert_eq!(writes_since_boot(&state), vec![ActuatorCall::Led(Led::Three, true); 3]);
    assert!(out.sent.is_empty());
}

// ── Fan ───────────────────────────────────────────────────────

#[test]
fn fan_rounds_clamps_and_echoes_when_running() {
    let state = pool();
    let mut out = RecordingPublisher::new();
    let cases = [
        ("47", 40),
        ("250", 100),
        ("-5", 0),
        ("abc", 0),
        ("60rpm", 60),
        ("0", 0),
    ];
    for (payload, _) in cases {
        reconciler::reconcile(&state, &mut out, &msg("dadn-fan-1", payload));
    }

    let applied: Vec<ActuatorCall> = cases
        .iter()
        .map(|(_, pct)| ActuatorCall::Fan(FanSpeed::nearest(*pct)))
        .collect();
    assert_eq!(writes_since_boot(&state), applied);
    assert_eq!(
        out.for_feed(Feed::Fan),
        vec![
            OutboundValue::Level(40),
            OutboundValue::Level(100),
            OutboundValue::Level(60),
        ]
    );
    assert_eq!(state.actuators().fan, FanSpeed::OFF);
}

#[test]
fn driver_failure_still_updates_shared_state() {
    let state = NodeState::new(MockHardware::failing(), CalendarTime::default());
    let mut out = RecordingPublisher::new();
    reconciler::reconcile(&state, &mut out, &msg("dadn-fan-1", "80"));
    assert_eq!(state.actuators().fan.percent(), 80);
    assert_eq!(out.sent, vec![(Feed::Fan, OutboundValue::Level(80))]);
    assert_eq!(state.with_hardware(|hw| hw.calls.len()), BOOT_WRITES + 1);
}

// ── Other feeds ───────────────────────────────────────────────

#[test]
fn detection_raises_notice() {
    let state = pool();
    let mut out = RecordingPublisher::new();
    assert_eq!(
        reconciler::reconcile(&state, &mut out, &msg("home/feeds/dadn-ai", "1")),
        Reconciled::Noticed
    );
    assert!(state.notices().detected());
    assert!(state.notices().take(Notice::Detect));
    assert!(writes_since_boot(&state).is_empty());
}

#[test]
fn unknown_and_publish_only_feeds_are_dropped() {
    let state = pool();
    let mut out = RecordingPublisher::new();
    for (topic, payload) in [("home/feeds/garage", "1"), ("DADN_Temp", "30"), ("DADN_Light", "1")] {
        assert_eq!(
            reconciler::reconcile(&state, &mut out, &msg(topic, payload)),
            Reconciled::Ignored
        );
    }
    assert!(writes_since_boot(&state).is_empty());
    assert!(out.sent.is_empty());
}

// ── Channel forms ─────────────────────────────────────────────

#[test]
fn drain_pending_handles_queue_in_order() {
    let state = pool();
    let mut out = RecordingPublisher::new();
    let ch: InboundChannel = Channel::new();
    ch.try_send(msg("DADN_LED_1", "1")).unwrap();
    ch.try_send(msg("DADN_Door", "1")).unwrap();
    ch.try_send(msg("DADN_LED_1", "0")).unwrap();

    assert_eq!(reconciler::drain_pending(&state, &mut out, ch.receiver()), 3);
    assert_eq!(
        writes_since_boot(&state),
        vec![
            ActuatorCall::Led(Led::One, true),
            ActuatorCall::Door(true),
            ActuatorCall::Led(Led::One, false),
        ]
    );
    assert_eq!(reconciler::drain_pending(&state, &mut out, ch.receiver()), 0);
}

#[test]
fn async_loop_consumes_queued_messages() {
    let state = pool();
    let ch: InboundChannel = Channel::new();
    ch.try_send(msg("DADN_LED_2", "1")).unwrap();
    ch.try_send(msg("dadn-fan-1", "20")).unwrap();

    let mut out = RecordingPublisher::new();
    // The loop never returns; stop it once the queue is empty.
    future::block_on(future::or(
        reconciler::run(&state, &mut out, ch.receiver()),
        future::ready(()),
    ));

    assert!(state.actuators().led(Led::Two));
    assert_eq!(state.actuators().fan.percent(), 20);
    assert_eq!(out.sent, vec![(Feed::Fan, OutboundValue::Level(20))]);
}
