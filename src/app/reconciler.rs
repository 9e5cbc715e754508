//! Inbound command reconciler.
//!
//! Applies remote commands through actuator dispatch. The policy differs
//! per actuator and is kept exactly:
//!
//! | Target | Compared first | Physical write      | Re-published      |
//! |--------|----------------|---------------------|-------------------|
//! | LED    | no             | every arrival       | never             |
//! | Fan    | no             | every arrival       | when speed > 0    |
//! | Door   | yes            | only on change      | once, on change   |
//!
//! The door comparison stops a locally published change from bouncing back
//! off the broker and re-triggering itself.

use log::{debug, info, warn};

use super::commands::{Feed, InboundCommand, OutboundValue};
use super::ports::{ActuatorPort, Publisher};
use crate::channels::{InboundMessage, InboundReceiver};
use crate::state::NodeState;

/// Outcome of one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Dispatch ran.
    Applied,
    /// Door already in the requested position; nothing written.
    Unchanged,
    /// Detection result recorded for the menu overlay.
    Noticed,
    /// Unknown or publish-only feed.
    Ignored,
}

/// Interpret and apply one message.
pub fn reconcile<H: ActuatorPort, P: Publisher>(
    state: &NodeState<H>,
    publisher: &mut P,
    msg: &InboundMessage,
) -> Reconciled {
    let Some(feed) = Feed::from_topic(&msg.topic) else {
        warn!("Reconciler: unknown feed '{}', dropped", msg.topic);
        return Reconciled::Ignored;
    };
    let Some(command) = InboundCommand::parse(feed, &msg.payload) else {
        warn!("Reconciler: '{}' is publish-only, dropped", feed.key());
        return Reconciled::Ignored;
    };
    debug!("Reconciler: {:?} from '{}'", command, msg.payload);
    apply(state, publisher, command)
}

/// Apply an already-parsed command.
pub fn apply<H: ActuatorPort, P: Publisher>(
    state: &NodeState<H>,
    publisher: &mut P,
    command: InboundCommand,
) -> Reconciled {
    match command {
        InboundCommand::Led { led, on } => {
            state.transact(|d| d.set_led(led, on));
            info!("Remote: LED{} {}", led.number(), if on { "on" } else { "off" });
            Reconciled::Applied
        }

        InboundCommand::Fan { speed } => {
            state.transact(|d| {
                let applied = d.set_fan_percent(speed);
                info!("Remote: fan {}%", applied.percent());
                if applied.is_running() {
                    if let Err(e) = publisher.publish(Feed::Fan, OutboundValue::Level(applied.percent())) {
                        warn!("Remote: fan echo publish failed: {}", e);
                    }
                }
            });
            Reconciled::Applied
        }

        InboundCommand::Door { open } => state.transact(|d| {
            if d.state().door_open == open {
                debug!("Remote: door already {}", if open { "open" } else { "closed" });
                return Reconciled::Unchanged;
            }
            d.set_door(open);
            info!("Remote: door {}", if open { "opened" } else { "closed" });
            if let Err(e) = publisher.publish(Feed::Door, OutboundValue::Flag(open)) {
                warn!("Remote: door publish failed: {}", e);
            }
            Reconciled::Applied
        }),

        InboundCommand::Detection { detected } => {
            state.notices().report_detection(detected);
            info!("Remote: human {}", if detected { "detected" } else { "not detected" });
            Reconciled::Noticed
        }
    }
}

/// Apply every message currently queued. Returns how many were handled.
pub fn drain_pending<H: ActuatorPort, P: Publisher>(
    state: &NodeState<H>,
    publisher: &mut P,
    inbound: InboundReceiver<'_>,
) -> usize {
    let mut handled = 0;
    while let Ok(msg) = inbound.try_receive() {
        reconcile(state, publisher, &msg);
        handled += 1;
    }
    handled
}

/// Await and apply inbound messages forever.
pub async fn run<H: ActuatorPort, P: Publisher>(
    state: &NodeState<H>,
    mut publisher: P,
    inbound: InboundReceiver<'_>,
) {
    info!("Reconciler started");
    loop {
        let msg = inbound.receive().await;
        reconcile(state, &mut publisher, &msg);
    }
}
