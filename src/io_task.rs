//! Remote-channel I/O task.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │  I/O thread (Core 0)                                     │
//!  │  futures_lite::block_on                                  │
//!  │  ├─ edge_executor::LocalExecutor                         │
//!  │  │  ├─ reconciler::run    INBOUND_CHANNEL  → dispatch    │
//!  │  │  └─ forward_outbound   OUTBOUND_CHANNEL → Transport   │
//!  │  └───────────────────────────────────────────────────────│
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Both loops wake only when their channel has a message. The transport
//! pushes inbound messages with `INBOUND_CHANNEL.try_send()`.

use std::io;
use std::thread::JoinHandle;

use heapless::String;
use log::{info, warn};

use crate::adapters::publisher::{ChannelPublisher, forward_outbound};
use crate::app::ports::{ActuatorPort, Transport};
use crate::app::reconciler;
use crate::channels::{INBOUND_CHANNEL, InboundMessage, OUTBOUND_CHANNEL};
use crate::drivers::task_pin::{self, Core, TaskPlacement};
use crate::state::NodeState;

pub const IO_TASK: TaskPlacement = TaskPlacement {
    core: Core::Pro,
    priority: 5,
    stack_kb: 8,
    name: "io\0",
};

/// Drive the reconciler and the outbound forwarder until the process ends.
pub fn run_io_loop<H, T>(state: &'static NodeState<H>, namespace: String<32>, transport: T)
where
    H: ActuatorPort,
    T: Transport,
{
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    executor
        .spawn(reconciler::run(
            state,
            ChannelPublisher::new(OUTBOUND_CHANNEL.sender()),
            INBOUND_CHANNEL.receiver(),
        ))
        .detach();
    executor
        .spawn(forward_outbound(
            OUTBOUND_CHANNEL.receiver(),
            transport,
            namespace.as_str(),
        ))
        .detach();

    info!("IO task started (inbound + outbound)");
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

/// Spawn the I/O loop on its own thread pinned to Core 0.
pub fn spawn_io_task<H, T>(
    state: &'static NodeState<H>,
    namespace: String<32>,
    transport: T,
) -> io::Result<JoinHandle<()>>
where
    H: ActuatorPort + Send + 'static,
    T: Transport + Send + 'static,
{
    task_pin::spawn_on_core(IO_TASK, move || run_io_loop(state, namespace, transport))
}

// ── Transport entry point ────────────────────────────────────

/// Queue a message received from the broker. Called from the transport's
/// own context; never blocks. Oversized payloads are truncated. Returns
/// `false` if the message was dropped.
pub fn feed_inbound(topic: &str, payload: &str) -> bool {
    let Some(msg) = InboundMessage::new(topic, payload) else {
        warn!("IO: no feed key fits in topic '{}', dropped", topic);
        return false;
    };
    if INBOUND_CHANNEL.try_send(msg).is_err() {
        warn!("IO: inbound channel full, dropping '{}'", topic);
        return false;
    }
    true
}
