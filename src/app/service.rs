//! Node service: every periodic unit behind one [`TaskDelegate`].
//!
//! [`NodeService`] owns the button poller, samplers, menu controller,
//! display and publisher, and borrows the shared pool. Driven by the
//! cooperative [`Scheduler`](crate::scheduler::Scheduler) it runs the
//! whole node on one thread, which is how host simulation and the
//! integration tests exercise it. On the target each unit runs on its
//! own thread instead (see `main.rs`); the units are the same.
//!
//! ```text
//!  ButtonLines ──▶ ┌──────────────────────────┐ ──▶ DisplayPort
//!  ClimateSource ─▶│       NodeService        │
//!  LightSource ──▶ │ poller · samplers · menu │ ──▶ Publisher
//!  InboundMessage ▶│       reconciler         │
//!                  └────────────┬─────────────┘
//!                               ▼
//!                      NodeState (shared pool)
//! ```

use log::{debug, info};

use super::ports::{
    ActuatorPort, ButtonLines, ClimateSource, DisplayPort, LightSource, Publisher, TaskDelegate,
};
use super::reconciler;
use crate::channels::InboundReceiver;
use crate::config::NodeConfig;
use crate::drivers::button::ButtonPoller;
use crate::menu::MenuController;
use crate::scheduler::TaskId;
use crate::sensors::{ClimateSampler, LightSampler};
use crate::state::NodeState;

/// Adapters the service is assembled from.
pub struct NodeParts<B, C, L, D, P> {
    pub buttons: B,
    pub climate: C,
    pub light: L,
    pub display: D,
    pub publisher: P,
}

pub struct NodeService<'a, H, B, C, L, D, P> {
    state: &'a NodeState<H>,
    poller: ButtonPoller<B>,
    climate: ClimateSampler<C>,
    light: LightSampler<L>,
    menu: MenuController,
    display: D,
    publisher: P,
    inbound: Option<InboundReceiver<'a>>,
    runs: [u64; TaskId::COUNT],
}

impl<'a, H, B, C, L, D, P> NodeService<'a, H, B, C, L, D, P>
where
    H: ActuatorPort,
    B: ButtonLines,
    C: ClimateSource,
    L: LightSource,
    D: DisplayPort,
    P: Publisher,
{
    pub fn new(
        config: &NodeConfig,
        state: &'a NodeState<H>,
        parts: NodeParts<B, C, L, D, P>,
        inbound: Option<InboundReceiver<'a>>,
    ) -> Self {
        info!(
            "NodeService: assembled (inbound {})",
            if inbound.is_some() { "attached" } else { "detached" }
        );
        Self {
            state,
            poller: ButtonPoller::new(parts.buttons, config.long_press_polls()),
            climate: ClimateSampler::new(parts.climate),
            light: LightSampler::new(parts.light),
            menu: MenuController::new(config),
            display: parts.display,
            publisher: parts.publisher,
            inbound,
            runs: [0; TaskId::COUNT],
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &'a NodeState<H> {
        self.state
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        self.poller.lines_mut()
    }

    pub fn climate_mut(&mut self) -> &mut C {
        self.climate.source_mut()
    }

    pub fn light_mut(&mut self) -> &mut L {
        self.light.source_mut()
    }

    /// How many times `task` has run.
    pub fn runs(&self, task: TaskId) -> u64 {
        self.runs[task as usize]
    }
}

impl<H, B, C, L, D, P> TaskDelegate for NodeService<'_, H, B, C, L, D, P>
where
    H: ActuatorPort,
    B: ButtonLines,
    C: ClimateSource,
    L: LightSource,
    D: DisplayPort,
    P: Publisher,
{
    fn run_task(&mut self, task: TaskId) {
        self.runs[task as usize] += 1;
        match task {
            TaskId::ButtonPoll => self.poller.poll(self.state.input()),
            TaskId::Clock => {
                let now = self.state.tick_clock();
                debug!("Clock: {}", now);
            }
            // Failures are logged by the samplers; the previous value stays.
            TaskId::Climate => {
                let _ = self.climate.sample(self.state, &mut self.publisher);
            }
            TaskId::Light => {
                let _ = self.light.sample(self.state, &mut self.publisher);
            }
            TaskId::Render => self.menu.tick(self.state, &mut self.display, &mut self.publisher),
            TaskId::Inbound => {
                if let Some(rx) = self.inbound {
                    reconciler::drain_pending(self.state, &mut self.publisher, rx);
                }
            }
        }
    }
}
