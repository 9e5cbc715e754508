//! Periodic task table and runners.
//!
//! Every unit of work on the node is a periodic task over the shared
//! pool. No task calls another; they meet only in [`NodeState`] and the
//! remote channels.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Task table                            │
//! │                                                              │
//! │  buttons 20ms   clock 1s   climate 30s   light 20s           │
//! │  menu 200ms     inbound 100ms                                │
//! │        │                                                     │
//! │        ├──▶ Scheduler::advance()  (cooperative, host sim)    │
//! │        │         └──▶ TaskDelegate::run_task(id)             │
//! │        │                                                     │
//! │        └──▶ spawn_periodic()      (one pinned thread each)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`NodeState`]: crate::state::NodeState

use std::io;
use std::thread::JoinHandle;

use embassy_time::Duration;
use log::{debug, info};

use crate::app::ports::TaskDelegate;
use crate::config::NodeConfig;
use crate::drivers::task_pin::{self, Core, TaskPlacement};

// ═══════════════════════════════════════════════════════════════
//  Task identity
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskId {
    ButtonPoll = 0,
    Clock = 1,
    Climate = 2,
    Light = 3,
    Render = 4,
    Inbound = 5,
}

impl TaskId {
    pub const COUNT: usize = 6;
}

/// One row of the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub id: TaskId,
    pub placement: TaskPlacement,
    pub period: Duration,
}

impl TaskSpec {
    pub fn name(&self) -> &'static str {
        self.placement.display_name()
    }
}

fn placement(core: Core, priority: u8, stack_kb: usize, name: &'static str) -> TaskPlacement {
    TaskPlacement {
        core,
        priority,
        stack_kb,
        name,
    }
}

/// Build the task table from the configuration. Indexed by `TaskId as usize`.
pub fn task_table(config: &NodeConfig) -> [TaskSpec; TaskId::COUNT] {
    let ms = |v: u32| Duration::from_millis(u64::from(v));
    [
        TaskSpec {
            id: TaskId::ButtonPoll,
            placement: placement(Core::App, 6, 4, "buttons\0"),
            period: ms(config.button_poll_ms),
        },
        TaskSpec {
            id: TaskId::Clock,
            placement: placement(Core::App, 5, 3, "clock\0"),
            period: ms(config.clock_tick_ms),
        },
        TaskSpec {
            id: TaskId::Climate,
            placement: placement(Core::App, 3, 4, "climate\0"),
            period: ms(config.climate_period_ms),
        },
        TaskSpec {
            id: TaskId::Light,
            placement: placement(Core::App, 3, 3, "light\0"),
            period: ms(config.light_period_ms),
        },
        TaskSpec {
            id: TaskId::Render,
            placement: placement(Core::App, 4, 6, "menu\0"),
            period: ms(config.render_period_ms),
        },
        TaskSpec {
            id: TaskId::Inbound,
            placement: placement(Core::Pro, 5, 8, "inbound\0"),
            period: ms(config.inbound_poll_ms),
        },
    ]
}

// ═══════════════════════════════════════════════════════════════
//  Cooperative runner
// ═══════════════════════════════════════════════════════════════

/// Deterministic single-threaded runner over the task table.
///
/// Time only moves when [`advance`](Self::advance) is called, so host
/// simulations and tests control it exactly.
pub struct Scheduler {
    table: [TaskSpec; TaskId::COUNT],
    elapsed_ms: [u64; TaskId::COUNT],
    now_ms: u64,
}

impl Scheduler {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            table: task_table(config),
            elapsed_ms: [0; TaskId::COUNT],
            now_ms: 0,
        }
    }

    pub fn table(&self) -> &[TaskSpec; TaskId::COUNT] {
        &self.table
    }

    /// Simulated milliseconds since construction.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move time forward by `step_ms` and run every task that came due,
    /// in table order. A task overdue by several periods runs that many
    /// times.
    pub fn advance(&mut self, step_ms: u64, delegate: &mut dyn TaskDelegate) {
        self.now_ms += step_ms;
        for (spec, elapsed) in self.table.iter().zip(self.elapsed_ms.iter_mut()) {
            let period = spec.period.as_millis().max(1);
            *elapsed += step_ms;
            while *elapsed >= period {
                *elapsed -= period;
                debug!("Scheduler: run '{}' at {}ms", spec.name(), self.now_ms);
                delegate.run_task(spec.id);
            }
        }
    }

    /// Advance in steps of the fastest period until `total_ms` has passed.
    pub fn run_for(&mut self, total_ms: u64, delegate: &mut dyn TaskDelegate) {
        let step = self
            .table
            .iter()
            .map(|t| t.period.as_millis())
            .min()
            .unwrap_or(1)
            .max(1);
        let mut remaining = total_ms;
        while remaining > 0 {
            let s = step.min(remaining);
            self.advance(s, delegate);
            remaining -= s;
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Threaded runner
// ═══════════════════════════════════════════════════════════════

/// Run `f` forever on its own pinned thread, sleeping one period between
/// invocations.
pub fn spawn_periodic(
    spec: TaskSpec,
    mut f: impl FnMut() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let period = std::time::Duration::from_millis(spec.period.as_millis());
    info!("Scheduler: '{}' every {}ms", spec.name(), spec.period.as_millis());
    task_pin::spawn_on_core(spec.placement, move || {
        loop {
            f();
            std::thread::sleep(period);
        }
    })
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
