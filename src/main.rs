//! HomeNode Firmware: Main Entry Point
//!
//! Hexagonal architecture with one pinned thread per periodic task.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   Lcd1602        Dht20 / AdcLight  GpioButtons│
//! │  (ActuatorPort)    (DisplayPort)  (Climate/Light)   (Lines)    │
//! │  ChannelPublisher  LogPublisher   Esp32TimeAdapter             │
//! │  (Publisher)       (Transport)    (boot calendar)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   NodeState (shared pool) · ActuatorDispatch           │    │
//! │  │   MenuController · Samplers · Reconciler               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  task_table → spawn_periodic (App core) · io_task (Pro core)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::cell::RefCell;

use anyhow::{Result, anyhow};
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::rmt::TxRmtDriver;
use esp_idf_svc::hal::rmt::config::TransmitConfig;
use esp_idf_svc::hal::units::Hertz;
use log::{error, info, warn};
use static_cell::StaticCell;

use homenode::adapters::display::Lcd1602;
use homenode::adapters::hardware::HardwareAdapter;
use homenode::adapters::publisher::{ChannelPublisher, LogPublisher};
use homenode::adapters::time::Esp32TimeAdapter;
use homenode::channels::OUTBOUND_CHANNEL;
use homenode::config::NodeConfig;
use homenode::drivers::button::{ButtonPoller, GpioButtons};
use homenode::drivers::door::DoorServo;
use homenode::drivers::fan::FanDriver;
use homenode::drivers::hw_init;
use homenode::drivers::leds::LedStrip;
use homenode::io_task;
use homenode::menu::MenuController;
use homenode::scheduler::{TaskId, spawn_periodic, task_table};
use homenode::sensors::climate::Dht20;
use homenode::sensors::light::AdcLight;
use homenode::sensors::{ClimateSampler, LightSampler};
use homenode::state::NodeState;

type SharedI2c = Mutex<CriticalSectionRawMutex, RefCell<I2cDriver<'static>>>;

static I2C_BUS: StaticCell<SharedI2c> = StaticCell::new();
static STATE: StaticCell<NodeState<HardwareAdapter>> = StaticCell::new();

const HEARTBEAT_SECS: u64 = 60;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HomeNode v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let peripherals = Peripherals::take()?;
    let strip_tx = TxRmtDriver::new(
        peripherals.rmt.channel0,
        peripherals.pins.gpio32,
        &TransmitConfig::new().clock_divider(1),
    )?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(100_000)),
    )?;
    let bus: &'static SharedI2c = I2C_BUS.init(Mutex::new(RefCell::new(i2c)));

    // ── 3. Config and shared pool ─────────────────────────────
    let config = NodeConfig::default();
    config
        .validate()
        .map_err(|e| anyhow!("invalid config: {}", e))?;

    let start = Esp32TimeAdapter::new().boot_time(config.default_start);
    let hw = HardwareAdapter::new(DoorServo::new(), LedStrip::new(strip_tx), FanDriver::new());
    // Outputs are forced idle inside NodeState::new, before any task exists.
    let state: &'static NodeState<HardwareAdapter> = STATE.init(NodeState::new(hw, start));

    // ── 4. Remote channel I/O (Core 0) ────────────────────────
    let _io = io_task::spawn_io_task(state, config.feed_namespace.clone(), LogPublisher::new())?;

    // ── 5. Periodic tasks (Core 1) ────────────────────────────
    let table = task_table(&config);

    let mut poller = ButtonPoller::new(GpioButtons, config.long_press_polls());
    let _buttons = spawn_periodic(table[TaskId::ButtonPoll as usize], move || {
        poller.poll(state.input());
    })?;

    let _clock = spawn_periodic(table[TaskId::Clock as usize], move || {
        state.tick_clock();
    })?;

    let mut climate = ClimateSampler::new(Dht20::new(I2cDevice::new(bus), FreeRtos));
    let mut climate_out = ChannelPublisher::new(OUTBOUND_CHANNEL.sender());
    let _climate = spawn_periodic(table[TaskId::Climate as usize], move || {
        let _ = climate.sample(state, &mut climate_out);
    })?;

    let mut light = LightSampler::new(AdcLight::new());
    let mut light_out = ChannelPublisher::new(OUTBOUND_CHANNEL.sender());
    let _light = spawn_periodic(table[TaskId::Light as usize], move || {
        let _ = light.sample(state, &mut light_out);
    })?;

    let mut lcd = Lcd1602::new(I2cDevice::new(bus), FreeRtos);
    if let Err(e) = lcd.init() {
        warn!("LCD init failed ({:?}), continuing without display", e);
    }
    let mut menu = MenuController::new(&config);
    let mut menu_out = ChannelPublisher::new(OUTBOUND_CHANNEL.sender());
    let _menu = spawn_periodic(table[TaskId::Render as usize], move || {
        menu.tick(state, &mut lcd, &mut menu_out);
    })?;

    info!("All tasks running");

    // ── 6. Heartbeat ──────────────────────────────────────────
    let time = Esp32TimeAdapter::new();
    loop {
        std::thread::sleep(std::time::Duration::from_secs(HEARTBEAT_SECS));
        time.resync(state);
        let a = state.actuators();
        let s = state.sensors();
        info!(
            "HEARTBEAT | up={}s | {} | T={:.1}C H={}% L={}% | door={} leds={:?} fan={}%",
            time.uptime_ms() / 1000,
            state.calendar(),
            s.temperature_c,
            s.humidity,
            s.light,
            if a.door_open { "open" } else { "closed" },
            a.leds,
            a.fan.percent(),
        );
    }
}
