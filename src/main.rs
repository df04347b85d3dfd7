//! DeskLift Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution: hardware timers
//! push ticks into a lock-free queue, and a single cooperative loop
//! drains it. Nothing in the loop blocks, waits, or sleeps on target.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time │
//! │  (Input+Actuator)  (EventSink)    (ConfigPort) (clock)   │
//! │  CloudLink (reports up, targets down)                    │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ──────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            DeskService (pure logic)                │  │
//! │  │  ClickClassifier · MotionController · Sequencers   │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use desklift::adapters::cloud::{self, CloudLink, NullTransport};
use desklift::adapters::hardware::HardwareAdapter;
use desklift::adapters::log_sink::LogEventSink;
use desklift::adapters::nvs::NvsAdapter;
use desklift::adapters::time::Esp32TimeAdapter;
use desklift::app::commands::DeskCommand;
use desklift::app::events::AppEvent;
use desklift::app::ports::{ConfigPort, EventSink, FanoutSink};
use desklift::app::service::DeskService;
use desklift::config::SystemConfig;
use desklift::drivers::{hw_init, hw_timer, watchdog::Watchdog};
use desklift::events::{self, Event};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  DeskLift v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            None
        }
    };
    let config = match nvs.as_ref() {
        Some(n) => match n.load() {
            Ok(cfg) => {
                info!("Config loaded from NVS");
                cfg
            }
            Err(e) => {
                warn!("NVS config load failed ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        None => SystemConfig::default(),
    };

    hw_timer::start_timers(config.control_loop_interval_ms, config.report_interval_secs);

    // ── 4. Construct adapters ─────────────────────────────────
    let time_adapter = Esp32TimeAdapter::new();
    let mut hw = HardwareAdapter::new();

    // Real deployments swap NullTransport for the MQTT transport;
    // remote_target_callback is registered with it at connect time.
    // Every domain event reaches both the serial log and the cloud link.
    let mut sink = FanoutSink(LogEventSink::new(), CloudLink::new(NullTransport));

    // ── 5. Construct desk service ─────────────────────────────
    let mut desk = DeskService::new(config.clone());
    desk.start(&mut sink);

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    let mut report_counter: u64 = 0;
    #[cfg(not(target_os = "espidf"))]
    let ticks_per_report =
        u64::from(config.report_interval_secs) * 1_000 / u64::from(config.control_loop_interval_ms);

    loop {
        // Simulate timer interrupts via sleep on non-espidf targets.
        // On real hardware, the CPU executes WFI (Wait For Interrupt)
        // and wakes only when a hardware timer fires.
        #[cfg(not(target_os = "espidf"))]
        {
            std::thread::sleep(std::time::Duration::from_millis(
                config.control_loop_interval_ms as u64,
            ));
            events::push_event(Event::ControlTick);
            report_counter += 1;
            if report_counter >= ticks_per_report {
                events::push_event(Event::ReportTick);
                report_counter = 0;
            }
        }

        // Process all pending events.
        events::drain_events(|event| {
            let now_ms = time_adapter.now_ms();
            match event {
                Event::ControlTick => {
                    desk.tick(now_ms, &mut hw, &mut sink);
                }

                Event::ReportTick => {
                    let pos = desk.position();
                    sink.emit(&AppEvent::PositionReport(pos));
                    if let Err(e) = sink.1.report(
                        pos,
                        desk.target(),
                        desk.is_moving(),
                        time_adapter.uptime_secs(),
                    ) {
                        // NotReady just means nobody is listening yet.
                        log::debug!("position report not published: {}", e);
                    }
                }

                Event::CloudCommand => {
                    if let Some(height) = cloud::take_pending_target() {
                        info!("Cloud: remote target {}", height);
                        desk.handle_command(
                            now_ms,
                            DeskCommand::SetTarget(height),
                            &mut hw,
                            &mut sink,
                        );
                    }
                }
            }
        });

        // Config auto-save (5s debounce after last change).
        if let Some(nvs) = nvs.as_ref() {
            desk.auto_save_if_needed(nvs);
        }

        // Feed watchdog on every iteration.
        watchdog.feed();
    }
}
