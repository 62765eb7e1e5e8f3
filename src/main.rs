//! Alarm Panel Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative tick loop:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MqttTransport    PanelHardware      Mfrc522Reader   NvsStore  │
//! │  (Transport)      (Display/Strip/    (BadgeReader)   (Config)  │
//! │  WifiLink          Beeper ports)     LogEventSink              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              PanelService (pure logic)                 │    │
//! │  │  FSM · Screen power · Beep cadence · Indicator         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Tick order: transport → local input → reassert → screen →     │
//! │  beeper (one blocking exception: the bounded fade-off)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod events;
mod pins;

pub mod app;
mod adapters;
mod control;
mod drivers;
pub mod fsm;

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use adapters::device_id;
use adapters::display::PanelRenderer;
use adapters::event_source;
use adapters::hardware::PanelHardware;
use adapters::log_sink::LogEventSink;
use adapters::mqtt::MqttTransport;
use adapters::nvs::NvsStore;
use adapters::time::MonotonicClock;
use adapters::wifi::WifiLink;
use app::events::PanelEvent;
use app::input::{Activity, PanelButton};
use app::ports::{BadgeReader, ConfigPort, EventSink, Transport};
use app::service::PanelService;
use config::PanelConfig;
use drivers::backlight::Backlight;
use drivers::button::ButtonDriver;
use drivers::lcd::Ili9342;
use drivers::rfid::{I2cBus, Mfrc522Reader};
use drivers::rgb_strip::StripDriver;
use drivers::speaker::SpeakerDriver;
use drivers::watchdog::Watchdog;
use events::Event;

use esp_idf_hal::delay::Delay;
use esp_idf_hal::gpio::{AnyIOPin, IOPin as _, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::units::FromValueType as _;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("alarm panel v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals + one-shot hardware init ───────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt; the TWDT
        // reset takes it from here in production.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = drivers::hw_init::init_isr_service() {
        log::error!("ISR service init failed: {} — continuing without buttons", e);
    }
    let watchdog = Watchdog::new();
    let peripherals = Peripherals::take().context("peripherals already taken")?;

    // ── 3. Config from NVS (or defaults) ──────────────────────
    let nvs = match NvsStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            None
        }
    };
    let cfg = match nvs.as_ref().map(|store| store.load()) {
        Some(Ok(loaded)) => {
            info!("Config loaded from NVS");
            loaded
        }
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            PanelConfig::default()
        }
        None => PanelConfig::default(),
    };
    cfg.validate().map_err(|e| anyhow!("config: {e}"))?;

    // ── 4. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    let client_id = cfg
        .mqtt_client_id
        .clone()
        .unwrap_or_else(|| device_id::client_id(&mac));
    info!("Client id: {}", client_id);

    // ── 5. Display + output hardware ──────────────────────────
    let spi_driver = SpiDriver::new(
        peripherals.spi2,
        peripherals.pins.gpio18,
        peripherals.pins.gpio23,
        None::<AnyIOPin>,
        &SpiDriverConfig::new(),
    )?;
    let spi = SpiDeviceDriver::new(
        spi_driver,
        Some(peripherals.pins.gpio14),
        &Ili9342::spi_config(),
    )?;
    let lcd_dc = PinDriver::output(peripherals.pins.gpio27.downgrade())?;
    let lcd_rst = PinDriver::output(peripherals.pins.gpio33.downgrade())?;
    let mut lcd = Ili9342::new(spi, lcd_dc, lcd_rst);
    lcd.init().map_err(|e| anyhow!("lcd: {e}"))?;

    let mut strip = StripDriver::new(pins::STRIP_LEN);
    strip.init().map_err(|e| anyhow!("strip: {e}"))?;

    let mut hw = PanelHardware::new(
        PanelRenderer::new(lcd),
        Backlight::new(),
        strip,
        SpeakerDriver::new(),
    );

    // ── 6. Badge reader (MFRC522 over I²C) ────────────────────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(100.kHz().into()),
    )?;
    let mut badge = Mfrc522Reader::new(
        I2cBus::new(i2c, pins::RFID_I2C_ADDR),
        cfg.badge_cooldown_ms,
    );
    if let Err(e) = badge.init() {
        warn!("Badge reader init failed ({e}) — scans disabled until reboot");
    }

    // ── 7. WiFi station link ──────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let wifi_driver = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), None)?,
        sysloop,
    )?;
    let mut wifi = WifiLink::new(&cfg.wifi_ssid, &cfg.wifi_password, cfg.reconnect_delay_ms)
        .map_err(|e| anyhow!("wifi: {e}"))?;
    wifi.attach_driver(wifi_driver);

    let clock = MonotonicClock::new();
    while !wifi.is_connected() {
        wifi.ensure_connected(clock.now_ms());
        if !wifi.is_connected() {
            std::thread::sleep(std::time::Duration::from_millis(500));
            watchdog.feed();
        }
    }

    // ── 8. MQTT transport ─────────────────────────────────────
    let mut transport =
        MqttTransport::new(&cfg, &client_id).map_err(|e| anyhow!("mqtt: {e}"))?;

    // ── 9. Panel service + boot prompt ────────────────────────
    let mut sink = LogEventSink::new();
    let mut panel = PanelService::new(&cfg);
    panel.boot(&mut hw, &mut sink);

    let mut button_a = ButtonDriver::new(PanelButton::A);
    let mut button_b = ButtonDriver::new(PanelButton::B);
    let mut button_c = ButtonDriver::new(PanelButton::C);
    let mut delay = Delay::new_default();

    drivers::hw_timer::start_tick_timer(cfg.tick_interval_ms);
    info!("System ready. Entering tick loop.");

    // ── 10. Tick loop ─────────────────────────────────────────
    let mut last_tick_ms = clock.now_ms();
    let mut last_reconnect_ms: u32 = 0;

    loop {
        events::drain_events(|event| {
            let now_ms = clock.now_ms();
            match event {
                Event::ButtonA => {
                    if let Some(b) = button_a.tick(now_ms) {
                        panel.notify_activity(Activity::ButtonPressed(b), &mut hw, &mut sink);
                    }
                }
                Event::ButtonB => {
                    if let Some(b) = button_b.tick(now_ms) {
                        panel.notify_activity(Activity::ButtonPressed(b), &mut hw, &mut sink);
                    }
                }
                Event::ButtonC => {
                    if let Some(b) = button_c.tick(now_ms) {
                        panel.notify_activity(Activity::ButtonPressed(b), &mut hw, &mut sink);
                    }
                }

                Event::ControlTick => {
                    let elapsed_ms = now_ms.wrapping_sub(last_tick_ms);
                    last_tick_ms = now_ms;

                    // (a) Transport: reconnect probe + inbound drain.
                    wifi.ensure_connected(now_ms);
                    if !transport.is_connected()
                        && now_ms.wrapping_sub(last_reconnect_ms) >= cfg.reconnect_delay_ms
                    {
                        last_reconnect_ms = now_ms;
                        if transport.reconnect().is_err() {
                            log::debug!("mqtt: broker still unreachable");
                        }
                    }
                    while let Some(msg) = transport.poll_incoming() {
                        if msg.topic == cfg.state_topic {
                            panel.handle_state_event(
                                event_source::decode_state(&msg.payload),
                                &mut hw,
                                &mut sink,
                            );
                        }
                    }

                    // (b) Local input: badge presence check.
                    if let Some(uid) = badge.poll_new_credential(now_ms) {
                        panel.notify_activity(Activity::BadgeScanned, &mut hw, &mut sink);
                        match event_source::publish_badge(&mut transport, &cfg.card_topic, &uid)
                        {
                            Ok(hex) => sink.emit(&PanelEvent::BadgePublished(hex)),
                            Err(e) => warn!("Badge publish failed: {e}"),
                        }
                    }

                    // (c)(d)(e) Reassert rule, screen countdown, beeper.
                    panel.tick(elapsed_ms, &mut hw, &mut delay, &mut sink);
                }
            }
        });

        watchdog.feed();

        // The tick timer wakes this task; between events just yield.
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
