//! System configuration parameters.
//!
//! All tunable parameters for the alarm panel. Values can be overridden via
//! NVS; the state→presentation table itself is static data and lives in
//! [`crate::fsm::profile`], not here.

use serde::{Deserialize, Serialize};

/// Core panel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    // --- WiFi ---
    /// Station SSID.
    pub wifi_ssid: String,
    /// Station passphrase (empty for an open network).
    pub wifi_password: String,

    // --- MQTT ---
    /// Broker hostname or IP.
    pub mqtt_host: String,
    /// Broker port.
    pub mqtt_port: u16,
    /// Optional broker credentials.
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    /// Client id; `None` derives one from the device MAC.
    pub mqtt_client_id: Option<String>,
    /// MQTT keep-alive interval (seconds).
    pub keep_alive_secs: u16,
    /// Topic carrying alarm state tokens.
    pub state_topic: String,
    /// Topic badge UIDs are published on.
    pub card_topic: String,
    /// Availability topic (LWT `offline`, retained `online` after connect).
    pub status_topic: String,
    /// Fixed delay between reconnect attempts (milliseconds).
    pub reconnect_delay_ms: u32,

    // --- Screen ---
    /// How long a wake keeps the screen on (milliseconds).
    pub screen_wake_ms: u32,
    /// Nominal backlight level while on (0-100%).
    pub screen_brightness: u8,
    /// Number of brightness steps in the fade-off sequence.
    pub fade_steps: u8,
    /// Pause between fade steps (milliseconds).
    pub fade_step_ms: u32,

    // --- Badge reader ---
    /// Ignore further card presentations for this long after a read
    /// (milliseconds).
    pub badge_cooldown_ms: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds).
    pub tick_interval_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            // WiFi
            wifi_ssid: String::new(),
            wifi_password: String::new(),

            // MQTT
            mqtt_host: "mqtt.local".to_string(),
            mqtt_port: 1883,
            mqtt_username: None,
            mqtt_password: None,
            mqtt_client_id: None,
            keep_alive_secs: 60,
            state_topic: "alarm/state".to_string(),
            card_topic: "alarm/panel/garage/card".to_string(),
            status_topic: "alarm/panel/garage/status".to_string(),
            reconnect_delay_ms: 5_000,

            // Screen
            screen_wake_ms: 10_000,
            screen_brightness: 50,
            fade_steps: 50,
            fade_step_ms: 20,

            // Badge reader
            badge_cooldown_ms: 2_000,

            // Timing
            tick_interval_ms: 200,
        }
    }
}

impl PanelConfig {
    /// Range-check every field. Invalid configs are rejected, not clamped,
    /// so a bad NVS blob or provisioning payload cannot disable the screen
    /// timeout or the fade.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.mqtt_host.is_empty() {
            return Err("mqtt_host must not be empty");
        }
        if self.mqtt_port == 0 {
            return Err("mqtt_port must be non-zero");
        }
        if self.state_topic.is_empty() || self.card_topic.is_empty() {
            return Err("topics must not be empty");
        }
        if self.screen_brightness == 0 || self.screen_brightness > 100 {
            return Err("screen_brightness must be 1-100");
        }
        if self.fade_steps == 0 {
            return Err("fade_steps must be non-zero");
        }
        if self.screen_wake_ms == 0 {
            return Err("screen_wake_ms must be non-zero");
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be non-zero");
        }
        Ok(())
    }
}
