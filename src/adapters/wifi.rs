//! WiFi station-mode adapter.
//!
//! Brings the station link up before MQTT and keeps retrying with a fixed
//! delay between attempts if it drops. Credentials are validated up front
//! so a bad config fails loudly at boot instead of looping forever.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls.
//! - **all other targets**: simulation stubs for host-side tests.

use core::fmt;
use log::{info, warn};

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectFailed,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (8-64 bytes, or empty for open)"),
            Self::ConnectFailed => write!(f, "WiFi connection failed"),
        }
    }
}

fn validate_ssid(ssid: &str) -> Result<(), WifiError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(WifiError::InvalidSsid);
    }
    if !ssid.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        return Err(WifiError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), WifiError> {
    if password.is_empty() {
        return Ok(()); // open network
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(WifiError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Station link
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
}

pub struct WifiLink {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    /// Fixed delay between connect attempts (milliseconds).
    retry_delay_ms: u32,
    last_attempt_ms: Option<u32>,
    #[cfg(target_os = "espidf")]
    driver: Option<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>>,
}

impl WifiLink {
    pub fn new(ssid: &str, password: &str, retry_delay_ms: u32) -> Result<Self, WifiError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        Ok(Self {
            state: WifiState::Disconnected,
            ssid: ssid.try_into().map_err(|_| WifiError::InvalidSsid)?,
            password: password.try_into().map_err(|_| WifiError::InvalidPassword)?,
            retry_delay_ms,
            last_attempt_ms: None,
            #[cfg(target_os = "espidf")]
            driver: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Attempt to (re)establish the station link if the fixed retry delay
    /// has elapsed. Safe to call every tick.
    pub fn ensure_connected(&mut self, now_ms: u32) {
        if self.is_connected() {
            return;
        }
        if let Some(last) = self.last_attempt_ms {
            if now_ms.wrapping_sub(last) < self.retry_delay_ms {
                return;
            }
        }
        self.last_attempt_ms = Some(now_ms.max(1));

        match self.platform_connect() {
            Ok(()) => {
                info!("wifi: connected to '{}'", self.ssid);
                self.state = WifiState::Connected;
            }
            Err(e) => {
                warn!("wifi: connect failed ({e}), retrying in {} ms", self.retry_delay_ms);
                self.state = WifiState::Disconnected;
            }
        }
    }

    /// Mark the link lost (e.g. on a disconnect event).
    pub fn mark_disconnected(&mut self) {
        self.state = WifiState::Disconnected;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    pub fn attach_driver(
        &mut self,
        driver: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    ) {
        self.driver = Some(driver);
    }

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), WifiError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let Some(wifi) = self.driver.as_mut() else {
            return Err(WifiError::NoCredentials);
        };

        let auth = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method: auth,
            ..Default::default()
        });

        wifi.set_configuration(&conf)
            .map_err(|_| WifiError::ConnectFailed)?;
        if !wifi.is_started().unwrap_or(false) {
            wifi.start().map_err(|_| WifiError::ConnectFailed)?;
        }
        wifi.connect().map_err(|_| WifiError::ConnectFailed)?;
        wifi.wait_netif_up().map_err(|_| WifiError::ConnectFailed)?;
        Ok(())
    }

    /// Simulation: the first attempt succeeds.
    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), WifiError> {
        Ok(())
    }
}
