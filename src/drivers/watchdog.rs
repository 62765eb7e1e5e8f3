//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the panel if the tick loop stalls for more than 10 seconds —
//! longer than the worst-case fade plus a reconnect probe, so normal
//! operation never trips it. The loop must call `feed()` every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT configuration from the single main task at boot.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("watchdog: reconfigure returned {} (may already be set up)", ret);
                }

                let subscribed = esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK;
                if subscribed {
                    log::info!("watchdog: subscribed ({} ms, panic on trigger)", TIMEOUT_MS);
                } else {
                    log::warn!("watchdog: subscribe failed");
                }
                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("watchdog(sim): no-op ({} ms nominal)", TIMEOUT_MS);
            Self {}
        }
    }

    /// Feed the watchdog. Must be called at least every `TIMEOUT_MS`.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the task subscribed in new().
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}
