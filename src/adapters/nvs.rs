//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`]: the panel configuration is persisted as a
//! single `postcard` blob. Writes are atomic (ESP-IDF commits per
//! `nvs_commit()`; the in-memory simulation trivially so), and every save
//! is range-validated first — a corrupted or malicious blob can not
//! disable the screen timeout.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::PanelConfig;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "alarmpanel";
const CONFIG_KEY: &str = "panelcfg";

/// Maximum serialized config size we ever read back.
const MAX_BLOB_SIZE: usize = 1024;

pub struct NvsStore {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsStore {
    /// Create the store and initialise the NVS flash partition.
    ///
    /// On first boot or after an IDF version bump the partition is erased
    /// and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init/erase run from the single main task
            // before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    // ── Blob access, ESP-IDF backend ──────────────────────────

    #[cfg(target_os = "espidf")]
    fn read_blob(&self, key: &str, buf: &mut [u8]) -> Result<usize, ConfigError> {
        let ns = Self::cstr16(CONFIG_NAMESPACE);
        let key_c = Self::cstr16(key);
        let mut handle: nvs_handle_t = 0;

        // SAFETY: ns/key_c are NUL-terminated buffers; handle is closed on
        // every path below.
        unsafe {
            if nvs_open(ns.as_ptr().cast(), nvs_open_mode_t_NVS_READONLY, &mut handle) != ESP_OK {
                return Err(ConfigError::NotFound);
            }
            let mut len = buf.len();
            let ret = nvs_get_blob(handle, key_c.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut len);
            nvs_close(handle);
            match ret {
                x if x == ESP_OK => Ok(len),
                x if x == ESP_ERR_NVS_NOT_FOUND => Err(ConfigError::NotFound),
                _ => Err(ConfigError::IoError),
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let ns = Self::cstr16(CONFIG_NAMESPACE);
        let key_c = Self::cstr16(key);
        let mut handle: nvs_handle_t = 0;

        // SAFETY: as in read_blob; commit before close makes the write
        // atomic from the panel's point of view.
        unsafe {
            if nvs_open(ns.as_ptr().cast(), nvs_open_mode_t_NVS_READWRITE, &mut handle) != ESP_OK {
                return Err(ConfigError::IoError);
            }
            let ret = nvs_set_blob(handle, key_c.as_ptr().cast(), data.as_ptr().cast(), data.len());
            if ret != ESP_OK {
                nvs_close(handle);
                return Err(if ret == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                    ConfigError::StorageFull
                } else {
                    ConfigError::IoError
                });
            }
            let ret = nvs_commit(handle);
            nvs_close(handle);
            if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
        }
        Ok(())
    }

    /// NVS namespaces/keys are limited to 15 characters + NUL.
    #[cfg(target_os = "espidf")]
    fn cstr16(s: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let len = s.len().min(15);
        buf[..len].copy_from_slice(&s.as_bytes()[..len]);
        buf
    }

    // ── Blob access, simulation backend ───────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn read_blob(&self, key: &str, buf: &mut [u8]) -> Result<usize, ConfigError> {
        let store = self.store.borrow();
        let blob = store
            .get(&format!("{CONFIG_NAMESPACE}::{key}"))
            .ok_or(ConfigError::NotFound)?;
        let n = blob.len().min(buf.len());
        buf[..n].copy_from_slice(&blob[..n]);
        Ok(n)
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_blob(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.store
            .borrow_mut()
            .insert(format!("{CONFIG_NAMESPACE}::{key}"), data.to_vec());
        Ok(())
    }
}

impl ConfigPort for NvsStore {
    fn load(&self) -> Result<PanelConfig, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        let len = self.read_blob(CONFIG_KEY, &mut buf)?;
        let config: PanelConfig =
            postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted)?;
        config
            .validate()
            .map_err(ConfigError::ValidationFailed)?;
        Ok(config)
    }

    fn save(&self, config: &PanelConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::ValidationFailed)?;
        let blob = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        self.write_blob(CONFIG_KEY, &blob)?;
        info!("NvsStore: config saved ({} bytes)", blob.len());
        Ok(())
    }
}
