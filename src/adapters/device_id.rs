//! Device identity.
//!
//! Derives the default MQTT client id from the factory-programmed MAC so
//! that multiple panels on one broker never collide. The config can still
//! pin an explicit id.

/// Factory MAC address.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> [u8; 6] {
    let mut mac = [0u8; 6];
    // SAFETY: esp_efuse_mac_get_default writes exactly 6 bytes.
    let ret = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    if ret != esp_idf_svc::sys::ESP_OK {
        log::warn!("device_id: eFuse MAC read failed (rc={}), using zeros", ret);
    }
    mac
}

/// Fixed MAC for host-side simulation.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> [u8; 6] {
    [0x24, 0x6F, 0x28, 0x00, 0xBE, 0xEF]
}

/// Default MQTT client id, e.g. `alarmpanel-00BEEF`.
pub fn client_id(mac: &[u8; 6]) -> String {
    format!("alarmpanel-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_uses_low_mac_bytes() {
        let id = client_id(&[0xAA, 0xBB, 0xCC, 0x11, 0x22, 0x33]);
        assert_eq!(id, "alarmpanel-112233");
    }

    #[test]
    fn sim_mac_is_stable() {
        assert_eq!(read_mac(), read_mac());
    }
}
