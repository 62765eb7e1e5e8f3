//! Speaker driver (LEDC tone).
//!
//! One `pulse()` is a short fixed-length chirp: tone duty on, bounded
//! sleep, duty off. The pause is part of the intentional, bounded blocking
//! budget of the tick loop (15 ms at most once per beeper tick).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: square wave on the speaker LEDC channel.
//! On host/test: counts pulses in-memory only.

use crate::drivers::hw_init;

/// Chirp length in milliseconds.
#[cfg(target_os = "espidf")]
const PULSE_MS: u64 = 15;
/// 50% duty square wave at the configured tone frequency.
const TONE_DUTY: u8 = 128;

pub struct SpeakerDriver {
    pulses_emitted: u64,
}

impl SpeakerDriver {
    pub fn new() -> Self {
        Self { pulses_emitted: 0 }
    }

    /// Emit one beep pulse.
    pub fn pulse(&mut self) {
        hw_init::ledc_set(hw_init::LEDC_CH_SPEAKER, TONE_DUTY);
        #[cfg(target_os = "espidf")]
        std::thread::sleep(std::time::Duration::from_millis(PULSE_MS));
        hw_init::ledc_set(hw_init::LEDC_CH_SPEAKER, 0);
        self.pulses_emitted += 1;
    }

    pub fn pulses_emitted(&self) -> u64 {
        self.pulses_emitted
    }
}

impl Default for SpeakerDriver {
    fn default() -> Self {
        Self::new()
    }
}
