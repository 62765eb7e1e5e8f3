//! Screen power controller.
//!
//! Manages the on/off lifecycle of the display with an inactivity timeout
//! and a graceful fade. The countdown is decremented by *measured* elapsed
//! milliseconds each tick (the loop period is not constant — transport
//! polling time varies), and a wake never shortens an existing countdown.
//!
//! The fade-off sequence is the one intentional blocking step in the whole
//! firmware: a fixed number of monotonically decreasing brightness steps,
//! paced through [`DelayNs`], executed atomically within a single tick.
//! Because every `wake` re-asserts nominal brightness, no partial-fade
//! brightness level can outlive a wake.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{DisplayPort, IndicatorPort};
use crate::control::indicator::IndicatorController;

pub struct ScreenController {
    on: bool,
    remaining_ms: u32,
    /// Nominal backlight level while on (0-100). Not proportional to the
    /// remaining time.
    brightness: u8,
    fade_steps: u8,
    fade_step_ms: u32,
}

impl ScreenController {
    /// Starts off (dark) — the first wake turns the screen on.
    pub fn new(brightness: u8, fade_steps: u8, fade_step_ms: u32) -> Self {
        Self {
            on: false,
            remaining_ms: 0,
            brightness,
            fade_steps,
            fade_step_ms,
        }
    }

    /// Keep the screen awake for at least `duration_ms` more.
    ///
    /// Never shortens an existing countdown. When the screen is off this
    /// powers it back up at full nominal brightness and re-applies the last
    /// indicator colour. Returns `true` if the screen transitioned from
    /// off to on.
    pub fn wake<HW>(
        &mut self,
        duration_ms: u32,
        hw: &mut HW,
        indicator: &IndicatorController,
    ) -> bool
    where
        HW: DisplayPort + IndicatorPort,
    {
        self.remaining_ms = self.remaining_ms.max(duration_ms);

        let was_off = !self.on;
        if was_off {
            hw.wake();
            indicator.restore(hw);
        }
        // Always re-assert nominal brightness: this also restores a screen
        // that was mid-fade when the wake arrived.
        hw.set_brightness(self.brightness);
        self.on = true;

        was_off
    }

    /// Advance the countdown by the measured elapsed time.
    ///
    /// No-op while off. When the countdown reaches zero, runs the blocking
    /// fade, powers the display down and blanks the indicator strip.
    /// Returns `true` if the screen turned off during this tick.
    pub fn tick<HW>(
        &mut self,
        elapsed_ms: u32,
        hw: &mut HW,
        delay: &mut impl DelayNs,
        indicator: &IndicatorController,
    ) -> bool
    where
        HW: DisplayPort + IndicatorPort,
    {
        if !self.on {
            return false;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms > 0 {
            return false;
        }

        self.fade_off(hw, delay);
        hw.sleep();
        self.on = false;
        indicator.blank(hw);
        true
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    // ── Internal ──────────────────────────────────────────────

    /// Bounded blocking fade: `fade_steps` monotonically decreasing
    /// brightness levels ending at 0.
    fn fade_off<HW: DisplayPort>(&self, hw: &mut HW, delay: &mut impl DelayNs) {
        let steps = u32::from(self.fade_steps);
        for step in (0..steps).rev() {
            let level = (u32::from(self.brightness) * step / steps) as u8;
            hw.set_brightness(level);
            delay.delay_ms(self.fade_step_ms);
        }
    }
}
