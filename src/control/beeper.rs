//! Periodic beep controller.
//!
//! Owns the beep schedule exclusively; callers only issue `start(cadence)`
//! and `stop()`. The phase is counted in ticks-since-start, not
//! ticks-since-last-beep: the counter increments on every enabled tick
//! whether or not a pulse was emitted, so a cadence of `c` fires at ticks
//! 0, c, 2c, … relative to `start()` regardless of wall-clock jitter.

/// Beep schedule state. The controller reports *when* to pulse; actually
/// driving the speaker is the caller's job (via `BeeperPort`).
pub struct BeeperController {
    cadence: u32,
    counter: u64,
    active: bool,
}

impl BeeperController {
    pub fn new() -> Self {
        Self {
            cadence: 0,
            counter: 0,
            active: false,
        }
    }

    /// Enable the periodic beep. Resets the phase counter.
    /// A cadence of 0 means "beep on every tick".
    pub fn start(&mut self, cadence_ticks: u32) {
        self.cadence = cadence_ticks;
        self.counter = 0;
        self.active = true;
    }

    /// Disable and reset the schedule. No-op side effects when already off.
    pub fn stop(&mut self) {
        self.active = false;
        self.counter = 0;
    }

    /// Advance one tick. Returns `true` when a pulse should be emitted.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        let fire = self.cadence == 0 || self.counter % u64::from(self.cadence) == 0;
        self.counter += 1;
        fire
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for BeeperController {
    fn default() -> Self {
        Self::new()
    }
}
