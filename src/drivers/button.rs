//! Debounced front-button driver.
//!
//! Active-low momentary switches. The GPIO ISR records the raw press
//! timestamp into an atomic; `tick()` (called from the tick loop) applies
//! the debounce window and reports at most one press per physical push.
//! Only short presses exist on this panel — every press is an activity
//! event that wakes the screen.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::input::PanelButton;

const DEBOUNCE_MS: u32 = 50;

/// Raw ISR timestamps (milliseconds since boot), one slot per button.
/// Written by the ISRs, read by the tick loop.
static BUTTON_ISR_TIMESTAMPS: [AtomicU32; 3] =
    [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];

/// ISR handler — register on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
pub fn button_isr(index: usize, now_ms: u32) {
    if let Some(slot) = BUTTON_ISR_TIMESTAMPS.get(index) {
        slot.store(now_ms.max(1), Ordering::Release);
    }
}

pub struct ButtonDriver {
    which: PanelButton,
    slot: usize,
    /// Timestamp of the last ISR edge we already reported.
    last_handled: u32,
    /// When the last reported press fired (for the debounce window).
    last_fire_ms: u32,
}

impl ButtonDriver {
    pub fn new(which: PanelButton) -> Self {
        let slot = match which {
            PanelButton::A => 0,
            PanelButton::B => 1,
            PanelButton::C => 2,
        };
        Self {
            which,
            slot,
            last_handled: 0,
            last_fire_ms: 0,
        }
    }

    /// Call once per tick. Returns the button identity when a debounced
    /// press occurred since the last call.
    pub fn tick(&mut self, now_ms: u32) -> Option<PanelButton> {
        let ts = BUTTON_ISR_TIMESTAMPS[self.slot].load(Ordering::Acquire);
        if ts == 0 || ts == self.last_handled {
            return None;
        }
        self.last_handled = ts;

        // Edges inside the debounce window are switch bounce, not presses.
        if self.last_fire_ms != 0 && now_ms.wrapping_sub(self.last_fire_ms) < DEBOUNCE_MS {
            return None;
        }
        self.last_fire_ms = now_ms.max(1);
        Some(self.which)
    }
}
