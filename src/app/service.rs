//! Panel service — the hexagonal core.
//!
//! [`PanelService`] owns the state machine and the three output
//! controllers, and exposes a clean, hardware-agnostic API. All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  StateEvent ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!   Activity  ──▶ │        PanelService          │
//!                 │  FSM · Screen · Beep · RGB   │──▶ Display/Strip/Beeper
//!      tick   ──▶ └─────────────────────────────┘      (ports)
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::PanelConfig;
use crate::control::beeper::BeeperController;
use crate::control::indicator::IndicatorController;
use crate::control::screen::ScreenController;
use crate::fsm::profile::presentation;
use crate::fsm::{PanelFsm, StateEvent};

use super::events::PanelEvent;
use super::input::Activity;
use super::ports::{BeeperPort, DisplayPort, EventSink, IndicatorPort};

/// Fixed asset position on the 320×240 panel.
pub const ASSET_X: i32 = 100;
pub const ASSET_Y: i32 = 60;

/// Title shown before the first recognized state event arrives.
pub const BOOT_PROMPT: &str = "Please present card!";

/// The application service orchestrates all presentation logic.
pub struct PanelService {
    fsm: PanelFsm,
    indicator: IndicatorController,
    beeper: BeeperController,
    screen: ScreenController,
    /// Default wake duration for every keep-awake event (milliseconds).
    wake_ms: u32,
    tick_count: u64,
}

impl PanelService {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            fsm: PanelFsm::new(),
            indicator: IndicatorController::new(),
            beeper: BeeperController::new(),
            screen: ScreenController::new(
                config.screen_brightness,
                config.fade_steps,
                config.fade_step_ms,
            ),
            wake_ms: config.screen_wake_ms,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Show the boot prompt and light the screen. No alarm state is
    /// rendered until the first recognized event.
    pub fn boot<HW>(&mut self, hw: &mut HW, sink: &mut impl EventSink)
    where
        HW: DisplayPort + IndicatorPort,
    {
        hw.set_title(BOOT_PROMPT);
        self.screen.wake(self.wake_ms, hw, &self.indicator);
        sink.emit(&PanelEvent::Started);
        info!("Panel started, waiting for first state event");
    }

    // ── Inbound state events ──────────────────────────────────

    /// Apply a decoded state event.
    ///
    /// Recognized events — duplicates included — replay the full side
    /// effects, in fixed order: indicator colour, beep schedule, display
    /// redraw, screen wake. `Unrecognized` causes no transition and no
    /// side effect of any kind (a retained garbage payload must not blank
    /// the display or reset the beeper).
    pub fn handle_state_event<HW>(
        &mut self,
        event: StateEvent,
        hw: &mut HW,
        sink: &mut impl EventSink,
    ) where
        HW: DisplayPort + IndicatorPort + BeeperPort,
    {
        let from = self.fsm.current();
        let Some(state) = self.fsm.apply(&event) else {
            if let StateEvent::Unrecognized(raw) = event {
                warn!("Ignoring unrecognized state payload: {:?}", raw.as_str());
                sink.emit(&PanelEvent::Ignored(raw));
            }
            return;
        };

        // Every recognized state has a table row; only Unknown does not,
        // and no event maps to Unknown.
        let Some(p) = presentation(state) else {
            return;
        };

        // 1. Indicator colour.
        self.indicator.set(p.color, hw);

        // 2. Beep schedule. Armed entry gets a single confirmation chirp.
        if p.entry_chirp {
            self.beeper.stop();
            hw.pulse();
        } else if let Some(cadence) = p.cadence {
            self.beeper.start(cadence);
        } else {
            self.beeper.stop();
        }

        // 3. Display redraw. A failed redraw is reported and skipped —
        // it must not stop the screen wake below.
        if let Err(e) = hw.draw_asset(p.asset, ASSET_X, ASSET_Y) {
            warn!("Asset redraw failed: {e}");
        }
        hw.set_title(p.label);

        // 4. Screen wake.
        if self.screen.wake(self.wake_ms, hw, &self.indicator) {
            sink.emit(&PanelEvent::ScreenWake);
        }

        sink.emit(&PanelEvent::StateChanged { from, to: state });
    }

    // ── Local activity ────────────────────────────────────────

    /// Button press or badge scan: wake the screen, nothing else.
    pub fn notify_activity<HW>(
        &mut self,
        activity: Activity,
        hw: &mut HW,
        sink: &mut impl EventSink,
    ) where
        HW: DisplayPort + IndicatorPort,
    {
        info!("Activity: {:?}", activity);
        if self.screen.wake(self.wake_ms, hw, &self.indicator) {
            sink.emit(&PanelEvent::ScreenWake);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle, in fixed order: (1) the reassert rule keeps
    /// the screen awake while the alarm condition is unresolved, (2) the
    /// screen countdown advances by the measured elapsed time, (3) the
    /// beeper schedule advances by one tick.
    pub fn tick<HW>(
        &mut self,
        elapsed_ms: u32,
        hw: &mut HW,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) where
        HW: DisplayPort + IndicatorPort + BeeperPort,
    {
        self.tick_count += 1;

        if self.fsm.needs_attention() {
            self.screen.wake(self.wake_ms, hw, &self.indicator);
        }

        if self.screen.tick(elapsed_ms, hw, delay, &self.indicator) {
            sink.emit(&PanelEvent::ScreenSleep);
        }

        if self.beeper.tick() {
            hw.pulse();
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The current alarm state.
    pub fn state(&self) -> crate::fsm::AlarmState {
        self.fsm.current()
    }

    /// Whether the screen is currently on.
    pub fn screen_on(&self) -> bool {
        self.screen.is_on()
    }

    /// Remaining screen-on time (milliseconds).
    pub fn screen_remaining_ms(&self) -> u32 {
        self.screen.remaining_ms()
    }

    /// Whether the beeper schedule is running.
    pub fn beeper_active(&self) -> bool {
        self.beeper.is_active()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
