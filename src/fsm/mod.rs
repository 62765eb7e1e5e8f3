//! Alarm presentation state machine.
//!
//! Tracks the panel's current alarm state and the "attention" flag that
//! keeps the screen awake while a condition is unresolved. The machine is
//! deliberately flat: every recognized event maps to exactly one state and
//! there are no guarded transitions —
//!
//! ```text
//!            armed_away / armed_home / armed_night
//!   ┌──────────────────────────────────────────────┐
//!   │                                              ▼
//! (any state) ──disarmed──▶ Disarmed     ArmedAway/Home/Night
//!   │                                              │
//!   ├──pending──▶ Pending ──┐                      │
//!   ├──arming───▶ Arming ───┼── attention flag ────┘
//!   └──triggered▶ Triggered ┘   (screen re-woken every tick)
//! ```
//!
//! Duplicate events are **not** deduplicated: a retained or repeated
//! message re-applies the full presentation, so a panel that missed a
//! redraw self-heals on the next broker delivery.

pub mod profile;

/// The panel's logical alarm state. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmState {
    ArmedAway,
    ArmedHome,
    ArmedNight,
    Disarmed,
    Pending,
    Arming,
    Triggered,
    /// Boot default — nothing has been received yet, nothing renders.
    Unknown,
}

impl AlarmState {
    /// Entry into one of the armed states gets a single confirmation chirp
    /// instead of a periodic cadence.
    pub fn is_armed(self) -> bool {
        matches!(self, Self::ArmedAway | Self::ArmedHome | Self::ArmedNight)
    }

    /// States that represent an unresolved condition: the screen is
    /// re-woken on every tick while one of these is current.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Pending | Self::Arming | Self::Triggered)
    }
}

/// Truncated, printable copy of an unrecognized payload, kept for logging.
pub type RawPayload = heapless::String<48>;

/// Input alphabet of the state machine.
///
/// Decoding raw broker payloads into these variants happens at the
/// transport boundary ([`crate::adapters::event_source`]); the machine
/// itself never sees a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    ArmedAway,
    ArmedHome,
    ArmedNight,
    Disarmed,
    Triggered,
    Pending,
    Arming,
    /// Anything that is not an exact known token. Causes no transition and
    /// no side effect.
    Unrecognized(RawPayload),
}

impl StateEvent {
    /// The state this event asserts, or `None` for `Unrecognized`.
    pub fn target(&self) -> Option<AlarmState> {
        match self {
            Self::ArmedAway => Some(AlarmState::ArmedAway),
            Self::ArmedHome => Some(AlarmState::ArmedHome),
            Self::ArmedNight => Some(AlarmState::ArmedNight),
            Self::Disarmed => Some(AlarmState::Disarmed),
            Self::Triggered => Some(AlarmState::Triggered),
            Self::Pending => Some(AlarmState::Pending),
            Self::Arming => Some(AlarmState::Arming),
            Self::Unrecognized(_) => None,
        }
    }
}

/// The state machine proper: current state + attention flag.
///
/// Owned by [`crate::app::service::PanelService`]; controllers are driven
/// from there, never from here — this type stays pure.
pub struct PanelFsm {
    current: AlarmState,
    attention: bool,
}

impl PanelFsm {
    /// Boot state: `Unknown`, screen not held awake.
    pub fn new() -> Self {
        Self {
            current: AlarmState::Unknown,
            attention: false,
        }
    }

    /// Apply an event. Recognized events always transition (including
    /// self-transitions) and return the asserted state so the caller can
    /// replay the full presentation. `Unrecognized` returns `None` and
    /// leaves everything untouched.
    pub fn apply(&mut self, event: &StateEvent) -> Option<AlarmState> {
        let next = event.target()?;
        self.current = next;
        self.attention = next.needs_attention();
        Some(next)
    }

    /// The current alarm state.
    pub fn current(&self) -> AlarmState {
        self.current
    }

    /// Whether the per-tick screen re-wake rule is active.
    pub fn needs_attention(&self) -> bool {
        self.attention
    }
}

impl Default for PanelFsm {
    fn default() -> Self {
        Self::new()
    }
}
