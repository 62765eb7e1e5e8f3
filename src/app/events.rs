//! Outbound application events.
//!
//! The [`PanelService`](super::service::PanelService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, mirror onto a
//! diagnostics topic, etc.

use crate::fsm::{AlarmState, RawPayload};

/// Hex-encoded badge UID, e.g. `AB-CD-12-34`.
pub type CredentialHex = heapless::String<32>;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// The panel service has started (boot prompt shown, state unknown).
    Started,

    /// A recognized state event was applied. `from == to` for re-asserted
    /// duplicates — those still replay the full presentation.
    StateChanged { from: AlarmState, to: AlarmState },

    /// An inbound payload matched no known token and was ignored.
    Ignored(RawPayload),

    /// The screen turned on (was off).
    ScreenWake,

    /// The screen timed out and faded off.
    ScreenSleep,

    /// A badge UID was published on the card topic.
    BadgePublished(CredentialHex),
}
