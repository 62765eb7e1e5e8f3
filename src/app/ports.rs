//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PanelService (domain)
//! ```
//!
//! Driven adapters (MQTT transport, badge reader, display, strip, speaker,
//! event sinks, config storage) implement these traits. The
//! [`PanelService`](super::service::PanelService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::config::PanelConfig;
use crate::error::{RenderError, TransportError};
use crate::fsm::profile::{AssetId, Rgb};

// ───────────────────────────────────────────────────────────────
// Transport port (MQTT pub/sub)
// ───────────────────────────────────────────────────────────────

/// A raw inbound broker message, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Publish/subscribe channel to the alarm controller.
///
/// `poll_incoming` is non-blocking: absence of a message is not an error,
/// just "no event this tick". QoS/retain/LWT are fixed at connection time
/// by the adapter, not negotiated per call.
pub trait Transport {
    /// Next pending inbound message, if any.
    fn poll_incoming(&mut self) -> Option<InboundMessage>;

    /// Publish `payload` on `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Whether the broker connection is currently up.
    fn is_connected(&self) -> bool;

    /// Attempt one (re)connect + resubscribe. The tick loop spaces calls
    /// by a fixed configured delay; this must not block on its own retry
    /// loop.
    fn reconnect(&mut self) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Badge reader port
// ───────────────────────────────────────────────────────────────

/// A raw badge UID (MFRC522 UIDs are 4, 7 or 10 bytes).
pub type CredentialId = heapless::Vec<u8, 10>;

/// Non-blocking presence check for a freshly presented badge.
pub trait BadgeReader {
    /// A new credential if one was presented since the last poll.
    /// Malformed or zero-length UIDs are swallowed here — the domain never
    /// sees them. `now_ms` drives the post-read cooldown.
    fn poll_new_credential(&mut self, now_ms: u32) -> Option<CredentialId>;
}

// ───────────────────────────────────────────────────────────────
// Output ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Status display: asset/title rendering plus the screen-power primitive.
pub trait DisplayPort {
    /// Draw a state asset with its top-left corner at (`x`, `y`).
    fn draw_asset(&mut self, asset: AssetId, x: i32, y: i32) -> Result<(), RenderError>;

    /// Replace the title band text.
    fn set_title(&mut self, text: &str);

    /// Backlight level, 0-100.
    fn set_brightness(&mut self, percent: u8);

    /// Power the display down (brightness is already 0 by then).
    fn sleep(&mut self);

    /// Power the display up (brightness set separately).
    fn wake(&mut self);
}

/// RGB indicator strip: a single solid fill.
pub trait IndicatorPort {
    fn fill(&mut self, color: Rgb);
}

/// Audible beeper: one pulse per call.
pub trait BeeperPort {
    fn pulse(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`PanelEvent`](super::events::PanelEvent)s
/// through this port. Adapters decide where they go (serial log, a
/// diagnostics topic, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::PanelEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists panel configuration.
///
/// Implementations MUST validate before persisting: invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<PanelConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &PanelConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
