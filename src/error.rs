//! Unified error types for the panel firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform. All variants are `Copy` so they
//! can be passed around the tick loop without allocation. The tick loop
//! itself never fails: everything here is logged and absorbed.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The MQTT transport failed.
    Transport(TransportError),
    /// A display redraw failed.
    Render(RenderError),
    /// The badge reader bus or protocol failed.
    Badge(BadgeError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
            Self::Badge(e) => write!(f, "badge: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The broker connection is not established.
    NotConnected,
    /// Connecting (or re-connecting) to the broker failed.
    ConnectFailed,
    /// Subscribing to the state topic failed.
    SubscribeFailed,
    /// An outbound publish was rejected or could not be queued.
    PublishFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::PublishFailed => write!(f, "publish failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Render errors
// ---------------------------------------------------------------------------

/// A redraw failure is reported upward and logged, never fatal: a failed
/// asset draw must not prevent the colour/beep side effects from applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The draw target rejected the pixel writes.
    DrawFailed,
    /// The requested asset position is outside the panel area.
    OutOfBounds,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DrawFailed => write!(f, "draw failed"),
            Self::OutOfBounds => write!(f, "asset position out of bounds"),
        }
    }
}

impl From<RenderError> for Error {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

// ---------------------------------------------------------------------------
// Badge reader errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeError {
    /// The I²C transaction with the MFRC522 failed.
    BusFailed,
    /// The card did not answer within the bounded poll window.
    Timeout,
    /// The transceiver flagged a protocol/CRC error.
    ProtocolError,
    /// The UID check byte did not match the received UID.
    BadChecksum,
}

impl fmt::Display for BadgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusFailed => write!(f, "bus transaction failed"),
            Self::Timeout => write!(f, "card timeout"),
            Self::ProtocolError => write!(f, "protocol error"),
            Self::BadChecksum => write!(f, "UID checksum mismatch"),
        }
    }
}

impl From<BadgeError> for Error {
    fn from(e: BadgeError) -> Self {
        Self::Badge(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
