//! Local activity inputs.
//!
//! Button presses and badge presentations never change the alarm state;
//! they only keep the screen awake. State events arrive separately as
//! [`StateEvent`](crate::fsm::StateEvent)s decoded at the transport
//! boundary.

/// One of the three front buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelButton {
    A,
    B,
    C,
}

/// A local event that wakes the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    ButtonPressed(PanelButton),
    BadgeScanned,
}
