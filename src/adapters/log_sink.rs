//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured panel events to the
//! logger (UART / USB-CDC in production). A diagnostics-topic MQTT sink
//! would implement the same trait.

use log::info;

use crate::app::events::PanelEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`PanelEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &PanelEvent) {
        match event {
            PanelEvent::Started => {
                info!("PANEL | started, state unknown");
            }
            PanelEvent::StateChanged { from, to } if from == to => {
                info!("STATE | {:?} re-asserted", to);
            }
            PanelEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            PanelEvent::Ignored(raw) => {
                info!("STATE | ignored payload {:?}", raw.as_str());
            }
            PanelEvent::ScreenWake => {
                info!("SCREEN | on");
            }
            PanelEvent::ScreenSleep => {
                info!("SCREEN | off (timeout)");
            }
            PanelEvent::BadgePublished(hex) => {
                info!("BADGE | published {}", hex.as_str());
            }
        }
    }
}
