//! Mock hardware adapter for integration tests.
//!
//! Records every output-port call so tests can assert on the full command
//! history without touching real LCD/RMT/LEDC peripherals.

use alarmpanel::app::events::PanelEvent;
use alarmpanel::app::ports::{
    BeeperPort, DisplayPort, EventSink, InboundMessage, IndicatorPort, Transport,
};
use alarmpanel::error::{RenderError, TransportError};
use alarmpanel::fsm::profile::{AssetId, Rgb};
use embedded_hal::delay::DelayNs;
use std::collections::VecDeque;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    DrawAsset(AssetId, i32, i32),
    SetTitle(String),
    SetBrightness(u8),
    Sleep,
    Wake,
    Fill(Rgb),
    Pulse,
}

// ── MockPanelHw ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockPanelHw {
    pub calls: Vec<HwCall>,
    pub fail_draws: bool,
}

#[allow(dead_code)]
impl MockPanelHw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fill(&self) -> Option<Rgb> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Fill(rgb) => Some(*rgb),
            _ => None,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::SetTitle(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn brightness(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::SetBrightness(b) => Some(*b),
            _ => None,
        })
    }

    pub fn pulses(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, HwCall::Pulse)).count()
    }

    pub fn draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::DrawAsset(..)))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DisplayPort for MockPanelHw {
    fn draw_asset(&mut self, asset: AssetId, x: i32, y: i32) -> Result<(), RenderError> {
        if self.fail_draws {
            return Err(RenderError::DrawFailed);
        }
        self.calls.push(HwCall::DrawAsset(asset, x, y));
        Ok(())
    }

    fn set_title(&mut self, text: &str) {
        self.calls.push(HwCall::SetTitle(text.to_string()));
    }

    fn set_brightness(&mut self, percent: u8) {
        self.calls.push(HwCall::SetBrightness(percent));
    }

    fn sleep(&mut self) {
        self.calls.push(HwCall::Sleep);
    }

    fn wake(&mut self) {
        self.calls.push(HwCall::Wake);
    }
}

impl IndicatorPort for MockPanelHw {
    fn fill(&mut self, color: Rgb) {
        self.calls.push(HwCall::Fill(color));
    }
}

impl BeeperPort for MockPanelHw {
    fn pulse(&mut self) {
        self.calls.push(HwCall::Pulse);
    }
}

// ── MockTransport ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockTransport {
    pub connected: bool,
    pub incoming: VecDeque<InboundMessage>,
    pub published: Vec<(String, Vec<u8>)>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }

    pub fn inject(&mut self, topic: &str, payload: &[u8]) {
        self.incoming.push_back(InboundMessage {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
    }
}

impl Transport for MockTransport {
    fn poll_incoming(&mut self) -> Option<InboundMessage> {
        if !self.connected {
            return None;
        }
        self.incoming.pop_front()
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<PanelEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignored_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PanelEvent::Ignored(_)))
            .count()
    }

    pub fn screen_sleeps(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PanelEvent::ScreenSleep))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &PanelEvent) {
        self.events.push(event.clone());
    }
}

// ── NoDelay ───────────────────────────────────────────────────

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
