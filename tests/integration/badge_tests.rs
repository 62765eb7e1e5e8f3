//! Badge scan → wake + publish-sequence integration tests.

use crate::mock_hw::{MockPanelHw, MockTransport, NoDelay, RecordingSink};

use alarmpanel::adapters::event_source::{decode_state, publish_badge};
use alarmpanel::app::input::Activity;
use alarmpanel::app::service::PanelService;
use alarmpanel::config::PanelConfig;
use alarmpanel::fsm::AlarmState;

const CARD_TOPIC: &str = "alarm/panel/garage/card";

fn make_panel() -> (PanelService, MockPanelHw, RecordingSink) {
    (
        PanelService::new(&PanelConfig::default()),
        MockPanelHw::new(),
        RecordingSink::new(),
    )
}

// ── Badge scan while disarmed ────────────────────────────────

#[test]
fn badge_scan_while_disarmed_wakes_and_publishes() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"disarmed"), &mut hw, &mut sink);

    // Let the screen expire so the wake is observable.
    for _ in 0..60 {
        panel.tick(200, &mut hw, &mut NoDelay, &mut sink);
    }
    assert!(!panel.screen_on());

    let mut transport = MockTransport::connected();
    panel.notify_activity(Activity::BadgeScanned, &mut hw, &mut sink);
    let hex = publish_badge(&mut transport, CARD_TOPIC, &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

    assert!(panel.screen_on(), "badge scan must wake the screen");
    assert_eq!(panel.state(), AlarmState::Disarmed, "no state change");
    assert_eq!(hex.as_str(), "DE-AD-BE-EF");
    assert_eq!(
        transport.published,
        vec![
            (CARD_TOPIC.to_string(), Vec::new()),
            (CARD_TOPIC.to_string(), b"DE-AD-BE-EF".to_vec()),
        ],
        "empty payload clears the retained value before the UID"
    );
}

#[test]
fn failed_publish_does_not_stop_the_panel() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"disarmed"), &mut hw, &mut sink);

    let mut transport = MockTransport::default(); // disconnected
    panel.notify_activity(Activity::BadgeScanned, &mut hw, &mut sink);
    assert!(publish_badge(&mut transport, CARD_TOPIC, &[0x01]).is_err());
    assert!(transport.published.is_empty());

    // The tick loop keeps running regardless.
    for _ in 0..10 {
        panel.tick(200, &mut hw, &mut NoDelay, &mut sink);
    }
    assert_eq!(panel.state(), AlarmState::Disarmed);
}

// ── Disconnect tolerance ─────────────────────────────────────

#[test]
fn timing_continues_while_transport_is_down() {
    let (mut panel, mut hw, mut sink) = make_panel();
    let mut transport = MockTransport::default(); // never connected

    panel.handle_state_event(decode_state(b"armed_away"), &mut hw, &mut sink);
    assert!(panel.screen_on());

    // No inbound traffic for the whole window; the countdown still runs.
    for _ in 0..60 {
        assert!(transport.poll_incoming().is_none());
        panel.tick(200, &mut hw, &mut NoDelay, &mut sink);
    }
    assert!(!panel.screen_on(), "screen timing must not depend on the broker");
}

#[test]
fn messages_resume_after_reconnect() {
    let (mut panel, mut hw, mut sink) = make_panel();
    let mut transport = MockTransport::default();

    transport.inject("alarm/state", b"triggered");
    assert!(transport.poll_incoming().is_none(), "nothing while down");

    transport.reconnect().unwrap();
    let msg = transport.poll_incoming().expect("queued message after reconnect");
    panel.handle_state_event(decode_state(&msg.payload), &mut hw, &mut sink);
    assert_eq!(panel.state(), AlarmState::Triggered);
}
