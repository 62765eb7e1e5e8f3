//! Integration tests for the PanelService → controllers → output-port
//! pipeline, covering the presentation scenarios end to end.

use crate::mock_hw::{HwCall, MockPanelHw, NoDelay, RecordingSink};

use alarmpanel::adapters::event_source::decode_state;
use alarmpanel::app::events::PanelEvent;
use alarmpanel::app::input::{Activity, PanelButton};
use alarmpanel::app::service::{ASSET_X, ASSET_Y, BOOT_PROMPT, PanelService};
use alarmpanel::config::PanelConfig;
use alarmpanel::fsm::AlarmState;
use alarmpanel::fsm::profile::AssetId;

fn make_panel() -> (PanelService, MockPanelHw, RecordingSink) {
    let cfg = PanelConfig::default();
    let panel = PanelService::new(&cfg);
    (panel, MockPanelHw::new(), RecordingSink::new())
}

/// Drive `n` control ticks at the default 200 ms loop period.
fn run_ticks(panel: &mut PanelService, hw: &mut MockPanelHw, sink: &mut RecordingSink, n: u32) {
    for _ in 0..n {
        panel.tick(200, hw, &mut NoDelay, sink);
    }
}

// ── Boot ─────────────────────────────────────────────────────

#[test]
fn boot_shows_prompt_and_renders_no_asset() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.boot(&mut hw, &mut sink);

    assert_eq!(hw.title(), Some(BOOT_PROMPT));
    assert_eq!(hw.draws(), 0, "no asset before the first state event");
    assert_eq!(panel.state(), AlarmState::Unknown);
    assert!(panel.screen_on());
}

// ── Triggered alarm ──────────────────────────────────────────

#[test]
fn triggered_applies_full_presentation() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"triggered"), &mut hw, &mut sink);

    assert_eq!(panel.state(), AlarmState::Triggered);
    assert_eq!(hw.last_fill(), Some((255, 0, 0)));
    assert_eq!(hw.title(), Some("Intrusion!!!"));
    assert!(panel.screen_on());
    assert!(panel.beeper_active());
    assert!(
        hw.calls
            .contains(&HwCall::DrawAsset(AssetId::Triggered, ASSET_X, ASSET_Y))
    );
}

#[test]
fn triggered_beeps_every_fourth_tick() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"triggered"), &mut hw, &mut sink);

    run_ticks(&mut panel, &mut hw, &mut sink, 8);
    // Pulses on ticks 0 and 4 since start.
    assert_eq!(hw.pulses(), 2);
}

// ── Armed, then a quiet stretch ──────────────────────────────

#[test]
fn armed_home_chirps_once_and_screen_times_out() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"armed_home"), &mut hw, &mut sink);

    assert_eq!(panel.state(), AlarmState::ArmedHome);
    assert_eq!(hw.title(), Some("Armed Home"));
    assert_eq!(hw.last_fill(), Some((0, 0, 255)));
    assert_eq!(hw.pulses(), 1, "single confirmation chirp");
    assert!(!panel.beeper_active());

    run_ticks(&mut panel, &mut hw, &mut sink, 1_000);

    assert_eq!(hw.pulses(), 1, "armed states never beep periodically");
    assert!(!panel.screen_on(), "screen must auto-off after the countdown");
    assert_eq!(sink.screen_sleeps(), 1);
    // Fade ended dark with the strip blanked.
    assert_eq!(hw.brightness(), Some(0));
    assert_eq!(hw.last_fill(), Some((0, 0, 0)));
}

// ── Pending keeps the screen awake ───────────────────────────

#[test]
fn pending_reassert_outlives_the_wake_countdown() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"pending"), &mut hw, &mut sink);
    let initial = panel.screen_remaining_ms();

    // 100 ticks × 200 ms = 20 s, double the default wake duration.
    run_ticks(&mut panel, &mut hw, &mut sink, 100);

    assert!(panel.screen_on(), "reassert rule must keep the screen on");
    // Each tick re-wakes before the countdown advances, so the remaining
    // time never drops more than one tick below the wake value.
    assert!(panel.screen_remaining_ms() >= initial - 200);
    assert_eq!(sink.screen_sleeps(), 0);
}

#[test]
fn disarm_after_pending_releases_the_screen() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"pending"), &mut hw, &mut sink);
    run_ticks(&mut panel, &mut hw, &mut sink, 100);
    assert!(panel.screen_on());

    panel.handle_state_event(decode_state(b"disarmed"), &mut hw, &mut sink);
    assert!(!panel.beeper_active());
    run_ticks(&mut panel, &mut hw, &mut sink, 60);
    assert!(!panel.screen_on(), "without attention the countdown expires");
}

// ── Garbage payloads ─────────────────────────────────────────

#[test]
fn garbage_changes_nothing() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"disarmed"), &mut hw, &mut sink);
    let state_before = panel.state();
    let remaining_before = panel.screen_remaining_ms();
    hw.clear();

    panel.handle_state_event(decode_state(b"garbage"), &mut hw, &mut sink);

    assert_eq!(panel.state(), state_before);
    assert_eq!(panel.screen_remaining_ms(), remaining_before);
    assert!(hw.calls.is_empty(), "no controller/port call on garbage");
    assert_eq!(sink.ignored_count(), 1);
}

#[test]
fn garbage_does_not_reset_the_beep_phase() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"triggered"), &mut hw, &mut sink);
    run_ticks(&mut panel, &mut hw, &mut sink, 3); // pulse fired at tick 0

    panel.handle_state_event(decode_state(b"nonsense"), &mut hw, &mut sink);
    run_ticks(&mut panel, &mut hw, &mut sink, 1); // tick 3 since start
    assert_eq!(hw.pulses(), 1, "phase must be untouched by garbage");
    run_ticks(&mut panel, &mut hw, &mut sink, 1); // tick 4 → second pulse
    assert_eq!(hw.pulses(), 2);
}

// ── Duplicates re-trigger ────────────────────────────────────

#[test]
fn duplicate_state_replays_all_side_effects() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"armed_away"), &mut hw, &mut sink);
    panel.handle_state_event(decode_state(b"armed_away"), &mut hw, &mut sink);

    assert_eq!(hw.draws(), 2, "duplicate must redraw");
    assert_eq!(hw.pulses(), 2, "duplicate must re-chirp");
    assert!(
        sink.events
            .iter()
            .filter(|e| matches!(
                e,
                PanelEvent::StateChanged { from: AlarmState::ArmedAway, to: AlarmState::ArmedAway }
            ))
            .count()
            == 1
    );
}

#[test]
fn duplicate_pending_resets_the_beep_phase() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"pending"), &mut hw, &mut sink);
    run_ticks(&mut panel, &mut hw, &mut sink, 7);

    // Re-asserting pending restarts the schedule at phase zero.
    panel.handle_state_event(decode_state(b"pending"), &mut hw, &mut sink);
    let pulses_before = hw.pulses();
    run_ticks(&mut panel, &mut hw, &mut sink, 1);
    assert_eq!(hw.pulses(), pulses_before + 1, "restart fires at tick 0");
}

// ── Side-effect ordering ─────────────────────────────────────

#[test]
fn side_effects_apply_in_fixed_order() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"armed_night"), &mut hw, &mut sink);

    let pos = |call: &HwCall| hw.calls.iter().position(|c| c == call);
    let fill = pos(&HwCall::Fill((0, 0, 255))).expect("colour set");
    let chirp = pos(&HwCall::Pulse).expect("chirp");
    let draw = pos(&HwCall::DrawAsset(AssetId::Armed, ASSET_X, ASSET_Y)).expect("redraw");
    let title = pos(&HwCall::SetTitle("Armed Night".to_string())).expect("title");
    let wake = pos(&HwCall::Wake).expect("wake");

    assert!(fill < chirp, "colour before beep");
    assert!(chirp < draw, "beep before redraw");
    assert!(draw < title, "asset before title");
    assert!(title < wake, "redraw before wake");
}

// ── Render failure tolerance ─────────────────────────────────

#[test]
fn failed_redraw_still_applies_colour_and_wake() {
    let (mut panel, mut hw, mut sink) = make_panel();
    hw.fail_draws = true;
    panel.handle_state_event(decode_state(b"triggered"), &mut hw, &mut sink);

    assert_eq!(hw.last_fill(), Some((255, 0, 0)));
    assert!(panel.screen_on());
    assert!(panel.beeper_active());
}

// ── Local activity ───────────────────────────────────────────

#[test]
fn button_press_wakes_without_state_change() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"disarmed"), &mut hw, &mut sink);
    run_ticks(&mut panel, &mut hw, &mut sink, 40); // 8 s of the 10 s budget

    panel.notify_activity(
        Activity::ButtonPressed(PanelButton::B),
        &mut hw,
        &mut sink,
    );
    assert_eq!(panel.state(), AlarmState::Disarmed);
    assert_eq!(panel.screen_remaining_ms(), 10_000, "wake restores the full budget");

    run_ticks(&mut panel, &mut hw, &mut sink, 40);
    assert!(panel.screen_on(), "fresh wake outlives the old countdown");
}

#[test]
fn wake_from_off_restores_the_state_colour() {
    let (mut panel, mut hw, mut sink) = make_panel();
    panel.handle_state_event(decode_state(b"armed_home"), &mut hw, &mut sink);
    run_ticks(&mut panel, &mut hw, &mut sink, 60); // screen times out
    assert!(!panel.screen_on());
    assert_eq!(hw.last_fill(), Some((0, 0, 0)));

    panel.notify_activity(Activity::ButtonPressed(PanelButton::A), &mut hw, &mut sink);
    assert!(panel.screen_on());
    assert_eq!(hw.last_fill(), Some((0, 0, 255)), "armed blue restored");
}
