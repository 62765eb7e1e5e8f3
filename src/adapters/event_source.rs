//! Event source codec — the string-matching boundary.
//!
//! Inbound broker payloads are classified into typed
//! [`StateEvent`](crate::fsm::StateEvent)s here, and badge credentials are
//! formatted for outbound publication here. The state machine itself never
//! compares strings.
//!
//! The wire contract is bit-exact: recognized payloads are exactly the
//! ASCII tokens below, case-sensitive, with no trimming. Everything else
//! is `Unrecognized` and causes no transition.

use log::debug;

use crate::app::events::CredentialHex;
use crate::app::ports::Transport;
use crate::error::TransportError;
use crate::fsm::{RawPayload, StateEvent};

// ── State tokens (wire-level, do not change) ──────────────────

pub const STATE_ARMED_AWAY: &[u8] = b"armed_away";
pub const STATE_ARMED_HOME: &[u8] = b"armed_home";
pub const STATE_ARMED_NIGHT: &[u8] = b"armed_night";
pub const STATE_DISARMED: &[u8] = b"disarmed";
pub const STATE_TRIGGERED: &[u8] = b"triggered";
pub const STATE_PENDING: &[u8] = b"pending";
pub const STATE_ARMING: &[u8] = b"arming";

/// Decode a raw state-topic payload into a typed event.
pub fn decode_state(payload: &[u8]) -> StateEvent {
    match payload {
        p if p == STATE_ARMED_AWAY => StateEvent::ArmedAway,
        p if p == STATE_ARMED_HOME => StateEvent::ArmedHome,
        p if p == STATE_ARMED_NIGHT => StateEvent::ArmedNight,
        p if p == STATE_DISARMED => StateEvent::Disarmed,
        p if p == STATE_TRIGGERED => StateEvent::Triggered,
        p if p == STATE_PENDING => StateEvent::Pending,
        p if p == STATE_ARMING => StateEvent::Arming,
        other => StateEvent::Unrecognized(snippet(other)),
    }
}

/// Printable, truncated copy of an unknown payload for diagnostics.
fn snippet(payload: &[u8]) -> RawPayload {
    let mut s = RawPayload::new();
    for &b in payload {
        let c = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        };
        if s.push(c).is_err() {
            break;
        }
    }
    s
}

// ── Badge formatting ──────────────────────────────────────────

/// Format a UID as uppercase hyphen-separated hex (`AB-CD-12-34`).
/// Returns `None` for an empty UID or one too long to encode.
pub fn encode_credential(uid: &[u8]) -> Option<CredentialHex> {
    use core::fmt::Write as _;

    if uid.is_empty() {
        return None;
    }
    let mut out = CredentialHex::new();
    for (i, byte) in uid.iter().enumerate() {
        let sep = if i == 0 { "" } else { "-" };
        if write!(out, "{sep}{byte:02X}").is_err() {
            return None;
        }
    }
    Some(out)
}

/// Publish a badge scan: one empty payload first (clears any retained
/// prior value on the broker), then the hex UID, both on `topic`.
pub fn publish_badge(
    transport: &mut impl Transport,
    topic: &str,
    uid: &[u8],
) -> Result<CredentialHex, TransportError> {
    let hex = encode_credential(uid).ok_or(TransportError::PublishFailed)?;
    debug!("Publishing badge {} on {}", hex.as_str(), topic);
    transport.publish(topic, b"")?;
    transport.publish(topic, hex.as_bytes())?;
    Ok(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::InboundMessage;
    use crate::fsm::StateEvent;

    #[test]
    fn all_tokens_decode() {
        assert_eq!(decode_state(b"armed_away"), StateEvent::ArmedAway);
        assert_eq!(decode_state(b"armed_home"), StateEvent::ArmedHome);
        assert_eq!(decode_state(b"armed_night"), StateEvent::ArmedNight);
        assert_eq!(decode_state(b"disarmed"), StateEvent::Disarmed);
        assert_eq!(decode_state(b"triggered"), StateEvent::Triggered);
        assert_eq!(decode_state(b"pending"), StateEvent::Pending);
        assert_eq!(decode_state(b"arming"), StateEvent::Arming);
    }

    #[test]
    fn match_is_exact_no_trimming_no_case_folding() {
        for raw in [
            &b"ARMED_AWAY"[..],
            b"armed_away ",
            b" armed_away",
            b"armed_away\n",
            b"Disarmed",
            b"",
            b"armed",
        ] {
            assert!(
                matches!(decode_state(raw), StateEvent::Unrecognized(_)),
                "{raw:?} must not decode"
            );
        }
    }

    #[test]
    fn unrecognized_keeps_printable_snippet() {
        let StateEvent::Unrecognized(raw) = decode_state(b"boom\x01\xFFx") else {
            panic!("expected unrecognized");
        };
        assert_eq!(raw.as_str(), "boom..x");
    }

    #[test]
    fn long_garbage_is_truncated_not_rejected() {
        let payload = vec![b'a'; 500];
        let StateEvent::Unrecognized(raw) = decode_state(&payload) else {
            panic!("expected unrecognized");
        };
        assert_eq!(raw.len(), 48);
    }

    #[test]
    fn credential_hex_format() {
        assert_eq!(
            encode_credential(&[0xAB, 0xCD, 0x12, 0x34]).unwrap().as_str(),
            "AB-CD-12-34"
        );
        assert_eq!(encode_credential(&[0x05]).unwrap().as_str(), "05");
    }

    #[test]
    fn empty_uid_is_not_encodable() {
        assert!(encode_credential(&[]).is_none());
    }

    #[test]
    fn ten_byte_uid_fits() {
        let uid = [0u8; 10];
        let hex = encode_credential(&uid).unwrap();
        assert_eq!(hex.len(), 29); // 10 × 2 hex + 9 separators
    }

    // ── publish sequence ─────────────────────────────────────

    struct TransportSpy {
        published: Vec<(String, Vec<u8>)>,
    }

    impl Transport for TransportSpy {
        fn poll_incoming(&mut self) -> Option<InboundMessage> {
            None
        }
        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            self.published.push((topic.to_string(), payload.to_vec()));
            Ok(())
        }
        fn is_connected(&self) -> bool {
            true
        }
        fn reconnect(&mut self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[test]
    fn badge_publish_is_empty_then_hex() {
        let mut t = TransportSpy { published: Vec::new() };
        let hex = publish_badge(&mut t, "alarm/panel/garage/card", &[0xDE, 0xAD]).unwrap();
        assert_eq!(hex.as_str(), "DE-AD");
        assert_eq!(
            t.published,
            vec![
                ("alarm/panel/garage/card".to_string(), Vec::new()),
                ("alarm/panel/garage/card".to_string(), b"DE-AD".to_vec()),
            ]
        );
    }

    #[test]
    fn empty_uid_publishes_nothing() {
        let mut t = TransportSpy { published: Vec::new() };
        assert!(publish_badge(&mut t, "t", &[]).is_err());
        assert!(t.published.is_empty());
    }
}
