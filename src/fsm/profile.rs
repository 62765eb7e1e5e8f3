//! Static state → presentation lookup table.
//!
//! Pure configuration data: for each alarm state, which display asset and
//! title to render, which colour the indicator strip takes, and how (or
//! whether) the beeper runs. `Unknown` has no presentation — the boot
//! prompt is rendered by the main loop, not through this table.

use super::AlarmState;

/// Colour as an (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Identifies a drawable state image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetId {
    Armed,
    Disarmed,
    Pending,
    Triggered,
}

/// One row of the presentation table.
#[derive(Debug, Clone, Copy)]
pub struct Presentation {
    pub asset: AssetId,
    pub label: &'static str,
    pub color: Rgb,
    /// Beep every N ticks while in this state; `None` means silent.
    pub cadence: Option<u32>,
    /// Single confirmation chirp on entry instead of a cadence.
    pub entry_chirp: bool,
}

const ARMED_AWAY: Presentation = Presentation {
    asset: AssetId::Armed,
    label: "Fully Armed",
    color: (0, 0, 255),
    cadence: None,
    entry_chirp: true,
};

const ARMED_HOME: Presentation = Presentation {
    asset: AssetId::Armed,
    label: "Armed Home",
    color: (0, 0, 255),
    cadence: None,
    entry_chirp: true,
};

const ARMED_NIGHT: Presentation = Presentation {
    asset: AssetId::Armed,
    label: "Armed Night",
    color: (0, 0, 255),
    cadence: None,
    entry_chirp: true,
};

const DISARMED: Presentation = Presentation {
    asset: AssetId::Disarmed,
    label: "Disarmed",
    color: (0, 255, 0),
    cadence: None,
    entry_chirp: false,
};

const TRIGGERED: Presentation = Presentation {
    asset: AssetId::Triggered,
    label: "Intrusion!!!",
    color: (255, 0, 0),
    cadence: Some(4),
    entry_chirp: false,
};

const PENDING: Presentation = Presentation {
    asset: AssetId::Pending,
    label: "Pending",
    color: (255, 69, 0),
    cadence: Some(10),
    entry_chirp: false,
};

const ARMING: Presentation = Presentation {
    asset: AssetId::Pending,
    label: "Arming",
    color: (255, 69, 0),
    cadence: Some(15),
    entry_chirp: false,
};

/// Look up the presentation for a state. `Unknown` renders nothing.
pub fn presentation(state: AlarmState) -> Option<&'static Presentation> {
    match state {
        AlarmState::ArmedAway => Some(&ARMED_AWAY),
        AlarmState::ArmedHome => Some(&ARMED_HOME),
        AlarmState::ArmedNight => Some(&ARMED_NIGHT),
        AlarmState::Disarmed => Some(&DISARMED),
        AlarmState::Pending => Some(&PENDING),
        AlarmState::Arming => Some(&ARMING),
        AlarmState::Triggered => Some(&TRIGGERED),
        AlarmState::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_states_share_asset_and_colour() {
        for s in [
            AlarmState::ArmedAway,
            AlarmState::ArmedHome,
            AlarmState::ArmedNight,
        ] {
            let p = presentation(s).unwrap();
            assert_eq!(p.asset, AssetId::Armed);
            assert_eq!(p.color, (0, 0, 255));
            assert_eq!(p.cadence, None);
            assert!(p.entry_chirp);
        }
    }

    #[test]
    fn armed_labels() {
        assert_eq!(presentation(AlarmState::ArmedAway).unwrap().label, "Fully Armed");
        assert_eq!(presentation(AlarmState::ArmedHome).unwrap().label, "Armed Home");
        assert_eq!(presentation(AlarmState::ArmedNight).unwrap().label, "Armed Night");
    }

    #[test]
    fn triggered_presentation() {
        let p = presentation(AlarmState::Triggered).unwrap();
        assert_eq!(p.asset, AssetId::Triggered);
        assert_eq!(p.label, "Intrusion!!!");
        assert_eq!(p.color, (255, 0, 0));
        assert_eq!(p.cadence, Some(4));
        assert!(!p.entry_chirp);
    }

    #[test]
    fn pending_and_arming_share_asset_but_not_cadence() {
        let pending = presentation(AlarmState::Pending).unwrap();
        let arming = presentation(AlarmState::Arming).unwrap();
        assert_eq!(pending.asset, AssetId::Pending);
        assert_eq!(arming.asset, AssetId::Pending);
        assert_eq!(pending.color, (255, 69, 0));
        assert_eq!(arming.color, (255, 69, 0));
        assert_eq!(pending.cadence, Some(10));
        assert_eq!(arming.cadence, Some(15));
    }

    #[test]
    fn disarmed_is_green_and_silent() {
        let p = presentation(AlarmState::Disarmed).unwrap();
        assert_eq!(p.color, (0, 255, 0));
        assert_eq!(p.cadence, None);
        assert!(!p.entry_chirp);
    }

    #[test]
    fn unknown_has_no_presentation() {
        assert!(presentation(AlarmState::Unknown).is_none());
    }
}
